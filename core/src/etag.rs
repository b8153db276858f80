//! Entity tags and the precondition headers derived from them.
//!
//! A caller holds whatever tag the service last returned for an item and
//! passes it back verbatim. Three states matter:
//!
//! - `Absent` (the empty string): no conditioning. Only meaningful for reads.
//! - `Any` (`*`): match any version.
//! - `Specific`: the exact version string, quotes included.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityTag {
    #[default]
    Absent,
    Any,
    Specific(String),
}

impl EntityTag {
    pub const WILDCARD: &'static str = "*";

    /// Interpret a caller-supplied tag string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" => EntityTag::Absent,
            Self::WILDCARD => EntityTag::Any,
            other => EntityTag::Specific(other.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, EntityTag::Absent)
    }

    /// Value for `If-None-Match` on a read. Absent and wildcard tags do not
    /// condition a read.
    pub fn if_none_match(&self) -> Option<&str> {
        match self {
            EntityTag::Specific(tag) => Some(tag),
            EntityTag::Absent | EntityTag::Any => None,
        }
    }

    /// Value for `If-Match` on a mutation. `None` only for an absent tag,
    /// which mutations reject.
    pub fn if_match(&self) -> Option<&str> {
        match self {
            EntityTag::Any => Some(Self::WILDCARD),
            EntityTag::Specific(tag) => Some(tag),
            EntityTag::Absent => None,
        }
    }
}

impl From<&str> for EntityTag {
    fn from(raw: &str) -> Self {
        EntityTag::parse(raw)
    }
}

impl From<String> for EntityTag {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "" => EntityTag::Absent,
            Self::WILDCARD => EntityTag::Any,
            _ => EntityTag::Specific(raw),
        }
    }
}

impl From<Option<&str>> for EntityTag {
    fn from(raw: Option<&str>) -> Self {
        raw.map(EntityTag::parse).unwrap_or_default()
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityTag::Absent => Ok(()),
            EntityTag::Any => f.write_str(Self::WILDCARD),
            EntityTag::Specific(tag) => f.write_str(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_three_states() {
        assert_eq!(EntityTag::parse(""), EntityTag::Absent);
        assert_eq!(EntityTag::parse("*"), EntityTag::Any);
        assert_eq!(
            EntityTag::parse("\"v1\""),
            EntityTag::Specific("\"v1\"".to_string())
        );
    }

    #[test]
    fn read_conditioning_skips_absent_and_wildcard() {
        assert_eq!(EntityTag::Absent.if_none_match(), None);
        assert_eq!(EntityTag::Any.if_none_match(), None);
        assert_eq!(EntityTag::from("\"7\"").if_none_match(), Some("\"7\""));
    }

    #[test]
    fn mutation_conditioning() {
        assert_eq!(EntityTag::Any.if_match(), Some("*"));
        assert_eq!(EntityTag::from("\"7\"").if_match(), Some("\"7\""));
        assert_eq!(EntityTag::Absent.if_match(), None);
    }

    #[test]
    fn specific_tag_is_kept_verbatim() {
        // Weak tags and unquoted values pass through untouched.
        let weak = EntityTag::from("W/\"3\"");
        assert_eq!(weak.if_match(), Some("W/\"3\""));
        let bare = EntityTag::from(String::from("v9"));
        assert_eq!(bare.to_string(), "v9");
    }

    #[test]
    fn option_conversion() {
        assert_eq!(EntityTag::from(None::<&str>), EntityTag::Absent);
        assert_eq!(EntityTag::from(Some("*")), EntityTag::Any);
    }
}
