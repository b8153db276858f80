//! `splist`: issue one request against a Projects or References list and
//! print the raw response.

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sp_list_core::{AccessToken, EntityTag, HttpResponse, ListKind, ListServiceConfig, RemoteListClient};

#[derive(Debug, Parser)]
#[command(name = "splist", version, about = "Read and modify items in a SharePoint-style list")]
struct Cli {
    /// Configuration file; `SPLIST_*` variables override it.
    #[arg(long, short, env = "SPLIST_CONFIG")]
    config: Option<String>,

    /// Bearer token for the list service.
    #[arg(long, env = "SPLIST_TOKEN", hide_env_values = true)]
    token: String,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// GET an item, or the whole list when --id is omitted.
    Read {
        #[command(flatten)]
        target: Target,
        /// Last seen ETag; the service answers 304 if it still matches.
        #[arg(long, default_value = "")]
        etag: String,
    },
    /// POST a new atom entry read from a file (`-` for stdin).
    Create {
        #[arg(long, value_enum)]
        list: ListArg,
        #[arg(long)]
        body: String,
    },
    /// Update an item guarded by its ETag (`*` to overwrite any version).
    Update {
        #[command(flatten)]
        target: ItemTarget,
        #[arg(long)]
        etag: String,
        #[arg(long)]
        body: String,
    },
    /// Delete an item guarded by its ETag (`*` to delete any version).
    Delete {
        #[command(flatten)]
        target: ItemTarget,
        #[arg(long)]
        etag: String,
    },
}

#[derive(Debug, Args)]
struct Target {
    #[arg(long, value_enum)]
    list: ListArg,
    #[arg(long)]
    id: Option<u64>,
}

#[derive(Debug, Args)]
struct ItemTarget {
    #[arg(long, value_enum)]
    list: ListArg,
    #[arg(long)]
    id: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListArg {
    Projects,
    References,
}

impl From<ListArg> for ListKind {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Projects => ListKind::Projects,
            ListArg::References => ListKind::References,
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_body(source: &str) -> Result<String> {
    if source == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read body from stdin")?;
        return Ok(body);
    }
    std::fs::read_to_string(source).with_context(|| format!("failed to read body from {source}"))
}

fn print_response(response: &HttpResponse) {
    println!("HTTP {}", response.status);
    for (name, value) in &response.headers {
        println!("{name}: {value}");
    }
    println!();
    println!("{}", response.body);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = ListServiceConfig::load(cli.config.as_deref())?;
    info!(site = %config.site_url, "configuration loaded");
    let client = RemoteListClient::new(config)?;
    let requests = client.requests();
    let token = AccessToken::new(cli.token);

    let response = match cli.command {
        Command::Read { target, etag } => {
            let kind = ListKind::from(target.list);
            let uri = match target.id {
                Some(id) => requests.item_uri(kind, id),
                None => requests.items_uri(kind),
            };
            info!(list = %kind, %uri, "read");
            client.read(&uri, &token, &EntityTag::from(etag)).await?
        }
        Command::Create { list, body } => {
            let kind = ListKind::from(list);
            let uri = requests.items_uri(kind);
            info!(list = %kind, %uri, "create");
            client.create(&uri, &token, read_body(&body)?).await?
        }
        Command::Update { target, etag, body } => {
            let kind = ListKind::from(target.list);
            let uri = requests.item_uri(kind, target.id);
            info!(list = %kind, %uri, "update");
            client
                .update(&uri, &token, &EntityTag::from(etag), read_body(&body)?)
                .await?
        }
        Command::Delete { target, etag } => {
            let kind = ListKind::from(target.list);
            let uri = requests.item_uri(kind, target.id);
            info!(list = %kind, %uri, "delete");
            client.delete(&uri, &token, &EntityTag::from(etag)).await?
        }
    };

    print_response(&response);
    Ok(())
}
