use anyhow::{bail, Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use nt_auth::{ApiKeyGenerator, AuthConfig};
use nt_core::logging::init_logging;
use nt_core::{Article, ArticleStore};
use nt_storage::FallbackConfig;
use nt_web::ServerConfig;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Categorized news API", long_about = None)]
pub struct Cli {
    /// Log more
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Upsert a JSON array of articles into the configured stores
    Import(ImportArgs),
    /// Print a fresh API key for the API_KEYS variable
    Keygen,
}

#[derive(Args, Debug, Clone)]
struct StoreArgs {
    /// SQLite file backing the primary store
    #[arg(long, env = "DATABASE_PATH")]
    database_path: Option<PathBuf>,
    /// Directory backing the secondary document store
    #[arg(long, env = "DOCUMENT_STORE_DIR")]
    document_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    /// `production` disables the generated development key
    #[arg(long, env = "APP_ENV", default_value = "development")]
    app_env: String,
    #[arg(
        long,
        env = "REQUIRE_API_KEY",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    require_api_key: bool,
    /// Comma-separated list of accepted keys
    #[arg(long, env = "API_KEYS", value_delimiter = ',')]
    api_keys: Vec<String>,
    /// Serve demo data when the primary store answers with no rows
    #[arg(
        long,
        env = "EMPTY_RESULT_TRIGGERS_FALLBACK",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    empty_result_triggers_fallback: bool,
    /// Per-store read timeout, 0 to wait indefinitely
    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value_t = 5)]
    store_timeout_secs: u64,
    #[arg(long, env = "HEARTBEAT_SECS", default_value_t = 30)]
    heartbeat_secs: u64,
    #[command(flatten)]
    stores: StoreArgs,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        let store_timeout = match self.store_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        ServerConfig {
            addr: SocketAddr::new(self.host, self.port),
            auth: AuthConfig {
                require_api_key: self.require_api_key,
                api_keys: self.api_keys,
                production: self.app_env.eq_ignore_ascii_case("production"),
            },
            fallback: FallbackConfig {
                empty_result_triggers_fallback: self.empty_result_triggers_fallback,
                store_timeout,
            },
            primary_path: self.stores.database_path,
            document_dir: self.stores.document_dir,
            heartbeat: Duration::from_secs(self.heartbeat_secs.max(1)),
        }
    }
}

#[derive(Args, Debug, Clone)]
struct ImportArgs {
    /// JSON file holding an array of articles
    file: PathBuf,
    #[command(flatten)]
    stores: StoreArgs,
}

fn load_articles(path: &Path) -> Result<Vec<Article>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let articles: Vec<Article> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of articles", path.display()))?;
    Ok(articles.into_iter().map(Article::normalized).collect())
}

async fn import(args: ImportArgs) -> Result<()> {
    let articles = load_articles(&args.file)?;
    info!("📥 Loaded {} articles from {}", articles.len(), args.file.display());

    let mut stores: Vec<Arc<dyn ArticleStore>> = Vec::new();
    if let Some(primary) = nt_storage::open_primary(args.stores.database_path.as_deref()).await {
        stores.push(primary);
    }
    if let Some(secondary) = nt_storage::open_secondary(args.stores.document_dir.as_deref()) {
        stores.push(secondary);
    }
    if stores.is_empty() {
        bail!("No store available; pass --database-path and/or --document-dir");
    }

    let report = nt_storage::upsert_everywhere(&stores, &articles).await;
    if report.stored == 0 && report.failed > 0 {
        bail!("Every write failed ({} attempts)", report.failed);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::INFO });

    match cli.command {
        Commands::Serve(args) => {
            let config = args.into_config();
            nt_web::serve(config).await.context("Server failed")?;
        }
        Commands::Import(args) => import(args).await?,
        Commands::Keygen => println!("{}", ApiKeyGenerator::new().generate()),
    }
    Ok(())
}
