//! HavWtr Person Info Server
//!
//! An MCP server for measurement conversion and person-info sync.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use havwtr::api::ApiClient;
use havwtr::config::Config;
use havwtr::mcp::HavWtrService;
use havwtr::{build_info, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("havwtr=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env()?;
    tracing::info!(
        database = %config.database_path.display(),
        measurement = ?config.measurement,
        api_configured = config.api_base_url.is_some(),
        "loaded configuration"
    );

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        if db::migrations::is_current(conn)? {
            tracing::info!(version, "database ready");
        } else {
            tracing::warn!(version, "database schema is newer than this build");
        }
        Ok(())
    })?;

    let api = match config.api_base_url {
        Some(_) => Some(ApiClient::from_config(&config)?),
        None => {
            tracing::warn!("HAVWTR_API_BASE_URL not set; server sync tools disabled");
            None
        }
    };

    let service = HavWtrService::new(config, database, api);

    eprintln!("Starting MCP server on stdio...");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
