mod collect;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::collect::CollectOptions;

#[derive(Debug, Parser)]
#[command(name = "shoedb-cli")]
#[command(about = "Load a paginated shoe catalog into Postgres")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every catalog page and store the extracted products
    Collect {
        /// Number of listing pages to fetch (overrides `SHOEDB_TOTAL_PAGES`)
        #[arg(long)]
        total_pages: Option<u32>,

        /// Pause between page requests in milliseconds (overrides `SHOEDB_PAGE_DELAY_MS`)
        #[arg(long)]
        page_delay_ms: Option<u64>,

        /// Log extracted records instead of writing them to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shoedb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Collect {
            total_pages,
            page_delay_ms,
            dry_run,
        } => {
            let cancel = CancellationToken::new();
            tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

            let options = CollectOptions {
                total_pages,
                page_delay_ms,
                dry_run,
            };
            collect::run_collect(&config, options, &cancel).await?;
        }
        Commands::Migrate => {
            let pool_config = shoedb_db::PoolConfig::from_app_config(&config);
            let pool = shoedb_db::connect_pool(&config.database_url, pool_config).await?;
            let applied = shoedb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            pool.close().await;
        }
    }

    Ok(())
}

async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::warn!("received shutdown signal; finishing dispatched work before exit");
    cancel.cancel();
}
