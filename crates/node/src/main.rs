//! Ledger node entry point.

use domain::LedgerService;
use journal::InMemoryJournal;
use node::config::{Config, LogFormat};
use node::error::NodeError;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logs go to stderr; stdout carries responses only.
fn init_tracing(config: &Config) -> Result<(), NodeError> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (text, json) = match config.log_format {
        LogFormat::Text => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), NodeError> {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config)?;

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    // 3. Build the ledger from its genesis document
    let genesis = node::load_genesis(&config)?;
    tracing::info!(
        owner = %genesis.owner,
        store = %genesis.store_name,
        allocations = genesis.allocations.len(),
        "starting ledger node"
    );
    let service = LedgerService::new(InMemoryJournal::new(), genesis)?;

    // 4. Serve JSON Lines until stdin closes
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let handled = node::serve(&service, stdin, &mut stdout).await?;
    tracing::info!(requests = handled, "input closed, shutting down");

    if config.metrics_dump {
        eprintln!("{}", metrics_handle.render());
    }

    Ok(())
}
