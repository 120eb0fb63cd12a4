use liqscope::{api, config::Config, db::init_db, HttpQuoteSource, LeadStore, QuoteSource, SqliteLeadStore};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize lead store: {}", e);
            std::process::exit(1);
        }
    };

    let quotes: Arc<dyn QuoteSource> =
        match HttpQuoteSource::new(config.quote_api_url.clone(), config.quote_timeout) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                eprintln!("Failed to build quote client: {}", e);
                std::process::exit(1);
            }
        };
    let leads: Arc<dyn LeadStore> = Arc::new(SqliteLeadStore::new(pool));

    let app = api::create_router(api::AppState::new(config, quotes, leads));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
