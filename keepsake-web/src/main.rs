//! keepsake-web - Personal memory-site web service
//!
//! A single binary serving the themed single-page site: letters, photo
//! gallery, audio playlist and two mini-games. Letters and photos persist
//! in the local object store, songs in sqlite, uploads on local disk; all
//! durable state lives under one root folder.

use anyhow::Result;
use clap::Parser;
use keepsake_common::config::{self, RootLayout, DEFAULT_PORT};
use keepsake_common::db;
use keepsake_common::store::Store;
use keepsake_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "keepsake-web", version, about = "Personal memory-site web service")]
struct Args {
    /// Root folder for all durable state (database, records, uploads)
    #[arg(long)]
    root: Option<PathBuf>,

    /// HTTP port to listen on
    #[arg(long, env = "KEEPSAKE_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting keepsake-web v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Resolve the root folder (CLI > env > config file > OS default) and
    // make sure the layout underneath it exists
    let root = config::resolve_root_folder(args.root.as_deref());
    let layout = RootLayout::new(root);
    layout.ensure_directories()?;

    // Open or create the song database
    let db_path = layout.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = db::init_database(&db_path).await?;

    // Open the local object store once; the handle is reused for the whole
    // session
    let store_path = layout.store_path();
    info!("Record container: {}", store_path.display());
    let store = Store::open(&store_path).await?;

    // Create application state and populate the projections
    let state = AppState::new(db_pool, store, layout.uploads_dir());
    state.cold_start().await?;

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("Listening on http://0.0.0.0:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
