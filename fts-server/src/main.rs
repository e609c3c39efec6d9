use anyhow::Result;
use clap::Parser;
use fts_core::engine::Engine;
use fts_core::index;
use fts_core::store::{Namespace, Store};
use fts_server::build_app;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "fts-server")]
#[command(about = "Full-text search over a Wikipedia abstract dump", long_about = None)]
struct Args {
    /// Path to the gzipped XML abstract dump
    #[arg(long)]
    path: String,
    /// The server port
    #[arg(long, default_value = "5000")]
    port: String,
    /// Directory where the index is stored
    #[arg(long = "dataDir", default_value = "data")]
    data_dir: String,
    /// Drop the stored documents and index and rebuild them from the dump
    #[arg(long, default_value_t = false)]
    rebuild: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let store = Arc::new(Store::open(&args.data_dir)?);

    if args.rebuild {
        tracing::info!("rebuild requested, dropping stored documents, index and cached results");
        store.drop_namespace(Namespace::Docs)?;
        store.drop_namespace(Namespace::Index)?;
        store.drop_namespace(Namespace::Results)?;
    }

    index::load_documents(&store, &args.path)?;
    index::build_index(&store)?;

    let engine = Arc::new(Engine::new(store));
    let app = build_app(engine);

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
