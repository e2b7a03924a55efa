use clap::Parser;
use district_matcher::CascadingMatcher;
use district_matcher_server::{init_tracing, load_config, run_server};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// TOML matcher configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of `<key>.geojson` collections (overrides the config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Maximum resident collections (overrides the config)
    #[arg(long)]
    cache_capacity: Option<usize>,

    /// Region codes whose district layers are loaded at startup
    #[arg(long, value_delimiter = ',')]
    preload: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(capacity) = args.cache_capacity {
        // validated by the builder
        config.cache_capacity = capacity;
    }
    if !args.preload.is_empty() {
        config = config.with_preload(args.preload);
    }

    info!("Loading districts from {}", config.data_dir.display());
    let matcher = CascadingMatcher::builder()
        .config(config)
        .warm_up(true)
        .build()?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl_c signal: {}", e);
        }
    };

    run_server(listener, Arc::new(matcher), shutdown).await?;

    Ok(())
}
