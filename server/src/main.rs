mod consts;
mod error;
mod gateway;
mod preview;
mod registry;
mod room;
mod themes;

use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use tokio::net::TcpListener;
use warp::Filter;

use error::ServerError;
use gateway::Gateway;
use preview::PreviewResolver;
use registry::Registry;
use themes::ThemeCatalog;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Port the websocket game endpoint listens on
    #[clap(short, long, default_value_t = 9000)]
    port: u16,
    /// Port the http preview api listens on
    #[clap(short, long, default_value_t = 3001)]
    api_port: u16,
    /// Theme catalog file
    #[clap(short, long, default_value = "data/themes.json")]
    themes: String,
    /// Base url of the public track catalog
    #[clap(short, long, default_value = "https://open.spotify.com")]
    catalog: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args).await {
        error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let themes = Arc::new(ThemeCatalog::load(&args.themes)?);
    info!("{} themes loaded from {}", themes.len(), args.themes);

    let registry = Arc::new(Registry::new());
    let gateway = Arc::new(Gateway::new(registry.clone(), themes));

    let cors = warp::cors().allow_any_origin().allow_methods(vec!["GET"]);
    let resolver = PreviewResolver::new(args.catalog);
    let preview_service = warp::path!("api" / "preview" / String)
        .and(warp::any().map(move || resolver.clone()))
        .and_then(preview::preview_handle)
        .with(cors);
    let api = tokio::spawn(warp::serve(preview_service).run(([0, 0, 0, 0], args.api_port)));
    info!("preview api on port {}", args.api_port);

    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("listening for players on port {}", args.port);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, addr) = match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        warn!("accept failed: {}", err);
                        continue;
                    }
                };
                let gateway = gateway.clone();
                tokio::spawn(async move { gateway.serve(stream, addr).await });
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("shutting down");
    registry.teardown().await;
    api.abort();
    Ok(())
}
