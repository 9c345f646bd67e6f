use std::io;
use std::sync::Arc;

use log::{info, warn};
use tokio::{net::TcpListener, signal};

use distributions::Registry;
use server::Settings;

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let settings = Settings::from_env().map_err(io::Error::other)?;
    let registry = Registry::new().map_err(io::Error::other)?;

    let addr = settings.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("serving distribution API at {addr}");

    let state = Arc::new((registry, settings));
    tokio::select! {
        ret = serve(listener, state) => {
            ret?;
        }
        _ = signal::ctrl_c() => {
            info!("received SIGTERM, shutting down");
        }
    }

    Ok(())
}

async fn serve(listener: TcpListener, state: Arc<(Registry, Settings)>) -> io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let (registry, settings) = &*state;
            if let Err(e) = server::handle_connection(stream, registry, settings).await {
                warn!("connection error from {peer}: {e}");
            }
        });
    }
}
