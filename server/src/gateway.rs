use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time;
use tokio_tungstenite::tungstenite::Message as WsMsg;

use protocol::{ClientEvent, JsonMessage, PlayerId, ServerEvent};

use crate::consts::{HB_DURATION, OUTBOUND_BUFFER};
use crate::registry::Registry;
use crate::themes::ThemeCatalog;

/// Front door for player connections. Each accepted socket gets a freshly
/// minted `PlayerId` and an outbound pump; inbound text frames decode into
/// client events and run against the registry. A dead or unknown room makes
/// the event a no-op rather than an error back to the client.
pub struct Gateway {
    registry: Arc<Registry>,
    themes: Arc<ThemeCatalog>,
    next_id: AtomicU64,
}

impl Gateway {
    pub fn new(registry: Arc<Registry>, themes: Arc<ThemeCatalog>) -> Self {
        Self {
            registry,
            themes,
            next_id: AtomicU64::new(1),
        }
    }

    /// Drives one connection from handshake to disconnect sweep.
    pub async fn serve(&self, stream: TcpStream, addr: SocketAddr) {
        let ws_stream = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws_stream) => ws_stream,
            Err(err) => {
                warn!("handshake with {} failed: {}", addr, err);
                return;
            }
        };
        let id = self.mint_id();
        info!("connection {} opened from {}", id, addr);

        let (mut ws_tx, mut ws_rx) = ws_stream.split();
        let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER);

        let pump = tokio::spawn(async move {
            let mut keepalive = time::interval(HB_DURATION);
            loop {
                tokio::select! {
                    event = rx.recv() => {
                        let event = match event {
                            Some(event) => event,
                            None => break,
                        };
                        let msg = match event.encode() {
                            Ok(msg) => msg,
                            Err(err) => {
                                debug!("dropped an unencodable event: {}", err);
                                continue;
                            }
                        };
                        if ws_tx.send(msg).await.is_err() {
                            break;
                        }
                    }
                    _ = keepalive.tick() => {
                        if ws_tx.send(WsMsg::Ping(Vec::new())).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                WsMsg::Text(text) => match ClientEvent::decode(&text) {
                    Ok(event) => self.dispatch(id, &tx, event).await,
                    Err(err) => debug!("connection {} sent an undecodable frame: {}", id, err),
                },
                WsMsg::Close(_) => break,
                // binary and control frames carry no events
                _ => {}
            }
        }

        self.registry.sweep(id).await;
        pump.abort();
        info!("connection {} closed", id);
    }

    async fn dispatch(&self, id: PlayerId, tx: &mpsc::Sender<ServerEvent>, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom { room_id, pseudo } => {
                let tx = tx.clone();
                self.registry
                    .join(&room_id, |room| room.join(id, pseudo, tx))
                    .await;
            }
            ClientEvent::LeaveRoom { room_id } => {
                let known = self
                    .registry
                    .update(&room_id, |room| room.remove_player(id))
                    .await;
                if !known {
                    debug!("leave for unknown room {} dropped", room_id);
                }
            }
            event => {
                let token = event.room_id().to_string();
                let known = self
                    .registry
                    .update(&token, |room| room.handle(id, &self.themes, event))
                    .await;
                if !known {
                    debug!("event for unknown room {} dropped", token);
                }
            }
        }
    }

    fn mint_id(&self) -> PlayerId {
        PlayerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}
