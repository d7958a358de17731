use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use protocol::PlayerId;

use crate::room::{Delivery, Outbound, Room};

/// Owns every live room. A room's lock is held for the whole step, from the
/// mutation through queueing its notifications, so per-room event handling
/// is strictly serial while distinct rooms proceed in parallel.
///
/// Rooms die as soon as a step leaves them empty. The `closed` flag marks a
/// guard taken on a dying room so a racing join falls through and retries
/// against a fresh entry.
pub struct Registry {
    rooms: RwLock<HashMap<String, Arc<Mutex<Room>>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Runs a join step, creating the room on first use.
    pub async fn join<F>(&self, token: &str, step: F)
    where
        F: FnOnce(&mut Room) -> Vec<Outbound>,
    {
        let (handle, room) = loop {
            let handle = {
                let mut rooms = self.rooms.write().await;
                rooms
                    .entry(token.to_string())
                    .or_insert_with(|| {
                        info!("room {} opened", token);
                        Arc::new(Mutex::new(Room::new()))
                    })
                    .clone()
            };
            let room = handle.clone().lock_owned().await;
            if !room.closed {
                break (handle, room);
            }
        };
        self.finish(token, handle, room, step).await;
    }

    /// Runs a step against an existing room. Unknown tokens, and rooms
    /// caught mid-close, are a no-op returning false.
    pub async fn update<F>(&self, token: &str, step: F) -> bool
    where
        F: FnOnce(&mut Room) -> Vec<Outbound>,
    {
        let handle = {
            let rooms = self.rooms.read().await;
            match rooms.get(token) {
                Some(handle) => handle.clone(),
                None => return false,
            }
        };
        let room = handle.clone().lock_owned().await;
        if room.closed {
            return false;
        }
        self.finish(token, handle, room, step).await;
        true
    }

    /// Applies the disconnect of a player to every room. Rooms that never
    /// listed the player stay quiet.
    pub async fn sweep(&self, id: PlayerId) {
        let tokens: Vec<String> = {
            let rooms = self.rooms.read().await;
            rooms.keys().cloned().collect()
        };
        for token in tokens {
            self.update(&token, |room| room.remove_player(id)).await;
        }
    }

    /// Drops every room. In-flight steps finish first, later events see
    /// only unknown rooms.
    pub async fn teardown(&self) {
        let drained: Vec<(String, Arc<Mutex<Room>>)> = {
            let mut rooms = self.rooms.write().await;
            rooms.drain().collect()
        };
        for (token, handle) in drained {
            let mut room = handle.lock_owned().await;
            room.closed = true;
            debug!("room {} dropped at shutdown", token);
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    #[cfg(test)]
    pub async fn contains(&self, token: &str) -> bool {
        self.rooms.read().await.contains_key(token)
    }

    async fn finish<F>(
        &self,
        token: &str,
        handle: Arc<Mutex<Room>>,
        mut room: OwnedMutexGuard<Room>,
        step: F,
    ) where
        F: FnOnce(&mut Room) -> Vec<Outbound>,
    {
        let outs = step(&mut room);
        deliver(room.resolve(outs)).await;
        if room.is_empty() {
            room.closed = true;
            drop(room);
            self.discard(token, &handle).await;
        }
    }

    /// Removes the map entry of a room that just closed. The pointer compare
    /// keeps a fresh room that already reused the token from being evicted.
    async fn discard(&self, token: &str, handle: &Arc<Mutex<Room>>) {
        let mut rooms = self.rooms.write().await;
        if matches!(rooms.get(token), Some(live) if Arc::ptr_eq(live, handle)) {
            rooms.remove(token);
            info!("room {} closed", token);
        }
    }
}

async fn deliver(deliveries: Vec<Delivery>) {
    for (tx, event) in deliveries {
        tx.send(event).await.unwrap_or_default();
    }
}
