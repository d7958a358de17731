use serde::{Deserialize, Serialize};

use crate::types::{GameMode, Track};
use crate::JsonMessage;

#[derive(Deserialize, Serialize, PartialEq, Debug)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: String,
        pseudo: String,
    },
    #[serde(rename_all = "camelCase")]
    StartGame {
        room_id: String,
        mode: Option<GameMode>,
    },
    #[serde(rename_all = "camelCase")]
    SubmitTracks {
        room_id: String,
        tracks: Vec<Track>,
    },
    #[serde(rename_all = "camelCase")]
    ReadyNextRound {
        room_id: String,
    },
    #[serde(rename_all = "camelCase")]
    SkipRound {
        room_id: String,
    },
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        room_id: String,
        pseudo: String,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    LeaveRoom {
        room_id: String,
    },
    #[serde(rename = "game2-set-track", rename_all = "camelCase")]
    SetTrack {
        room_id: String,
        track: Track,
        #[serde(default)]
        playlist_tracks: Vec<Track>,
    },
    #[serde(rename = "game2-draw-stroke", rename_all = "camelCase")]
    DrawStroke {
        room_id: String,
        stroke: serde_json::Value,
    },
    #[serde(rename = "game2-clear-canvas", rename_all = "camelCase")]
    ClearCanvas {
        room_id: String,
    },
    #[serde(rename = "game2-guess", rename_all = "camelCase")]
    Guess {
        room_id: String,
        guess: String,
    },
    #[serde(rename = "game2-next-round", rename_all = "camelCase")]
    NextRound {
        room_id: String,
    },
}

impl JsonMessage for ClientEvent {}

impl ClientEvent {
    pub fn room_id(&self) -> &str {
        match self {
            ClientEvent::JoinRoom { room_id, .. }
            | ClientEvent::StartGame { room_id, .. }
            | ClientEvent::SubmitTracks { room_id, .. }
            | ClientEvent::ReadyNextRound { room_id }
            | ClientEvent::SkipRound { room_id }
            | ClientEvent::ChatMessage { room_id, .. }
            | ClientEvent::LeaveRoom { room_id }
            | ClientEvent::SetTrack { room_id, .. }
            | ClientEvent::DrawStroke { room_id, .. }
            | ClientEvent::ClearCanvas { room_id }
            | ClientEvent::Guess { room_id, .. }
            | ClientEvent::NextRound { room_id } => room_id,
        }
    }
}
