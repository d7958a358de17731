use serde::{Deserialize, Serialize};

use crate::types::{GameMode, PlayerId, ScoreMap, Track};
use crate::JsonMessage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub pseudo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: i64,
    pub pseudo: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundPlayer {
    pub id: PlayerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo: Option<String>,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub player1: RoundPlayer,
    pub player2: RoundPlayer,
    pub matches: Vec<String>,
    pub scores: ScoreMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    PlayersUpdate(Vec<PlayerInfo>),
    #[serde(rename_all = "camelCase")]
    RoomInfo {
        is_creator: bool,
    },
    ChatHistory(Vec<ChatEntry>),
    ChatMessage(ChatEntry),
    GameStarted {
        theme: String,
        mode: GameMode,
    },
    ThemeUpdate(String),
    ScoresUpdate(ScoreMap),
    OpponentReady,
    RoundResult(RoundResult),
    ReadyCount(usize),
    SkipCount(usize),
    NewRound {
        theme: String,
    },

    #[serde(rename = "game2-start-drawing")]
    StartDrawing {
        track: Track,
    },
    #[serde(rename = "game2-wait-drawing")]
    WaitDrawing,
    #[serde(rename = "game2-playlist-tracks")]
    PlaylistTracks {
        tracks: Vec<Track>,
    },
    #[serde(rename = "game2-stroke")]
    Stroke(serde_json::Value),
    #[serde(rename = "game2-clear")]
    ClearCanvas,
    #[serde(rename = "game2-result")]
    GuessResult {
        correct: bool,
        guess: String,
        track: Track,
        scores: ScoreMap,
    },
    #[serde(rename = "game2-ready-count")]
    PictionaryReadyCount(usize),
    #[serde(rename = "game2-new-round")]
    PictionaryNewRound,
}

impl JsonMessage for ServerEvent {}
