use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-minted identifier, unique per accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Match,
    Pictionary,
}

pub type ScoreMap = BTreeMap<PlayerId, u32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_mode_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_value(GameMode::Match).unwrap(),
            serde_json::json!("match")
        );
        assert_eq!(
            serde_json::from_str::<GameMode>("\"pictionary\"").unwrap(),
            GameMode::Pictionary
        );
    }

    #[test]
    fn track_optionals_default_and_drop() {
        let track: Track =
            serde_json::from_str(r#"{"id":"t1","name":"Imagine","artist":"John Lennon"}"#).unwrap();
        assert_eq!(track.album, None);
        assert_eq!(
            serde_json::to_value(&track).unwrap(),
            serde_json::json!({"id": "t1", "name": "Imagine", "artist": "John Lennon"})
        );
    }

    #[test]
    fn track_preview_url_is_camel_case() {
        let track = Track {
            id: "t1".into(),
            name: "n".into(),
            artist: "a".into(),
            album: None,
            image: None,
            preview_url: Some("https://cdn.example/p.mp3".into()),
            duration: Some(30_000),
        };
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["previewUrl"], "https://cdn.example/p.mp3");
        assert_eq!(value["duration"], 30_000);
    }
}
