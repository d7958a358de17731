use std::collections::HashSet;

use protocol::{PlayerId, ServerEvent, Track};
use unicode_normalization::UnicodeNormalization;

use super::{Outbound, Room};
use crate::consts::ROUND_PLAYERS;

/// Turn state for the drawing mode. The chooser of the track becomes the
/// guesser, whoever else is in the room draws it. Strokes are relayed and
/// never retained.
#[derive(Default)]
pub struct PictionaryRound {
    track: Option<Track>,
    drawer: Option<PlayerId>,
    guesser: Option<PlayerId>,
    playlist: Vec<Track>,
    ready: HashSet<PlayerId>,
}

impl PictionaryRound {
    pub fn replay_for(&self, id: PlayerId) -> Vec<Outbound> {
        let mut out = Vec::new();
        if let Some(track) = &self.track {
            if self.drawer == Some(id) {
                out.push(Outbound::To(
                    id,
                    ServerEvent::StartDrawing {
                        track: track.clone(),
                    },
                ));
            } else if self.guesser == Some(id) {
                out.push(Outbound::To(id, ServerEvent::WaitDrawing));
                out.push(Outbound::To(
                    id,
                    ServerEvent::PlaylistTracks {
                        tracks: self.playlist.clone(),
                    },
                ));
            }
        }
        out
    }
}

impl Room {
    pub fn set_track(&mut self, from: PlayerId, track: Track, playlist: Vec<Track>) -> Vec<Outbound> {
        let drawer = self.players.iter().map(|p| p.id).find(|id| *id != from);
        let mut out = Vec::new();
        if let Some(drawer) = drawer {
            out.push(Outbound::To(
                drawer,
                ServerEvent::StartDrawing {
                    track: track.clone(),
                },
            ));
        }
        out.push(Outbound::To(
            from,
            ServerEvent::PlaylistTracks {
                tracks: playlist.clone(),
            },
        ));
        self.pictionary.track = Some(track);
        self.pictionary.playlist = playlist;
        self.pictionary.drawer = drawer;
        self.pictionary.guesser = Some(from);
        out
    }

    pub fn relay_stroke(&self, stroke: serde_json::Value) -> Vec<Outbound> {
        match self.pictionary.guesser {
            Some(guesser) => vec![Outbound::To(guesser, ServerEvent::Stroke(stroke))],
            None => Vec::new(),
        }
    }

    pub fn relay_clear(&self) -> Vec<Outbound> {
        match self.pictionary.guesser {
            Some(guesser) => vec![Outbound::To(guesser, ServerEvent::ClearCanvas)],
            None => Vec::new(),
        }
    }

    /// One attempt per turn: right or wrong, the turn state is cleared and
    /// the track revealed. A correct guess pays both roles.
    pub fn guess(&mut self, guess: String) -> Vec<Outbound> {
        let track = match self.pictionary.track.take() {
            Some(track) => track,
            None => return Vec::new(),
        };
        let correct = guess_matches(&guess, &track);
        if correct {
            if let Some(guesser) = self.pictionary.guesser {
                self.scores.add(guesser, 1);
            }
            if let Some(drawer) = self.pictionary.drawer {
                self.scores.add(drawer, 1);
            }
        }
        self.pictionary.drawer = None;
        self.pictionary.guesser = None;
        vec![Outbound::Broadcast(ServerEvent::GuessResult {
            correct,
            guess,
            track,
            scores: self.scores.snapshot(),
        })]
    }

    pub fn pictionary_next_round(&mut self, from: PlayerId) -> Vec<Outbound> {
        self.pictionary.ready.insert(from);
        let count = self.pictionary.ready.len();
        let mut out = vec![Outbound::Broadcast(ServerEvent::PictionaryReadyCount(count))];
        if count == ROUND_PLAYERS {
            self.pictionary.ready.clear();
            out.push(Outbound::Broadcast(ServerEvent::PictionaryNewRound));
        }
        out
    }
}

/// Lowercases, decomposes, drops combining marks and anything outside
/// ascii alphanumerics or whitespace, then trims.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|&c| !('\u{0300}'..='\u{036f}').contains(&c))
        .filter(|&c| matches!(c, 'a'..='z' | '0'..='9') || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn guess_matches(guess: &str, track: &Track) -> bool {
    let name = normalize(&track.name);
    let artist = normalize(&track.artist);
    let guess = normalize(guess);
    name.contains(&guess)
        || artist.contains(&guess)
        || guess.contains(&name)
        || guess.contains(&artist)
}
