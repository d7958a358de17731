use std::collections::HashSet;

use protocol::{GameMode, PlayerId, RoundPlayer, RoundResult, ServerEvent, Track};

use super::{Outbound, Room};
use crate::consts::ROUND_PLAYERS;
use crate::themes::ThemeCatalog;

pub struct Submission {
    pub player: PlayerId,
    pub tracks: Vec<Track>,
}

/// Transient state of a match round. Submissions keep their arrival order,
/// a resubmission replaces the tracks without giving up the original slot.
#[derive(Default)]
pub struct MatchRound {
    pub(crate) submissions: Vec<Submission>,
    pub(crate) ready_for_next: HashSet<PlayerId>,
    pub(crate) skip_votes: HashSet<PlayerId>,
}

impl MatchRound {
    fn record(&mut self, player: PlayerId, tracks: Vec<Track>) {
        if let Some(sub) = self.submissions.iter_mut().find(|s| s.player == player) {
            sub.tracks = tracks;
        } else {
            self.submissions.push(Submission { player, tracks });
        }
    }

    fn reset(&mut self) {
        self.submissions.clear();
        self.ready_for_next.clear();
        self.skip_votes.clear();
    }
}

impl Room {
    pub fn start_game(&mut self, themes: &ThemeCatalog, mode: Option<GameMode>) -> Vec<Outbound> {
        let mode = mode.unwrap_or(GameMode::Match);
        let theme = themes.draw().to_string();
        self.mode = Some(mode);
        self.theme = Some(theme.clone());
        self.match_round.reset();
        vec![Outbound::Broadcast(ServerEvent::GameStarted { theme, mode })]
    }

    pub fn submit_tracks(&mut self, from: PlayerId, tracks: Vec<Track>) -> Vec<Outbound> {
        self.match_round.record(from, tracks);
        let mut out: Vec<Outbound> = self
            .players
            .iter()
            .filter(|p| p.id != from)
            .map(|p| Outbound::To(p.id, ServerEvent::OpponentReady))
            .collect();
        if let Some(result) = self.evaluate_round() {
            out.push(Outbound::Broadcast(ServerEvent::RoundResult(result)));
        }
        out
    }

    /// A round completes only with exactly two submissions from a room of
    /// exactly two players. Matches walk the first submitter's list, so a
    /// track id listed twice there awards twice.
    fn evaluate_round(&mut self) -> Option<RoundResult> {
        if self.match_round.submissions.len() != ROUND_PLAYERS
            || self.players.len() != ROUND_PLAYERS
        {
            return None;
        }
        let first = &self.match_round.submissions[0];
        let second = &self.match_round.submissions[1];
        let second_ids: HashSet<&str> = second.tracks.iter().map(|t| t.id.as_str()).collect();
        let matches: Vec<String> = first
            .tracks
            .iter()
            .map(|t| t.id.clone())
            .filter(|id| second_ids.contains(id.as_str()))
            .collect();
        let player1 = RoundPlayer {
            id: first.player,
            pseudo: self.pseudo_of(first.player),
            tracks: first.tracks.clone(),
        };
        let player2 = RoundPlayer {
            id: second.player,
            pseudo: self.pseudo_of(second.player),
            tracks: second.tracks.clone(),
        };
        for _ in &matches {
            self.scores.add(player1.id, 1);
            self.scores.add(player2.id, 1);
        }
        Some(RoundResult {
            player1,
            player2,
            matches,
            scores: self.scores.snapshot(),
        })
    }

    pub fn ready_next_round(&mut self, from: PlayerId, themes: &ThemeCatalog) -> Vec<Outbound> {
        self.match_round.ready_for_next.insert(from);
        let count = self.match_round.ready_for_next.len();
        let mut out = vec![Outbound::Broadcast(ServerEvent::ReadyCount(count))];
        if count == ROUND_PLAYERS {
            out.push(self.advance_round(themes));
        }
        out
    }

    pub fn skip_round(&mut self, from: PlayerId, themes: &ThemeCatalog) -> Vec<Outbound> {
        self.match_round.skip_votes.insert(from);
        let count = self.match_round.skip_votes.len();
        let mut out = vec![Outbound::Broadcast(ServerEvent::SkipCount(count))];
        if count == ROUND_PLAYERS {
            out.push(self.advance_round(themes));
        }
        out
    }

    fn advance_round(&mut self, themes: &ThemeCatalog) -> Outbound {
        let theme = themes.draw().to_string();
        self.theme = Some(theme.clone());
        self.match_round.reset();
        Outbound::Broadcast(ServerEvent::NewRound { theme })
    }
}
