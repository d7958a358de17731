mod chat;
mod match_game;
mod pictionary;
mod scores;

use tokio::sync::mpsc;

use protocol::{ClientEvent, GameMode, PlayerId, PlayerInfo, ServerEvent};

use crate::themes::ThemeCatalog;

use chat::ChatLog;
use match_game::MatchRound;
use pictionary::PictionaryRound;
use scores::ScoreLedger;

/// A notification produced by a room step, before fan-out to channels.
#[derive(Debug, PartialEq)]
pub enum Outbound {
    Broadcast(ServerEvent),
    To(PlayerId, ServerEvent),
}

pub type Delivery = (mpsc::Sender<ServerEvent>, ServerEvent);

pub struct Player {
    pub id: PlayerId,
    pub pseudo: String,
    tx: mpsc::Sender<ServerEvent>,
}

/// All live state of one room. Every handler mutates and returns the
/// notifications for that step; nothing in here touches a socket.
pub struct Room {
    players: Vec<Player>,
    creator: Option<PlayerId>,
    mode: Option<GameMode>,
    theme: Option<String>,
    chat: ChatLog,
    scores: ScoreLedger,
    match_round: MatchRound,
    pictionary: PictionaryRound,
    pub(crate) closed: bool,
}

impl Room {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            creator: None,
            mode: None,
            theme: None,
            chat: ChatLog::default(),
            scores: ScoreLedger::default(),
            match_round: MatchRound::default(),
            pictionary: PictionaryRound::default(),
            closed: false,
        }
    }

    /// Admits a player and replays the room snapshot to them. The first
    /// joiner becomes the creator for the life of the room.
    pub fn join(
        &mut self,
        id: PlayerId,
        pseudo: String,
        tx: mpsc::Sender<ServerEvent>,
    ) -> Vec<Outbound> {
        if self.creator.is_none() {
            self.creator = Some(id);
        }
        if !self.contains(id) {
            self.players.push(Player { id, pseudo, tx });
            self.scores.ensure(id);
        }
        let mut out = vec![Outbound::Broadcast(ServerEvent::PlayersUpdate(
            self.player_infos(),
        ))];
        out.push(Outbound::To(
            id,
            ServerEvent::RoomInfo {
                is_creator: self.creator == Some(id),
            },
        ));
        out.push(Outbound::To(id, ServerEvent::ChatHistory(self.chat.history())));
        if let Some(theme) = &self.theme {
            out.push(Outbound::To(
                id,
                ServerEvent::GameStarted {
                    theme: theme.clone(),
                    mode: self.mode.unwrap_or(GameMode::Match),
                },
            ));
            out.push(Outbound::To(
                id,
                ServerEvent::ScoresUpdate(self.scores.snapshot()),
            ));
        }
        out.extend(self.pictionary.replay_for(id));
        out
    }

    /// Drops the player if present. The survivors get the updated list;
    /// an emptied room stays silent and is discarded by the registry.
    pub fn remove_player(&mut self, id: PlayerId) -> Vec<Outbound> {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        if self.players.len() == before || self.players.is_empty() {
            return Vec::new();
        }
        vec![Outbound::Broadcast(ServerEvent::PlayersUpdate(
            self.player_infos(),
        ))]
    }

    pub fn chat_message(&mut self, pseudo: String, message: String) -> Vec<Outbound> {
        let entry = self.chat.append(pseudo, message);
        vec![Outbound::Broadcast(ServerEvent::ChatMessage(entry))]
    }

    pub fn handle(
        &mut self,
        from: PlayerId,
        themes: &ThemeCatalog,
        event: ClientEvent,
    ) -> Vec<Outbound> {
        match event {
            ClientEvent::StartGame { mode, .. } => self.start_game(themes, mode),
            ClientEvent::SubmitTracks { tracks, .. } => self.submit_tracks(from, tracks),
            ClientEvent::ReadyNextRound { .. } => self.ready_next_round(from, themes),
            ClientEvent::SkipRound { .. } => self.skip_round(from, themes),
            ClientEvent::ChatMessage {
                pseudo, message, ..
            } => self.chat_message(pseudo, message),
            ClientEvent::SetTrack {
                track,
                playlist_tracks,
                ..
            } => self.set_track(from, track, playlist_tracks),
            ClientEvent::DrawStroke { stroke, .. } => self.relay_stroke(stroke),
            ClientEvent::ClearCanvas { .. } => self.relay_clear(),
            ClientEvent::Guess { guess, .. } => self.guess(guess),
            ClientEvent::NextRound { .. } => self.pictionary_next_round(from),
            // membership changes go through the gateway, not here
            ClientEvent::JoinRoom { .. } | ClientEvent::LeaveRoom { .. } => Vec::new(),
        }
    }

    pub fn resolve(&self, outs: Vec<Outbound>) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        for out in outs {
            match out {
                Outbound::Broadcast(event) => {
                    for player in &self.players {
                        deliveries.push((player.tx.clone(), event.clone()));
                    }
                }
                Outbound::To(id, event) => {
                    if let Some(player) = self.players.iter().find(|p| p.id == id) {
                        deliveries.push((player.tx.clone(), event));
                    }
                }
            }
        }
        deliveries
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    fn player_infos(&self) -> Vec<PlayerInfo> {
        self.players
            .iter()
            .map(|p| PlayerInfo {
                id: p.id,
                pseudo: p.pseudo.clone(),
            })
            .collect()
    }

    fn pseudo_of(&self, id: PlayerId) -> Option<String> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.pseudo.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::Track;

    fn catalog() -> ThemeCatalog {
        ThemeCatalog::from_themes(vec!["disco".into()]).unwrap()
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            name: id.into(),
            artist: "artist".into(),
            album: None,
            image: None,
            preview_url: None,
            duration: None,
        }
    }

    fn room_with_players(count: u64) -> (Room, Vec<mpsc::Receiver<ServerEvent>>) {
        let mut room = Room::new();
        let mut rxs = Vec::new();
        for n in 1..=count {
            let (tx, rx) = mpsc::channel(16);
            room.join(PlayerId(n), format!("p{}", n), tx);
            rxs.push(rx);
        }
        (room, rxs)
    }

    #[test]
    fn the_first_joiner_stays_the_creator() {
        let mut room = Room::new();
        let (tx, _rx1) = mpsc::channel(16);
        let outs = room.join(PlayerId(1), "ana".into(), tx);
        assert!(outs.contains(&Outbound::To(
            PlayerId(1),
            ServerEvent::RoomInfo { is_creator: true }
        )));
        let (tx, _rx2) = mpsc::channel(16);
        let outs = room.join(PlayerId(2), "ben".into(), tx);
        assert!(outs.contains(&Outbound::To(
            PlayerId(2),
            ServerEvent::RoomInfo { is_creator: false }
        )));

        room.remove_player(PlayerId(1));
        let (tx, _rx3) = mpsc::channel(16);
        let outs = room.join(PlayerId(3), "cara".into(), tx);
        assert!(outs.contains(&Outbound::To(
            PlayerId(3),
            ServerEvent::RoomInfo { is_creator: false }
        )));
    }

    #[test]
    fn rejoining_does_not_duplicate_the_player() {
        let (mut room, _rxs) = room_with_players(1);
        let (tx, _rx) = mpsc::channel(16);
        let outs = room.join(PlayerId(1), "p1".into(), tx);
        assert!(matches!(
            &outs[0],
            Outbound::Broadcast(ServerEvent::PlayersUpdate(infos)) if infos.len() == 1
        ));
    }

    #[test]
    fn a_late_joiner_gets_the_full_snapshot_in_order() {
        let themes = catalog();
        let (mut room, _rxs) = room_with_players(2);
        room.chat_message("ana".into(), "hi".into());
        room.start_game(&themes, None);

        let (tx, _rx) = mpsc::channel(16);
        let outs = room.join(PlayerId(3), "cara".into(), tx);
        assert_eq!(outs.len(), 5);
        assert!(matches!(
            &outs[0],
            Outbound::Broadcast(ServerEvent::PlayersUpdate(infos)) if infos.len() == 3
        ));
        assert_eq!(
            outs[1],
            Outbound::To(PlayerId(3), ServerEvent::RoomInfo { is_creator: false })
        );
        assert!(matches!(
            &outs[2],
            Outbound::To(id, ServerEvent::ChatHistory(history))
                if *id == PlayerId(3) && history.len() == 1
        ));
        assert!(matches!(
            &outs[3],
            Outbound::To(id, ServerEvent::GameStarted { theme, mode: GameMode::Match })
                if *id == PlayerId(3) && theme == "disco"
        ));
        assert!(matches!(
            &outs[4],
            Outbound::To(id, ServerEvent::ScoresUpdate(scores))
                if *id == PlayerId(3) && scores.len() == 3
        ));
    }

    #[test]
    fn a_rejoining_drawer_is_reprompted() {
        let (mut room, _rxs) = room_with_players(2);
        room.set_track(PlayerId(1), track("t1"), vec![track("t2")]);
        let (tx, _rx) = mpsc::channel(16);
        let outs = room.join(PlayerId(2), "p2".into(), tx);
        assert!(outs.contains(&Outbound::To(
            PlayerId(2),
            ServerEvent::StartDrawing { track: track("t1") }
        )));
    }

    #[test]
    fn a_departure_leaves_the_survivor_announced() {
        let (mut room, _rxs) = room_with_players(2);
        let outs = room.remove_player(PlayerId(2));
        assert_eq!(outs.len(), 1);
        assert!(matches!(
            &outs[0],
            Outbound::Broadcast(ServerEvent::PlayersUpdate(infos))
                if infos.len() == 1 && infos[0].id == PlayerId(1)
        ));
        assert!(!room.is_empty());
        // the departed player's tally stays on the books
        assert_eq!(room.scores.snapshot().len(), 2);
    }

    #[test]
    fn emptying_the_room_is_silent() {
        let (mut room, _rxs) = room_with_players(1);
        let outs = room.remove_player(PlayerId(1));
        assert!(outs.is_empty());
        assert!(room.is_empty());
    }

    #[test]
    fn removing_a_stranger_changes_nothing() {
        let (mut room, _rxs) = room_with_players(2);
        assert!(room.remove_player(PlayerId(9)).is_empty());
        assert!(room.contains(PlayerId(1)));
        assert!(room.contains(PlayerId(2)));
    }

    #[test]
    fn chat_accepts_any_pseudo_from_the_payload() {
        let (mut room, _rxs) = room_with_players(2);
        let outs = room.chat_message("stranger".into(), "hello".into());
        assert!(matches!(
            &outs[0],
            Outbound::Broadcast(ServerEvent::ChatMessage(entry)) if entry.pseudo == "stranger"
        ));
        assert_eq!(room.chat.history().len(), 1);
    }

    #[test]
    fn resolve_fans_out_broadcasts_and_targets_unicasts() {
        let (room, mut rxs) = room_with_players(2);
        let deliveries = room.resolve(vec![
            Outbound::Broadcast(ServerEvent::OpponentReady),
            Outbound::To(PlayerId(2), ServerEvent::WaitDrawing),
            Outbound::To(PlayerId(9), ServerEvent::WaitDrawing),
        ]);
        assert_eq!(deliveries.len(), 3);
        for (tx, event) in deliveries {
            tx.try_send(event).unwrap();
        }
        assert_eq!(rxs[0].try_recv().unwrap(), ServerEvent::OpponentReady);
        assert!(rxs[0].try_recv().is_err());
        assert_eq!(rxs[1].try_recv().unwrap(), ServerEvent::OpponentReady);
        assert_eq!(rxs[1].try_recv().unwrap(), ServerEvent::WaitDrawing);
        assert!(rxs[1].try_recv().is_err());
    }

    #[test]
    fn handle_routes_room_scoped_events() {
        let themes = catalog();
        let (mut room, _rxs) = room_with_players(2);
        let outs = room.handle(
            PlayerId(1),
            &themes,
            ClientEvent::StartGame {
                room_id: "r".into(),
                mode: None,
            },
        );
        assert!(matches!(
            &outs[0],
            Outbound::Broadcast(ServerEvent::GameStarted { .. })
        ));
        let outs = room.handle(
            PlayerId(1),
            &themes,
            ClientEvent::ChatMessage {
                room_id: "r".into(),
                pseudo: "zoe".into(),
                message: "yo".into(),
            },
        );
        assert!(matches!(
            &outs[0],
            Outbound::Broadcast(ServerEvent::ChatMessage(entry)) if entry.pseudo == "zoe"
        ));
        let outs = room.handle(
            PlayerId(1),
            &themes,
            ClientEvent::JoinRoom {
                room_id: "r".into(),
                pseudo: "x".into(),
            },
        );
        assert!(outs.is_empty());
    }
}
