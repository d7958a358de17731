use std::collections::VecDeque;

use chrono::{Local, Utc};

use protocol::ChatEntry;

use crate::consts::CHAT_HISTORY_LIMIT;

/// Per-room message buffer, capped to the most recent entries.
#[derive(Default)]
pub struct ChatLog {
    entries: VecDeque<ChatEntry>,
}

impl ChatLog {
    pub fn append(&mut self, pseudo: String, message: String) -> ChatEntry {
        let entry = ChatEntry {
            id: Utc::now().timestamp_millis(),
            pseudo,
            message,
            timestamp: Local::now().format("%H:%M").to_string(),
        };
        self.entries.push_back(entry.clone());
        while self.entries.len() > CHAT_HISTORY_LIMIT {
            self.entries.pop_front();
        }
        entry
    }

    pub fn history(&self) -> Vec<ChatEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_entries() {
        let mut log = ChatLog::default();
        let entry = log.append("ana".into(), "hello".into());
        assert_eq!(entry.pseudo, "ana");
        assert_eq!(entry.message, "hello");
        assert!(entry.id > 0);
        assert_eq!(entry.timestamp.len(), 5);
        assert!(entry.timestamp.contains(':'));
    }

    #[test]
    fn keeps_insertion_order() {
        let mut log = ChatLog::default();
        log.append("ana".into(), "first".into());
        log.append("ben".into(), "second".into());
        let history = log.history();
        assert_eq!(history[0].message, "first");
        assert_eq!(history[1].message, "second");
    }

    #[test]
    fn evicts_oldest_beyond_the_cap() {
        let mut log = ChatLog::default();
        for n in 0..CHAT_HISTORY_LIMIT + 3 {
            log.append("ana".into(), format!("msg {}", n));
        }
        let history = log.history();
        assert_eq!(history.len(), CHAT_HISTORY_LIMIT);
        assert_eq!(history[0].message, "msg 3");
        assert_eq!(
            history.last().unwrap().message,
            format!("msg {}", CHAT_HISTORY_LIMIT + 2)
        );
    }
}
