use protocol::{PlayerId, ScoreMap};

/// Accumulated points per player. Entries only ever grow and are kept even
/// after a player leaves, so late broadcasts still show the full tally.
#[derive(Default)]
pub struct ScoreLedger {
    scores: ScoreMap,
}

impl ScoreLedger {
    pub fn ensure(&mut self, id: PlayerId) {
        self.scores.entry(id).or_insert(0);
    }

    pub fn add(&mut self, id: PlayerId, delta: u32) {
        *self.scores.entry(id).or_insert(0) += delta;
    }

    pub fn snapshot(&self) -> ScoreMap {
        self.scores.clone()
    }

    pub fn get(&self, id: PlayerId) -> u32 {
        self.scores.get(&id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_initializes_to_zero_once() {
        let mut ledger = ScoreLedger::default();
        ledger.ensure(PlayerId(1));
        assert_eq!(ledger.get(PlayerId(1)), 0);
        ledger.add(PlayerId(1), 2);
        ledger.ensure(PlayerId(1));
        assert_eq!(ledger.get(PlayerId(1)), 2);
    }

    #[test]
    fn add_accumulates_and_creates_missing_entries() {
        let mut ledger = ScoreLedger::default();
        ledger.add(PlayerId(4), 1);
        ledger.add(PlayerId(4), 1);
        assert_eq!(ledger.get(PlayerId(4)), 2);
        assert_eq!(ledger.get(PlayerId(9)), 0);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut ledger = ScoreLedger::default();
        ledger.add(PlayerId(1), 1);
        let snap = ledger.snapshot();
        ledger.add(PlayerId(1), 1);
        assert_eq!(snap.get(&PlayerId(1)), Some(&1));
        assert_eq!(ledger.get(PlayerId(1)), 2);
    }
}
