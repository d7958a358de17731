pub const HB_DURATION: tokio::time::Duration = tokio::time::Duration::from_secs(10);

pub const CHAT_HISTORY_LIMIT: usize = 50;
pub const ROUND_PLAYERS: usize = 2;

pub const OUTBOUND_BUFFER: usize = 128;
