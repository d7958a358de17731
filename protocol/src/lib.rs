pub mod request;
pub mod response;
pub mod types;

pub use response::*;
pub use request::*;
pub use types::*;

use serde::{de::DeserializeOwned, Serialize};
use tokio_tungstenite::tungstenite::Message;

pub trait JsonMessage: Serialize + DeserializeOwned {
    fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(text)
    }

    fn encode(&self) -> Result<Message, serde_json::Error> {
        let text = serde_json::to_string(&self)?;
        Ok(Message::Text(text))
    }
}
