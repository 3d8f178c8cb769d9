use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

#[derive(Serialize_repr, Deserialize_repr, PartialEq, Eq, Clone, Copy, Debug, Default)]
#[repr(u8)]
pub enum LocalGameState {
    #[default]
    None = 0,
    Installed = 1,
    Running = 2,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LocalGame {
    pub game_id: String,
    pub local_game_state: LocalGameState,
}

impl LocalGame {
    pub fn new(local_game_state: LocalGameState) -> Self {
        Self {
            game_id: crate::constants::GAME_ID.to_string(),
            local_game_state,
        }
    }
}
