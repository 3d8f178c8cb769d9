pub mod types;

use crate::constants::{GAME_ID, GAME_TITLE};
use crate::library::types::{Game, LicenseInfo, LicenseType};

/// The account always owns exactly the one free-to-play game
pub(crate) fn owned_games() -> Vec<Game> {
    vec![Game {
        game_id: GAME_ID.to_string(),
        game_title: GAME_TITLE.to_string(),
        dlcs: Vec::new(),
        license_info: LicenseInfo::new(LicenseType::FreeToPlay),
    }]
}
