use std::collections::HashMap;

use crate::achievements::types::Achievement;
use crate::auth::types::{AuthResponse, Authentication, LoginCookie};
use crate::errors::EmptyResult;
use crate::library::types::Game;
use crate::local::types::LocalGame;
use crate::Error;

/// Notifications the plugin sends to the launcher
///
/// Implemented by whatever carries the launcher's protocol.
pub trait Host: Send + Sync {
    fn store_credentials(&self, credentials: HashMap<String, String>);

    fn lost_authentication(&self);

    fn update_local_game_status(&self, local_game: LocalGame);

    fn game_achievements_import_success(&self, game_id: &str, achievements: Vec<Achievement>);

    fn game_achievements_import_failure(&self, game_id: &str, error: &Error);

    fn achievements_import_finished(&self);
}

/// Requests the launcher sends to the plugin
#[allow(async_fn_in_trait)]
pub trait Plugin {
    /// Authenticate with stored credentials or ask for the login window
    async fn authenticate(
        &mut self,
        stored_credentials: Option<&HashMap<String, String>>,
    ) -> Result<AuthResponse, Error>;

    /// Finish authentication with what the login window captured
    async fn pass_login_credentials(
        &mut self,
        step: &str,
        credentials: &HashMap<String, String>,
        cookies: &[LoginCookie],
    ) -> Result<Authentication, Error>;

    async fn get_owned_games(&self) -> Result<Vec<Game>, Error>;

    /// Results are delivered through [`Host`], one report per game id
    async fn import_achievements(&mut self, game_ids: &[String]) -> EmptyResult;

    async fn get_local_games(&mut self) -> Result<Vec<LocalGame>, Error>;

    async fn launch_game(&mut self, game_id: &str) -> EmptyResult;

    #[cfg(feature = "installer")]
    async fn install_game(&mut self, game_id: &str) -> EmptyResult;

    #[cfg(feature = "installer")]
    async fn uninstall_game(&mut self, game_id: &str) -> EmptyResult;

    /// Called periodically by the launcher
    fn tick(&mut self);

    fn shutdown(&mut self);
}
