use std::collections::HashMap;
#[cfg(feature = "installer")]
use std::path::PathBuf;
use std::sync::Arc;

use crate::achievements::cache::UnlockTimeCache;
use crate::achievements::types::{Achievement, AchievementTag};
use crate::auth::types::{AuthResponse, Authentication, Credentials, LoginCookie};
use crate::errors::{auth_required_error, io_error, unknown_error, EmptyResult, ErrorKind};
use crate::library::types::Game;
use crate::local::types::LocalGame;
use crate::local::{LocalGameProbe, LocalGameTracker};
use crate::manifest::Manifest;
use crate::plugin::{Host, Plugin};
use crate::session::{SessionConfig, SessionFetcher};
use crate::{achievements, auth, library, utils, Error};

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// Waiting for the login window to finish
    Authenticating,
    Authenticated,
}

/// Entry point, adapts the web session and local detection to launcher requests
pub struct PoePlugin {
    host: Arc<dyn Host>,
    manifest: Manifest,
    config: SessionConfig,
    fetcher: Option<SessionFetcher>,
    state: AuthState,
    achievements_cache: UnlockTimeCache,
    local: Option<LocalGameTracker>,
    clock: Clock,
}

impl PoePlugin {
    pub fn new(host: Arc<dyn Host>) -> Result<Self, Error> {
        Ok(Self {
            host,
            manifest: Manifest::bundled()?,
            config: SessionConfig::default(),
            fetcher: None,
            state: AuthState::Unauthenticated,
            achievements_cache: UnlockTimeCache::new(),
            local: crate::local::native_probe().map(LocalGameTracker::new),
            clock: Box::new(utils::unix_now),
        })
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace platform detection, `None` disables local games
    pub fn with_local_probe(mut self, probe: Option<Box<dyn LocalGameProbe>>) -> Self {
        self.local = probe.map(LocalGameTracker::new);
        self
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn achievements_cache(&self) -> &UnlockTimeCache {
        &self.achievements_cache
    }

    pub fn requires_authentication(&self) -> Result<&SessionFetcher, Error> {
        self.fetcher.as_ref().ok_or_else(auth_required_error)
    }

    fn close_client(&mut self) {
        let Some(fetcher) = self.fetcher.take() else {
            return;
        };
        self.state = AuthState::Unauthenticated;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(fetcher.shutdown());
            }
            Err(_) => drop(fetcher),
        }
    }

    /// Tear the session down once the site stopped accepting it
    fn check_session(&mut self, err: &Error) {
        if err.kind() == ErrorKind::SessionExpired {
            log::info!("Authentication lost");
            self.close_client();
        }
    }

    fn do_auth(&mut self, credentials: Credentials, store: bool) -> Result<Authentication, Error> {
        self.close_client();

        let host = self.host.clone();
        let fetcher = SessionFetcher::new(credentials.clone(), self.config.clone(), move || {
            host.lost_authentication()
        })?;
        if store {
            self.host.store_credentials(credentials.to_stored());
        }
        self.fetcher = Some(fetcher);
        self.state = AuthState::Authenticated;
        log::info!("Authenticated as {}", credentials.profile_name());

        Ok(Authentication {
            user_id: credentials.profile_name().clone(),
            user_name: credentials.profile_name().clone(),
        })
    }

    async fn prepare_achievements_context(&mut self) -> Result<Vec<AchievementTag>, Error> {
        let result = self.requires_authentication()?.get_achievements().await;
        if let Err(err) = &result {
            self.check_session(err);
        }
        result
    }

    pub fn get_unlocked_achievements(
        &mut self,
        tags: &[AchievementTag],
    ) -> Result<Vec<Achievement>, Error> {
        let names = achievements::extract_names(tags)?;
        let now = (self.clock)();
        Ok(self.achievements_cache.reconcile(names, now))
    }

    #[cfg(feature = "installer")]
    async fn get_installer(&mut self, probe_cached: Option<PathBuf>) -> Result<PathBuf, Error> {
        if let Some(cached) = probe_cached {
            log::debug!("Using cached installer {}", cached.display());
            return Ok(cached);
        }

        let result = self.requires_authentication()?.get_installer().await;
        if let Err(err) = &result {
            self.check_session(err);
        }
        let installer = result?;

        let directory = tempfile::Builder::new()
            .prefix("poe-installer")
            .tempdir()
            .map_err(io_error)?
            .keep();
        let installer_path = directory.join(crate::constants::INSTALLER_BIN);
        tokio::fs::write(&installer_path, installer)
            .await
            .map_err(io_error)?;
        log::debug!("Installer downloaded to {}", installer_path.display());
        Ok(installer_path)
    }

    #[cfg(feature = "installer")]
    async fn run_installer(&mut self, args: &[&str]) -> EmptyResult {
        let Some(cached) = self
            .local
            .as_ref()
            .map(|local| local.probe().cached_installer())
        else {
            log::warn!("Local games are not supported on this platform");
            return Ok(());
        };
        let installer = self.get_installer(cached).await?;
        if let Some(local) = &self.local {
            local
                .probe()
                .spawn_detached(&installer, args)
                .map_err(io_error)?;
        }
        Ok(())
    }
}

/// Errors other than the well-known ones are reported as generic failures
fn import_error(err: Error) -> Error {
    match err.kind() {
        ErrorKind::UnknownBackendResponse
        | ErrorKind::SessionExpired
        | ErrorKind::AuthenticationRequired => err,
        _ => unknown_error(err),
    }
}

impl Plugin for PoePlugin {
    async fn authenticate(
        &mut self,
        stored_credentials: Option<&HashMap<String, String>>,
    ) -> Result<AuthResponse, Error> {
        if let Some(credentials) = stored_credentials.and_then(Credentials::from_stored) {
            return self
                .do_auth(credentials, false)
                .map(AuthResponse::Authenticated);
        }

        log::debug!("No stored credentials, opening login window");
        if self.fetcher.is_none() {
            self.state = AuthState::Authenticating;
        }
        Ok(AuthResponse::NextStep(auth::web_session_step()))
    }

    async fn pass_login_credentials(
        &mut self,
        step: &str,
        credentials: &HashMap<String, String>,
        cookies: &[LoginCookie],
    ) -> Result<Authentication, Error> {
        log::debug!("Login step {} finished", step);
        let end_uri = credentials.get("end_uri").map(String::as_str);
        let credentials = auth::session_id_from_cookies(cookies).and_then(|session_id| {
            Credentials::new(session_id, auth::profile_name_from_end_uri(end_uri)?)
        });
        match credentials {
            Ok(credentials) => self.do_auth(credentials, true),
            Err(err) => {
                log::warn!("Login failed: {}", err);
                self.state = match self.fetcher {
                    Some(_) => AuthState::Authenticated,
                    None => AuthState::Unauthenticated,
                };
                Err(err)
            }
        }
    }

    async fn get_owned_games(&self) -> Result<Vec<Game>, Error> {
        Ok(library::owned_games())
    }

    async fn import_achievements(&mut self, game_ids: &[String]) -> EmptyResult {
        self.requires_authentication()?;

        let context = self
            .prepare_achievements_context()
            .await
            .map_err(import_error);
        for game_id in game_ids {
            let result = match &context {
                Ok(tags) => self.get_unlocked_achievements(tags).map_err(import_error),
                Err(err) => {
                    self.host.game_achievements_import_failure(game_id, err);
                    continue;
                }
            };
            match result {
                Ok(unlocked) => {
                    log::debug!("Imported {} achievements for {}", unlocked.len(), game_id);
                    self.host.game_achievements_import_success(game_id, unlocked);
                }
                Err(err) => {
                    log::warn!("Achievements import for {} failed: {}", game_id, err);
                    self.host.game_achievements_import_failure(game_id, &err);
                }
            }
        }
        if let Err(err) = &context {
            log::warn!("Achievements import failed: {}", err);
        }
        self.host.achievements_import_finished();
        Ok(())
    }

    async fn get_local_games(&mut self) -> Result<Vec<LocalGame>, Error> {
        Ok(self
            .local
            .as_mut()
            .map(|local| vec![local.refresh()])
            .unwrap_or_default())
    }

    async fn launch_game(&mut self, game_id: &str) -> EmptyResult {
        log::debug!("Launching {}", game_id);
        if let Some(local) = &self.local {
            local.launch().map_err(io_error)?;
        }
        Ok(())
    }

    #[cfg(feature = "installer")]
    async fn install_game(&mut self, game_id: &str) -> EmptyResult {
        log::debug!("Installing {}", game_id);
        self.run_installer(&[]).await
    }

    #[cfg(feature = "installer")]
    async fn uninstall_game(&mut self, game_id: &str) -> EmptyResult {
        log::debug!("Uninstalling {}", game_id);
        self.run_installer(&["/uninstall"]).await
    }

    fn tick(&mut self) {
        let Some(local) = self.local.as_mut() else {
            return;
        };
        if let Some(changed) = local.poll() {
            self.host.update_local_game_status(changed);
        }
    }

    fn shutdown(&mut self) {
        self.close_client();
    }
}
