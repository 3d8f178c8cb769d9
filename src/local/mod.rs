use std::io;
use std::path::{Path, PathBuf};

use crate::constants::{GAME_BIN, GAME_CONTENT_MARKER, PROCESS_NAMES};
use crate::utils::normalize_process_name;

use self::types::{LocalGame, LocalGameState};

pub mod types;
#[cfg(windows)]
mod windows;

/// Operating system facilities install/run detection is built on
///
/// Only implemented where the game can be installed, see [`native_probe`].
pub trait LocalGameProbe: Send + Sync {
    /// Install location recorded by the game's installer
    fn install_path(&self) -> Option<PathBuf>;

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Names or paths of every running process
    fn process_names(&self) -> Vec<String>;

    /// Installer kept by the system after a previous install
    fn cached_installer(&self) -> Option<PathBuf>;

    /// Start `program` without a console window, not waiting for it
    fn spawn_detached(&self, program: &Path, args: &[&str]) -> io::Result<()>;
}

/// Probe for the current platform, `None` where local games are not supported
#[cfg(windows)]
pub fn native_probe() -> Option<Box<dyn LocalGameProbe>> {
    Some(Box::new(windows::WindowsProbe::new()))
}

#[cfg(not(windows))]
pub fn native_probe() -> Option<Box<dyn LocalGameProbe>> {
    None
}

pub fn is_installed(probe: &dyn LocalGameProbe, install_path: Option<&Path>) -> bool {
    let Some(install_path) = install_path else {
        return false;
    };
    probe.file_exists(&install_path.join(GAME_BIN))
        && probe.file_exists(&install_path.join(GAME_CONTENT_MARKER))
}

pub fn is_running(probe: &dyn LocalGameProbe) -> bool {
    probe
        .process_names()
        .iter()
        .map(|name| normalize_process_name(name))
        .any(|name| PROCESS_NAMES.contains(&name.as_str()))
}

pub fn detect_state(probe: &dyn LocalGameProbe, install_path: Option<&Path>) -> LocalGameState {
    if !is_installed(probe, install_path) {
        return LocalGameState::None;
    }
    if is_running(probe) {
        return LocalGameState::Running;
    }
    LocalGameState::Installed
}

/// Last reported local state, refreshed by polling
pub struct LocalGameTracker {
    probe: Box<dyn LocalGameProbe>,
    install_path: Option<PathBuf>,
    state: LocalGameState,
}

impl LocalGameTracker {
    pub fn new(probe: Box<dyn LocalGameProbe>) -> Self {
        let install_path = probe.install_path();
        let state = detect_state(probe.as_ref(), install_path.as_deref());
        Self {
            probe,
            install_path,
            state,
        }
    }

    pub fn install_path(&self) -> Option<&Path> {
        self.install_path.as_deref()
    }

    pub fn state(&self) -> LocalGameState {
        self.state
    }

    pub fn probe(&self) -> &dyn LocalGameProbe {
        self.probe.as_ref()
    }

    /// Re-detect and remember the current state
    pub fn refresh(&mut self) -> LocalGame {
        self.state = detect_state(self.probe.as_ref(), self.install_path.as_deref());
        LocalGame::new(self.state)
    }

    /// Returns the new state only when it differs from the last one
    pub fn poll(&mut self) -> Option<LocalGame> {
        if self.install_path.is_none() {
            self.install_path = self.probe.install_path();
        }
        let current = detect_state(self.probe.as_ref(), self.install_path.as_deref());
        if current == self.state {
            return None;
        }
        log::debug!("Local game state changed {:?} -> {:?}", self.state, current);
        self.state = current;
        Some(LocalGame::new(current))
    }

    /// Start the game executable, does nothing while the install path is unknown
    pub fn launch(&self) -> io::Result<()> {
        let Some(install_path) = &self.install_path else {
            log::warn!("Launch requested without a known install path");
            return Ok(());
        };
        self.probe.spawn_detached(&install_path.join(GAME_BIN), &[])
    }

    #[cfg(test)]
    pub(crate) fn set_install_path(&mut self, install_path: Option<PathBuf>) {
        self.install_path = install_path;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    pub(crate) struct FakeState {
        pub install_path: Option<PathBuf>,
        pub files: Vec<PathBuf>,
        pub processes: Vec<String>,
        pub cached_installer: Option<PathBuf>,
        pub spawned: Vec<(PathBuf, Vec<String>)>,
    }

    #[derive(Clone, Default)]
    pub(crate) struct FakeProbe(pub Arc<Mutex<FakeState>>);

    impl FakeProbe {
        pub fn installed(path: &str) -> Self {
            let probe = Self::default();
            {
                let mut state = probe.0.lock();
                state.install_path = Some(PathBuf::from(path));
                state.files = vec![
                    Path::new(path).join(GAME_BIN),
                    Path::new(path).join(GAME_CONTENT_MARKER),
                ];
            }
            probe
        }
    }

    impl LocalGameProbe for FakeProbe {
        fn install_path(&self) -> Option<PathBuf> {
            self.0.lock().install_path.clone()
        }

        fn file_exists(&self, path: &Path) -> bool {
            self.0.lock().files.iter().any(|file| file == path)
        }

        fn process_names(&self) -> Vec<String> {
            self.0.lock().processes.clone()
        }

        fn cached_installer(&self) -> Option<PathBuf> {
            self.0.lock().cached_installer.clone()
        }

        fn spawn_detached(&self, program: &Path, args: &[&str]) -> io::Result<()> {
            self.0.lock().spawned.push((
                program.to_path_buf(),
                args.iter().map(|arg| arg.to_string()).collect(),
            ));
            Ok(())
        }
    }

    fn processes(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn not_installed_without_path() {
        let probe = FakeProbe::default();
        assert_eq!(detect_state(&probe, None), LocalGameState::None);
    }

    #[test]
    fn not_installed_without_marker() {
        let probe = FakeProbe::installed("installed");
        probe
            .0
            .lock()
            .files
            .retain(|file| !file.ends_with(GAME_CONTENT_MARKER));
        assert_eq!(
            detect_state(&probe, Some(Path::new("installed"))),
            LocalGameState::None
        );
    }

    #[test]
    fn installed_not_running() {
        let probe = FakeProbe::installed("installed");
        probe.0.lock().processes = processes(&[
            "c:\\opera.exe",
            "d:\\GalaxyClient.exe",
            "d:\\PathOfExile not game.exe",
            "e:\\not PathOfExile.exe",
        ]);
        assert_eq!(
            detect_state(&probe, Some(Path::new("installed"))),
            LocalGameState::Installed
        );
    }

    #[test]
    fn running_matches_case_insensitive() {
        let probe = FakeProbe::installed("installed");
        probe.0.lock().processes =
            processes(&["c:\\opera.exe", "d:\\GalaxyClient.exe", "d:\\PathOfExile_x64.exe"]);
        assert_eq!(
            detect_state(&probe, Some(Path::new("installed"))),
            LocalGameState::Running
        );

        probe.0.lock().processes = processes(&["PATHOFEXILE.EXE"]);
        assert_eq!(
            detect_state(&probe, Some(Path::new("installed"))),
            LocalGameState::Running
        );
    }

    #[test]
    fn poll_reports_changes_only() {
        let probe = FakeProbe::default();
        let mut tracker = LocalGameTracker::new(Box::new(probe.clone()));
        assert_eq!(tracker.state(), LocalGameState::None);
        assert_eq!(tracker.poll(), None);

        // install path appears after the game gets installed
        let installed = FakeProbe::installed("installed").0.lock().clone();
        *probe.0.lock() = installed;
        assert_eq!(
            tracker.poll(),
            Some(LocalGame::new(LocalGameState::Installed))
        );
        assert_eq!(tracker.install_path(), Some(Path::new("installed")));
        assert_eq!(tracker.poll(), None);

        probe.0.lock().processes = processes(&["PathOfExile.exe"]);
        assert_eq!(tracker.poll(), Some(LocalGame::new(LocalGameState::Running)));
    }

    #[test]
    fn launch_uses_install_path() {
        let probe = FakeProbe::installed("path");
        let mut tracker = LocalGameTracker::new(Box::new(probe.clone()));
        tracker.launch().unwrap();
        assert_eq!(
            probe.0.lock().spawned,
            vec![(Path::new("path").join(GAME_BIN), vec![])]
        );

        tracker.set_install_path(None);
        tracker.launch().unwrap();
        assert_eq!(probe.0.lock().spawned.len(), 1);
    }
}
