use std::io;
use std::os::windows::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use parking_lot::Mutex;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ};
use winreg::RegKey;

use crate::constants::registry::{INSTALL_KEY, INSTALL_VALUE, UNINSTALL_KEY};
use crate::constants::GAME_TITLE;

use super::LocalGameProbe;

const DETACHED_PROCESS: u32 = 0x0000_0008;
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

pub(crate) struct WindowsProbe {
    system: Mutex<System>,
}

impl WindowsProbe {
    pub(crate) fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

fn cached_installer_entry(entry: &RegKey) -> Option<PathBuf> {
    let display_name: String = entry.get_value("DisplayName").ok()?;
    if display_name != GAME_TITLE {
        return None;
    }
    let installed: u32 = entry.get_value("Installed").ok()?;
    if installed == 0 {
        return None;
    }
    let path: String = entry.get_value("BundleCachePath").ok()?;
    let path = PathBuf::from(path);
    path.exists().then_some(path)
}

impl LocalGameProbe for WindowsProbe {
    fn install_path(&self) -> Option<PathBuf> {
        let key = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(INSTALL_KEY, KEY_READ)
            .ok()?;
        let path: String = key.get_value(INSTALL_VALUE).ok()?;
        if path.is_empty() {
            return None;
        }
        Some(PathBuf::from(path))
    }

    fn process_names(&self) -> Vec<String> {
        let mut system = self.system.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        system
            .processes()
            .values()
            .map(|process| process.name().to_string_lossy().into_owned())
            .collect()
    }

    fn cached_installer(&self) -> Option<PathBuf> {
        let root = match RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(UNINSTALL_KEY, KEY_READ)
        {
            Ok(root) => root,
            Err(err) => {
                log::warn!("Failed to open uninstall registry: {}", err);
                return None;
            }
        };

        root.enum_keys()
            .filter_map(Result::ok)
            .filter_map(|name| root.open_subkey_with_flags(name, KEY_READ).ok())
            .find_map(|entry| cached_installer_entry(&entry))
    }

    fn spawn_detached(&self, program: &Path, args: &[&str]) -> io::Result<()> {
        let mut command = Command::new(program);
        command
            .args(args)
            .creation_flags(DETACHED_PROCESS | CREATE_NO_WINDOW);
        if let Some(working_dir) = program.parent() {
            command.current_dir(working_dir);
        }
        log::info!("Starting {}", program.display());
        command.spawn()?;
        Ok(())
    }
}
