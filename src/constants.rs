pub const GAME_ID: &str = "PathOfExile";
pub const GAME_TITLE: &str = "Path of Exile";

pub const AUTH_SESSION_ID: &str = "POESESSID";
pub const AUTH_PROFILE_NAME: &str = "PROFILE_NAME";
/// Page the login window is sent to once the profile name is known
pub const AUTH_REDIRECT: &str = "https://localhost/poe?name=";
pub const AUTH_REDIRECT_PARAM: &str = "name";

pub const GAME_BIN: &str = "PathOfExile_x64.exe";
pub const GAME_CONTENT_MARKER: &str = "Content.ggpk";
pub const PROCESS_NAMES: [&str; 2] = ["pathofexile.exe", "pathofexile_x64.exe"];
pub const INSTALLER_BIN: &str = "PathOfExileInstaller.exe";
pub const INSTALLER_PATH: &str = "downloads/PathOfExileInstaller.exe";

pub const REQUEST_LIMIT: usize = 30;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub mod domains {
    pub const POE_WEB: &str = "https://www.pathofexile.com";
    pub const POE_COOKIE_DOMAIN: &str = "pathofexile.com";
}

pub mod registry {
    pub const INSTALL_KEY: &str = r"Software\GrindingGearGames\Path of Exile";
    pub const INSTALL_VALUE: &str = "InstallLocation";
    pub const UNINSTALL_KEY: &str =
        r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall";
}
