use serde::{Deserialize, Serialize};

// https://galaxy-integrations-python-api.readthedocs.io/en/latest/galaxy.api.html#galaxy.api.consts.LicenseType
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum LicenseType {
    Unknown,
    SinglePurchase,
    FreeToPlay,
    OtherUserLicense,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LicenseInfo {
    pub license_type: LicenseType,
    pub owner: Option<String>,
}

impl LicenseInfo {
    pub fn new(license_type: LicenseType) -> Self {
        Self {
            license_type,
            owner: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Dlc {
    pub dlc_id: String,
    pub dlc_title: String,
    pub license_info: LicenseInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub game_id: String,
    pub game_title: String,
    pub dlcs: Vec<Dlc>,
    pub license_info: LicenseInfo,
}
