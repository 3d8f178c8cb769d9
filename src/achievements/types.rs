use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One completed entry scraped from the profile page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchievementTag {
    /// Raw text of the entry's first heading, `None` when it has none
    pub heading: Option<String>,
}

impl AchievementTag {
    pub fn new<S: Into<String>>(heading: S) -> Self {
        Self {
            heading: Some(heading.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Getters, Clone, Debug, PartialEq, Eq)]
pub struct Achievement {
    unlock_time: i64,
    achievement_name: String,
}

impl Achievement {
    pub fn new<S: Into<String>>(unlock_time: i64, achievement_name: S) -> Self {
        Self {
            unlock_time,
            achievement_name: achievement_name.into(),
        }
    }
}
