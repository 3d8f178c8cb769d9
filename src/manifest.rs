use std::path::Path;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::errors::{io_error, json_error};
use crate::Error;

const BUNDLED_MANIFEST: &str = include_str!("../manifest.json");

/// Static descriptor identifying the plugin to the host
#[derive(Serialize, Deserialize, Getters, Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    name: String,
    platform: String,
    guid: String,
    version: String,
    description: String,
    author: String,
    email: String,
    url: String,
}

impl Manifest {
    /// Manifest shipped with the crate
    pub fn bundled() -> Result<Self, Error> {
        Self::parse(BUNDLED_MANIFEST)
    }

    pub fn parse(data: &str) -> Result<Self, Error> {
        serde_json::from_str(data).map_err(json_error)
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = tokio::fs::read_to_string(path).await.map_err(io_error)?;
        Self::parse(&data)
    }
}
