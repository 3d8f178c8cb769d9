pub mod achievements;
pub mod auth;
pub mod constants;
mod core;
pub mod errors;
pub mod library;
pub mod local;
pub mod manifest;
pub mod plugin;
pub mod session;
pub mod utils;

pub use crate::core::{AuthState, PoePlugin};
pub use crate::errors::Error;
pub use crate::plugin::{Host, Plugin};
pub use session::SessionFetcher;
