// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::handler::StaticFiles;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub files: StaticFiles,
}

impl AppState {
    pub const fn new(config: Config, files: StaticFiles) -> Self {
        Self { config, files }
    }
}
