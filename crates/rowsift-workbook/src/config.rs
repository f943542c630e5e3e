use serde::{Deserialize, Serialize};

pub const DEFAULT_DISPLAY_LIMIT: usize = 1000;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of results the view shows; the total is still
    /// counted in full.
    pub display_limit: usize,
    /// Rows between two progress reports.
    pub progress_interval: usize,
    /// Record one trace line per matched row.
    pub debug: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            display_limit: DEFAULT_DISPLAY_LIMIT,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            debug: false,
        }
    }
}
