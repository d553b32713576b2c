//! History file path resolution.
//!
//! History lives in `~/.sqlish_history` unless `SQLISH_HISTORY` points
//! somewhere else. An empty value disables persistence entirely; rustyline
//! handles the actual file I/O.

use std::env;
use std::path::PathBuf;

use directories::BaseDirs;

const DEFAULT_HISTORY_FILE: &str = ".sqlish_history";
const HISTORY_ENV_VAR: &str = "SQLISH_HISTORY";

pub fn history_path() -> Option<PathBuf> {
    if let Ok(custom_path) = env::var(HISTORY_ENV_VAR) {
        if custom_path.is_empty() {
            return None;
        }
        return Some(PathBuf::from(custom_path));
    }

    BaseDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_HISTORY_FILE))
}
