use crate::paths;

const LOCAL_CONFIG_FILE: &str = ".appdb.toml";

/// Load config file content from CWD first, then the config directory
///
/// Searches for:
/// 1. `.appdb.toml` in the current working directory
/// 2. `config.toml` in the application config directory
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(LOCAL_CONFIG_FILE) {
        log::debug!("Loaded config from {}", LOCAL_CONFIG_FILE);
        return Some(content);
    }

    if let Ok(path) = paths::app_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Some(content);
        }
    }

    None
}
