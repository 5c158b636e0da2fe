//!
//! Platform-native path resolution for refbridge configuration.
//!
//! - Linux/Unix: XDG Base Directory Specification (~/.config/refbridge)
//! - macOS: ~/Library/Application Support
//! - Windows: %APPDATA%
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use crate::error::{BridgeError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/* --- constants ------------------------------------------------------------------------------- */

/// Application name for directory resolution
const APP_NAME: &str = "refbridge";
/// Organization qualifier for directory resolution
const ORGANIZATION: &str = "com";
/// Organization name for directory resolution
const ORG_NAME: &str = "SkyCorp";
/// File name of the main configuration file
const CONFIG_FILE_NAME: &str = "config.toml";

/* --- public functions ------------------------------------------------------------------------ */

/// Get the user configuration directory for refbridge
///
/// The directory is not created; a missing user config simply means defaults.
///
/// # Returns
/// * `Ok(PathBuf)` - Path to user configuration directory
/// * `Err(BridgeError)` - Unable to determine the home directory
pub fn user_config_dir() -> Result<PathBuf> {
    Ok(get_project_dirs()?.config_dir().to_path_buf())
}

/// Get the default user configuration file path
pub fn user_config_file() -> Result<PathBuf> {
    Ok(user_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Expand `~/` and `$VAR` references in a path
///
/// # Arguments
/// * `path` - Path that may contain a leading tilde or environment variables
///
/// # Returns
/// * `Ok(PathBuf)` - Expanded path
/// * `Err(BridgeError)` - Home directory unknown or a variable is undefined
pub fn expand_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path_str = path.as_ref().to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        return match directories::UserDirs::new() {
            Some(dirs) => Ok(dirs.home_dir().join(rest)),
            None => Err(BridgeError::Config(
                "Unable to determine user home directory for tilde expansion".to_string(),
            )),
        };
    }

    if path_str.contains('$') {
        let expanded = shellexpand::full(&path_str).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to expand environment variables in path '{}': {}",
                path_str, e
            ))
        })?;
        return Ok(PathBuf::from(expanded.as_ref()));
    }

    Ok(path.as_ref().to_path_buf())
}

/// Check that a configuration file exists, is a regular file and is readable
pub fn validate_config_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BridgeError::Config(format!(
            "Configuration file '{}' does not exist",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(BridgeError::Config(format!(
            "Configuration path '{}' exists but is not a regular file",
            path.display()
        )));
    }

    std::fs::File::open(path).map_err(|e| {
        BridgeError::Config(format!(
            "Configuration file '{}' exists but cannot be read: {}\n\
             You can fix this with: chmod 644 '{}'",
            path.display(),
            e,
            path.display()
        ))
    })?;

    Ok(())
}

/* --- private functions ----------------------------------------------------------------------- */

/// Get ProjectDirs instance for refbridge
fn get_project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(ORGANIZATION, ORG_NAME, APP_NAME).ok_or_else(|| {
        BridgeError::Config(
            "Unable to determine user directories. \
             Please ensure your user account has a valid home directory."
                .to_string(),
        )
    })
}

/* --- tests ----------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_config_file_path() {
        let config_file = user_config_file().expect("Should get config file path");
        assert_eq!(config_file.file_name().unwrap(), "config.toml");
        assert!(config_file.to_string_lossy().contains("refbridge"));
    }

    #[test]
    fn test_tilde_expansion() {
        let expanded = expand_path("~/test/path").expect("Should expand tilde");
        assert!(!expanded.to_string_lossy().contains('~'), "Tilde should be expanded");

        let absolute = expand_path("/absolute/path").expect("Should handle absolute path");
        assert_eq!(absolute, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_env_var_expansion() {
        temp_env::with_var("REFBRIDGE_TEST_DIR", Some("/opt/refbridge"), || {
            let expanded = expand_path("$REFBRIDGE_TEST_DIR/config.toml").unwrap();
            assert_eq!(expanded, PathBuf::from("/opt/refbridge/config.toml"));
        });
        temp_env::with_var_unset("REFBRIDGE_TEST_UNSET", || {
            assert!(expand_path("$REFBRIDGE_TEST_UNSET/config.toml").is_err());
        });
    }

    #[test]
    fn test_validate_config_file() {
        assert!(validate_config_file("/non/existent/file.toml").is_err());

        let temp_dir = TempDir::new().unwrap();
        assert!(validate_config_file(temp_dir.path()).is_err());

        let temp_file = temp_dir.path().join("test.toml");
        fs::write(&temp_file, "[endpoint]").unwrap();
        assert!(validate_config_file(&temp_file).is_ok());
    }
}
