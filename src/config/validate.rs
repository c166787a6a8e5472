// src/config/validate.rs

use anyhow::Result;

use crate::config::model::WatchConfig;
use crate::errors::UsageError;

/// Run basic semantic validation against a resolved configuration.
///
/// This checks:
/// - at least one directory is being watched
/// - at least one command is configured
/// - every watched directory exists
///
/// It does **not** compile patterns; that happens separately so pattern
/// errors can be reported with the offending text.
pub fn validate_config(cfg: &WatchConfig) -> Result<()> {
    ensure_has_dirs(cfg)?;
    ensure_has_commands(cfg)?;
    ensure_dirs_exist(cfg)?;
    Ok(())
}

fn ensure_has_dirs(cfg: &WatchConfig) -> Result<()> {
    if cfg.dirs.is_empty() {
        return Err(UsageError::NoDirectory.into());
    }
    Ok(())
}

fn ensure_has_commands(cfg: &WatchConfig) -> Result<()> {
    if cfg.commands.is_empty() || cfg.commands.iter().all(|c| c.argv.is_empty()) {
        return Err(UsageError::NoCommand.into());
    }
    Ok(())
}

fn ensure_dirs_exist(cfg: &WatchConfig) -> Result<()> {
    for dir in &cfg.dirs {
        if !dir.is_dir() {
            return Err(UsageError::MissingDirectory(dir.clone()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::Command;

    #[test]
    fn empty_config_is_rejected() {
        assert!(validate_config(&WatchConfig::default()).is_err());
    }

    #[test]
    fn missing_directory_is_rejected() {
        let cfg = WatchConfig {
            dirs: vec!["/definitely/not/a/real/dir".into()],
            patterns: vec![],
            commands: vec![Command::parse("echo hi")],
        };
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn existing_dir_with_command_passes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cfg = WatchConfig {
            dirs: vec![tmp.path().to_path_buf()],
            patterns: vec![],
            commands: vec![Command::parse("echo hi")],
        };
        assert!(validate_config(&cfg).is_ok());
    }
}
