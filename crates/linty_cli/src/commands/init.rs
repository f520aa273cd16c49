//! Init command implementation

use std::fs;
use std::path::Path;

use linty_core::LintyConfig;
use miette::{IntoDiagnostic, Result, miette};
use tracing::info;

const DEFAULT_CONFIG: &str = r#"{
  "concurrency": 4,
  "gitignore": true,
  "ignore": ["node_modules/", "*.min.js"],
  "verbose": false,
  "secure": false,
  "protocol": "structured",
  "report": "fail-complete",
  "lint": []
}
"#;

/// Writes a starter `linty.json` into `dir`, leaving an existing one alone
/// unless `force` is set.
pub fn run_init(dir: &Path, force: bool) -> Result<()> {
    fs::create_dir_all(dir).into_diagnostic()?;
    let config_path = dir.join(LintyConfig::CONFIG_FILE);

    if config_path.exists() && !force {
        return Err(miette!(
            "{} already exists; pass --force to replace it",
            config_path.display()
        ));
    }

    fs::write(&config_path, DEFAULT_CONFIG).into_diagnostic()?;
    info!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LintyConfig::from_json(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.worker_count(), 4);
        assert!(config.gitignore);
        assert!(config.lint.is_empty());
    }

    #[test]
    fn test_existing_config_is_kept_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LintyConfig::CONFIG_FILE);
        fs::write(&path, "{}").unwrap();

        let err = run_init(dir.path(), false).unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_force_replaces_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LintyConfig::CONFIG_FILE);
        fs::write(&path, "{}").unwrap();

        run_init(dir.path(), true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
