//! TOML configuration loaded from `siteops.toml` at the site root.
//!
//! Every key is optional; a missing file loads the documented defaults so
//! the tool runs against a bare site tree.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the config file looked up in the site root.
pub const CONFIG_FILE: &str = "siteops.toml";

/// Full configuration for one site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Host CLI settings.
    pub host: HostConfig,
    /// Migration engine settings.
    pub migrate: MigrateConfig,
    /// Asset sync settings.
    pub sync: SyncConfig,
}

/// Settings for the site's admin CLI.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Program invoked for host operations. Must accept
    /// `--path=<site-root>` and the `db`/`theme`/`plugin` command families.
    pub program: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            program: "wp".to_string(),
        }
    }
}

/// Settings for the migration engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MigrateConfig {
    /// Directory under the site root holding the change-units.
    pub dir: String,
    /// Ledger table name.
    pub table: String,
    /// Bootstrap seed file name inside the migrations directory. Exempt
    /// from the naming convention and excluded from discovery.
    pub bootstrap: String,
    /// File extension of generator scripts (without the dot).
    pub generator_ext: String,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            dir: "migrations".to_string(),
            table: "migrations".to_string(),
            bootstrap: "bootstrap.sql".to_string(),
            generator_ext: "sh".to_string(),
        }
    }
}

/// Settings for the asset sync subsystem.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Source directory of binary assets, relative to the site root.
    pub source: String,
    /// Target directory inside the site tree, relative to the site root.
    pub target: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: "assets".to_string(),
            target: "public/assets".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load `siteops.toml` from the site root.
    ///
    /// A missing file yields the default configuration; a present file
    /// overrides only the keys it names.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(site_root: &Path) -> Result<Self, ConfigError> {
        let path = site_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Absolute path of the migrations directory.
    #[must_use]
    pub fn migrations_dir(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.migrate.dir)
    }

    /// Absolute path of the sync source directory.
    #[must_use]
    pub fn sync_source(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.sync.source)
    }

    /// Absolute path of the sync target directory.
    #[must_use]
    pub fn sync_target(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.sync.target)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config.host.program, "wp");
        assert_eq!(config.migrate.dir, "migrations");
        assert_eq!(config.migrate.table, "migrations");
        assert_eq!(config.migrate.bootstrap, "bootstrap.sql");
        assert_eq!(config.migrate.generator_ext, "sh");
        assert_eq!(config.sync.source, "assets");
        assert_eq!(config.sync.target, "public/assets");
    }

    #[test]
    fn partial_file_overrides_named_keys_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[migrate]\ntable = \"schema_log\"\n",
        )
        .unwrap();
        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config.migrate.table, "schema_log");
        assert_eq!(config.migrate.dir, "migrations", "unnamed keys keep defaults");
        assert_eq!(config.host.program, "wp");
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[host]
program = "sitecli"

[migrate]
dir = "db/changes"
table = "applied_changes"
bootstrap = "seed.sql"
generator-ext = "gen"

[sync]
source = "media"
target = "public/media"
"#,
        )
        .unwrap();
        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config.host.program, "sitecli");
        assert_eq!(config.migrate.dir, "db/changes");
        assert_eq!(config.migrate.table, "applied_changes");
        assert_eq!(config.migrate.bootstrap, "seed.sql");
        assert_eq!(config.migrate.generator_ext, "gen");
        assert_eq!(config.sync.source, "media");
        assert_eq!(config.sync.target, "public/media");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[migrate\n").unwrap();
        let err = SiteConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[migrate]\nbogus = 1\n").unwrap();
        let err = SiteConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn path_helpers_join_site_root() {
        let config = SiteConfig::default();
        let root = Path::new("/srv/site");
        assert_eq!(
            config.migrations_dir(root),
            PathBuf::from("/srv/site/migrations")
        );
        assert_eq!(config.sync_source(root), PathBuf::from("/srv/site/assets"));
        assert_eq!(
            config.sync_target(root),
            PathBuf::from("/srv/site/public/assets")
        );
    }
}
