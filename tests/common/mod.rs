// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed site fixture, a scripted host that
// simulates the admin CLI with an in-memory ledger, and a recording logger,
// so each integration test can set up an isolated environment without
// repeating boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use siteops_cli::error::HostError;
use siteops_cli::host::{ComponentKind, Host};
use siteops_cli::logging::{Log, UnitEntry, UnitStatus};

/// An isolated site tree backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
#[derive(Debug)]
pub struct SiteFixture {
    /// Temporary directory containing the site tree.
    pub root: tempfile::TempDir,
}

impl SiteFixture {
    /// Create a site with an empty `migrations/` directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("migrations")).expect("create migrations dir");
        Self { root }
    }

    /// Path to the site root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the migrations directory.
    pub fn migrations_dir(&self) -> PathBuf {
        self.root.path().join("migrations")
    }

    /// Write a change-unit file into `migrations/`.
    pub fn write_unit(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.migrations_dir().join(name);
        std::fs::write(&path, contents).expect("write unit file");
        path
    }

    /// Write an executable generator script into `migrations/` (Unix only).
    #[cfg(unix)]
    pub fn write_generator(&self, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.migrations_dir().join(name);
        std::fs::write(&path, script).expect("write generator script");
        let mut perms = std::fs::metadata(&path)
            .expect("generator metadata")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("set generator permissions");
        path
    }

    /// Write `siteops.toml` at the site root.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.root.path().join("siteops.toml"), contents).expect("write config");
    }

    /// Write a file under the default asset source directory.
    pub fn write_asset(&self, rel: &str, contents: &str) {
        let path = self.root.path().join("assets").join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create asset parent");
        }
        std::fs::write(path, contents).expect("write asset");
    }
}

/// Host simulation with an in-memory ledger and a call journal.
///
/// `query_count` understands the two statements the engine issues: the
/// `information_schema` existence probe and the per-name membership check.
/// `execute_statements` records the file name and its contents at call
/// time, so tests can observe generated temp files that are deleted
/// immediately afterwards.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    /// Whether the ledger table currently exists.
    pub table_exists: Mutex<bool>,
    /// Names present in the simulated ledger.
    pub applied: Mutex<HashSet<String>>,
    /// Installed presentation-layer components.
    pub themes: Mutex<HashSet<String>>,
    /// Installed extension components.
    pub plugins: Mutex<HashSet<String>>,
    /// Journal of `(operation, detail)` pairs in invocation order.
    pub calls: Mutex<Vec<(String, String)>>,
    /// File name of the bootstrap seed, used to flip `table_exists`.
    pub bootstrap_name: String,
}

impl ScriptedHost {
    /// A host with no installed components and an absent ledger table.
    pub fn new() -> Self {
        Self {
            bootstrap_name: "bootstrap.sql".to_string(),
            ..Self::default()
        }
    }

    /// Mark a theme as installed.
    pub fn install_theme(&self, name: &str) {
        self.themes.lock().unwrap().insert(name.to_string());
    }

    /// Mark a plugin as installed.
    pub fn install_plugin(&self, name: &str) {
        self.plugins.lock().unwrap().insert(name.to_string());
    }

    /// Clone of the call journal.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Clone of the simulated ledger contents.
    pub fn applied_names(&self) -> HashSet<String> {
        self.applied.lock().unwrap().clone()
    }

    fn journal(&self, operation: &str, detail: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), detail.to_string()));
    }
}

impl Host for ScriptedHost {
    fn ensure_ledger_table(&self) -> Result<(), HostError> {
        *self.table_exists.lock().unwrap() = true;
        self.journal("create-table", "");
        Ok(())
    }

    fn query_count(&self, statement: &str) -> Result<u64, HostError> {
        if statement.contains("information_schema") {
            return Ok(u64::from(*self.table_exists.lock().unwrap()));
        }
        let name = statement.split('\'').nth(1).unwrap_or_default();
        Ok(u64::from(self.applied.lock().unwrap().contains(name)))
    }

    fn insert_ledger_row(&self, name: &str) -> Result<(), HostError> {
        self.applied.lock().unwrap().insert(name.to_string());
        self.journal("record", name);
        Ok(())
    }

    fn is_installed(&self, kind: ComponentKind, name: &str) -> Result<bool, HostError> {
        Ok(match kind {
            ComponentKind::Theme => self.themes.lock().unwrap().contains(name),
            ComponentKind::Plugin => self.plugins.lock().unwrap().contains(name),
        })
    }

    fn activate(&self, kind: ComponentKind, name: &str) -> Result<(), HostError> {
        self.journal("activate", &format!("{} {name}", kind.as_str()));
        Ok(())
    }

    fn execute_statements(&self, file: &Path) -> Result<(), HostError> {
        let file_name = file
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().to_string());
        if file_name == self.bootstrap_name {
            *self.table_exists.lock().unwrap() = true;
        }
        // Contents are read at call time because generated temp files are
        // removed as soon as the runner returns.
        let contents = std::fs::read_to_string(file).unwrap_or_default();
        self.journal("execute", &format!("{file_name}\n{contents}"));
        Ok(())
    }
}

/// [`Log`] implementation that records warnings and unit outcomes.
#[derive(Debug, Default)]
pub struct RecordingLog {
    /// Warning and error messages, in emission order.
    pub warnings: Mutex<Vec<String>>,
    /// Recorded unit outcomes.
    pub units: Mutex<Vec<UnitEntry>>,
}

impl RecordingLog {
    /// An empty recording logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of all warning messages.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    /// Count recorded entries with the given status.
    pub fn count(&self, status: UnitStatus) -> usize {
        self.units
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.status == status)
            .count()
    }
}

impl Log for RecordingLog {
    fn stage(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}

    fn warn(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }

    fn error(&self, msg: &str) {
        self.warn(msg);
    }

    fn dry_run(&self, _msg: &str) {}

    fn record_unit(&self, name: &str, status: UnitStatus, message: Option<&str>) {
        self.units.lock().unwrap().push(UnitEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}
