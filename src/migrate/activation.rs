//! Dispatch of activation-kind units to the host.
use crate::error::MigrateError;
use crate::host::{ComponentKind, Host};

/// Resolves an activation target against the host's two component
/// categories and invokes the matching activate operation.
pub struct ActivationDispatcher<'a> {
    host: &'a dyn Host,
}

impl std::fmt::Debug for ActivationDispatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationDispatcher").finish_non_exhaustive()
    }
}

impl<'a> ActivationDispatcher<'a> {
    /// Create a dispatcher over the given host.
    #[must_use]
    pub const fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }

    /// Activate `target` as whichever category it is installed under.
    ///
    /// The categories are mutually exclusive in the host, so the first
    /// installed match wins. Returns the category that was activated.
    ///
    /// # Errors
    ///
    /// - [`MigrateError::NotInstalled`] when the target matches neither
    ///   category; the unit must not be recorded so a later run retries it.
    /// - [`MigrateError::ActivationFailed`] for any other host error.
    pub fn dispatch(&self, target: &str) -> Result<ComponentKind, MigrateError> {
        for kind in [ComponentKind::Theme, ComponentKind::Plugin] {
            let installed =
                self.host
                    .is_installed(kind, target)
                    .map_err(|source| MigrateError::ActivationFailed {
                        target: target.to_string(),
                        source,
                    })?;
            if installed {
                self.host
                    .activate(kind, target)
                    .map_err(|source| MigrateError::ActivationFailed {
                        target: target.to_string(),
                        source,
                    })?;
                return Ok(kind);
            }
        }
        Err(MigrateError::NotInstalled(target.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct ComponentHost {
        themes: HashSet<String>,
        plugins: HashSet<String>,
        activate_fails: bool,
        probe_fails: bool,
        activated: Mutex<Vec<(ComponentKind, String)>>,
    }

    impl Host for ComponentHost {
        fn ensure_ledger_table(&self) -> Result<(), HostError> {
            Ok(())
        }

        fn query_count(&self, _statement: &str) -> Result<u64, HostError> {
            Ok(0)
        }

        fn insert_ledger_row(&self, _name: &str) -> Result<(), HostError> {
            Ok(())
        }

        fn is_installed(&self, kind: ComponentKind, name: &str) -> Result<bool, HostError> {
            if self.probe_fails {
                return Err(HostError::Spawn {
                    program: "wp".to_string(),
                    message: "not found".to_string(),
                });
            }
            Ok(match kind {
                ComponentKind::Theme => self.themes.contains(name),
                ComponentKind::Plugin => self.plugins.contains(name),
            })
        }

        fn activate(&self, kind: ComponentKind, name: &str) -> Result<(), HostError> {
            if self.activate_fails {
                return Err(HostError::OperationFailed {
                    operation: format!("{} activate", kind.as_str()),
                    code: 1,
                    stderr: "activation error".to_string(),
                });
            }
            self.activated.lock().unwrap().push((kind, name.to_string()));
            Ok(())
        }

        fn execute_statements(&self, _file: &Path) -> Result<(), HostError> {
            Ok(())
        }
    }

    #[test]
    fn dispatches_installed_theme() {
        let host = ComponentHost {
            themes: HashSet::from(["widgets".to_string()]),
            ..ComponentHost::default()
        };
        let kind = ActivationDispatcher::new(&host).dispatch("widgets").unwrap();
        assert_eq!(kind, ComponentKind::Theme);
        assert_eq!(
            *host.activated.lock().unwrap(),
            vec![(ComponentKind::Theme, "widgets".to_string())]
        );
    }

    #[test]
    fn dispatches_installed_plugin() {
        let host = ComponentHost {
            plugins: HashSet::from(["gallery".to_string()]),
            ..ComponentHost::default()
        };
        let kind = ActivationDispatcher::new(&host).dispatch("gallery").unwrap();
        assert_eq!(kind, ComponentKind::Plugin);
    }

    #[test]
    fn neither_category_is_not_installed() {
        let host = ComponentHost::default();
        let err = ActivationDispatcher::new(&host)
            .dispatch("widgets")
            .unwrap_err();
        assert!(matches!(err, MigrateError::NotInstalled(ref t) if t == "widgets"));
        assert!(host.activated.lock().unwrap().is_empty());
    }

    #[test]
    fn activate_error_is_activation_failed() {
        let host = ComponentHost {
            themes: HashSet::from(["widgets".to_string()]),
            activate_fails: true,
            ..ComponentHost::default()
        };
        let err = ActivationDispatcher::new(&host)
            .dispatch("widgets")
            .unwrap_err();
        assert!(matches!(err, MigrateError::ActivationFailed { .. }));
    }

    #[test]
    fn probe_error_is_activation_failed_not_not_installed() {
        let host = ComponentHost {
            probe_fails: true,
            ..ComponentHost::default()
        };
        let err = ActivationDispatcher::new(&host)
            .dispatch("widgets")
            .unwrap_err();
        assert!(
            matches!(err, MigrateError::ActivationFailed { .. }),
            "a spawn failure is retryable but must not be reported as not-installed"
        );
    }
}
