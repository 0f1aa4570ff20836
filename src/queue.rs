//! Serialized install queue.
//!
//! Accepts install requests at any rate and drives them through the
//! installer strictly one at a time, in FIFO order. A failing package never
//! halts the queue; failed names accumulate and are reported once,
//! together, when the backlog drains.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::Preferences;
use crate::error::Error;
use crate::source::{DependencyType, Installer};
use crate::status::StatusReporter;

#[derive(Default)]
struct QueueState {
    backlog: VecDeque<String>,

    /// True only while a drain task is running.
    active: bool,

    /// Names that failed during the current drain cycle; taken and cleared
    /// when the aggregate is reported.
    failed: Vec<String>,
}

struct QueueInner {
    installer: Arc<dyn Installer>,
    reporter: Arc<dyn StatusReporter>,
    prefs: Preferences,
    state: Mutex<QueueState>,
}

/// Drives package installs one at a time in enqueue order.
///
/// Cheap to clone; clones share the same backlog.
#[derive(Clone)]
pub struct InstallQueue {
    inner: Arc<QueueInner>,
}

impl InstallQueue {
    pub fn new(
        installer: Arc<dyn Installer>,
        reporter: Arc<dyn StatusReporter>,
        prefs: Preferences,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                installer,
                reporter,
                prefs,
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    /// Queue a package for installation.
    ///
    /// Never fails and never blocks: the name is appended to the backlog
    /// and, when no install is currently running, a drain task is spawned
    /// on the ambient tokio runtime. Duplicate names are processed
    /// independently; deduplication is the caller's concern.
    pub fn enqueue(&self, package: impl Into<String>) {
        let start_drain = {
            let mut state = self.inner.state.lock().unwrap();
            state.backlog.push_back(package.into());
            if state.active {
                false
            } else {
                state.active = true;
                true
            }
        };

        if start_drain {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move { drain(inner).await });
        }
    }
}

/// Process the backlog until it is empty, then report aggregated failures.
async fn drain(inner: Arc<QueueInner>) {
    loop {
        // Pop-or-finish is atomic: an enqueue racing with the end of this
        // drain either lands before the pop or observes active == false and
        // spawns its own drain. `failed` must be taken in the same critical
        // section that clears `active`.
        let (package, failed) = {
            let mut state = inner.state.lock().unwrap();
            match state.backlog.pop_front() {
                Some(package) => (Some(package), Vec::new()),
                None => {
                    state.active = false;
                    (None, std::mem::take(&mut state.failed))
                }
            }
        };

        let Some(package) = package else {
            if !failed.is_empty() {
                let message = format!("Error installing: {}", failed.join(", "));
                warn!("{message}");
                let status = inner.reporter.post(&message, false);
                inner.reporter.remove(status);
            }
            return;
        };

        install_one(&inner, &package).await;
    }
}

/// Run one install attempt and report its outcome.
async fn install_one(inner: &QueueInner, package: &str) {
    let status = inner.reporter.post(&format!("Installing {package}…"), true);

    let result = inner
        .installer
        .install(
            package,
            None,
            DependencyType::Production,
            inner.prefs.save_to_manifest,
        )
        .await;

    match result {
        Ok(installed) => {
            info!(package, dir = ?installed.installation_dir, "package installed");
            inner.reporter.update(status, &format!("{package} installed"), false);
            inner.reporter.remove(status);
        }
        Err(err) => {
            // No per-package failure message; the user sees one aggregated
            // status when the backlog drains.
            let failure = Error::Install {
                package: package.to_string(),
                reason: format!("{err:#}"),
            };
            warn!("{failure}");
            inner.state.lock().unwrap().failed.push(package.to_string());
            inner.reporter.remove(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InstallResult;
    use anyhow::bail;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Installer that records call order and how many ran concurrently.
    struct RecordingInstaller {
        completed: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail: HashSet<String>,
    }

    impl RecordingInstaller {
        fn new(fail: &[&str]) -> Self {
            Self {
                completed: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fail: fail.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn completed(&self) -> Vec<String> {
            self.completed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Installer for RecordingInstaller {
        async fn install(
            &self,
            package: &str,
            _target_dir: Option<&Path>,
            _dependency_type: DependencyType,
            _save: bool,
        ) -> anyhow::Result<InstallResult> {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(5)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.completed.lock().unwrap().push(package.to_string());

            if self.fail.contains(package) {
                bail!("registry refused {package}");
            }
            Ok(InstallResult {
                package: package.to_string(),
                installation_dir: None,
            })
        }
    }

    /// Reporter that records every posted and updated message in order.
    #[derive(Default)]
    struct RecordingReporter {
        next_id: AtomicUsize,
        messages: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl StatusReporter for RecordingReporter {
        fn post(&self, message: &str, _busy: bool) -> crate::status::StatusId {
            self.messages.lock().unwrap().push(message.to_string());
            self.next_id.fetch_add(1, Ordering::Relaxed) as u64
        }

        fn update(&self, _id: crate::status::StatusId, message: &str, _busy: bool) {
            self.messages.lock().unwrap().push(message.to_string());
        }

        fn remove(&self, _id: crate::status::StatusId) {}
    }

    async fn drained(queue: &InstallQueue) {
        loop {
            {
                let state = queue.inner.state.lock().unwrap();
                if !state.active && state.backlog.is_empty() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_installs_run_fifo_one_at_a_time() {
        let installer = Arc::new(RecordingInstaller::new(&[]));
        let queue = InstallQueue::new(
            Arc::clone(&installer) as Arc<dyn Installer>,
            Arc::new(RecordingReporter::default()),
            Preferences::default(),
        );

        for name in ["jquery", "lodash", "backbone", "jquery"] {
            queue.enqueue(name);
        }
        drained(&queue).await;

        assert_eq!(
            installer.completed(),
            vec!["jquery", "lodash", "backbone", "jquery"]
        );
        assert_eq!(installer.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_aggregate_into_one_status_after_drain() {
        let installer = Arc::new(RecordingInstaller::new(&["lodash", "moment"]));
        let reporter = Arc::new(RecordingReporter::default());
        let queue = InstallQueue::new(
            Arc::clone(&installer) as Arc<dyn Installer>,
            Arc::clone(&reporter) as Arc<dyn StatusReporter>,
            Preferences::default(),
        );

        for name in ["jquery", "lodash", "moment", "backbone"] {
            queue.enqueue(name);
        }
        drained(&queue).await;

        // Every task ran despite the failures in the middle.
        assert_eq!(
            installer.completed(),
            vec!["jquery", "lodash", "moment", "backbone"]
        );

        let messages = reporter.messages();
        let aggregates: Vec<&String> = messages
            .iter()
            .filter(|m| m.starts_with("Error installing"))
            .collect();
        assert_eq!(aggregates, vec!["Error installing: lodash, moment"]);

        // The aggregate comes after the last install's own messages.
        assert_eq!(messages.last().unwrap(), "Error installing: lodash, moment");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_names_clear_between_drain_cycles() {
        let installer = Arc::new(RecordingInstaller::new(&["lodash"]));
        let reporter = Arc::new(RecordingReporter::default());
        let queue = InstallQueue::new(
            Arc::clone(&installer) as Arc<dyn Installer>,
            Arc::clone(&reporter) as Arc<dyn StatusReporter>,
            Preferences::default(),
        );

        queue.enqueue("lodash");
        drained(&queue).await;

        queue.enqueue("jquery");
        drained(&queue).await;

        let aggregates = reporter
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Error installing"))
            .collect::<Vec<_>>();
        assert_eq!(aggregates, vec!["Error installing: lodash"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_during_active_drain_is_picked_up() {
        let installer = Arc::new(RecordingInstaller::new(&[]));
        let queue = InstallQueue::new(
            Arc::clone(&installer) as Arc<dyn Installer>,
            Arc::new(RecordingReporter::default()),
            Preferences::default(),
        );

        queue.enqueue("jquery");
        tokio::time::sleep(Duration::from_millis(1)).await;
        queue.enqueue("lodash");
        drained(&queue).await;

        assert_eq!(installer.completed(), vec!["jquery", "lodash"]);
        assert_eq!(installer.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
