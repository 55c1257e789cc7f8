//! In-memory collaborators for testing the update flow.
//!
//! Each mock records how often it was used so tests can assert not only
//! on results but on which components a run touched.
//!
//! # Example
//!
//! ```
//! use ublue_update::mock::{MockExecutor, MockScriptSource};
//! use ublue_update::notify::{NotificationGateway, RecordingNotifier};
//! use ublue_update::scripts::ScriptRunner;
//!
//! let source = MockScriptSource::new().script("/d/10-system", true);
//! let executor = MockExecutor::new().exits("/d/10-system", 0, "done");
//! let notifier = RecordingNotifier::new();
//! let gateway = NotificationGateway::new(&notifier, false);
//!
//! let report = ScriptRunner::new(&executor, &gateway).run(&source).unwrap();
//! assert!(report.success());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, UpdateError};
use crate::inhibitors::{BatteryStatus, SystemProbe};
use crate::scripts::{ScriptEntry, ScriptSource};
use crate::shell::{CommandResult, Executor};
use crate::transaction::PackageManager;

/// Executor returning scripted exit codes and output.
///
/// Programs without a scripted result fail to start.
#[derive(Debug, Default)]
pub struct MockExecutor {
    results: HashMap<PathBuf, (i32, String)>,
    calls: RefCell<Vec<PathBuf>>,
}

impl MockExecutor {
    /// Create an executor with no scripted programs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `program` to exit with `code`, printing `output`.
    pub fn exits(mut self, program: impl Into<PathBuf>, code: i32, output: &str) -> Self {
        self.results
            .insert(program.into(), (code, output.to_string()));
        self
    }

    /// Programs executed so far, in order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl Executor for MockExecutor {
    fn execute(&self, program: &Path) -> Result<CommandResult> {
        self.calls.borrow_mut().push(program.to_path_buf());
        match self.results.get(program) {
            Some((0, output)) => Ok(CommandResult::success(output.clone(), String::new())),
            Some((code, output)) => Ok(CommandResult::failure(
                Some(*code),
                output.clone(),
                String::new(),
            )),
            None => Err(UpdateError::CommandFailed {
                command: program.display().to_string(),
                code: None,
            }),
        }
    }
}

/// Script source with a fixed listing.
#[derive(Debug, Default)]
pub struct MockScriptSource {
    entries: Vec<ScriptEntry>,
    missing: Option<PathBuf>,
    listings: Cell<usize>,
}

impl MockScriptSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose directory does not exist.
    pub fn missing(dir: impl Into<PathBuf>) -> Self {
        Self {
            missing: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Add an entry. Entries are listed in insertion order.
    pub fn script(mut self, path: impl Into<PathBuf>, executable: bool) -> Self {
        self.entries.push(ScriptEntry::new(path, executable));
        self
    }

    /// How many times the source was listed.
    pub fn listings(&self) -> usize {
        self.listings.get()
    }
}

impl ScriptSource for MockScriptSource {
    fn entries(&self) -> Result<Vec<ScriptEntry>> {
        self.listings.set(self.listings.get() + 1);
        match &self.missing {
            Some(path) => Err(UpdateError::ScriptDirNotFound { path: path.clone() }),
            None => Ok(self.entries.clone()),
        }
    }
}

/// Probe over fixed readings.
///
/// Defaults to a machine at rest with no battery on an unmetered network.
#[derive(Debug, Default)]
pub struct MockProbe {
    battery: Option<BatteryStatus>,
    cpu_load: f64,
    memory_used: f64,
    metered: bool,
    broken: bool,
    reads: Cell<usize>,
}

impl MockProbe {
    /// A machine at rest without a battery, on an unmetered network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Running on battery at `percent` charge.
    pub fn on_battery(mut self, percent: f64) -> Self {
        self.battery = Some(BatteryStatus {
            percent,
            power_plugged: false,
        });
        self
    }

    /// Battery at `percent` charge with the charger connected.
    pub fn plugged_in(mut self, percent: f64) -> Self {
        self.battery = Some(BatteryStatus {
            percent,
            power_plugged: true,
        });
        self
    }

    /// Set the CPU load percentage.
    pub fn cpu_load(mut self, percent: f64) -> Self {
        self.cpu_load = percent;
        self
    }

    /// Set the used memory percentage.
    pub fn memory_used(mut self, percent: f64) -> Self {
        self.memory_used = percent;
        self
    }

    /// Report a metered network.
    pub fn metered(mut self) -> Self {
        self.metered = true;
        self
    }

    /// Make every reading fail.
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    /// Total number of readings taken.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    fn read<T>(&self, what: &str, value: T) -> Result<T> {
        self.reads.set(self.reads.get() + 1);
        if self.broken {
            return Err(UpdateError::UnexpectedOutput {
                command: what.to_string(),
                message: "sensor unavailable".to_string(),
            });
        }
        Ok(value)
    }
}

impl SystemProbe for MockProbe {
    fn battery(&self) -> Result<Option<BatteryStatus>> {
        self.read("battery", self.battery)
    }

    fn cpu_load_percent(&self) -> Result<f64> {
        self.read("loadavg", self.cpu_load)
    }

    fn memory_used_percent(&self) -> Result<f64> {
        self.read("meminfo", self.memory_used)
    }

    fn network_metered(&self) -> Result<bool> {
        self.read("Metered", self.metered)
    }
}

/// Package manager with a scripted transaction and update state.
#[derive(Debug, Default)]
pub struct MockPackageManager {
    busy_polls: usize,
    updates: bool,
    polls: Cell<usize>,
    update_queries: Cell<usize>,
}

impl MockPackageManager {
    /// Idle package manager with no updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an active transaction for the first `polls` queries.
    pub fn busy_for(mut self, polls: usize) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Set whether updates are available.
    pub fn with_updates(mut self, available: bool) -> Self {
        self.updates = available;
        self
    }

    /// Transaction queries made so far.
    pub fn polls(&self) -> usize {
        self.polls.get()
    }

    /// Update-availability queries made so far.
    pub fn update_queries(&self) -> usize {
        self.update_queries.get()
    }
}

impl PackageManager for MockPackageManager {
    fn active_transaction(&self) -> Result<Option<String>> {
        let n = self.polls.get();
        self.polls.set(n + 1);
        Ok((n < self.busy_polls).then(|| "upgrade".to_string()))
    }

    fn updates_available(&self) -> Result<bool> {
        self.update_queries.set(self.update_queries.get() + 1);
        Ok(self.updates)
    }
}
