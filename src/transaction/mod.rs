//! Package-manager transactions and update availability.
//!
//! - [`PackageManager`] abstracts the host's package manager
//! - [`TransactionBarrier`] blocks until no transaction is in flight
//! - [`rpm_ostree`] is the production backend

pub mod rpm_ostree;

pub use rpm_ostree::RpmOstree;

use std::time::{Duration, Instant};

use crate::error::{Result, UpdateError};

/// Observes the host's package manager.
pub trait PackageManager {
    /// Description of the transaction currently holding the lock, if any.
    fn active_transaction(&self) -> Result<Option<String>>;

    /// Whether the update source has something newer than the booted system.
    fn updates_available(&self) -> Result<bool>;
}

/// Waits for conflicting package-manager transactions to finish.
///
/// This is the only place the update flow blocks before scripts run.
pub struct TransactionBarrier<'a> {
    package_manager: &'a dyn PackageManager,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl<'a> TransactionBarrier<'a> {
    /// Create a barrier that polls every `poll_interval`, with no timeout.
    pub fn new(package_manager: &'a dyn PackageManager, poll_interval: Duration) -> Self {
        Self {
            package_manager,
            poll_interval,
            timeout: None,
        }
    }

    /// Give up with [`UpdateError::TransactionTimeout`] after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Block until no transaction is active.
    pub fn wait(&self) -> Result<()> {
        let start = Instant::now();
        let mut announced = false;

        while let Some(txn) = self.package_manager.active_transaction()? {
            if !announced {
                tracing::info!("Waiting for transaction to finish: {}", txn);
                announced = true;
            } else {
                tracing::debug!("Transaction still active: {}", txn);
            }

            if let Some(timeout) = self.timeout {
                let waited = start.elapsed();
                if waited >= timeout {
                    return Err(UpdateError::TransactionTimeout { waited });
                }
            }

            std::thread::sleep(self.poll_interval);
        }

        if announced {
            tracing::info!("Transaction finished");
        }
        Ok(())
    }
}
