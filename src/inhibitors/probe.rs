//! Live system state probes.
//!
//! The inhibitor checks never read `/sys` or `/proc` directly; they go
//! through [`SystemProbe`], so a fake can stand in for the real machine.
//! [`LinuxProbe`] is the production implementation.
//!
//! The parsers are free functions over file contents so each source
//! format can be tested without touching the host.

use crate::error::{Result, UpdateError};
use crate::shell::execute_tool;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Charge and power source of the machine's batteries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStatus {
    /// Charge percentage, averaged over all batteries.
    pub percent: f64,
    /// Whether an external power source is connected.
    pub power_plugged: bool,
}

/// Access to live hardware and resource state.
pub trait SystemProbe {
    /// Battery state, or `None` on machines without a battery.
    fn battery(&self) -> Result<Option<BatteryStatus>>;

    /// 5-minute load average as a percentage of online CPUs.
    fn cpu_load_percent(&self) -> Result<f64>;

    /// Used memory as a percentage of total memory.
    fn memory_used_percent(&self) -> Result<f64>;

    /// Whether the active network connection is metered.
    fn network_metered(&self) -> Result<bool>;
}

/// Probe backed by sysfs, procfs, and NetworkManager.
#[derive(Debug, Clone)]
pub struct LinuxProbe {
    power_supply_dir: PathBuf,
    proc_dir: PathBuf,
}

impl Default for LinuxProbe {
    fn default() -> Self {
        Self {
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
            proc_dir: PathBuf::from("/proc"),
        }
    }
}

impl LinuxProbe {
    /// Create a probe reading the standard system locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a probe rooted at alternative sysfs/procfs directories.
    pub fn with_roots(power_supply_dir: &Path, proc_dir: &Path) -> Self {
        Self {
            power_supply_dir: power_supply_dir.to_path_buf(),
            proc_dir: proc_dir.to_path_buf(),
        }
    }

    fn read_proc(&self, name: &str) -> Result<String> {
        let path = self.proc_dir.join(name);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(content)
    }
}

impl SystemProbe for LinuxProbe {
    fn battery(&self) -> Result<Option<BatteryStatus>> {
        if !self.power_supply_dir.exists() {
            return Ok(None);
        }
        read_power_supplies(&self.power_supply_dir)
    }

    fn cpu_load_percent(&self) -> Result<f64> {
        let content = self.read_proc("loadavg")?;
        let load = parse_loadavg(&content)?;
        let cpus = std::thread::available_parallelism()?.get();
        Ok(load / cpus as f64 * 100.0)
    }

    fn memory_used_percent(&self) -> Result<f64> {
        let content = self.read_proc("meminfo")?;
        parse_meminfo(&content)
    }

    fn network_metered(&self) -> Result<bool> {
        let args = [
            "get-property",
            "org.freedesktop.NetworkManager",
            "/org/freedesktop/NetworkManager",
            "org.freedesktop.NetworkManager",
            "Metered",
        ];
        let result = execute_tool("busctl", &args)?;
        if !result.success {
            return Err(UpdateError::CommandFailed {
                command: format!("busctl {}", args.join(" ")),
                code: result.exit_code,
            });
        }
        parse_metered(&result.stdout)
    }
}

/// Read every supply under a `power_supply` class directory.
///
/// Mains/USB adapters decide `power_plugged`; when the machine has none,
/// a battery that is not `Discharging` counts as plugged in.
pub fn read_power_supplies(dir: &Path) -> Result<Option<BatteryStatus>> {
    let mut charges = Vec::new();
    let mut adapter_seen = false;
    let mut adapter_online = false;
    let mut discharging = false;

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for supply in entries {
        let kind = read_attr(&supply, "type").unwrap_or_default();
        match kind.as_str() {
            "Battery" => {
                // Peripheral batteries (mice, headsets) report scope=Device.
                if read_attr(&supply, "scope").as_deref() == Some("Device") {
                    continue;
                }
                let Some(capacity) = read_attr(&supply, "capacity") else {
                    continue;
                };
                let percent: f64 =
                    capacity
                        .parse()
                        .map_err(|_| UpdateError::UnexpectedOutput {
                            command: supply.join("capacity").display().to_string(),
                            message: format!("not a number: {}", capacity),
                        })?;
                charges.push(percent);
                if read_attr(&supply, "status").as_deref() == Some("Discharging") {
                    discharging = true;
                }
            }
            "Mains" | "USB" | "USB_C" => {
                adapter_seen = true;
                if read_attr(&supply, "online").as_deref() == Some("1") {
                    adapter_online = true;
                }
            }
            _ => {}
        }
    }

    if charges.is_empty() {
        return Ok(None);
    }

    let percent = charges.iter().sum::<f64>() / charges.len() as f64;
    let power_plugged = if adapter_seen {
        adapter_online
    } else {
        !discharging
    };

    Ok(Some(BatteryStatus {
        percent,
        power_plugged,
    }))
}

fn read_attr(supply: &Path, name: &str) -> Option<String> {
    fs::read_to_string(supply.join(name))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Extract the 5-minute load average from `/proc/loadavg`.
pub fn parse_loadavg(content: &str) -> Result<f64> {
    content
        .split_whitespace()
        .nth(1)
        .and_then(|field| field.parse().ok())
        .ok_or_else(|| UpdateError::UnexpectedOutput {
            command: "/proc/loadavg".to_string(),
            message: format!("cannot parse {:?}", content.trim()),
        })
}

/// Compute used memory percentage from `/proc/meminfo`.
///
/// Used memory is `MemTotal - MemAvailable`, the same figure `free`
/// reports as unavailable to new applications.
pub fn parse_meminfo(content: &str) -> Result<f64> {
    let mut total = None;
    let mut available = None;

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok());
        match key.trim() {
            "MemTotal" => total = value,
            "MemAvailable" => available = value,
            _ => {}
        }
    }

    match (total, available) {
        (Some(total), Some(available)) if total > 0 => {
            let used = total.saturating_sub(available);
            Ok(used as f64 / total as f64 * 100.0)
        }
        _ => Err(UpdateError::UnexpectedOutput {
            command: "/proc/meminfo".to_string(),
            message: "missing MemTotal or MemAvailable".to_string(),
        }),
    }
}

/// Interpret the `Metered` property as printed by `busctl get-property`.
///
/// The value is an `NMMetered` enum: 0 unknown, 1 yes, 2 no, 3 guess-yes,
/// 4 guess-no. Only `yes` and `guess-yes` count as metered.
pub fn parse_metered(output: &str) -> Result<bool> {
    let mut fields = output.split_whitespace();
    let value = match (fields.next(), fields.next()) {
        (Some("u"), Some(value)) => value.parse::<u32>().ok(),
        _ => None,
    };

    match value {
        Some(1) | Some(3) => Ok(true),
        Some(0) | Some(2) | Some(4) => Ok(false),
        _ => Err(UpdateError::UnexpectedOutput {
            command: "busctl get-property ... Metered".to_string(),
            message: format!("cannot parse {:?}", output.trim()),
        }),
    }
}
