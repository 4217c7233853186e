// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scheduler configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! num_threads = 4
//! worker_name_prefix = "kernel-worker"
//! ```

use crate::ScheduleError;
use std::path::Path;

/// Configuration for the kernel scheduler.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SchedulerConfig {
    /// Number of worker threads, dispatch included (defaults to the
    /// number of online CPU cores).
    pub num_threads: Option<usize>,
    /// Thread name prefix for pool workers.
    #[serde(default = "default_prefix")]
    pub worker_name_prefix: String,
}

fn default_prefix() -> String {
    "kernel-worker".to_string()
}

impl SchedulerConfig {
    /// Creates a configuration with an explicit thread count.
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ScheduleError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScheduleError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ScheduleError> {
        toml::from_str(toml_str).map_err(|e| ScheduleError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ScheduleError> {
        toml::to_string_pretty(self)
            .map_err(|e| ScheduleError::Config(format!("TOML serialise error: {e}")))
    }

    /// Resolves the number of worker threads.
    pub fn resolve_threads(&self) -> usize {
        self.num_threads
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .max(1)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            worker_name_prefix: default_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert!(config.num_threads.is_none());
        assert_eq!(config.worker_name_prefix, "kernel-worker");
        assert!(config.resolve_threads() >= 1);
    }

    #[test]
    fn test_with_threads() {
        let config = SchedulerConfig::with_threads(3);
        assert_eq!(config.resolve_threads(), 3);
    }

    #[test]
    fn test_zero_threads_resolves_to_one() {
        let config = SchedulerConfig::with_threads(0);
        assert_eq!(config.resolve_threads(), 1);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SchedulerConfig::with_threads(8);
        let toml_str = config.to_toml().unwrap();
        let parsed = SchedulerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.num_threads, Some(8));
    }

    #[test]
    fn test_toml_defaults_prefix() {
        let parsed = SchedulerConfig::from_toml("num_threads = 2").unwrap();
        assert_eq!(parsed.num_threads, Some(2));
        assert_eq!(parsed.worker_name_prefix, "kernel-worker");
    }

    #[test]
    fn test_bad_toml() {
        let result = SchedulerConfig::from_toml("num_threads = \"many\"");
        assert!(matches!(result, Err(ScheduleError::Config(_))));
    }
}
