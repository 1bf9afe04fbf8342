//! Renderer timing knobs and output settings.
//!
//! Every field has a default, so a config file only needs to name the
//! values it changes:
//!
//! ```json
//! { "target_fps": 8, "tty": "/dev/tty2", "scramble_hold_ms": 2000 }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::{GRID_HEIGHT, GRID_WIDTH};

/// Frames-per-second shed for every unit of 1-minute load.
const FPS_LOAD_PENALTY: f64 = 3.0;

/// Errors raised while loading or validating a [`RendererConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Renderer and scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Scheduler cadence.
    pub update_interval_ms: u64,
    /// Nominal spacing between trace appearances. Trace spawning is a
    /// per-update coin flip, so this is informational only.
    pub trace_interval_ms: u64,
    /// Base lifetime of a trace mark before load scaling.
    pub trace_duration_ms: u64,
    /// Maximum concurrent trace marks.
    pub max_traces: usize,
    /// Trigger probability at full load.
    pub base_trace_chance: f64,
    /// Frame rate with an idle host.
    pub target_fps: f64,
    /// How often the scrambler flips a coin to scramble or restore.
    pub scramble_interval_ms: u64,
    /// When set, a scramble is undone automatically after this long.
    pub scramble_hold_ms: Option<u64>,
    /// How long a load-average reading stays fresh.
    pub load_cache_ms: u64,
    /// Preferred output device.
    pub tty: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            update_interval_ms: 50,
            trace_interval_ms: 3000,
            trace_duration_ms: 4000,
            max_traces: 3,
            base_trace_chance: 0.15,
            target_fps: 5.0,
            scramble_interval_ms: 30_000,
            scramble_hold_ms: None,
            load_cache_ms: 500,
            tty: PathBuf::from("/dev/tty1"),
        }
    }
}

impl RendererConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width != GRID_WIDTH || self.height != GRID_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "grid must be {GRID_WIDTH}x{GRID_HEIGHT}, got {}x{}",
                self.width, self.height
            )));
        }
        if self.update_interval_ms == 0 {
            return Err(ConfigError::Invalid("update_interval_ms must be > 0".into()));
        }
        if self.trace_duration_ms == 0 {
            return Err(ConfigError::Invalid("trace_duration_ms must be > 0".into()));
        }
        if self.scramble_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "scramble_interval_ms must be > 0".into(),
            ));
        }
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        if !(0.0..=1.0).contains(&self.base_trace_chance) {
            return Err(ConfigError::Invalid(format!(
                "base_trace_chance must be within [0, 1], got {}",
                self.base_trace_chance
            )));
        }
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn trace_duration(&self) -> Duration {
        Duration::from_millis(self.trace_duration_ms)
    }

    pub fn scramble_interval(&self) -> Duration {
        Duration::from_millis(self.scramble_interval_ms)
    }

    pub fn scramble_hold(&self) -> Option<Duration> {
        self.scramble_hold_ms.map(Duration::from_millis)
    }

    pub fn load_cache(&self) -> Duration {
        Duration::from_millis(self.load_cache_ms)
    }

    /// Frame rate after shedding load: `max(1, target_fps - cpu_load * 3)`.
    pub fn effective_fps(&self, cpu_load: f64) -> f64 {
        (self.target_fps - cpu_load * FPS_LOAD_PENALTY).max(1.0)
    }

    /// Minimum spacing between frames at the given load.
    pub fn frame_interval(&self, cpu_load: f64) -> Duration {
        Duration::from_secs_f64(1.0 / self.effective_fps(cpu_load))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        RendererConfig::default().validate().unwrap();
    }

    #[test]
    fn fps_drops_with_load_but_never_below_one() {
        let config = RendererConfig::default();
        assert_eq!(config.effective_fps(0.0), 5.0);
        assert!((config.effective_fps(1.0) - 2.0).abs() < 1e-12);
        assert_eq!(config.effective_fps(10.0), 1.0);
        assert_eq!(config.frame_interval(0.0), Duration::from_millis(200));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "target_fps": 8, "scramble_hold_ms": 2000 }}"#).unwrap();
        let config = RendererConfig::from_file(file.path()).unwrap();
        assert_eq!(config.target_fps, 8.0);
        assert_eq!(config.scramble_hold(), Some(Duration::from_secs(2)));
        assert_eq!(config.max_traces, 3);
        assert_eq!(config.tty, PathBuf::from("/dev/tty1"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = RendererConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RendererConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            RendererConfig {
                width: 8,
                ..RendererConfig::default()
            },
            RendererConfig {
                update_interval_ms: 0,
                ..RendererConfig::default()
            },
            RendererConfig {
                trace_duration_ms: 0,
                ..RendererConfig::default()
            },
            RendererConfig {
                target_fps: 0.0,
                ..RendererConfig::default()
            },
            RendererConfig {
                base_trace_chance: 1.5,
                ..RendererConfig::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{config:?} should be rejected"
            );
        }
    }
}
