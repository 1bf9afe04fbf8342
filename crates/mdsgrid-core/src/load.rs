//! Host load sampling.
//!
//! The 1-minute load average is cached for a short window so the renderer
//! can ask for a sample every frame without hammering the kernel. Memory
//! usage is cheap and recomputed on every call.
//!
//! Metrics that the platform does not expose read as zero. That is a
//! neutral value for the animation (fewest traces, shortest fades), so a
//! missing metric never surfaces as an error.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// One observation of host load, normalized for the animation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadSample {
    /// 1-minute load average, clamped to `[0, 1]`.
    pub cpu_load: f64,
    /// Fraction of physical memory in use, `[0, 1]`.
    pub memory_usage: f64,
    /// Absolute change of the raw load average since the previous sample.
    pub cpu_delta: f64,
}

/// Physical memory totals in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryInfo {
    /// `1 - available / total`, clamped to `[0, 1]`. Zero when total is zero.
    pub fn usage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let free = self.available_bytes as f64 / self.total_bytes as f64;
        (1.0 - free).clamp(0.0, 1.0)
    }
}

/// Where raw load and memory numbers come from.
pub trait MetricsSource {
    /// Raw 1-minute load average, or `None` if unavailable.
    fn load_average(&self) -> Option<f64>;

    /// Physical memory totals, or `None` if unavailable.
    fn memory(&self) -> Option<MemoryInfo>;
}

// ---------------------------------------------------------------------------
// HostMetrics
// ---------------------------------------------------------------------------

/// Live metrics from the running host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostMetrics;

impl MetricsSource for HostMetrics {
    fn load_average(&self) -> Option<f64> {
        host_loadavg_1m()
    }

    fn memory(&self) -> Option<MemoryInfo> {
        host_memory()
    }
}

fn host_loadavg_1m() -> Option<f64> {
    #[cfg(unix)]
    {
        let mut values = [0.0_f64; 3];
        // SAFETY: `getloadavg` writes at most `n` doubles into a valid buffer of 3.
        let n = unsafe { libc::getloadavg(values.as_mut_ptr(), 3) };
        (n > 0).then_some(values[0])
    }
    #[cfg(not(unix))]
    {
        None
    }
}

#[cfg(target_os = "linux")]
fn host_memory() -> Option<MemoryInfo> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_meminfo(&meminfo)
}

#[cfg(not(target_os = "linux"))]
fn host_memory() -> Option<MemoryInfo> {
    None
}

/// Parse `/proc/meminfo`. Prefers `MemAvailable` over `MemFree`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo(raw: &str) -> Option<MemoryInfo> {
    let mut total = None;
    let mut available = None;
    let mut free = None;
    for line in raw.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(kib) = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
        else {
            continue;
        };
        match key {
            "MemTotal" => total = Some(kib * 1024),
            "MemAvailable" => available = Some(kib * 1024),
            "MemFree" => free = Some(kib * 1024),
            _ => {}
        }
    }
    Some(MemoryInfo {
        total_bytes: total?,
        available_bytes: available.or(free)?,
    })
}

// ---------------------------------------------------------------------------
// LoadSampler
// ---------------------------------------------------------------------------

/// Caching load sampler.
#[derive(Debug)]
pub struct LoadSampler<M = HostMetrics> {
    source: M,
    cache_window: Duration,
    cached_load: f64,
    fetched_at: Option<Instant>,
    previous_load: Option<f64>,
    reported_missing: bool,
}

impl LoadSampler<HostMetrics> {
    /// Sampler over live host metrics.
    pub fn host(cache_window: Duration) -> Self {
        Self::new(HostMetrics, cache_window)
    }
}

impl<M: MetricsSource> LoadSampler<M> {
    pub fn new(source: M, cache_window: Duration) -> Self {
        Self {
            source,
            cache_window,
            cached_load: 0.0,
            fetched_at: None,
            previous_load: None,
            reported_missing: false,
        }
    }

    /// Sample now.
    pub fn sample(&mut self) -> LoadSample {
        self.sample_at(Instant::now())
    }

    /// Sample as of `now`.
    pub fn sample_at(&mut self, now: Instant) -> LoadSample {
        let raw = self.raw_load_at(now);
        let cpu_delta = self.previous_load.map_or(0.0, |prev| (raw - prev).abs());
        self.previous_load = Some(raw);

        let memory_usage = self.source.memory().map_or(0.0, |m| m.usage());

        LoadSample {
            cpu_load: raw.clamp(0.0, 1.0),
            memory_usage,
            cpu_delta,
        }
    }

    /// Unclamped load average, refreshed once the cache window has passed.
    fn raw_load_at(&mut self, now: Instant) -> f64 {
        let stale = self
            .fetched_at
            .is_none_or(|at| now.saturating_duration_since(at) > self.cache_window);
        if stale {
            self.cached_load = match self.source.load_average() {
                Some(v) if v.is_finite() && v >= 0.0 => v,
                _ => {
                    if !self.reported_missing {
                        log::debug!("load average unavailable, using 0");
                        self.reported_missing = true;
                    }
                    0.0
                }
            };
            self.fetched_at = Some(now);
        }
        self.cached_load
    }
}
