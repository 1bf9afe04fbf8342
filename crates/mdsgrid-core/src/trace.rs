//! Trace marks: short-lived highlighted cells driven by host load.
//!
//! Each update may spawn one mark. The chance of spawning grows with CPU
//! load, the spawn position follows memory usage (higher usage picks a
//! later band of cells), and marks live longer on a busy host.

use std::ops::Range;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::RendererConfig;
use crate::load::LoadSample;

/// Lower bound on the load factor so an idle host still sparkles.
const MIN_LOAD_FACTOR: f64 = 0.1;

/// A highlighted cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceMark {
    /// Logical cell index, row-major.
    pub cell_index: usize,
    pub start: Instant,
    /// CPU delta observed when the mark was spawned.
    pub intensity: f64,
}

impl TraceMark {
    /// Elapsed time since `start` as a fraction of `duration`.
    pub fn age(&self, now: Instant, duration: Duration) -> f64 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        elapsed / duration.as_secs_f64()
    }
}

/// Owns the active trace marks.
#[derive(Debug, Clone)]
pub struct TraceEngine {
    width: usize,
    height: usize,
    cap: usize,
    base_chance: f64,
    base_duration: Duration,
    marks: Vec<TraceMark>,
}

impl TraceEngine {
    pub fn new(
        width: usize,
        height: usize,
        cap: usize,
        base_chance: f64,
        base_duration: Duration,
    ) -> Self {
        Self {
            width,
            height,
            cap,
            base_chance,
            base_duration,
            marks: Vec::with_capacity(cap),
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(
            config.width,
            config.height,
            config.max_traces,
            config.base_trace_chance,
            config.trace_duration(),
        )
    }

    /// Chance that one update spawns a mark.
    pub fn spawn_probability(&self, load: &LoadSample) -> f64 {
        self.base_chance * load.cpu_load.clamp(MIN_LOAD_FACTOR, 1.0)
    }

    /// Lifetime of a mark at the given load: `base * (1 + cpu_load)`.
    pub fn dynamic_duration(&self, cpu_load: f64) -> Duration {
        self.base_duration.mul_f64(1.0 + cpu_load.max(0.0))
    }

    /// Unwrapped candidate index range for a new mark.
    ///
    /// The band is `floor(memory_usage * width)` and spans `height`
    /// indices; indices past the end of the grid wrap around.
    pub fn candidate_range(&self, memory_usage: f64) -> Range<usize> {
        let band = (memory_usage.clamp(0.0, 1.0) * self.width as f64).floor() as usize;
        let start = band * self.height;
        start..start + self.height
    }

    /// Possibly spawn a mark, then drop the expired ones.
    pub fn update<R: Rng + ?Sized>(&mut self, now: Instant, load: &LoadSample, rng: &mut R) {
        if self.marks.len() < self.cap && rng.random::<f64>() < self.spawn_probability(load) {
            let range = self.candidate_range(load.memory_usage);
            let picked = rng.random_range(range);
            self.marks.push(TraceMark {
                cell_index: picked % self.cell_count(),
                start: now,
                intensity: load.cpu_delta,
            });
        }

        let lifetime = self.dynamic_duration(load.cpu_load);
        self.marks.retain(|m| m.age(now, lifetime) <= 1.0);
    }

    /// Active marks, oldest first.
    pub fn snapshot(&self) -> &[TraceMark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Base (unscaled) mark lifetime; the fade is timed against this.
    pub fn base_duration(&self) -> Duration {
        self.base_duration
    }

    fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine(cap: usize, chance: f64) -> TraceEngine {
        TraceEngine::new(16, 16, cap, chance, Duration::from_millis(4000))
    }

    fn load(cpu_load: f64, memory_usage: f64, cpu_delta: f64) -> LoadSample {
        LoadSample {
            cpu_load,
            memory_usage,
            cpu_delta,
        }
    }

    #[test]
    fn full_load_half_memory_scenario() {
        let e = engine(3, 0.15);
        let sample = load(1.0, 0.5, 0.0);
        assert!((e.spawn_probability(&sample) - 0.15).abs() < 1e-12);
        assert_eq!(e.dynamic_duration(1.0), Duration::from_millis(8000));
        assert_eq!(e.candidate_range(0.5), 128..144);
    }

    #[test]
    fn idle_host_keeps_minimum_chance() {
        let e = engine(3, 0.15);
        let p = e.spawn_probability(&load(0.0, 0.0, 0.0));
        assert!((p - 0.015).abs() < 1e-12);
    }

    #[test]
    fn spawned_marks_land_in_memory_band() {
        let mut e = engine(3, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let now = Instant::now();
        e.update(now, &load(1.0, 0.5, 0.25), &mut rng);
        let mark = e.snapshot()[0];
        assert!((128..144).contains(&mark.cell_index));
        assert_eq!(mark.intensity, 0.25);
        assert_eq!(mark.start, now);
    }

    #[test]
    fn full_memory_band_wraps_to_start() {
        let mut e = engine(3, 1.0);
        let mut rng = StdRng::seed_from_u64(11);
        let now = Instant::now();
        e.update(now, &load(1.0, 1.0, 0.0), &mut rng);
        assert!(e.snapshot()[0].cell_index < 16);
    }

    #[test]
    fn out_of_range_memory_usage_is_clamped() {
        let mut e = engine(3, 1.0);
        assert_eq!(e.candidate_range(1e300), 256..272);
        assert_eq!(e.candidate_range(f64::INFINITY), 256..272);
        assert_eq!(e.candidate_range(-3.0), 0..16);

        let mut rng = StdRng::seed_from_u64(13);
        e.update(Instant::now(), &load(1.0, 1e300, 0.0), &mut rng);
        assert!(e.snapshot()[0].cell_index < 16);
    }

    #[test]
    fn active_count_never_exceeds_cap() {
        let mut e = engine(3, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        let t0 = Instant::now();
        for i in 0..200 {
            e.update(t0 + Duration::from_millis(i), &load(1.0, 0.3, 0.1), &mut rng);
            assert!(e.len() <= 3);
        }
        assert_eq!(e.len(), 3);
    }

    #[test]
    fn zero_chance_never_spawns() {
        let mut e = engine(3, 0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let t0 = Instant::now();
        for i in 0..100 {
            e.update(t0 + Duration::from_millis(i * 10), &load(1.0, 0.5, 1.0), &mut rng);
        }
        assert!(e.is_empty());
    }

    #[test]
    fn mark_lives_exactly_its_dynamic_duration() {
        let mut e = engine(1, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let t0 = Instant::now();
        let busy = load(1.0, 0.2, 0.0);
        e.update(t0, &busy, &mut rng);
        assert_eq!(e.len(), 1);

        // cap reached, so no respawn; lifetime at full load is 8s
        e.update(t0 + Duration::from_millis(8000), &busy, &mut rng);
        assert_eq!(e.len(), 1);
        assert_eq!(e.snapshot()[0].start, t0);

        e.update(t0 + Duration::from_millis(8001), &busy, &mut rng);
        assert!(e.snapshot().iter().all(|m| m.start != t0));
    }

    #[test]
    fn lower_load_shortens_lifetime() {
        let mut e = engine(1, 1.0);
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        e.update(t0, &load(1.0, 0.0, 0.0), &mut rng);
        let quiet = LoadSample {
            cpu_load: 0.0,
            ..LoadSample::default()
        };
        let mut quiet_engine = engine(1, 0.0);
        quiet_engine.marks = e.marks.clone();
        quiet_engine.update(t0 + Duration::from_millis(4001), &quiet, &mut rng);
        assert!(quiet_engine.is_empty());
    }

    #[test]
    fn age_is_fraction_of_duration() {
        let t0 = Instant::now();
        let mark = TraceMark {
            cell_index: 0,
            start: t0,
            intensity: 1.0,
        };
        let d = Duration::from_millis(4000);
        assert_eq!(mark.age(t0, d), 0.0);
        assert!((mark.age(t0 + Duration::from_millis(2000), d) - 0.5).abs() < 1e-12);
        // a clock reading before start clamps to zero
        assert_eq!(mark.age(t0.checked_sub(Duration::from_millis(5)).unwrap_or(t0), d), 0.0);
    }
}
