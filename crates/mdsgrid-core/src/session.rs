//! A renderer session: one logo, its permutation, its trace marks and its
//! load sampler.
//!
//! Sessions share nothing. The display loop owns one for the lifetime of
//! the process; the HTTP endpoint builds a fresh one per request.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RendererConfig;
use crate::grid::ColorGrid;
use crate::load::{HostMetrics, LoadSample, LoadSampler, MetricsSource};
use crate::render::render_frame;
use crate::scramble::{Permutation, Scrambler};
use crate::trace::{TraceEngine, TraceMark};

/// Decides when the next frame is due.
#[derive(Debug, Clone, Default)]
pub struct FramePacer {
    last_frame: Option<Instant>,
}

impl FramePacer {
    /// True if no frame has been drawn yet or `interval` has passed since
    /// the last one.
    pub fn is_due(&self, now: Instant, interval: Duration) -> bool {
        self.last_frame
            .is_none_or(|last| now.saturating_duration_since(last) >= interval)
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}

/// Owns all mutable renderer state.
pub struct RendererSession<M = HostMetrics> {
    config: RendererConfig,
    grid: ColorGrid,
    sampler: LoadSampler<M>,
    traces: TraceEngine,
    scrambler: Scrambler,
    rng: StdRng,
    pacer: FramePacer,
    next_scramble: Option<Instant>,
    last_sample: LoadSample,
    /// Largest `cpu_delta` sampled since the last drawn frame.
    pending_delta: Option<f64>,
    running: bool,
}

impl RendererSession<HostMetrics> {
    /// Session over live host metrics with an OS-seeded RNG.
    pub fn new(config: RendererConfig) -> Self {
        let sampler = LoadSampler::host(config.load_cache());
        Self::with_parts(config, sampler, StdRng::from_os_rng())
    }
}

impl<M: MetricsSource> RendererSession<M> {
    /// Session with an explicit metrics source and RNG.
    pub fn with_parts(config: RendererConfig, sampler: LoadSampler<M>, rng: StdRng) -> Self {
        let grid = ColorGrid::mds();
        let traces = TraceEngine::from_config(&config);
        let scrambler = Scrambler::new(grid.len(), config.scramble_hold());
        Self {
            config,
            grid,
            sampler,
            traces,
            scrambler,
            rng,
            pacer: FramePacer::default(),
            next_scramble: None,
            last_sample: LoadSample::default(),
            pending_delta: None,
            running: false,
        }
    }

    /// Shorthand for tests and tools: custom metrics, seeded RNG.
    pub fn seeded(config: RendererConfig, source: M, seed: u64) -> Self {
        let sampler = LoadSampler::new(source, config.load_cache());
        Self::with_parts(config, sampler, StdRng::seed_from_u64(seed))
    }

    /// Arm the frame and scramble timers.
    pub fn start(&mut self, now: Instant) {
        self.running = true;
        self.pacer.reset();
        self.pending_delta = None;
        self.next_scramble = Some(now + self.config.scramble_interval());
    }

    /// Disarm the timers. `tick` produces nothing until the next `start`.
    pub fn stop(&mut self) {
        self.running = false;
        self.next_scramble = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One scheduler step. Returns a frame when one is due.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        if !self.running {
            return None;
        }

        if self.scrambler.tick(now) {
            log::debug!("scramble hold elapsed, grid restored");
        }
        if let Some(at) = self.next_scramble
            && now >= at
        {
            let encrypt = self.rng.random_bool(0.5);
            if self.scrambler.animate(now, encrypt, &mut self.rng) {
                log::debug!("grid {}", if encrypt { "scrambled" } else { "restored" });
            }
            self.next_scramble = Some(now + self.config.scramble_interval());
        }

        let mut sample = self.sampler.sample_at(now);
        self.last_sample = sample;
        // A refresh can land between frames; keep its delta for the next one.
        let delta = self
            .pending_delta
            .map_or(sample.cpu_delta, |d| d.max(sample.cpu_delta));
        if !self
            .pacer
            .is_due(now, self.config.frame_interval(sample.cpu_load))
        {
            self.pending_delta = Some(delta);
            return None;
        }
        self.pacer.mark(now);
        self.pending_delta = None;
        sample.cpu_delta = delta;
        self.traces.update(now, &sample, &mut self.rng);
        Some(self.draw(now))
    }

    /// Sample load, update traces and render, regardless of pacing.
    pub fn render_frame(&mut self, now: Instant) -> String {
        let sample = self.sampler.sample_at(now);
        self.last_sample = sample;
        self.traces.update(now, &sample, &mut self.rng);
        self.draw(now)
    }

    /// Scramble or restore the grid. Ignored while a transition is in flight.
    pub fn animate(&mut self, now: Instant, encrypt: bool) -> bool {
        self.scrambler.animate(now, encrypt, &mut self.rng)
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn traces(&self) -> &[TraceMark] {
        self.traces.snapshot()
    }

    pub fn permutation(&self) -> &Permutation {
        self.scrambler.positions()
    }

    /// Most recent load sample taken by this session.
    pub fn last_sample(&self) -> LoadSample {
        self.last_sample
    }

    fn draw(&self, now: Instant) -> String {
        render_frame(
            &self.grid,
            self.scrambler.positions(),
            self.traces.snapshot(),
            now,
            self.traces.base_duration(),
        )
    }
}
