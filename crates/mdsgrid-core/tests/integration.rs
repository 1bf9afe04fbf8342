//! Integration tests for mdsgrid-core.
//!
//! These exercise the full frame pipeline:
//! load sample → trace update → permutation → rendered text.

use std::time::{Duration, Instant};

use mdsgrid_core::{
    ColorGrid, LoadSample, MemoryInfo, MetricsSource, Permutation, RendererConfig,
    RendererSession, Rgb, TraceEngine, render_frame,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

struct Steady(f64, f64);

impl MetricsSource for Steady {
    fn load_average(&self) -> Option<f64> {
        Some(self.0)
    }

    fn memory(&self) -> Option<MemoryInfo> {
        Some(MemoryInfo {
            total_bytes: 1 << 20,
            available_bytes: ((1.0 - self.1) * (1u64 << 20) as f64) as u64,
        })
    }
}

fn assert_frame_shape(frame: &str) {
    let lines: Vec<&str> = frame.lines().collect();
    assert_eq!(lines.len(), 16);
    for line in lines {
        assert_eq!(line.chars().count(), 32);
    }
}

#[test]
fn blank_logo_renders_sixteen_blank_rows() {
    let grid = ColorGrid::filled(16, 16, Rgb(0x111111));
    let frame = render_frame(
        &grid,
        &Permutation::identity(256),
        &[],
        Instant::now(),
        Duration::from_secs(4),
    );
    assert_eq!(frame.lines().count(), 16);
    assert!(frame.lines().all(|l| l == " ".repeat(32)));
}

#[test]
fn session_frames_keep_their_shape_under_load() {
    let config = RendererConfig {
        base_trace_chance: 1.0,
        scramble_interval_ms: 100,
        ..RendererConfig::default()
    };
    let mut session = RendererSession::seeded(config, Steady(2.0, 0.5), 17);
    let t0 = Instant::now();
    session.start(t0);
    let mut frames = 0;
    for ms in (0..5000).step_by(50) {
        if let Some(frame) = session.tick(t0 + Duration::from_millis(ms)) {
            assert_frame_shape(&frame);
            frames += 1;
        }
        assert!(session.traces().len() <= 3);
        assert!(session.permutation().is_bijection());
    }
    // load 2.0 clamps to 1.0 → 2 fps over 5s
    assert_eq!(frames, 10);
}

#[test]
fn example_scenario_full_load_half_memory() {
    let engine = TraceEngine::new(16, 16, 3, 0.15, Duration::from_millis(4000));
    let load = LoadSample {
        cpu_load: 1.0,
        memory_usage: 0.5,
        cpu_delta: 0.0,
    };
    assert!((engine.spawn_probability(&load) - 0.15).abs() < 1e-12);
    assert_eq!(engine.dynamic_duration(load.cpu_load), Duration::from_secs(8));
    assert_eq!(engine.candidate_range(load.memory_usage), 128..144);
}

#[test]
fn marks_expire_after_dynamic_duration() {
    let mut engine = TraceEngine::new(16, 16, 1, 1.0, Duration::from_millis(1000));
    let mut rng = StdRng::seed_from_u64(8);
    let load = LoadSample {
        cpu_load: 0.5,
        memory_usage: 0.0,
        cpu_delta: 0.0,
    };
    let t0 = Instant::now();
    engine.update(t0, &load, &mut rng);
    let first = engine.snapshot()[0];

    for ms in [0, 500, 1000, 1500] {
        engine.update(t0 + Duration::from_millis(ms), &load, &mut rng);
        assert_eq!(engine.snapshot()[0], first, "gone early at {ms}ms");
    }
    engine.update(t0 + Duration::from_millis(1501), &load, &mut rng);
    assert!(engine.snapshot().iter().all(|m| m.start != first.start));
}

#[test]
fn host_session_renders_a_frame() {
    let mut session = RendererSession::new(RendererConfig::default());
    let frame = session.render_frame(Instant::now());
    assert_frame_shape(&frame);
    let sample = session.last_sample();
    assert!((0.0..=1.0).contains(&sample.cpu_load));
    assert!((0.0..=1.0).contains(&sample.memory_usage));
}
