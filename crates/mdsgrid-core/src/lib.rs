//! # mdsgrid-core
//!
//! **The MDS logo, breathing with your machine.**
//!
//! `mdsgrid-core` renders a 16×16 pixel-art logo as text and animates it
//! from live host load: busy CPUs make "trace" highlights appear more often
//! and linger longer, memory pressure decides where they land, and every so
//! often the whole grid is scrambled and restored.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Instant;
//! use mdsgrid_core::{RendererConfig, RendererSession};
//!
//! let mut session = RendererSession::new(RendererConfig::default());
//! let frame = session.render_frame(Instant::now());
//! assert_eq!(frame.lines().count(), 16);
//! print!("{frame}");
//! ```
//!
//! ## Architecture
//!
//! LoadSampler → TraceEngine → render_frame → OutputSink
//!
//! The [`Scrambler`] runs on its own timer and feeds the permutation that
//! [`render_frame`] reads. A [`RendererSession`] owns all of it; the
//! [`scheduler::run_display`] loop ticks a session and writes frames to a
//! [`TerminalSink`].

pub mod config;
pub mod grid;
pub mod load;
pub mod render;
pub mod scheduler;
pub mod scramble;
pub mod session;
pub mod sink;
pub mod trace;

pub use config::{ConfigError, RendererConfig};
pub use grid::{CELL_COUNT, ColorGrid, FADE_TABLE, GRID_HEIGHT, GRID_WIDTH, Glyph, Rgb};
pub use load::{HostMetrics, LoadSample, LoadSampler, MemoryInfo, MetricsSource};
pub use render::{fade_glyph, fade_index, render_frame};
pub use scheduler::{DisplayStats, run_display};
pub use scramble::{Permutation, Scrambler};
pub use session::{FramePacer, RendererSession};
pub use sink::{OutputSink, SinkError, TerminalSink};
pub use trace::{TraceEngine, TraceMark};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
