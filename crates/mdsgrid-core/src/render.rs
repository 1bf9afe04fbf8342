//! Frame composition: color grid + permutation + trace marks → text.
//!
//! Pure and total. Out-of-range lookups degrade to identity positions and
//! blank cells rather than failing.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use crate::grid::{ColorGrid, FADE_TABLE, Glyph};
use crate::scramble::Permutation;
use crate::trace::TraceMark;

/// Index into [`FADE_TABLE`] for a mark of the given age and intensity.
///
/// The cosine easing gives a smooth pulse: at age 0 and intensity 1 the
/// index is the last entry, at age 1 it is the first.
pub fn fade_index(age: f64, intensity: f64) -> usize {
    let last = FADE_TABLE.len() - 1;
    let progress = (((age * PI).cos() * 0.5 + 0.5) * intensity).clamp(0.0, 1.0);
    ((progress * last as f64).floor() as usize).min(last)
}

pub fn fade_glyph(age: f64, intensity: f64) -> Glyph {
    FADE_TABLE[fade_index(age, intensity)]
}

/// Render one frame: `grid.height()` newline-terminated rows of
/// `grid.width() * 2` characters.
///
/// Trace fades are timed against `fade_duration` (the base trace duration),
/// not the load-scaled lifetime the engine uses to expire marks.
pub fn render_frame(
    grid: &ColorGrid,
    permutation: &Permutation,
    traces: &[TraceMark],
    now: Instant,
    fade_duration: Duration,
) -> String {
    let (width, height) = (grid.width(), grid.height());
    // 2 glyph chars of up to 3 bytes each, plus the newline
    let mut out = String::with_capacity(height * (width * 6 + 1));

    for row in 0..height {
        for col in 0..width {
            let cell = row * width + col;
            let glyph = match traces.iter().find(|t| t.cell_index == cell) {
                Some(trace) => fade_glyph(trace.age(now, fade_duration), trace.intensity),
                None => {
                    let source = permutation.get(cell).unwrap_or(cell);
                    grid.get(source).map_or(Glyph::Blank, Glyph::from_color)
                }
            };
            glyph.push_to(&mut out);
        }
        out.push('\n');
    }

    out
}
