//! The display loop: tick a session at a fixed cadence and push frames to
//! a sink until asked to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::load::MetricsSource;
use crate::session::RendererSession;
use crate::sink::OutputSink;

/// Granularity of the stop-flag check while waiting for the next tick.
const STOP_POLL: Duration = Duration::from_millis(10);

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayStats {
    pub ticks: u64,
    pub frames: u64,
    pub dropped: u64,
}

/// Run until `stop` is set, then stop the session, reset and close the sink.
///
/// Write failures are logged and the frame is dropped; the next tick
/// proceeds as usual.
pub fn run_display<M, S>(
    session: &mut RendererSession<M>,
    sink: &mut S,
    stop: &AtomicBool,
) -> DisplayStats
where
    M: MetricsSource,
    S: OutputSink + ?Sized,
{
    let interval = session.config().update_interval();
    let mut stats = DisplayStats::default();

    session.start(Instant::now());
    while !stop.load(Ordering::SeqCst) {
        stats.ticks += 1;
        if let Some(frame) = session.tick(Instant::now()) {
            match sink.present(&frame) {
                Ok(()) => stats.frames += 1,
                Err(e) => {
                    stats.dropped += 1;
                    log::warn!("dropped frame: {e}");
                }
            }
        }
        wait_for_next_tick(interval, stop);
    }

    shutdown(session, sink);
    log::info!(
        "display stopped after {} frames ({} dropped)",
        stats.frames,
        stats.dropped
    );
    stats
}

fn wait_for_next_tick(interval: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + interval;
    while !stop.load(Ordering::SeqCst) {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            break;
        }
        std::thread::sleep(left.min(STOP_POLL));
    }
}

/// Stop the session's timers, reset the terminal and close the sink.
pub fn shutdown<M, S>(session: &mut RendererSession<M>, sink: &mut S)
where
    M: MetricsSource,
    S: OutputSink + ?Sized,
{
    session.stop();
    if let Err(e) = sink.reset() {
        log::warn!("terminal reset failed: {e}");
    }
    sink.close();
}
