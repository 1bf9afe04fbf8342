//! `mdsgrid run` — draw the logo on a terminal and serve frames over HTTP.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mdsgrid_core::{RendererConfig, RendererSession, TerminalSink, run_display};

/// Time given to the terminal to flush the reset sequence before exit.
const EXIT_FLUSH_DELAY: Duration = Duration::from_millis(100);

pub struct RunCommandConfig<'a> {
    pub config: RendererConfig,
    pub tty: Option<&'a str>,
    pub fps: Option<f64>,
    pub host: &'a str,
    pub port: u16,
    pub serve_http: bool,
}

pub fn run(cmd: RunCommandConfig<'_>) {
    let mut config = cmd.config;
    if let Some(tty) = cmd.tty {
        config.tty = PathBuf::from(tty);
    }
    if let Some(fps) = cmd.fps {
        config.target_fps = fps;
    }
    super::ensure_valid(&config);

    // Ctrl+C and SIGTERM both land here; the display loop notices within
    // one update interval and runs the terminal cleanup itself.
    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        s.store(true, Ordering::SeqCst);
    }) {
        log::warn!("cannot install signal handler: {e}");
    }

    // Held until the display stops; dropping it shuts the server down.
    let _runtime = cmd
        .serve_http
        .then(|| start_server(config.clone(), cmd.host, cmd.port));

    let mut sink = TerminalSink::open(&config.tty);
    log::info!("drawing on {}", sink.describe());
    let mut session = RendererSession::new(config);
    run_display(&mut session, &mut sink, &stop);

    std::thread::sleep(EXIT_FLUSH_DELAY);
}

/// Start the HTTP endpoint on a background runtime. A bind failure is
/// logged and the terminal display carries on without it.
fn start_server(config: RendererConfig, host: &str, port: u16) -> tokio::runtime::Runtime {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {e}");
            std::process::exit(1);
        }
    };
    let host = host.to_string();
    rt.spawn(async move {
        if let Err(e) = mdsgrid_server::run_server(config, &host, port).await {
            log::error!("HTTP endpoint on {host}:{port} failed: {e}");
        }
    });
    rt
}
