use std::time::Instant;

use mdsgrid_core::{RendererConfig, RendererSession};

pub fn run(config: RendererConfig) {
    let mut session = RendererSession::new(config);
    print!("{}", session.render_frame(Instant::now()));
}
