pub mod frame;
pub mod run;
pub mod sample;
pub mod serve;

use std::path::Path;

use mdsgrid_core::RendererConfig;

/// Load the config file if one was given, otherwise use defaults.
/// Exits the process on an unreadable or invalid file.
pub fn load_config(path: Option<&str>) -> RendererConfig {
    let Some(path) = path else {
        return RendererConfig::default();
    };
    match RendererConfig::from_file(Path::new(path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Validate a config after CLI overrides, exiting on failure.
pub fn ensure_valid(config: &RendererConfig) {
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
