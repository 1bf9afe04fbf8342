use mdsgrid_core::{LoadSampler, RendererConfig};

pub fn run(config: &RendererConfig) {
    let sample = LoadSampler::host(config.load_cache()).sample();
    match serde_json::to_string_pretty(&sample) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
