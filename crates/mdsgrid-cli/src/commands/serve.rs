use mdsgrid_core::RendererConfig;

pub fn run(config: RendererConfig, host: &str, port: u16) {
    println!("mdsgrid server v{}", mdsgrid_core::VERSION);
    println!("   http://{host}:{port}");
    println!();
    println!("   Endpoints:");
    println!("     GET /        Current frame (text/plain)");
    println!("     GET /health  Host load as JSON");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(mdsgrid_server::run_server(config, host, port)) {
        eprintln!("Error: cannot serve on {host}:{port}: {e}");
        std::process::exit(1);
    }
}
