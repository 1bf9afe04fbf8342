//! CLI for mdsgrid — the MDS logo on your TTY, breathing with your machine.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mdsgrid")]
#[command(about = "mdsgrid — the MDS logo on your TTY, breathing with your machine")]
#[command(version = mdsgrid_core::VERSION)]
struct Cli {
    /// JSON config file with renderer timing knobs
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the logo on a terminal device and serve frames over HTTP
    Run {
        /// Terminal device to draw on (falls back to stdout)
        #[arg(long)]
        tty: Option<String>,

        /// Base frames per second (reduced automatically under load)
        #[arg(long)]
        fps: Option<f64>,

        /// Bind address for the HTTP endpoint
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port for the HTTP endpoint
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Only draw on the terminal; do not start the HTTP endpoint
        #[arg(long)]
        no_server: bool,
    },

    /// Serve frames over HTTP only
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Print a single frame to stdout
    Frame,

    /// Print the current load sample as JSON
    Sample,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            tty,
            fps,
            host,
            port,
            no_server,
        } => commands::run::run(commands::run::RunCommandConfig {
            config,
            tty: tty.as_deref(),
            fps,
            host: &host,
            port,
            serve_http: !no_server,
        }),
        Commands::Serve { host, port } => commands::serve::run(config, &host, port),
        Commands::Frame => commands::frame::run(config),
        Commands::Sample => commands::sample::run(&config),
    }
}
