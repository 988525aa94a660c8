use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use causerie::cli::Args;
use causerie::ui::chat_loop::run_chat;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go to stderr so the alternate screen stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run_chat(args.resolve_base_url()).await
}
