use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use magnusliber::{ChatController, Cli, Container, ContainerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    // stdout carries the conversation, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = match Container::new(ContainerConfig {
        data_dir: cli.data_dir,
        config_path: cli.config,
        messages_path: cli.messages,
        system_message_path: cli.system_message,
        mock_completions: cli.mock,
    }) {
        Ok(container) => container,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("Chat session using {}", container.model_name());
    let mut controller = ChatController::new(&container);
    controller
        .run(io::stdin().lock(), &mut io::stdout(), &mut io::stderr())
        .await?;

    Ok(ExitCode::SUCCESS)
}
