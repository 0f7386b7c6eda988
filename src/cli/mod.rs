use std::path::PathBuf;

use clap::Parser;

/// Every flag is optional; with none given the client reads its files from the
/// current directory and falls back to environment variables.
#[derive(Parser)]
#[command(name = "magnusliber")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory holding MagnusLiber.json, Messages.json and SystemMessage.txt
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Explicit configuration file, overriding the data-dir lookup
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub messages: Option<PathBuf>,

    #[arg(long)]
    pub system_message: Option<PathBuf>,

    /// Answer locally instead of calling Azure OpenAI
    #[arg(long)]
    pub mock: bool,
}
