use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nova")]
#[command(author, version)]
#[command(about = "A chat assistant for Twitch streamers.")]
pub struct Cli {
    #[arg(short = 'o', long = "options-file")]
    pub options_file: Option<PathBuf>,
    #[arg(long = "env-file")]
    pub env_file: Option<PathBuf>,
    /// Overrides `nova.dataset` from the options file.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
    /// Overrides `nova.model` from the options file.
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Skip loading the saved model and train a fresh one.
    #[arg(long)]
    pub retrain: bool,
}
