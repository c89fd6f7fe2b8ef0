use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use url::Url;

/// Fish Audio voice training and testing
#[derive(Debug, Parser)]
#[command(name = "voiss", about = "Train Fish Audio voice models, test them, and run the synthesis proxy")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "voiss.toml", env = "VOISS_CONFIG", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the synthesis proxy
    Serve(ServeArgs),
    /// Upload a voice sample and train a model
    Train(TrainArgs),
    /// Synthesize speech with a trained model
    Speak(SpeakArgs),
    /// Show details of a model
    Model(ModelArgs),
}

#[derive(Debug, ClapArgs)]
pub struct ServeArgs {
    /// Override the listen address
    #[arg(long, env = "VOISS_LISTEN")]
    pub listen: Option<SocketAddr>,
}

#[derive(Debug, ClapArgs)]
pub struct TrainArgs {
    /// Fish Audio API token
    #[arg(long, env = "FISH_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Voice sample to upload
    #[arg(long)]
    pub audio: Option<PathBuf>,

    /// Cover image for the model
    #[arg(long)]
    pub cover: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub title: String,

    /// Transcript of the voice sample
    #[arg(long, default_value = "")]
    pub texts: String,

    /// public, unlist or private
    #[arg(long, default_value = "public")]
    pub visibility: String,

    /// fast or full
    #[arg(long, default_value = "fast")]
    pub train_mode: String,

    /// Skip audio enhancement before training
    #[arg(long)]
    pub no_enhance: bool,
}

#[derive(Debug, ClapArgs)]
pub struct SpeakArgs {
    /// Testing link carrying `modelId` and `token`
    #[arg(long)]
    pub link: Option<Url>,

    #[arg(long)]
    pub model_id: Option<String>,

    /// Fish Audio API token
    #[arg(long, env = "FISH_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Text to synthesize
    #[arg(long, default_value = "")]
    pub text: String,

    #[arg(long)]
    pub base_model: Option<String>,

    #[arg(long)]
    pub temperature: Option<String>,

    #[arg(long)]
    pub top_p: Option<String>,

    #[arg(long)]
    pub speed: Option<String>,

    #[arg(long)]
    pub volume: Option<String>,

    #[arg(long)]
    pub prosody: Option<String>,

    /// Where to write the audio, defaults to the suggested download name
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, ClapArgs)]
pub struct ModelArgs {
    #[arg(long)]
    pub id: String,

    /// Fish Audio API token
    #[arg(long, env = "FISH_API_TOKEN", hide_env_values = true)]
    pub token: String,
}
