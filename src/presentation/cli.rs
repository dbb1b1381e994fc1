use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "audube")]
#[command(version, about = "Extracts MP3 audio from online videos and caches the result")]
pub struct Cli {
    /// Show detailed logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Listen port, overriding the configured one.
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,
}
