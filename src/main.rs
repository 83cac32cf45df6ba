//! Command-line front end for the voice container converter.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spx2wav")]
#[command(about = "Convert proprietary Speex voice containers to PCM WAV", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a voice container and write a mono 16-bit WAV
    Convert {
        /// Input container path
        input: PathBuf,

        /// Output WAV path
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spx2wav=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert { input, output } => cmd_convert(&input, &output),
    }
}

#[cfg(feature = "libspeex")]
fn cmd_convert(input: &Path, output: &Path) -> Result<()> {
    use spx2wav::convert::convert_file;
    use spx2wav::speex::LibSpeex;

    let summary = convert_file(input, output, &LibSpeex)?;
    println!(
        "Done: {} frames, {} samples -> {}",
        summary.frames,
        summary.samples,
        output.display()
    );
    Ok(())
}

#[cfg(not(feature = "libspeex"))]
fn cmd_convert(_input: &Path, _output: &Path) -> Result<()> {
    anyhow::bail!("built without a native Speex decoder; rebuild with --features libspeex")
}
