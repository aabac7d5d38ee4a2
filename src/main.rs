use clap::Parser;
use gif_inspector::{gui, InspectorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gif-inspector")]
#[command(
    version,
    about = "A developer tool to browse a directory of GIF files and inspect the frames, timings and iteration count of each animation."
)]
struct Args {
    #[arg(
        short,
        long,
        help = "Directory to scan for .gif files (will be saved in config if used once)"
    )]
    folder: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = InspectorConfig::load_or_default()?;

    let gif_folder = args.folder.unwrap_or(config.gif_folder.clone());
    if gif_folder.as_os_str().is_empty() {
        anyhow::bail!("gif folder path must not be empty");
    }

    if gif_folder != config.gif_folder {
        config.gif_folder = gif_folder.clone();
        config.save()?;
    }

    gui::run_inspector(gif_folder)?;
    Ok(())
}
