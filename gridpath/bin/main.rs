use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use gridpath::{bfs, util, Settings};
use log::{error, info};

/// Breadth-first shortest paths on text boards
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Draw the path with a runner glyph
    #[arg(long)]
    emoji: bool,

    /// Print each result as JSON
    #[arg(long)]
    json: bool,

    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder that board names are resolved against
    #[arg(long)]
    boards: Option<PathBuf>,

    /// Board files or names inside the boards folder
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.emoji |= args.emoji;
    if args.boards.is_some() {
        settings.boards = args.boards;
    }

    let mut failed = 0;
    for name in &args.names {
        let mut grid = util::load_board(&settings, name)?;
        info!("searching {} ({}x{})", name, grid.width(), grid.height());

        match bfs(&mut grid) {
            Ok(outcome) if args.json => {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            Ok(outcome) => {
                println!("{}: {:?}, {} steps", name, outcome.elapsed, outcome.edges());
                println!("{}\n", outcome.board);
            }
            Err(e) => {
                error!("{}: {}", name, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} boards have no path", failed, args.names.len());
    }
    Ok(())
}
