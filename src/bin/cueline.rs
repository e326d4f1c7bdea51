use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use cueline::{Composition, Evaluator, FrameIndex};

#[derive(Parser, Debug)]
#[command(name = "cueline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the offline authoring validation over a composition JSON.
    Validate(ValidateArgs),
    /// Evaluate a single frame and print its state as JSON.
    Frame(FrameArgs),
    /// Print the audio-segment descriptors the host mixer needs.
    Segments(SegmentsArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Also resolve asset paths against this directory.
    #[arg(long)]
    assets_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based, real frame counter).
    #[arg(long)]
    frame: u64,
}

#[derive(Parser, Debug)]
struct SegmentsArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Segments(args) => cmd_segments(args),
    }
}

fn read_comp_json(path: &Path) -> anyhow::Result<Composition> {
    let f = File::open(path).with_context(|| format!("open composition '{}'", path.display()))?;
    let r = BufReader::new(f);
    let comp: Composition =
        serde_json::from_reader(r).with_context(|| "parse composition JSON")?;
    Ok(comp)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let comp = read_comp_json(&args.in_path)?;
    comp.validate()?;
    if let Some(root) = &args.assets_root {
        comp.verify_assets(root)?;
    }
    println!(
        "ok: {} words, {} effects, {} frames",
        comp.words.len(),
        comp.effects.len(),
        comp.total_frames().0
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let comp = read_comp_json(&args.in_path)?;
    let evaluator = Evaluator::new(&comp)?;
    let state = evaluator.eval_frame(FrameIndex(args.frame))?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn cmd_segments(args: SegmentsArgs) -> anyhow::Result<()> {
    let comp = read_comp_json(&args.in_path)?;
    let evaluator = Evaluator::new(&comp)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&evaluator.audio_segments())?
    );
    Ok(())
}
