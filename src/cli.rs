use crate::align::{GridCell, auto_align};
use crate::config::{Config, load_config};
use crate::geometry::{BoundingBox, check_overlap};
use crate::ir::{DependencyMap, FsmStates, states_from_json_str};
use crate::layout::compute_tree_layout;
use crate::layout_dump::{TreeLayoutDump, write_align_dump, write_tree_dump};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fsml", version, about = "Layout tools for FSM diagrams")]
pub struct Cli {
    /// Log decisions at debug level (overrides FSML_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Balanced tree layout of a dependency map
    Tree(TreeArgs),
    /// Snap measured states onto the alignment grid
    Align(AlignArgs),
    /// Report whether any two states overlap
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Dependency map JSON (id -> ids above it) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// FSM states JSON (key -> state) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Measured boxes JSON (key -> {x, y, width, height})
    #[arg(short = 'b', long = "boxes")]
    pub boxes: Option<PathBuf>,

    /// Grid from a previous run to align against
    #[arg(short = 'g', long = "grid")]
    pub grid: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// FSM states JSON (key -> state) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Measured boxes JSON (key -> {x, y, width, height})
    #[arg(short = 'b', long = "boxes")]
    pub boxes: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Tree(args) => run_tree(args),
        Command::Align(args) => run_align(args),
        Command::Check(args) => run_check(args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FSML_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_tree(args: TreeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let deps = DependencyMap::from_json_str(&input).context("invalid dependency map")?;
    let layout = compute_tree_layout(&deps)?;
    match args.output.as_deref() {
        Some(path) => write_tree_dump(path, &layout, &config.tree),
        None => write_json(&TreeLayoutDump::from_layout(&layout, &config.tree)),
    }
}

fn run_align(args: AlignArgs) -> Result<()> {
    let Config { align, .. } = load_config(args.config.as_deref())?;
    let states = read_states(args.input.as_deref())?;
    let boxes = read_boxes(args.boxes.as_deref())?;
    let grid: Option<Vec<GridCell>> = match args.grid.as_deref() {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            Some(serde_json::from_str(&contents).context("invalid grid")?)
        }
        None => None,
    };

    let outcome = auto_align(&states, &align, grid.as_deref(), &boxes);
    match args.output.as_deref() {
        Some(path) => write_align_dump(path, &outcome),
        None => write_json(&outcome),
    }
}

fn run_check(args: CheckArgs) -> Result<()> {
    let states = read_states(args.input.as_deref())?;
    let boxes = read_boxes(args.boxes.as_deref())?;
    let overlapping = check_overlap(&states, &boxes);
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{}",
        if overlapping { "overlap" } else { "no overlap" }
    )?;
    Ok(())
}

fn read_states(path: Option<&Path>) -> Result<FsmStates> {
    let input = read_input(path)?;
    states_from_json_str(&input).context("invalid states")
}

fn read_boxes(path: Option<&Path>) -> Result<IndexMap<String, BoundingBox>> {
    let Some(path) = path else {
        return Ok(IndexMap::new());
    };
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).context("invalid boxes")
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
