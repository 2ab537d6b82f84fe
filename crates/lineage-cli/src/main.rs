//! lineage-order CLI
//!
//! - `layout`: order and lay out a lineage tree read from JSON
//! - `frame`: print the reference frame built from the configured landmarks

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lineage_config::LineageConfig;
use lineage_order::{LayoutOptions, LineageTree, TreeLayout};
use lineage_sorter::{Axis, DescendantsSorter, Sorter, StrategyKind};
use tracing_subscriber::{fmt, EnvFilter};

mod console;

use console::ConsoleSink;

#[derive(Parser, Debug)]
#[command(name = "lineage-order")]
#[command(version)]
#[command(about = "Lay out cell lineage trees with anatomically ordered daughters")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Order every division and print the resulting layout
    Layout(LayoutArgs),
    /// Print the reference frame of the configured sorter
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct SorterArgs {
    /// Config file; falls back to $LINEAGE_ORDER_CONFIG, then the user config dir
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured strategy (full-frame, sliced, poles)
    #[arg(short, long)]
    strategy: Option<StrategyKind>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Lineage tree as JSON
    #[arg(short, long)]
    tree: PathBuf,

    #[command(flatten)]
    sorter: SorterArgs,

    /// Narrate every comparison (shown with -vv)
    #[arg(long)]
    verbose_trace: bool,

    /// Draw the sorter's reference frame before the tree
    #[arg(long)]
    debug_geometry: bool,

    /// Print the layout summary as JSON instead of the primitives
    #[arg(long)]
    summary_json: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sorter: SorterArgs,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Layout(args) => run_layout(args),
        Commands::Frame(args) => run_frame(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(args: &SorterArgs) -> Result<LineageConfig> {
    let mut config = LineageConfig::discover(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(strategy) = args.strategy {
        config.sorter.strategy = strategy;
        config.validate().context("Configuration invalid for the chosen strategy")?;
    }
    Ok(config)
}

fn build_sorter(config: &LineageConfig) -> Result<Sorter> {
    config
        .build_sorter()
        .with_context(|| format!("Failed to build the {} sorter", config.sorter.strategy))
}

fn layout_options(configured: &LayoutOptions, args: &LayoutArgs) -> LayoutOptions {
    LayoutOptions {
        export_debug_geometry: configured.export_debug_geometry || args.debug_geometry,
        verbose_trace: configured.verbose_trace || args.verbose_trace,
        ..*configured
    }
}

fn run_layout(args: LayoutArgs) -> Result<()> {
    let config = load_config(&args.sorter)?;
    let sorter = build_sorter(&config)?;

    let file = File::open(&args.tree)
        .with_context(|| format!("Failed to open {}", args.tree.display()))?;
    let tree = LineageTree::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read lineage from {}", args.tree.display()))?;
    tracing::debug!(path = %args.tree.display(), nodes = tree.node_count(), "read lineage");

    let layout = TreeLayout::new(&sorter, layout_options(&config.layout, &args))?;
    let mut sink = ConsoleSink::new();
    let summary = layout.layout(&tree, &mut sink)?;

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", sink.as_str());
        println!(
            "# {} nodes, {} leaves, {} divisions ordered with {}",
            summary.nodes, summary.leaves, summary.branch_points, summary.strategy
        );
    }
    Ok(())
}

fn run_frame(args: FrameArgs) -> Result<()> {
    let config = load_config(&args.sorter)?;
    let sorter = build_sorter(&config)?;
    print!("{}", describe_frame(&sorter));
    Ok(())
}

fn describe_frame(sorter: &Sorter) -> String {
    let thresholds = sorter.thresholds();
    let mut out = format!(
        "strategy: {}\nlayering: ({}°, {}°)\n",
        sorter.strategy(),
        thresholds.layering_lower_deg(),
        thresholds.layering_upper_deg()
    );
    match sorter {
        Sorter::FullFrame(s) => {
            let frame = s.frame();
            out.push_str(&format!("centre: {}\n", frame.centre()));
            for axis in Axis::ALL {
                out.push_str(&format!("axis {axis}: {}\n", frame.axis(axis)));
            }
        }
        Sorter::Sliced(s) => {
            out.push_str(&format!(
                "left/right cutoff: {}°\nanchor: {}\nup: {}\n",
                thresholds.left_right_cutoff_deg(),
                s.frame().anchor(),
                s.frame().up()
            ));
        }
        Sorter::Poles(s) => {
            out.push_str(&format!(
                "left/right cutoff: {}°\nanchor: {}\nup: {}\n",
                thresholds.left_right_cutoff_deg(),
                s.frame().anchor(),
                s.frame().up()
            ));
        }
    }

    let mut sink = ConsoleSink::new();
    sorter.export_debug_graphics(&mut sink);
    out.push_str(sink.as_str());
    out
}
