use std::path::PathBuf;

use anyhow::Result;
use bench_report::{
    InsertPlotOptions, OutputFormat, PatternVariant, Profile, QueryPlotOptions, plot_inserts,
    plot_queries, setup_logging,
};
use clap::{Args, Parser, Subcommand};

/// Turns database benchmark logs into comparison charts
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// TOML profile with the compared series, colours and labels
    #[arg(long, global = true)]
    profile: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert rate against database size, one line per compared system
    Inserts(InsertArgs),
    /// Change of mean query latency between two query benchmark runs
    Queries(QueryArgs),
}

#[derive(Args)]
struct InsertArgs {
    /// Insert batch size of the runs, must be > 0
    #[arg(short, long, default_value_t = 10000, allow_negative_numbers = true)]
    batch_size: i64,
    /// Directory holding one sub directory of logs per compared system
    #[arg(short, long, default_value = "new_insert_no_debug")]
    dir: PathBuf,
    /// Reporting period of the loader, part of the log file names
    #[arg(long, default_value_t = 20000)]
    report_period: u64,
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Only show the batch size in the title
    #[arg(short, long)]
    pretty: bool,
    /// Draw the raw points with a fitted trend curve
    #[arg(long)]
    trend: bool,
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=3))]
    degree: u8,
    /// Average blocks of this many points before plotting
    #[arg(long)]
    downsample: Option<usize>,
    /// Memory size of the database host, only used for annotation
    #[arg(long)]
    memory: Option<String>,
    #[arg(long, value_enum, default_value_t = PatternVariant::Timed)]
    layout: PatternVariant,
    /// Zero-based field plotted along x
    #[arg(long)]
    x_field: Option<usize>,
    /// Zero-based field plotted along y
    #[arg(long)]
    y_field: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,
    /// Also write the plotted points next to the chart
    #[arg(long)]
    export_csv: bool,
}

#[derive(Args)]
struct QueryArgs {
    /// Query benchmarker output of the reference system
    #[arg(long)]
    baseline: PathBuf,
    /// Query benchmarker output of the compared system
    #[arg(long)]
    candidate: PathBuf,
    #[arg(short, long)]
    label: String,
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,
    #[arg(long)]
    export_csv: bool,
}

impl From<InsertArgs> for InsertPlotOptions {
    fn from(args: InsertArgs) -> Self {
        Self {
            batch_size: args.batch_size,
            report_period: args.report_period,
            input_dir: args.dir,
            out_dir: args.out_dir,
            pretty: args.pretty,
            trend_degree: args.trend.then_some(usize::from(args.degree)),
            downsample: args.downsample,
            memory: args.memory,
            layout: args.layout,
            x_field: args.x_field,
            y_field: args.y_field,
            format: args.format,
            export_csv: args.export_csv,
        }
    }
}

impl From<QueryArgs> for QueryPlotOptions {
    fn from(args: QueryArgs) -> Self {
        Self {
            baseline: args.baseline,
            candidate: args.candidate,
            label: args.label,
            out_dir: args.out_dir,
            format: args.format,
            export_csv: args.export_csv,
        }
    }
}

fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    let profile = match &cli.profile {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };

    let written = match cli.command {
        Commands::Inserts(args) => plot_inserts(&args.into(), &profile),
        Commands::Queries(args) => plot_queries(&args.into(), &profile),
    };

    match written {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err}");
            Err(err.into())
        }
    }
}
