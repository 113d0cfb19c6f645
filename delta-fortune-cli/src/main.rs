mod assets;
mod reports;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use assets::FsLoader;
use delta_fortune::{AnalysisCategory, FortuneEngine, FortuneReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored text for a terminal
    Console,
    /// Pretty-printed JSON of the full report
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "delta-fortune", version)]
#[command(about = "Daily five-element fortune for Delta Force operators")]
struct Args {
    /// Operator codename (e.g. 威龙)
    #[arg(long, required_unless_present = "list_operators")]
    operator: Option<String>,

    /// Analysis category: comprehensive, qimen, plum_blossom, skin_fortune, wealth_analysis
    #[arg(long, default_value = "comprehensive")]
    category: String,

    /// Moment to read, as `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or `YYYY-MM-DDTHH:MM` (default: now)
    #[arg(long, value_parser = parse_moment)]
    date: Option<NaiveDateTime>,

    /// Directory holding the reference JSON files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List all operators and exit
    #[arg(long)]
    list_operators: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let loader = args
        .data_dir
        .as_ref()
        .map_or_else(FsLoader::default, FsLoader::new);
    info!("reference data from {}", loader.root().display());
    let mut engine = FortuneEngine::new(loader);
    engine
        .load()
        .context("failed to load fortune reference data")?;

    if args.list_operators {
        return list_operators(&engine, args.output.clone());
    }

    let Some(codename) = args.operator.as_deref() else {
        bail!("--operator is required");
    };
    let category = resolve_category(&args.category);
    let at = args.date.unwrap_or_else(|| Local::now().naive_local());
    let report = engine
        .compute_daily_fortune(codename, category, at)
        .with_context(|| format!("no fortune for `{codename}`"))?;

    if args.report == ReportFormat::Console && args.output.is_none() {
        announce_banner();
    }
    write_report(args, &report)
}

fn announce_banner() {
    println!("{}", "🎲 Delta Fortune".bright_cyan().bold());
    println!("{}", "================".cyan());
}

fn resolve_category(key: &str) -> AnalysisCategory {
    let category = AnalysisCategory::from_key(key);
    if category.key() != key.trim() {
        warn!("unknown category `{key}`, using {}", category.key());
    }
    category
}

fn parse_moment(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYY-MM-DD HH:MM, got `{raw}`"))
}

fn list_operators<L>(engine: &FortuneEngine<L>, output: Option<PathBuf>) -> Result<()>
where
    L: delta_fortune::DataLoader,
{
    let data = engine.data().context("reference data is not loaded")?;
    let mut output_target = OutputTarget::new(output)?;
    writeln!(output_target.writer(), "Available operators:")?;
    for operator in &data.operators.operators {
        let role = operator.role.as_deref().unwrap_or("");
        writeln!(
            output_target.writer(),
            "  {:8} {}  {role}",
            operator.codename, operator.element
        )?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn write_report(args: &Args, report: &FortuneReport) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, report)?,
        ReportFormat::Markdown => {
            reports::generate_markdown_report(&mut output_target, report, args.verbose)?;
        }
        ReportFormat::Console => {
            if args.output.is_some() {
                colored::control::set_override(false);
            }
            reports::generate_console_report(&mut output_target, report, args.verbose)?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
