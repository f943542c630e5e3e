mod render;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rowsift_workbook::{DEFAULT_EXPORT_FILE, SearchProgress, Session, SessionConfig, SessionError};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rowsift", version, about = "Search spreadsheet rows and export the matches")]
struct Cli {
    /// Enable verbose logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a file and print the matching rows.
    Search(SearchArgs),
    /// Search a file and write the matching rows to a spreadsheet.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Spreadsheet to load (.xlsx, .xls, .ods, .csv, .tsv).
    file: PathBuf,

    /// Text, number or phone number to look for.
    query: String,

    /// Hide a column, 1-based. May be repeated.
    #[arg(long = "hide-col", value_parser = clap::value_parser!(u64).range(1..))]
    hide_col: Vec<u64>,

    /// Delete a displayed row after the search, 1-based. Applied in order,
    /// each against the rows left by the previous deletion.
    #[arg(long = "delete", value_parser = clap::value_parser!(u64).range(1..))]
    delete: Vec<u64>,

    /// Report scan progress on stderr.
    #[arg(long)]
    progress: bool,

    /// Log one line per matched row explaining the hit.
    #[arg(long)]
    debug: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[command(flatten)]
    query: QueryArgs,

    /// Maximum number of rows to display.
    #[arg(long, default_value_t = rowsift_workbook::config::DEFAULT_DISPLAY_LIMIT)]
    limit: usize,

    /// Column width for HTML output as COL=PX, 1-based column. May be repeated.
    #[arg(long = "col-width", value_parser = parse_col_width)]
    col_width: Vec<(usize, u32)>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    query: QueryArgs,

    /// Output file; `.csv` writes CSV, anything else writes xlsx.
    #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn parse_col_width(s: &str) -> Result<(usize, u32), String> {
    let (col, px) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COL=PX, got `{s}`"))?;
    let col: usize = col.trim().parse().map_err(|e| format!("bad column `{col}`: {e}"))?;
    if col == 0 {
        return Err("columns are 1-based".to_string());
    }
    let px: u32 = px.trim().parse().map_err(|e| format!("bad width `{px}`: {e}"))?;
    Ok((col - 1, px))
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

struct StderrProgress;

impl SearchProgress for StderrProgress {
    fn on_progress(&mut self, scanned: usize, total: usize) {
        let percent = if total == 0 { 100 } else { scanned * 100 / total };
        eprint!("\rПоиск... {percent}%");
        if scanned == total {
            eprintln!();
        }
    }
}

fn user_error(e: SessionError) -> anyhow::Error {
    let msg = e.user_message();
    anyhow::Error::new(e).context(msg)
}

/// Load, search, then apply column hiding and row deletions.
fn run_query(args: &QueryArgs, config: SessionConfig) -> Result<Session> {
    let mut session = Session::new(config);
    let dataset = session.load_path(&args.file).map_err(user_error)?;
    info!(
        file = %args.file.display(),
        rows = dataset.len(),
        columns = dataset.width(),
        "loaded"
    );

    let summary = if args.progress {
        session.search(&args.query, &mut StderrProgress)
    } else {
        session.search(&args.query, &mut rowsift_workbook::NoProgress)
    }
    .map_err(user_error)?;
    debug!(total = summary.total, shown = summary.shown, "search done");
    for line in session.debug_log() {
        eprintln!("{line}");
    }

    for &col in &args.hide_col {
        session.hide_column((col - 1) as usize);
    }
    for &k in &args.delete {
        let display_index = (k - 1) as usize;
        if session.delete_row(display_index).is_none() {
            bail!("no displayed row {k} to delete");
        }
    }
    Ok(session)
}

fn search(args: SearchArgs) -> Result<()> {
    let config = SessionConfig {
        display_limit: args.limit,
        debug: args.query.debug,
        ..SessionConfig::default()
    };
    let mut session = run_query(&args.query, config)?;
    for &(col, px) in &args.col_width {
        session.set_column_width(col, px);
    }
    let view = session.view();

    let rendered = match args.format {
        OutputFormat::Text => render::render_text(&view),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&view).context("serialize results")? + "\n"
        }
        OutputFormat::Html => view.to_html(),
    };
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("write results")?;
    Ok(())
}

fn export(args: ExportArgs) -> Result<()> {
    let config = SessionConfig {
        debug: args.query.debug,
        ..SessionConfig::default()
    };
    let session = run_query(&args.query, config)?;
    session.export_to_path(&args.out).map_err(user_error)?;
    println!(
        "{} -> {}",
        session.view().status_line(),
        args.out.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Command::Search(args) => search(args),
        Command::Export(args) => export(args),
    }
}
