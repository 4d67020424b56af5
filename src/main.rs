use clap::{Parser, ValueEnum};
use srcfuse::fs_utils::default_root;
use srcfuse::{AmalgamateOptions, Amalgamation, FuseReport, Layout, Result, amalgamate, dry_run};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LONG_HELP: &str = r#"
Layout:
  ROOT/include/unittest/unittest.h      - interface seed
  ROOT/include/unittest/unittest-spi.h  - auxiliary header, inlined into the source
  ROOT/src/unittest-all.cc              - implementation seed

Output:
  OUTPUT_DIR/unittest/unittest.h        - every header, fused
  OUTPUT_DIR/unittest/unittest-all.cc   - every source, fused; includes only
                                          the fused header

Examples:
  # Fuse the library this binary was installed into (ROOT = <bin dir>/..)
  srcfuse fused_unittest
  # Fuse a library checked out elsewhere
  srcfuse path/to/unittest fused_unittest
  # Overwrite existing output without asking
  srcfuse path/to/unittest fused_unittest --force
  # Show which files each artifact would contain
  srcfuse path/to/unittest fused_unittest --list
  srcfuse path/to/unittest fused_unittest --list=json

Build against the result by adding OUTPUT_DIR to the include path and
compiling OUTPUT_DIR/unittest/unittest-all.cc. Conditional inclusion of the
library's own headers is not understood.
"#;

/// Fuse a multi-file library into one header and one source file.
#[derive(Parser, Debug)]
#[command(
    name = "srcfuse",
    version,
    about = "Fuse a multi-file library into one header and one source file.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// [ROOT] OUTPUT_DIR. ROOT defaults to the parent of the directory holding this binary.
    #[arg(value_name = "PATHS", num_args = 1..=2, required = true)]
    paths: Vec<PathBuf>,

    /// Library root, used when only OUTPUT_DIR is given
    #[arg(long, value_name = "DIR", env = "SRCFUSE_ROOT")]
    root: Option<PathBuf>,

    /// Overwrite existing output files without asking
    #[arg(long, short = 'y')]
    force: bool,

    /// Only list the files each artifact would contain (format: plain, json)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "plain")]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum ListFormat {
    /// One section per artifact, one file per line
    Plain,
    /// JSON output for scripting
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,srcfuse={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let (root, output_dir) = match cli.paths.as_slice() {
        [root, output_dir] => (root.clone(), output_dir.clone()),
        paths => {
            let output_dir = paths.first().cloned().unwrap_or_default();
            let root = match &cli.root {
                Some(root) => root.clone(),
                None => default_root()?,
            };
            (root, output_dir)
        }
    };
    tracing::debug!(root = %root.display(), output = %output_dir.display(), "resolved paths");

    let layout = Layout::default();

    if let Some(format) = cli.list {
        let reports = dry_run(&root, &layout)?;
        return print_reports(&reports, format);
    }

    let options = AmalgamateOptions { force: cli.force };
    let stdin = io::stdin();
    let artifacts = amalgamate(
        &root,
        &output_dir,
        &layout,
        &options,
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;

    tracing::info!(
        interface = %artifacts.interface.display(),
        implementation = %artifacts.implementation.display(),
        "fusion complete"
    );
    Ok(())
}

fn print_reports(reports: &Amalgamation, format: ListFormat) -> Result<()> {
    match format {
        ListFormat::Plain => {
            print_report("interface", &reports.interface);
            println!();
            print_report("implementation", &reports.implementation);
        }
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(reports)?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_report(name: &str, report: &FuseReport) {
    println!(
        "{name} ({}): {} files, {} lines",
        report.seed,
        report.inlined.len(),
        report.lines_written
    );
    for path in &report.inlined {
        println!("  {path}");
    }
    if report.interface_reference_emitted {
        println!("  (references the fused interface)");
    }
}
