use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use xcall_check::checksum::descriptor::signature;
use xcall_check::{suite, Trace, Value, Variant, VectorFile};

#[derive(Parser)]
#[command(name = "xcall-check", about = "Cross-boundary argument checksum harness")]
struct Cli {
    /// Log received arguments and checksums (overrides the warn default)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in reference suite through the C ABI
    Run {
        /// Write the JSON report here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// List checksum variants and their slot order
    Variants,
    /// Compute one checksum from a JSON argument list
    Checksum {
        #[arg(short = 'V', long)]
        variant: String,
        /// JSON array of {"kind", "value"} objects, or @FILE
        #[arg(short, long)]
        args: String,
    },
    /// Evaluate a JSON vector file
    Verify {
        vectors: PathBuf,
    },
    /// Record the unit sequence of one checksum into a trace file
    Trace {
        #[arg(short = 'V', long)]
        variant: String,
        /// JSON array of {"kind", "value"} objects, or @FILE
        #[arg(short, long)]
        args: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Refold a trace file and print its checksum
    Replay {
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {

        // ── Run ──────────────────────────────────────────────────────────────
        Commands::Run { report } => {
            let result = suite::run();
            println!("Run {}  started {}", result.run_id, result.started_at.to_rfc3339());
            let mut section = None;
            for check in &result.checks {
                if section != Some(check.section) {
                    println!("=== {} ===", check.section);
                    section = Some(check.section);
                }
                if check.passed {
                    println!("  ok    {:<26} {}", check.name, check.actual);
                } else {
                    println!("  FAIL  {:<26} expected {} got {}", check.name, check.expected, check.actual);
                }
            }
            println!("{}", result.summary());
            if let Some(path) = report {
                let mut w = BufWriter::new(File::create(&path)?);
                w.write_all(result.to_json()?.as_bytes())?;
                w.flush()?;
                println!("Report: {}", path.display());
            }
            if !result.passed() {
                std::process::exit(1);
            }
        }

        // ── Variants ─────────────────────────────────────────────────────────
        Commands::Variants => {
            println!("{:<16} Slots", "Variant");
            for v in Variant::ALL {
                println!("{:<16} {}", v.name(), signature(v));
            }
        }

        // ── Checksum ─────────────────────────────────────────────────────────
        Commands::Checksum { variant, args } => {
            let variant: Variant = variant.parse()?;
            let args = parse_args(&args)?;
            let sum = variant.checksum(&args)?;
            println!("{variant}  {sum}  ({})", sum.as_i64());
        }

        // ── Verify ───────────────────────────────────────────────────────────
        Commands::Verify { vectors } => {
            let file = VectorFile::load(&vectors)?;
            let outcomes = file.evaluate();
            let mut failures = 0usize;
            for o in &outcomes {
                let actual = o.actual.map(|c| c.to_string());
                match (&o.error, o.passed()) {
                    (Some(err), _) => println!("  FAIL  {:<26} {}", o.name, err),
                    (None, true)   => println!("  ok    {:<26} {}", o.name, actual.unwrap_or_default()),
                    (None, false)  => println!(
                        "  FAIL  {:<26} expected {} got {}",
                        o.name,
                        o.expect.map(|c| c.to_string()).unwrap_or_default(),
                        actual.unwrap_or_default(),
                    ),
                }
                if !o.passed() { failures += 1; }
            }
            println!("{} case(s), {} failure(s)", outcomes.len(), failures);
            if failures > 0 {
                std::process::exit(1);
            }
        }

        // ── Trace ────────────────────────────────────────────────────────────
        Commands::Trace { variant, args, output } => {
            let variant: Variant = variant.parse()?;
            let args = parse_args(&args)?;
            let trace = Trace::record(variant, &args)?;
            let mut w = BufWriter::new(File::create(&output)?);
            trace.write(&mut w)?;
            w.flush()?;
            println!("{variant}  {} unit(s)  {}", trace.units.len(), trace.replay());
            println!("Trace: {}", output.display());
        }

        // ── Replay ───────────────────────────────────────────────────────────
        Commands::Replay { input } => {
            let trace = Trace::read(BufReader::new(File::open(&input)?))?;
            println!("{}  {} unit(s)", trace.variant, trace.units.len());
            for (i, unit) in trace.units.iter().enumerate() {
                println!("  [{i:>3}] 0x{unit:016x}");
            }
            println!("{}", trace.replay());
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    if verbose {
        filter = filter.add_directive(tracing::Level::INFO.into());
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Inline JSON, or `@path` to read it from a file.
fn parse_args(raw: &str) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    Ok(match raw.strip_prefix('@') {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None       => serde_json::from_str(raw)?,
    })
}
