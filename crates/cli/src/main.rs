//! pcbdoc: thin command-line wrapper around the board document engine.
//!
//! `check` parses a board and reports diagnostics, `fmt` runs a
//! load-then-save cycle (a byte-exact no-op for untouched boards), and
//! `stats` prints entity counts. File I/O and extension validation happen
//! here; the engine core only ever sees string buffers.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use pcbdoc_core::{format_document, io, Diagnostic, IoError};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Board file checker and formatter.
#[derive(Parser)]
#[command(name = "pcbdoc", version, about = "KiCad board file checker and formatter")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a board file and report diagnostics
    Check {
        /// Path to the .kicad_pcb file
        file: PathBuf,
    },

    /// Load a board and write it back out (stdout unless -o is given)
    Fmt {
        /// Path to the .kicad_pcb file
        file: PathBuf,
        /// Output path; must carry the .kicad_pcb extension
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print entity counts and totals for a board file
    Stats {
        /// Path to the .kicad_pcb file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            2
        }
    };
    process::exit(code);
}

fn run(cli: &Cli) -> Result<i32, IoError> {
    match &cli.command {
        Commands::Check { file } => {
            let doc = io::load_board(file)?;
            report_diagnostics(doc.diagnostics(), cli.output);
            Ok(0)
        }
        Commands::Fmt { file, out } => {
            let doc = io::load_board(file)?;
            match out {
                Some(path) => io::save_board(&doc, path)?,
                None => print!("{}", format_document(&doc)),
            }
            Ok(0)
        }
        Commands::Stats { file } => {
            let mut doc = io::load_board(file)?;
            let stats = doc.stats();
            match cli.output {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&stats).expect("stats serialize")
                    );
                }
                OutputFormat::Text => {
                    println!("footprints: {}", stats.footprints);
                    println!("tracks:     {}", stats.tracks);
                    println!("vias:       {}", stats.vias);
                    println!("zones:      {}", stats.zones);
                    println!("nets:       {}", stats.nets);
                    println!("graphics:   {}", stats.graphics);
                    println!("unknown:    {}", stats.unknown_elements);
                    println!("track length: {:.3} mm", stats.total_track_length_mm);
                }
            }
            Ok(0)
        }
    }
}

fn report_diagnostics(diagnostics: &[Diagnostic], output: OutputFormat) {
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(diagnostics).expect("diagnostics serialize")
            );
        }
        OutputFormat::Text => {
            if diagnostics.is_empty() {
                println!("ok: no diagnostics");
                return;
            }
            for diag in diagnostics {
                match diag {
                    Diagnostic::UnknownElement { tag, offset } => {
                        println!("notice: unknown element `{tag}` at byte {offset} (preserved)");
                    }
                    Diagnostic::DanglingNet { entity, net } => {
                        println!("warning: entity {entity} references undeclared net {net}");
                    }
                    Diagnostic::UnknownLayer { entity, layer } => {
                        println!("warning: entity {entity} references unknown layer `{layer}`");
                    }
                }
            }
        }
    }
}
