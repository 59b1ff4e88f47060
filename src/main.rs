use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use remapkit::channel::MappingKey;
use remapkit::config;
use remapkit::generate::{self, GenerateRequest};
use remapkit::join;
use remapkit::table::Format;

/// Mapping-channel resolution and rename-table pipeline
///
/// remapkit turns versioned mapping identifiers into the concrete renaming
/// tables a deobfuscation build needs: it splits merged channel identifiers
/// into their official and community halves, derives combined rename tables
/// (srg→named or obf→named, forward or reversed), and joins resolved
/// mapping archives into the single archive the external rewriter consumes.
///
/// TYPICAL PIPELINE:
///
///   # Which namespaces does this identifier stand for?
///   remapkit split official_snapshot_20230602-1.20.1
///
///   # Downloads happen outside remapkit; then join the resolved archives:
///   remapkit join official.zip snapshot.zip
///
///   # Derive the member-renaming table for the rewriter:
///   remapkit generate --srg joined.tsrg --names snapshot.zip \
///       --output build/output.tsrg
///
/// Defaults for 'generate' can be set in remapkit.toml in the working
/// directory. Logging is controlled via RUST_LOG (e.g. RUST_LOG=debug).
#[derive(Parser)]
#[command(name = "remapkit")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(
    after_help = "See 'remapkit <command> --help' for more information on a specific command."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a mapping identifier into its namespace keys
    ///
    /// A merged identifier (channel 'official_snapshot' or
    /// 'official_stable') yields two keys, official first; any other
    /// identifier yields itself.
    Split {
        /// The composite identifier, {channel}_{version}
        mapping: String,

        /// Emit the keys as JSON instead of plain lines
        #[arg(long)]
        json: bool,
    },

    /// Generate a combined rename table
    ///
    /// Loads the base obfuscated→srg table, derives the requested span
    /// (srg→srg by default, obf→srg with --obf), renames methods and
    /// fields through the community name archives, and writes the result.
    Generate {
        /// Base obfuscated→srg table file
        #[arg(long)]
        srg: PathBuf,

        /// Community name archive(s), primary first
        #[arg(long = "names", required = true, num_args = 1..)]
        names: Vec<PathBuf>,

        /// Output table path
        #[arg(long)]
        output: PathBuf,

        /// Output format (default from remapkit.toml, else tsrg)
        #[arg(long)]
        format: Option<Format>,

        /// Write the table in reverse direction
        #[arg(long)]
        reverse: bool,

        /// Keep the obfuscated→srg span instead of deriving srg→srg
        #[arg(long)]
        obf: bool,
    },

    /// Join resolved mapping archives into one
    ///
    /// Copies every entry of the first archive and the params.csv entry of
    /// the second (when present) into '<first>-joined.zip'. Skips the merge
    /// when inputs are unchanged; falls back to the first archive if the
    /// merge fails. Prints the resulting path.
    Join {
        /// Archive paths, primary namespace first
        #[arg(required = true, num_args = 1..)]
        archives: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Split { mapping, json } => run_split(&mapping, json),
        Commands::Generate {
            srg,
            names,
            output,
            format,
            reverse,
            obf,
        } => run_generate(srg, names, output, format, reverse, obf),
        Commands::Join { archives } => run_join(&archives),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_split(mapping: &str, json: bool) -> Result<()> {
    if mapping.trim().is_empty() {
        bail!("mapping identifier must not be empty");
    }
    let keys = MappingKey::parse(mapping)?.split();
    if json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
    } else {
        for key in keys {
            println!("{} {}", key.channel, key.version);
        }
    }
    Ok(())
}

fn run_generate(
    srg: PathBuf,
    names: Vec<PathBuf>,
    output: PathBuf,
    format: Option<Format>,
    reverse: bool,
    obf: bool,
) -> Result<()> {
    let defaults = config::load(std::path::Path::new("."))?.generate;
    let request = GenerateRequest {
        srg,
        names,
        output,
        format: format.unwrap_or(defaults.format),
        reverse: reverse || defaults.reverse,
        obfuscated: obf || defaults.obfuscated,
    };
    generate::run(&request)?;
    Ok(())
}

fn run_join(archives: &[PathBuf]) -> Result<()> {
    // Fallback-on-failure is deliberate: a failed join degrades to the
    // unmerged primary archive (without its donated params.csv) instead of
    // blocking the build.
    let path = join::join_or_first(archives);
    println!("{}", path.display());
    Ok(())
}
