mod output;

use anyhow::{Context, Result};
use arcpath_core::{
    Config, FsDirCreator, check_chunk_size, checksum_tree, combine, crc32_from_hex, crc32_to_hex,
    get_filename, make_dir, prepare_entry_path, resolve, truncate_to_parent, verify_file,
};
use clap::{Parser, Subcommand};
use output::{
    CombineOutput, CrcOutput, FilenameOutput, MkdirOutput, OutputWriter, ParentOutput,
    PrepareOutput, ResolveOutput, VerifyOutput,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Result code for a checksum that does not match.
const RESULT_MISMATCH: u8 = 2;

/// Result code for any other failure.
const RESULT_FAILURE: u8 = 1;

/// Arcpath - Path and checksum helpers for archive extraction
#[derive(Parser)]
#[command(name = "arcpath")]
#[command(about = "Resolve archive entry paths, create directories and compute CRC-32", long_about = None)]
#[command(version)]
struct Cli {
    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file with key=value settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path buffer capacity in bytes (overrides config and ARCPATH_MAX_PATH)
    #[arg(long, global = true)]
    max_path: Option<usize>,

    /// Bytes read per chunk when checksumming (overrides config and ARCPATH_CHUNK_SIZE)
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove `.` and `..` segments from a path without touching the filesystem
    Resolve {
        /// Path to resolve
        path: String,
    },

    /// Join a segment onto a base path
    Combine {
        /// Base path
        base: String,

        /// Segment to append
        segment: String,
    },

    /// Print the part of a path after its last separator
    Filename {
        /// Path to split
        path: String,
    },

    /// Print a path without its last component
    Parent {
        /// Path to truncate
        path: String,
    },

    /// Create directories, including missing parents
    Mkdir {
        /// Directories to create
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Compute CRC-32 of files (directories are walked)
    Crc {
        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Check a file against an expected CRC-32
    Verify {
        /// File to check
        path: PathBuf,

        /// Expected CRC-32 as 8 hex digits
        crc: String,
    },

    /// Create the parent directories for an archive entry and print its output path
    Prepare {
        /// Destination root
        dest: String,

        /// Entry name as stored in the archive
        entry: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = OutputWriter::new(cli.json);
    match run(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = result_code(&err);
            output.write_error(&err, code);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn result_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<arcpath_core::Error>() {
        Some(arcpath_core::Error::ChecksumMismatch { .. }) => RESULT_MISMATCH,
        _ => RESULT_FAILURE,
    }
}

/// Build the effective config: defaults < config file < environment < flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    config
        .apply_env()
        .with_context(|| "Invalid ARCPATH_* environment variable")?;

    if let Some(max_path) = cli.max_path {
        anyhow::ensure!(max_path > 0, "--max-path must be non-zero");
        config.max_path = max_path;
    }
    if let Some(chunk_size) = cli.chunk_size {
        anyhow::ensure!(chunk_size > 0, "--chunk-size must be non-zero");
        config.chunk_size = check_chunk_size(chunk_size).context("Invalid --chunk-size")?;
    }

    Ok(config)
}

fn run(cli: Cli, output: &OutputWriter) -> Result<()> {
    let config = load_config(&cli)?;
    tracing::debug!(max_path = config.max_path, chunk_size = config.chunk_size, "loaded config");

    match cli.command {
        Commands::Resolve { path } => cmd_resolve(output, &config, path),
        Commands::Combine { base, segment } => cmd_combine(output, &config, base, &segment),
        Commands::Filename { path } => cmd_filename(output, path),
        Commands::Parent { path } => cmd_parent(output, path),
        Commands::Mkdir { paths } => cmd_mkdir(output, paths),
        Commands::Crc { paths } => cmd_crc(output, &config, paths),
        Commands::Verify { path, crc } => cmd_verify(output, path, &crc),
        Commands::Prepare { dest, entry } => cmd_prepare(output, &config, &dest, entry),
    }
}

fn cmd_resolve(output: &OutputWriter, config: &Config, path: String) -> Result<()> {
    let resolved = resolve(&path, config.max_path)
        .with_context(|| format!("Failed to resolve path: {}", path))?;

    let data = ResolveOutput {
        success: true,
        result_code: 0,
        input: path,
        resolved,
    };
    output.write(&data, || format!("{}\n", data.resolved))
}

fn cmd_combine(output: &OutputWriter, config: &Config, base: String, segment: &str) -> Result<()> {
    let mut path = base;
    combine(&mut path, segment, config.max_path)
        .with_context(|| format!("Failed to combine {} with {}", path, segment))?;

    let data = CombineOutput {
        success: true,
        result_code: 0,
        path,
    };
    output.write(&data, || format!("{}\n", data.path))
}

fn cmd_filename(output: &OutputWriter, path: String) -> Result<()> {
    let filename = get_filename(&path)
        .with_context(|| format!("No filename in path: {}", path))?
        .to_string();

    let data = FilenameOutput {
        success: true,
        result_code: 0,
        path,
        filename,
    };
    output.write(&data, || format!("{}\n", data.filename))
}

fn cmd_parent(output: &OutputWriter, path: String) -> Result<()> {
    let mut parent = path.clone();
    truncate_to_parent(&mut parent);

    let data = ParentOutput {
        success: true,
        result_code: 0,
        path,
        parent,
    };
    output.write(&data, || format!("{}\n", data.parent))
}

fn cmd_mkdir(output: &OutputWriter, paths: Vec<String>) -> Result<()> {
    for path in &paths {
        make_dir(path).with_context(|| format!("Failed to create directory: {}", path))?;
    }

    let data = MkdirOutput {
        success: true,
        result_code: 0,
        directories: paths,
    };
    output.write(&data, || {
        data.directories
            .iter()
            .map(|d| format!("Created {}\n", d))
            .collect()
    })
}

fn cmd_crc(output: &OutputWriter, config: &Config, paths: Vec<PathBuf>) -> Result<()> {
    let mut files = Vec::new();
    for path in &paths {
        let entries = checksum_tree(path, config.chunk_size)
            .with_context(|| format!("Failed to checksum {}", path.display()))?;
        files.extend(entries);
    }

    let data = CrcOutput {
        success: true,
        result_code: 0,
        files,
    };
    output.write(&data, || {
        data.files
            .iter()
            .map(|f| format!("{} {:>10} {}\n", crc32_to_hex(f.crc32), f.size, f.path))
            .collect()
    })
}

fn cmd_verify(output: &OutputWriter, path: PathBuf, crc: &str) -> Result<()> {
    let expected = crc32_from_hex(crc).with_context(|| format!("Invalid CRC-32: {}", crc))?;

    verify_file(&path, expected)
        .with_context(|| format!("Verification failed for {}", path.display()))?;

    let data = VerifyOutput {
        success: true,
        result_code: 0,
        path: path.display().to_string(),
        crc32: crc32_to_hex(expected),
    };
    output.write(&data, || format!("{}: OK\n", data.path))
}

fn cmd_prepare(output: &OutputWriter, config: &Config, dest: &str, entry: String) -> Result<()> {
    let path = prepare_entry_path(&FsDirCreator, dest, &entry, config.max_path)
        .with_context(|| format!("Failed to prepare output path for entry: {}", entry))?;

    let data = PrepareOutput {
        success: true,
        result_code: 0,
        entry,
        path,
    };
    output.write(&data, || format!("{}\n", data.path))
}
