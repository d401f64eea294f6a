//! lzfind-cli - Inspect LZ parsing decisions for a file
//!
//! A command-line tool that runs the lazy parser over a file and
//! reports what the match finder saw: literal/match counts, longest
//! match, and an estimated token-stream size. No entropy coding is
//! performed; the output is analysis, not an archive format.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use lzfind::{encode_bytes, reconstruct, ScanStats, Token};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lzfind-cli")]
#[command(about = "Inspect LZ match-finding and lazy-parsing decisions for a file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a file and print match statistics
    Scan {
        /// Input file to scan
        input: PathBuf,

        /// Dictionary size
        #[arg(short, long, value_enum, default_value_t = CliDictSize::Size32K)]
        dict_size: CliDictSize,
    },

    /// Tokenize a file, reconstruct the tokens, and compare
    Verify {
        /// Input file to verify
        input: PathBuf,

        /// Dictionary size
        #[arg(short, long, value_enum, default_value_t = CliDictSize::Size32K)]
        dict_size: CliDictSize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliDictSize {
    /// 4KB dictionary (4096 bytes)
    Size4K,
    /// 32KB dictionary (32768 bytes) - Default
    Size32K,
    /// 256KB dictionary (262144 bytes)
    Size256K,
    /// 1MB dictionary (1048576 bytes)
    Size1M,
}

impl From<CliDictSize> for u32 {
    fn from(size: CliDictSize) -> Self {
        match size {
            CliDictSize::Size4K => 4 * 1024,
            CliDictSize::Size32K => 32 * 1024,
            CliDictSize::Size256K => 256 * 1024,
            CliDictSize::Size1M => 1024 * 1024,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan { input, dict_size } => {
            scan_file(&input, dict_size.into(), cli.verbose, cli.quiet)
        }
        Commands::Verify { input, dict_size } => {
            verify_file(&input, dict_size.into(), cli.quiet)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn tokenize_with_progress(
    data: &[u8],
    dict_size: u32,
    quiet: bool,
    message: &'static str,
) -> Result<Vec<Token>, Box<dyn std::error::Error>> {
    let progress = if !quiet && data.len() > 1024 * 1024 {
        let pb = ProgressBar::new(2);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(message);
        Some(pb)
    } else {
        None
    };

    if let Some(ref pb) = progress {
        pb.inc(1);
    }

    let tokens = encode_bytes(data, dict_size).map_err(|e| format!("Scan failed: {}", e))?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("done");
    }

    Ok(tokens)
}

fn scan_file(
    input: &PathBuf,
    dict_size: u32,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let start_time = Instant::now();
    let data = fs::read(input)?;

    if verbose {
        println!("Input size: {} bytes", data.len());
        println!("Dictionary: {} bytes", dict_size);
    }

    let tokens = tokenize_with_progress(&data, dict_size, quiet, "Scanning...")?;
    let stats = ScanStats::from_tokens(&tokens);
    let elapsed = start_time.elapsed();

    // Rough token cost: one byte per literal, three per match. Only an
    // estimate; the real cost depends on the entropy stage.
    let estimated = stats.literal_count + stats.match_count * 3;

    if !quiet {
        println!("Scan of '{}':", input.display());
        println!("  Input:          {} bytes", data.len());
        println!("  Tokens:         {}", tokens.len());
        println!("  Literals:       {}", stats.literal_count);
        println!("  Matches:        {}", stats.match_count);
        println!("  Longest match:  {} bytes", stats.longest_match);
        if stats.match_count > 0 {
            let matched = stats.total_bytes - stats.literal_count as u64;
            println!(
                "  Avg match len:  {:.1} bytes",
                matched as f64 / stats.match_count as f64
            );
        }
        if !data.is_empty() {
            println!(
                "  Est. ratio:     {:.1}%",
                (estimated as f64 / data.len() as f64) * 100.0
            );
        }
        println!("  Time:           {:.2?}", elapsed);
    }

    Ok(())
}

fn verify_file(
    input: &PathBuf,
    dict_size: u32,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    let tokens = tokenize_with_progress(&data, dict_size, quiet, "Verifying...")?;
    let rebuilt = reconstruct(&tokens).map_err(|e| format!("Reconstruction failed: {}", e))?;

    if rebuilt != data {
        return Err("Reconstruction mismatch: token stream does not round-trip".into());
    }

    if !quiet {
        println!(
            "✓ '{}' round-trips through {} tokens",
            input.display(),
            tokens.len()
        );
    }

    Ok(())
}
