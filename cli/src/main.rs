//! Turbine CLI
//!
//! Bulk AES-128-CTR encryption command-line tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bench_mode, crypt_file, BackendArg, CryptArgs};

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "turbine")]
#[command(about = "Parallel AES-128-CTR engine (scalar / AES-NI / VAES)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file
    Encrypt(CryptArgs),
    /// Decrypt a file (CTR mode: same keystream as encrypt)
    Decrypt(CryptArgs),
    /// Measure backend throughput on this machine
    Bench {
        /// Buffer size in MiB
        #[arg(long, default_value_t = 64)]
        size: usize,

        /// Execution lanes (defaults to the thread-pool width)
        #[arg(long)]
        lanes: Option<usize>,

        /// Restrict the run to a single backend
        #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
        backend: BackendArg,
    },
    /// Print the detected hardware backend and thread count
    Info,
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt(args) => crypt_file(&args, "enc")?,
        Commands::Decrypt(args) => crypt_file(&args, "dec")?,
        Commands::Bench {
            size,
            lanes,
            backend,
        } => bench_mode(size, lanes, backend)?,
        Commands::Info => {
            println!("backend: {}", turbine::active_backend());
            println!("threads: {}", rayon::current_num_threads());
        }
    }

    Ok(())
}
