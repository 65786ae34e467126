//! Encrypt / Decrypt Commands
//!
//! File encryption via the streaming engine. CTR mode makes the two commands
//! the same keystream XOR; they differ only in the default output suffix.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use turbine::{Backend, CtrParams, CtrStream};

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Backend selector exposed on the command line.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum BackendArg {
    /// Fastest backend supported by this CPU
    Auto,
    /// Portable table-driven implementation
    Scalar,
    /// AES-NI single-block kernel
    Aesni,
    /// VAES 4-block wide kernel
    Vaes,
}

impl BackendArg {
    /// Explicit backend, or `None` for auto-dispatch.
    pub fn pick(self) -> Option<Backend> {
        match self {
            Self::Auto => None,
            Self::Scalar => Some(Backend::Scalar),
            Self::Aesni => Some(Backend::AesNi),
            Self::Vaes => Some(Backend::Vaes),
        }
    }
}

#[derive(Args)]
pub struct CryptArgs {
    /// Input file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output file (defaults to FILE.enc / FILE.dec)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 128-bit key, hex encoded (32 hex digits)
    #[arg(short, long)]
    pub key: String,

    /// 128-bit IV, hex encoded: nonce (8 bytes) || big-endian counter (8 bytes)
    #[arg(long, conflicts_with_all = ["nonce", "counter"])]
    pub iv: Option<String>,

    /// 64-bit nonce, hex encoded (16 hex digits)
    #[arg(long)]
    pub nonce: Option<String>,

    /// Base counter value (used with --nonce)
    #[arg(long, default_value_t = 0)]
    pub counter: u64,

    /// Backend to use
    #[arg(short, long, value_enum, default_value_t = BackendArg::Auto)]
    pub backend: BackendArg,

    /// Execution lanes (defaults to the thread-pool width)
    #[arg(short, long)]
    pub lanes: Option<usize>,
}

// =============================================================================
// PARSING HELPERS
// =============================================================================

fn parse_hex<const N: usize>(what: &str, hex_str: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(hex_str).with_context(|| format!("{what} is not valid hex"))?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("{what} must be {N} bytes, got {actual}"))
}

fn parse_params(args: &CryptArgs) -> Result<CtrParams> {
    if let Some(iv) = &args.iv {
        let iv: [u8; 16] = parse_hex("IV", iv)?;
        return Ok(CtrParams::from_iv(&iv));
    }
    if let Some(nonce) = &args.nonce {
        let nonce: [u8; 8] = parse_hex("nonce", nonce)?;
        return Ok(CtrParams::new(nonce, args.counter));
    }
    bail!("either --iv or --nonce is required");
}

// =============================================================================
// ENCRYPT / DECRYPT
// =============================================================================

/// Apply the CTR keystream to one file and write the result.
pub fn crypt_file(args: &CryptArgs, suffix: &str) -> Result<()> {
    let key: [u8; 16] = parse_hex("key", &args.key)?;
    let params = parse_params(args)?;

    let mut data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read: {}", args.input.display()))?;

    let mut stream = match args.backend.pick() {
        None => CtrStream::new(&key, params),
        Some(backend) => CtrStream::with_backend(&key, params, backend)
            .map_err(|e| anyhow::anyhow!("{e}"))?,
    };

    let lanes = args.lanes.unwrap_or_else(rayon::current_num_threads);
    stream.apply_keystream_parallel(&mut data, lanes);

    let output = args.output.clone().unwrap_or_else(|| {
        let mut path = args.input.clone().into_os_string();
        path.push(format!(".{suffix}"));
        PathBuf::from(path)
    });
    std::fs::write(&output, &data)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    println!("{} -> {} ({} bytes)", args.input.display(), output.display(), data.len());
    Ok(())
}
