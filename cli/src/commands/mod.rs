//! CLI Commands
//!
//! All turbine CLI commands organized as separate modules.

mod bench;
mod crypt;

pub use bench::bench_mode;
pub use crypt::{crypt_file, BackendArg, CryptArgs};
