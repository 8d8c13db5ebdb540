//! Wait for a shared input file, then gzip it to the output share.
//!
//! Layout:
//! - `readiness.rs`: fixed-interval existence poll with a bounded number of retries
//! - `gzip.rs`: streaming copy through a gzip encoder

pub mod gzip;
pub mod readiness;

pub use gzip::compress_file;
pub use readiness::{PollPolicy, wait_for_ready};

use crate::config::CompressorConfig;
use crate::error::AppError;
use std::path::PathBuf;
use tracing::info;

pub const INPUT_FILE_NAME: &str = "input.txt";
pub const OUTPUT_FILE_NAME: &str = "output.gz";

/// Run the compressor once: wait for the input, compress it, return the
/// number of input bytes processed.
pub async fn run(cfg: &CompressorConfig) -> Result<u64, AppError> {
    let input_path = cfg.input_location.join(INPUT_FILE_NAME);
    let output_path = cfg.output_location.join(OUTPUT_FILE_NAME);

    let policy = PollPolicy {
        interval: cfg.poll_interval(),
        max_retries: cfg.poll_max_retries,
    };
    wait_for_ready(&input_path, policy).await?;

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        "compressing file"
    );
    let copied = compress_on_blocking_pool(input_path, output_path).await?;
    info!(bytes = copied, "file compressed successfully");
    Ok(copied)
}

async fn compress_on_blocking_pool(input: PathBuf, output: PathBuf) -> Result<u64, AppError> {
    tokio::task::spawn_blocking(move || compress_file(&input, &output))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
}
