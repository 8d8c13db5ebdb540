use crate::error::AppError;
use flate2::{Compression, write::GzEncoder};
use std::fs::File;
use std::io;
use std::path::Path;

/// Gzip `input` into `output`, replacing any existing file.
///
/// Returns the number of uncompressed bytes read. The encoder is finished
/// (trailer written) before the output file is synced and closed.
pub fn compress_file(input: &Path, output: &Path) -> Result<u64, AppError> {
    let mut input_file = File::open(input)?;
    let output_file = File::create(output)?;

    let mut encoder = GzEncoder::new(output_file, Compression::default());
    let copied = io::copy(&mut input_file, &mut encoder)?;
    let output_file = encoder.finish()?;
    output_file.sync_all()?;
    Ok(copied)
}
