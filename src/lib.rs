pub mod compressor;
pub mod config;
pub mod error;
pub mod exporter;
pub mod telemetry;

pub use error::AppError;
