// Allow uppercase acronyms for industry-standard terms like NVMe, ATA, SCSI
#![allow(clippy::upper_case_acronyms)]

pub mod crypto;
pub mod report;
pub mod scanner;
pub mod wipe;

// Re-export the main pipeline pieces for convenience
pub use crypto::certificates::{Certificate, CertificateBuilder, SignatureEngine};
pub use wipe::{classify, dispatch, CommandRunner, SystemRunner};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WipeError {
    #[error("unsupported device type: {0}")]
    UnsupportedDevice(String),

    #[error("{tool} failed ({status}): {output}")]
    EraseToolFailed {
        tool: String,
        status: String,
        output: String,
    },

    #[error("device enumeration failed: {0}")]
    Enumeration(String),

    #[error("certificate signing failed: {0}")]
    Signing(String),

    #[error("failed to persist certificate: {0}")]
    Persistence(#[from] std::io::Error),
}

pub type WipeResult<T> = Result<T, WipeError>;

/// Erase-method category for a device. Exactly one class per device,
/// derived from the identifier and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    NVMe,
    AtaScsi,
    Unsupported,
}

/// Result of one external erase invocation. Produced by the dispatcher,
/// consumed once by the certificate builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EraseOutcome {
    pub class: DeviceClass,
    pub success: bool,
    pub tool_output: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Immutable per-run configuration, built once from the CLI and passed
/// down by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub device: String,
    pub output_base: String,
}

/// Runs the full erase-and-certify pipeline for one device: classify,
/// dispatch the matching external erase tool, build the certificate,
/// sign it. Persisting the certificate is up to the caller.
///
/// A signing failure does not fail the pipeline; the certificate is
/// returned with empty signature and public-key fields.
pub fn erase_and_certify(
    device: &str,
    platform: &str,
    runner: &dyn CommandRunner,
) -> WipeResult<Certificate> {
    let class = wipe::classify(device);
    let outcome = wipe::dispatch(device, class, runner)?;
    let mut certificate = CertificateBuilder::build(device, &outcome, platform);
    SignatureEngine::sign(&mut certificate);
    Ok(certificate)
}

#[cfg(test)]
mod lib_tests;
