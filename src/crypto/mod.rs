pub mod certificates;

// Re-export
pub use certificates::{
    Certificate, CertificateBuilder, EphemeralP256, KeyProvider, SignatureEngine,
};
