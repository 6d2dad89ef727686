use crate::{DeviceClass, EraseOutcome, WipeError, WipeResult};
use chrono::{DateTime, Utc};
use log::warn;
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, KeyPair as _, ECDSA_P256_SHA256_ASN1_SIGNING};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Signed attestation that an erase occurred. Flat, JSON-serializable;
/// field order here is the canonical serialization order the signature
/// covers. Immutable once signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_id: String,
    pub device: String,
    pub device_fingerprint: String,
    pub method: String,
    pub compliance_standards: Vec<String>,
    pub duration: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub platform: String,
    pub signature: String,
    pub public_key: String,
}

impl Certificate {
    /// Byte form the signature covers: this record with the signature and
    /// public-key fields present but empty. A verifier must rebuild these
    /// exact bytes for the digest to match; the fields are serialized as
    /// empty strings, never omitted.
    pub fn canonical_bytes(&self) -> WipeResult<Vec<u8>> {
        let mut unsigned = self.clone();
        unsigned.signature = String::new();
        unsigned.public_key = String::new();
        serde_json::to_vec(&unsigned).map_err(|e| WipeError::Signing(e.to_string()))
    }

    /// Signature and public key are either both present or both absent.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty() && !self.public_key.is_empty()
    }
}

const METHOD_DESCRIPTION: &str =
    "Firmware-level secure erase per NIST SP 800-88 Rev. 1 (Purge)";

fn compliance_standards(class: DeviceClass) -> Vec<String> {
    let mut standards = vec!["NIST SP 800-88 Rev. 1".to_string()];
    match class {
        DeviceClass::NVMe => standards.push("NVM Express Format NVM (SES=1)".to_string()),
        DeviceClass::AtaScsi => standards.push("ATA ACS-3 Enhanced Security Erase".to_string()),
        DeviceClass::Unsupported => {}
    }
    standards
}

/// SHA-256 fingerprint of the device identifier, so a certificate can be
/// matched to its target without relying on the raw path string alone.
pub(crate) fn device_fingerprint(device: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(device.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct CertificateBuilder;

impl CertificateBuilder {
    /// Assembles the unsigned attestation record. Call only for a
    /// successful outcome; a failed erase never reaches this stage.
    ///
    /// Duration is the wall-clock span of the erase call (flush included,
    /// signing excluded). The start/end timestamps are recomputed relative
    /// to issuance time as `now - duration` and `now`; the raw erase
    /// window stays on the `EraseOutcome`.
    pub fn build(device: &str, outcome: &EraseOutcome, platform: &str) -> Certificate {
        debug_assert!(outcome.success);

        let elapsed = outcome.finished_at - outcome.started_at;
        let now = Utc::now();

        Certificate {
            certificate_id: Uuid::new_v4().to_string(),
            device: device.to_string(),
            device_fingerprint: device_fingerprint(device),
            method: METHOD_DESCRIPTION.to_string(),
            compliance_standards: compliance_standards(outcome.class),
            duration: humantime::format_duration(elapsed.to_std().unwrap_or_default())
                .to_string(),
            started_at: now - elapsed,
            finished_at: now,
            platform: platform.to_string(),
            signature: String::new(),
            public_key: String::new(),
        }
    }
}

/// Source of the ephemeral signing key. A trait seam so signing failure
/// paths can be exercised without exhausting the system random source.
pub trait KeyProvider {
    fn generate(&self) -> WipeResult<EcdsaKeyPair>;
}

/// Fresh P-256 key material from the OS secure random source. Generated
/// per signing call, never cached or reused.
pub struct EphemeralP256;

impl KeyProvider for EphemeralP256 {
    fn generate(&self) -> WipeResult<EcdsaKeyPair> {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng)
            .map_err(|_| WipeError::Signing("key generation failed".to_string()))?;
        EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref(), &rng)
            .map_err(|e| WipeError::Signing(format!("key material rejected: {}", e)))
    }
}

pub struct SignatureEngine;

impl SignatureEngine {
    /// Signs the certificate in place with a fresh ephemeral key pair.
    /// Never fails the pipeline: the erase already succeeded, so on any
    /// signing problem the certificate ships unsigned and the failure is
    /// logged as a warning.
    pub fn sign(cert: &mut Certificate) {
        Self::sign_with(cert, &EphemeralP256)
    }

    pub fn sign_with(cert: &mut Certificate, keys: &dyn KeyProvider) {
        if let Err(e) = Self::try_sign(cert, keys) {
            warn!("issuing unsigned certificate: {}", e);
            cert.signature = String::new();
            cert.public_key = String::new();
        }
    }

    fn try_sign(cert: &mut Certificate, keys: &dyn KeyProvider) -> WipeResult<()> {
        let key_pair = keys.generate()?;
        let message = cert.canonical_bytes()?;

        // ECDSA P-256: SHA-256 over the canonical bytes, ASN.1 DER signature
        let rng = SystemRandom::new();
        let sig = key_pair
            .sign(&rng, &message)
            .map_err(|_| WipeError::Signing("signature computation failed".to_string()))?;

        cert.signature = hex_encode(sig.as_ref());
        // Uncompressed public point; the private half drops with key_pair
        cert.public_key = hex_encode(key_pair.public_key().as_ref());
        Ok(())
    }
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
