use crate::crypto::certificates::Certificate;
use crate::WipeResult;
use std::fmt::Write as _;
use std::fs;
use std::io;

/// Writes the issued certificate as `<base>.json` (structured record) and
/// `<base>.txt` (human-readable report). Failure here is fatal for the
/// run; the erase itself already happened, only the artifacts are lost.
pub fn save_certificate(cert: &Certificate, output_base: &str) -> WipeResult<()> {
    let json = serde_json::to_string_pretty(cert)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(format!("{}.json", output_base), json)?;

    fs::write(format!("{}.txt", output_base), render_report(cert))?;
    Ok(())
}

/// Plain-text report document mirroring the certificate fields.
pub fn render_report(cert: &Certificate) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Secure Wipe Certificate");
    let _ = writeln!(report, "=======================");
    let _ = writeln!(report);
    let _ = writeln!(report, "Certificate ID: {}", cert.certificate_id);
    let _ = writeln!(report, "Device:         {}", cert.device);
    let _ = writeln!(report, "Fingerprint:    {}", cert.device_fingerprint);
    let _ = writeln!(report, "Method:         {}", cert.method);
    for standard in &cert.compliance_standards {
        let _ = writeln!(report, "Standard:       {}", standard);
    }
    let _ = writeln!(report, "Duration:       {}", cert.duration);
    let _ = writeln!(report, "Started:        {}", cert.started_at);
    let _ = writeln!(report, "Finished:       {}", cert.finished_at);
    let _ = writeln!(report, "Platform:       {}", cert.platform);
    if cert.is_signed() {
        let _ = writeln!(report, "Signature:      ECDSA P-256 ({})", cert.signature);
        let _ = writeln!(report, "Public key:     {}", cert.public_key);
    } else {
        let _ = writeln!(report, "Signature:      ABSENT (unsigned certificate)");
    }
    report
}
