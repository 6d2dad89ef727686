use crate::{WipeError, WipeResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::process::Command;

#[derive(Debug, Deserialize)]
struct LsblkOutput {
    #[serde(default)]
    blockdevices: Vec<BlockDevice>,
}

/// One block device as reported by lsblk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDevice {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub size: String,
    #[serde(rename = "rota", default)]
    pub rotational: bool,
}

/// Enumerates candidate whole-disk devices via lsblk. Used by the listing
/// mode only; the erase pipeline takes its target straight from the caller.
pub fn discover() -> WipeResult<Vec<BlockDevice>> {
    // -J for JSON output, -o for the columns we want
    let output = Command::new("lsblk")
        .args(["-J", "-o", "NAME,MODEL,SERIAL,TYPE,SIZE,ROTA"])
        .output()
        .map_err(|e| WipeError::Enumeration(format!("failed to run lsblk: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WipeError::Enumeration(format!(
            "lsblk failed: {}",
            stderr.trim()
        )));
    }

    parse_lsblk(&output.stdout)
}

/// Parses lsblk JSON and filters out partitions and virtual devices; only
/// whole "disk" entries are erase candidates.
pub(crate) fn parse_lsblk(raw: &[u8]) -> WipeResult<Vec<BlockDevice>> {
    let parsed: LsblkOutput = serde_json::from_slice(raw).map_err(|e| {
        WipeError::Enumeration(format!(
            "failed to parse lsblk JSON: {}. Raw: {}",
            e,
            String::from_utf8_lossy(raw)
        ))
    })?;

    let disks: Vec<BlockDevice> = parsed
        .blockdevices
        .into_iter()
        .filter(|dev| dev.device_type == "disk")
        .collect();

    if disks.is_empty() {
        warn!("lsblk found no devices of type 'disk'");
    }

    Ok(disks)
}
