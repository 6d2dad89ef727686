use crate::{DeviceClass, EraseOutcome, WipeError, WipeResult};
use chrono::Utc;
use log::info;
use nix::unistd::{setpgid, Pid};
use std::os::unix::process::CommandExt;
use std::process::Command;

/// Classification priority table, evaluated top to bottom. The order is a
/// contract: an identifier containing both patterns resolves to the first
/// match, so "nvme" always wins over "sd".
const CLASS_PRIORITY: &[(&str, DeviceClass)] = &[
    ("nvme", DeviceClass::NVMe),
    ("sd", DeviceClass::AtaScsi),
];

/// Maps a device identifier to its erase-method class. Total: empty or
/// malformed identifiers come back `Unsupported`, never an error. Only
/// dispatch may fail.
pub fn classify(device: &str) -> DeviceClass {
    CLASS_PRIORITY
        .iter()
        .find(|(pattern, _)| device.contains(pattern))
        .map(|&(_, class)| class)
        .unwrap_or(DeviceClass::Unsupported)
}

/// Captured result of one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: Option<i32>,
    pub combined: String,
    pub success: bool,
}

/// Seam over external command execution so the dispatcher can be tested
/// without touching real hardware.
pub trait CommandRunner {
    /// Run the tool to completion, capturing combined stdout/stderr.
    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<ToolOutput>;

    /// Flush pending writes to storage at the OS level.
    fn sync(&self);
}

/// Production runner: spawns the erase tool in its own process group and
/// blocks until it exits.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<ToolOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        // Give the child its own process group: a cancellation signal sent
        // to the orchestrator's group does not also hit the child, and the
        // child tree can be signalled as a unit.
        unsafe {
            cmd.pre_exec(|| {
                setpgid(Pid::from_raw(0), Pid::from_raw(0)).map_err(std::io::Error::from)
            });
        }

        let output = cmd.output()?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ToolOutput {
            status: output.status.code(),
            combined,
            success: output.status.success(),
        })
    }

    fn sync(&self) {
        nix::unistd::sync();
    }
}

/// Fixed, non-configurable argument set for each erase method. `None` for
/// classes with no external tool.
pub(crate) fn erase_command(class: DeviceClass, device: &str) -> Option<(&'static str, Vec<String>)> {
    match class {
        // Format NVM with a single-pass cryptographic erase (SES=1)
        DeviceClass::NVMe => Some((
            "nvme",
            vec!["format".into(), "--ses=1".into(), device.into()],
        )),
        // ATA enhanced security erase with the conventional master password
        DeviceClass::AtaScsi => Some((
            "hdparm",
            vec![
                "--user-master".into(),
                "u".into(),
                "--security-erase-enhanced".into(),
                "p".into(),
                device.into(),
            ],
        )),
        DeviceClass::Unsupported => None,
    }
}

/// Invokes the class-appropriate external erase tool and reports the
/// outcome. Exactly one invocation per call: a destructive erase is never
/// re-issued, since a partial erase followed by a blind retry can leave
/// the device in an undefined state. On success a synchronous storage
/// flush runs before this returns, and the reported window includes it.
///
/// Blocks with no deadline; a hung erase tool blocks the pipeline.
pub fn dispatch(
    device: &str,
    class: DeviceClass,
    runner: &dyn CommandRunner,
) -> WipeResult<EraseOutcome> {
    let (tool, args) = erase_command(class, device)
        .ok_or_else(|| WipeError::UnsupportedDevice(device.to_string()))?;

    info!("Erasing {} with {} ({:?})", device, tool, class);

    let started_at = Utc::now();

    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let output = runner
        .run(tool, &arg_refs)
        .map_err(|e| WipeError::EraseToolFailed {
            tool: tool.to_string(),
            status: "failed to launch".to_string(),
            output: e.to_string(),
        })?;

    if !output.success {
        let status = match output.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        return Err(WipeError::EraseToolFailed {
            tool: tool.to_string(),
            status,
            output: output.combined,
        });
    }

    // Make the erase durable at the OS level before certificate issuance
    runner.sync();

    let finished_at = Utc::now();
    info!("Erase of {} complete", device);

    Ok(EraseOutcome {
        class,
        success: true,
        tool_output: output.combined,
        started_at,
        finished_at,
    })
}
