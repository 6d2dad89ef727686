use crate::wipe::{CommandRunner, ToolOutput};
use crate::{erase_and_certify, WipeError};

/// Runner that fails the test if any process would have been launched.
struct NoLaunchRunner;

impl CommandRunner for NoLaunchRunner {
    fn run(&self, program: &str, _args: &[&str]) -> std::io::Result<ToolOutput> {
        panic!("no process should be launched, attempted: {}", program);
    }

    fn sync(&self) {
        panic!("no flush should happen without an erase");
    }
}

#[test]
fn pipeline_rejects_unsupported_device_before_any_process() {
    let err = erase_and_certify("/dev/loop0", "linux", &NoLaunchRunner).unwrap_err();
    match err {
        WipeError::UnsupportedDevice(device) => assert_eq!(device, "/dev/loop0"),
        other => panic!("expected UnsupportedDevice, got: {}", other),
    }
}

#[test]
fn erase_tool_error_carries_exit_detail_and_output() {
    let err = WipeError::EraseToolFailed {
        tool: "hdparm".to_string(),
        status: "exit status 1".to_string(),
        output: "device busy".to_string(),
    };
    let message = err.to_string();
    assert!(message.contains("hdparm"));
    assert!(message.contains("exit status 1"));
    assert!(message.contains("device busy"));
}

#[test]
fn unsupported_error_names_the_device() {
    let err = WipeError::UnsupportedDevice("/dev/mmcblk0".to_string());
    assert!(err.to_string().contains("/dev/mmcblk0"));
}
