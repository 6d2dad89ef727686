//! Scripted command runner so pipeline scenarios can run without real
//! hardware or the external erase tools.

use std::cell::RefCell;
use std::io;
use veriwipe::wipe::{CommandRunner, ToolOutput};

pub struct ScriptedRunner {
    response: ToolOutput,
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
    pub syncs: RefCell<u32>,
}

impl ScriptedRunner {
    pub fn succeeding(combined: &str) -> Self {
        Self::new(ToolOutput {
            status: Some(0),
            combined: combined.to_string(),
            success: true,
        })
    }

    pub fn failing(code: i32, combined: &str) -> Self {
        Self::new(ToolOutput {
            status: Some(code),
            combined: combined.to_string(),
            success: false,
        })
    }

    fn new(response: ToolOutput) -> Self {
        Self {
            response,
            calls: RefCell::new(Vec::new()),
            syncs: RefCell::new(0),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<ToolOutput> {
        self.calls.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        Ok(self.response.clone())
    }

    fn sync(&self) {
        *self.syncs.borrow_mut() += 1;
    }
}
