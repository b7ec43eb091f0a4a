//! Backend commands queued from UI to backend worker.

use shared::domain::SelectedFile;

pub enum BackendCommand {
    Convert { file: SelectedFile },
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Convert { .. } => "convert",
            BackendCommand::CheckHealth => "check_health",
        }
    }
}
