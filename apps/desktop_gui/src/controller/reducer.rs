//! Conversion UI state and its event-driven transitions.

use shared::{
    domain::{SelectedFile, SUPPORTED_FORMATS_HINT},
    protocol::ConversionResult,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{DragEvent, DragEventKind};

/// What the drag handler did with an event. Platform default handling
/// (opening the dropped file elsewhere) is always suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDisposition {
    pub suppress_default: bool,
    pub file_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    Empty,
    Success { filename: &'a str, text: &'a str },
    Failure { message: &'a str },
}

/// Per-session controller state. `is_loading` is only true between a
/// dispatched conversion and its recorded result.
#[derive(Debug, Default)]
pub struct ConversionUiState {
    selected_file: Option<SelectedFile>,
    is_loading: bool,
    result: Option<ConversionResult>,
    drag_active: bool,
}

impl ConversionUiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Picker entry point. `None` means the dialog was cancelled.
    pub fn select_file(&mut self, file: Option<SelectedFile>) -> bool {
        let Some(file) = file else {
            return false;
        };
        tracing::debug!(filename = %file.name, "file selected");
        self.selected_file = Some(file);
        self.result = None;
        true
    }

    pub fn handle_drag(&mut self, event: DragEvent) -> DragDisposition {
        let file_selected = match event.kind {
            DragEventKind::Enter | DragEventKind::Over => {
                self.drag_active = true;
                false
            }
            DragEventKind::Leave => {
                self.drag_active = false;
                false
            }
            DragEventKind::Drop => {
                self.drag_active = false;
                self.select_file(event.file)
            }
        };
        DragDisposition {
            suppress_default: true,
            file_selected,
        }
    }

    /// Convert control is shown only once a file has been chosen.
    pub fn show_convert_control(&self) -> bool {
        self.selected_file.is_some()
    }

    pub fn can_convert(&self) -> bool {
        self.selected_file.is_some() && !self.is_loading
    }

    /// Starts a conversion of the selected file, returning the single command
    /// to queue. Returns `None` with no file or while a request is in flight.
    pub fn begin_conversion(&mut self) -> Option<BackendCommand> {
        if self.is_loading {
            return None;
        }
        let file = self.selected_file.clone()?;
        self.is_loading = true;
        Some(BackendCommand::Convert { file })
    }

    /// Records the outcome of the outstanding request, replacing any previous
    /// result, and ends the loading bracket.
    pub fn finish_conversion(&mut self, result: ConversionResult) {
        self.result = Some(result);
        self.is_loading = false;
    }

    pub fn result_view(&self) -> ResultView<'_> {
        match &self.result {
            None => ResultView::Empty,
            Some(result) if result.success => ResultView::Success {
                filename: &result.filename,
                text: &result.text,
            },
            Some(result) => ResultView::Failure {
                message: result.error_message(),
            },
        }
    }

    /// Text for the copy action; `None` when there is nothing to copy.
    pub fn copy_text(&self) -> Option<&str> {
        match self.result_view() {
            ResultView::Success { text, .. } if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn convert_button_label(&self) -> &'static str {
        if self.is_loading {
            "Converting..."
        } else {
            "Convert to Text"
        }
    }

    pub fn drop_zone_lines(&self) -> (String, &'static str) {
        match &self.selected_file {
            Some(file) => (
                format!("Selected: {}", file.name),
                "Click to select a different file",
            ),
            None => (
                "Drop a file here or click to select".to_string(),
                SUPPORTED_FORMATS_HINT,
            ),
        }
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
