//! UI/backend events, drag events, and error modeling for the converter controller.

use shared::{domain::SelectedFile, protocol::ConversionResult};

pub enum UiEvent {
    Info(String),
    ServiceStatus { reachable: bool, message: String },
    ConversionFinished(ConversionResult),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEventKind {
    Enter,
    Over,
    Leave,
    Drop,
}

/// One event of the drag-and-drop quartet. Only `Drop` carries a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    pub kind: DragEventKind,
    pub file: Option<SelectedFile>,
}

impl DragEvent {
    pub fn enter() -> Self {
        Self {
            kind: DragEventKind::Enter,
            file: None,
        }
    }

    pub fn over() -> Self {
        Self {
            kind: DragEventKind::Over,
            file: None,
        }
    }

    pub fn leave() -> Self {
        Self {
            kind: DragEventKind::Leave,
            file: None,
        }
    }

    pub fn drop(file: Option<SelectedFile>) -> Self {
        Self {
            kind: DragEventKind::Drop,
            file,
        }
    }
}

/// Derives this frame's drag event from the platform's hover/drop lists.
///
/// `dropped` is `Some` whenever the platform reported a drop this frame, even
/// if the dropped item could not be turned into a file.
pub fn drag_event_for_frame(
    drag_active: bool,
    hovering: bool,
    dropped: Option<Option<SelectedFile>>,
) -> Option<DragEvent> {
    if let Some(file) = dropped {
        return Some(DragEvent::drop(file));
    }
    match (hovering, drag_active) {
        (true, false) => Some(DragEvent::enter()),
        (true, true) => Some(DragEvent::over()),
        (false, true) => Some(DragEvent::leave()),
        (false, false) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    HealthCheck,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
