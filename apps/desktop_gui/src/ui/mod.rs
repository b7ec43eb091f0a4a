//! UI layer for the converter: app shell, drop zone, and result panel.

pub mod app;

pub use app::DesktopGuiApp;
