use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Extensions offered by the file picker filter. Advisory only: the
/// controller forwards whatever file the platform hands back.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "png", "jpg", "jpeg", "gif", "docx", "pptx", "xlsx",
];

pub const SUPPORTED_FORMATS_HINT: &str = "Supported: PDF, Images, Word, PowerPoint, Excel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A user-chosen document plus the name shown in the UI and sent as the
/// multipart filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    pub fn has_accepted_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_selection_uses_file_name_for_display() {
        let file = SelectedFile::from_path("/tmp/docs/report.pdf");
        assert_eq!(file.name, "report.pdf");
        assert_eq!(
            file.source,
            FileSource::Path(PathBuf::from("/tmp/docs/report.pdf"))
        );
    }

    #[test]
    fn extension_check_is_case_insensitive_and_advisory() {
        assert!(SelectedFile::from_path("SCAN.JPG").has_accepted_extension());
        assert!(!SelectedFile::from_path("bad.xyz").has_accepted_extension());
        assert!(!SelectedFile::from_bytes("README", b"plain".to_vec()).has_accepted_extension());
    }
}
