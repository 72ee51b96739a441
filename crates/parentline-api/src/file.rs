//! Pending local files awaiting upload.

use std::path::Path;

use bytes::Bytes;

use crate::Result;

/// A local file selected for upload but not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// File name sent to the upload service.
    pub name: String,
    /// MIME type sent with the file part.
    pub mime_type: String,
    /// File contents.
    pub data: Bytes,
}

impl LocalFile {
    /// Creates a file from in-memory contents.
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, mime_type, data))
    }

    /// Returns the size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_path_guesses_mime() {
        let dir = std::env::temp_dir().join(format!("parentline-file-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("report.pdf");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let file = LocalFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.len(), 8);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_empty_file() {
        let file = LocalFile::new("blank.txt", "text/plain", Vec::<u8>::new());
        assert!(file.is_empty());
        assert!(!LocalFile::new("a.txt", "text/plain", b"a".to_vec()).is_empty());
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = LocalFile::from_path("/nonexistent/parentline/none.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
