//! Compose draft.

use parentline_api::LocalFile;

use crate::engine::DEFAULT_ATTACHMENT_CAP;
use crate::error::DraftError;

/// Text and files being composed for the open conversation.
#[derive(Debug, Clone)]
pub struct ComposeDraft {
    /// Message text as typed.
    pub content: String,
    attachments: Vec<LocalFile>,
    cap: usize,
}

impl Default for ComposeDraft {
    fn default() -> Self {
        Self::new(DEFAULT_ATTACHMENT_CAP)
    }
}

impl ComposeDraft {
    /// Creates an empty draft accepting at most `cap` attachments.
    #[must_use]
    pub const fn new(cap: usize) -> Self {
        Self {
            content: String::new(),
            attachments: Vec::new(),
            cap,
        }
    }

    /// Returns the pending attachments.
    #[must_use]
    pub fn attachments(&self) -> &[LocalFile] {
        &self.attachments
    }

    /// Returns the attachment cap.
    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Adds a file.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::AttachmentLimit`] if the cap is reached.
    pub fn attach(&mut self, file: LocalFile) -> Result<(), DraftError> {
        if self.attachments.len() >= self.cap {
            return Err(DraftError::AttachmentLimit { cap: self.cap });
        }
        self.attachments.push(file);
        Ok(())
    }

    /// Removes the file at `index`; out-of-range indexes are ignored.
    pub fn remove_attachment(&mut self, index: usize) -> Option<LocalFile> {
        (index < self.attachments.len()).then(|| self.attachments.remove(index))
    }

    /// Returns true if there is nothing to send.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty() && self.attachments.is_empty()
    }

    /// Empties text and attachments.
    pub fn clear(&mut self) {
        self.content.clear();
        self.attachments.clear();
    }
}
