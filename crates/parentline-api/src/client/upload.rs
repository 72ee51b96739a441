//! Upload service endpoint.

use reqwest::multipart::{Form, Part};

use super::Client;
use crate::error::{Error, Result};
use crate::file::LocalFile;
use crate::model::Attachment;

/// Multipart field name of each uploaded file.
const FILE_FIELD: &str = "files";

impl Client {
    /// Uploads all files as one multipart batch.
    ///
    /// Returns one attachment per file, in input order. A response with a
    /// different number of attachments is an error; no partial list is
    /// ever returned.
    pub(super) async fn upload_files(&self, files: &[LocalFile]) -> Result<Vec<Attachment>> {
        let url = self.url("/uploads", None)?;

        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.data.to_vec())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part(FILE_FIELD, part);
        }

        let attachments: Vec<Attachment> = self
            .execute(self.http.post(url.clone()).multipart(form), &url)
            .await?;

        if attachments.len() != files.len() {
            return Err(Error::InvalidResponse(format!(
                "upload returned {} attachments for {} files",
                attachments.len(),
                files.len()
            )));
        }

        tracing::debug!(count = attachments.len(), "uploaded attachments");
        Ok(attachments)
    }
}
