use reqwest::header::CONTENT_TYPE;
use talkrix_core::models::CorpusDocument;

use crate::client::ApiClient;
use crate::client::ApiResult;
use crate::error::ApiError;

/// A file bound for a knowledge base.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub source_id: Option<String>,
    pub contents: Vec<u8>,
}

/// Step the upload flow stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    RequestUrl,
    PutBytes,
    Register,
}

impl UploadStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::RequestUrl => "requesting upload URL",
            Self::PutBytes => "uploading file",
            Self::Register => "registering document",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{} failed: {source}", .stage.label())]
pub struct UploadError {
    pub stage: UploadStage,
    #[source]
    pub source: ApiError,
}

/// Guesses a MIME type from the file extension.
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

impl ApiClient {
    /// Presigned upload: ask for a URL, PUT the bytes there, then register the
    /// document. Each step runs only after the previous one succeeded.
    pub async fn upload_document(
        &self,
        corpus_id: &str,
        upload: DocumentUpload,
    ) -> Result<CorpusDocument, UploadError> {
        let target = self
            .request_upload_url(corpus_id, &upload.file_name, &upload.mime_type)
            .await
            .map_err(|source| UploadError {
                stage: UploadStage::RequestUrl,
                source,
            })?;

        self.put_presigned(&target.presigned_url, &upload.mime_type, upload.contents)
            .await
            .map_err(|source| UploadError {
                stage: UploadStage::PutBytes,
                source,
            })?;
        tracing::info!(
            "[ApiClient] uploaded {} as document {}",
            upload.file_name,
            target.document_id
        );

        self.register_document(
            corpus_id,
            &target.document_id,
            upload.source_id.as_deref(),
            &upload.file_name,
        )
        .await
        .map_err(|source| UploadError {
            stage: UploadStage::Register,
            source,
        })
    }

    /// The presigned URL carries its own credentials; no bearer header.
    async fn put_presigned(&self, url: &str, mime_type: &str, contents: Vec<u8>) -> ApiResult<()> {
        let response = self
            .http()
            .put(url)
            .header(CONTENT_TYPE, mime_type)
            .body(contents)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mime_is_guessed_from_extension() {
        assert_eq!(mime_for("Manual.PDF"), "application/pdf");
        assert_eq!(mime_for("notes.md"), "text/markdown");
        assert_eq!(mime_for("archive"), "application/octet-stream");
    }
}
