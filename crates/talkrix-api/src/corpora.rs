use serde::Serialize;
use talkrix_core::models::Corpus;
use talkrix_core::models::CorpusDocument;
use talkrix_core::models::CorpusSource;
use talkrix_core::models::QueryChunk;
use talkrix_core::models::UploadTarget;

use crate::client::segment;
use crate::client::ApiClient;
use crate::client::ApiResult;

pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlRequest<'a> {
    file_name: &'a str,
    mime_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterDocumentRequest<'a> {
    document_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_id: Option<&'a str>,
    file_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum QueryResponse {
    Results { results: Vec<QueryChunk> },
    Chunks(Vec<QueryChunk>),
}

impl ApiClient {
    pub async fn list_corpora(&self) -> ApiResult<Vec<Corpus>> {
        self.get("/corpora").await
    }

    pub async fn get_corpus(&self, id: &str) -> ApiResult<Corpus> {
        self.get(&format!("/corpora/{}", segment(id))).await
    }

    pub async fn create_corpus(&self, corpus: &Corpus) -> ApiResult<Corpus> {
        self.post("/corpora", corpus).await
    }

    pub async fn update_corpus(&self, id: &str, corpus: &Corpus) -> ApiResult<Corpus> {
        self.patch(&format!("/corpora/{}", segment(id)), corpus).await
    }

    pub async fn delete_corpus(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/corpora/{}", segment(id))).await
    }

    pub async fn list_sources(&self, corpus_id: &str) -> ApiResult<Vec<CorpusSource>> {
        self.get(&format!("/corpora/{}/sources", segment(corpus_id)))
            .await
    }

    pub async fn create_source(&self, corpus_id: &str, source: &CorpusSource) -> ApiResult<CorpusSource> {
        self.post(&format!("/corpora/{}/sources", segment(corpus_id)), source)
            .await
    }

    pub async fn delete_source(&self, corpus_id: &str, source_id: &str) -> ApiResult<()> {
        self.delete(&format!(
            "/corpora/{}/sources/{}",
            segment(corpus_id),
            segment(source_id)
        ))
        .await
    }

    pub async fn list_documents(&self, corpus_id: &str) -> ApiResult<Vec<CorpusDocument>> {
        self.get(&format!("/corpora/{}/documents", segment(corpus_id)))
            .await
    }

    pub async fn delete_document(&self, corpus_id: &str, document_id: &str) -> ApiResult<()> {
        self.delete(&format!(
            "/corpora/{}/documents/{}",
            segment(corpus_id),
            segment(document_id)
        ))
        .await
    }

    pub async fn request_upload_url(
        &self,
        corpus_id: &str,
        file_name: &str,
        mime_type: &str,
    ) -> ApiResult<UploadTarget> {
        self.post(
            &format!("/corpora/{}/upload-url", segment(corpus_id)),
            &UploadUrlRequest {
                file_name,
                mime_type,
            },
        )
        .await
    }

    pub async fn register_document(
        &self,
        corpus_id: &str,
        document_id: &str,
        source_id: Option<&str>,
        file_name: &str,
    ) -> ApiResult<CorpusDocument> {
        self.post(
            &format!("/corpora/{}/documents", segment(corpus_id)),
            &RegisterDocumentRequest {
                document_id,
                source_id,
                file_name,
            },
        )
        .await
    }

    pub async fn query_corpus(
        &self,
        corpus_id: &str,
        query: &str,
        max_results: usize,
    ) -> ApiResult<Vec<QueryChunk>> {
        let response: QueryResponse = self
            .post(
                &format!("/corpora/{}/query", segment(corpus_id)),
                &QueryRequest {
                    query,
                    max_results: max_results.max(1),
                },
            )
            .await?;
        Ok(match response {
            QueryResponse::Results { results } => results,
            QueryResponse::Chunks(chunks) => chunks,
        })
    }
}
