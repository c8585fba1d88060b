use serde::Serialize;
use talkrix_core::models::CallPage;
use talkrix_core::models::CallStats;
use talkrix_core::models::CallStatus;
use talkrix_core::models::CallType;

use crate::client::ApiClient;
use crate::client::ApiResult;

/// Server-side paging and filters for the call history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallQuery {
    pub page: usize,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CallStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub call_type: Option<CallType>,
}

impl CallQuery {
    pub fn page(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            status: None,
            call_type: None,
        }
    }
}

impl ApiClient {
    pub async fn list_calls(&self, query: &CallQuery) -> ApiResult<CallPage> {
        let mut page: CallPage = self.get_query("/calls", query).await?;
        if page.page == 0 {
            page.page = query.page;
        }
        if page.limit == 0 {
            page.limit = query.limit;
        }
        Ok(page)
    }

    pub async fn call_stats(&self) -> ApiResult<CallStats> {
        self.get("/calls/stats").await
    }

    /// One page of history plus the aggregate stats, fetched together.
    pub async fn calls_with_stats(&self, query: &CallQuery) -> (ApiResult<CallPage>, ApiResult<CallStats>) {
        tokio::join!(self.list_calls(query), self.call_stats())
    }
}
