use talkrix_core::models::Agent;
use talkrix_core::models::Tool;

use crate::client::segment;
use crate::client::ApiClient;
use crate::client::ApiResult;

impl ApiClient {
    pub async fn list_agents(&self) -> ApiResult<Vec<Agent>> {
        self.get("/agents").await
    }

    pub async fn get_agent(&self, id: &str) -> ApiResult<Agent> {
        self.get(&format!("/agents/{}", segment(id))).await
    }

    pub async fn create_agent(&self, agent: &Agent) -> ApiResult<Agent> {
        self.post("/agents", agent).await
    }

    pub async fn update_agent(&self, id: &str, agent: &Agent) -> ApiResult<Agent> {
        self.patch(&format!("/agents/{}", segment(id)), agent).await
    }

    pub async fn delete_agent(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/agents/{}", segment(id))).await
    }

    /// User-defined tools only; the built-in catalogue never comes from the
    /// server.
    pub async fn list_tools(&self) -> ApiResult<Vec<Tool>> {
        self.get("/tools").await
    }

    pub async fn get_tool(&self, id: &str) -> ApiResult<Tool> {
        self.get(&format!("/tools/{}", segment(id))).await
    }

    pub async fn create_tool(&self, tool: &Tool) -> ApiResult<Tool> {
        self.post("/tools", tool).await
    }

    pub async fn update_tool(&self, id: &str, tool: &Tool) -> ApiResult<Tool> {
        self.patch(&format!("/tools/{}", segment(id)), tool).await
    }

    pub async fn delete_tool(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/tools/{}", segment(id))).await
    }
}
