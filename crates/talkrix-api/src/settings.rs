use talkrix_core::models::ApiKey;
use talkrix_core::models::DashboardStats;
use talkrix_core::models::GeneralSettings;
use talkrix_core::models::StatsPeriod;
use talkrix_core::models::TelephonySettings;

use crate::client::ApiClient;
use crate::client::ApiResult;

impl ApiClient {
    pub async fn dashboard_stats(&self, period: StatsPeriod) -> ApiResult<DashboardStats> {
        self.get_query("/dashboard", &[("period", period.as_str())])
            .await
    }

    pub async fn general_settings(&self) -> ApiResult<GeneralSettings> {
        self.get("/settings").await
    }

    pub async fn update_general_settings(&self, settings: &GeneralSettings) -> ApiResult<GeneralSettings> {
        self.patch("/settings", settings).await
    }

    pub async fn telephony_settings(&self) -> ApiResult<TelephonySettings> {
        self.get("/settings/telephony").await
    }

    pub async fn update_telephony_settings(
        &self,
        settings: &TelephonySettings,
    ) -> ApiResult<TelephonySettings> {
        self.patch("/settings/telephony", settings).await
    }

    /// General and telephony settings, fetched concurrently.
    pub async fn all_settings(&self) -> ApiResult<(GeneralSettings, TelephonySettings)> {
        let (general, telephony) = tokio::join!(self.general_settings(), self.telephony_settings());
        Ok((general?, telephony?))
    }

    pub async fn api_key(&self) -> ApiResult<ApiKey> {
        self.get("/settings/api-key").await
    }

    pub async fn regenerate_api_key(&self) -> ApiResult<ApiKey> {
        self.post("/settings/api-key/regenerate", &serde_json::json!({}))
            .await
    }
}
