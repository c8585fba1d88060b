use reqwest::multipart::Form;
use reqwest::multipart::Part;
use talkrix_core::models::Campaign;
use talkrix_core::models::CampaignStats;
use talkrix_core::models::Contact;
use talkrix_core::models::ContactUploadResult;

use crate::client::segment;
use crate::client::ApiClient;
use crate::client::ApiResult;

const CSV_MIME: &str = "text/csv";

impl ApiClient {
    pub async fn list_campaigns(&self) -> ApiResult<Vec<Campaign>> {
        self.get("/campaigns").await
    }

    pub async fn get_campaign(&self, id: &str) -> ApiResult<Campaign> {
        self.get(&format!("/campaigns/{}", segment(id))).await
    }

    pub async fn campaign_stats(&self, id: &str) -> ApiResult<CampaignStats> {
        self.get(&format!("/campaigns/{}/stats", segment(id))).await
    }

    /// Detail page load: the campaign and its stats are independent and
    /// fetched together.
    pub async fn campaign_detail(&self, id: &str) -> ApiResult<(Campaign, CampaignStats)> {
        let (campaign, stats) = tokio::join!(self.get_campaign(id), self.campaign_stats(id));
        Ok((campaign?, stats?))
    }

    pub async fn create_campaign(&self, campaign: &Campaign) -> ApiResult<Campaign> {
        self.post("/campaigns", campaign).await
    }

    pub async fn update_campaign(&self, id: &str, campaign: &Campaign) -> ApiResult<Campaign> {
        self.patch(&format!("/campaigns/{}", segment(id)), campaign)
            .await
    }

    pub async fn delete_campaign(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/campaigns/{}", segment(id))).await
    }

    pub async fn list_contacts(&self, campaign_id: &str) -> ApiResult<Vec<Contact>> {
        self.get(&format!("/campaigns/{}/contacts", segment(campaign_id)))
            .await
    }

    pub async fn add_contact(&self, campaign_id: &str, contact: &Contact) -> ApiResult<Contact> {
        self.post(
            &format!("/campaigns/{}/contacts", segment(campaign_id)),
            contact,
        )
        .await
    }

    pub async fn update_contact(
        &self,
        campaign_id: &str,
        contact_id: &str,
        contact: &Contact,
    ) -> ApiResult<Contact> {
        self.patch(
            &format!(
                "/campaigns/{}/contacts/{}",
                segment(campaign_id),
                segment(contact_id)
            ),
            contact,
        )
        .await
    }

    pub async fn delete_contact(&self, campaign_id: &str, contact_id: &str) -> ApiResult<()> {
        self.delete(&format!(
            "/campaigns/{}/contacts/{}",
            segment(campaign_id),
            segment(contact_id)
        ))
        .await
    }

    /// Bulk import from a CSV file, sent as the multipart field `file`.
    pub async fn upload_contacts(
        &self,
        campaign_id: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> ApiResult<ContactUploadResult> {
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str(CSV_MIME)?;
        let form = Form::new().part("file", part);
        self.post_multipart(
            &format!("/campaigns/{}/contacts/upload", segment(campaign_id)),
            form,
        )
        .await
    }
}
