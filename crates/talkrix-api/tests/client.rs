use mockito::Matcher;
use mockito::Server;
use pretty_assertions::assert_eq;
use talkrix_api::ApiClient;
use talkrix_api::ApiError;
use talkrix_api::CallQuery;
use talkrix_api::DocumentUpload;
use talkrix_api::UploadStage;
use talkrix_core::models::CallStatus;
use talkrix_core::models::CallType;
use talkrix_core::models::StatsPeriod;

const TOKEN: &str = "test-token";

fn client(server: &Server) -> ApiClient {
    ApiClient::new(server.url()).with_token(TOKEN)
}

#[tokio::test]
async fn login_posts_credentials_without_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(serde_json::json!({
            "email": "ada@example.com",
            "password": "hunter22"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accessToken":"jwt","user":{"name":"Ada","email":"ada@example.com","isFirstLogin":true}}"#)
        .create_async()
        .await;

    let auth = ApiClient::new(server.url())
        .login("ada@example.com", "hunter22")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(auth.access_token, "jwt");
    assert!(auth.user.is_first_login);
}

#[tokio::test]
async fn rejected_login_reports_backend_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"message":"Invalid email or password"}"#)
        .create_async()
        .await;

    let err = ApiClient::new(server.url())
        .login("ada@example.com", "wrong-pass")
        .await
        .unwrap_err();

    assert!(!err.is_unauthorized());
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn protected_calls_need_a_token() {
    let server = Server::new_async().await;
    let err = ApiClient::new(server.url()).list_agents().await.unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
}

#[tokio::test]
async fn list_agents_sends_bearer_and_accepts_data_envelope() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/agents")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"_id":"a1","name":"Support","systemPrompt":"Be kind"}]}"#)
        .create_async()
        .await;

    let agents = client(&server).list_agents().await.unwrap();

    mock.assert_async().await;
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].id, "a1");
    assert_eq!(agents[0].system_prompt, "Be kind");
}

#[tokio::test]
async fn unauthorized_response_is_typed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/campaigns")
        .with_status(401)
        .with_body(r#"{"message":"Unauthorized"}"#)
        .create_async()
        .await;

    let err = client(&server).list_campaigns().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn server_errors_carry_the_backend_message() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/agents/a1")
        .with_status(409)
        .with_body(r#"{"message":"Agent is used by a running campaign"}"#)
        .create_async()
        .await;

    let err = client(&server).delete_agent("a1").await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Agent is used by a running campaign");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn dashboard_stats_pass_the_period() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/dashboard")
        .match_query(Matcher::UrlEncoded("period".into(), "week".into()))
        .with_status(200)
        .with_body(r#"{"totalCalls":42,"activeAgents":3}"#)
        .create_async()
        .await;

    let stats = client(&server)
        .dashboard_stats(StatsPeriod::Week)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(stats.total_calls, 42);
    assert_eq!(stats.active_agents, 3);
}

#[tokio::test]
async fn call_history_sends_paging_and_filters() {
    let mut server = Server::new_async().await;
    let calls = server
        .mock("GET", "/calls")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "20".into()),
            Matcher::UrlEncoded("status".into(), "no_answer".into()),
            Matcher::UrlEncoded("type".into(), "outbound".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"calls":[{"id":"c1","status":"no_answer","type":"outbound","durationSeconds":0}],"total":21}"#,
        )
        .create_async()
        .await;
    let stats = server
        .mock("GET", "/calls/stats")
        .with_status(200)
        .with_body(r#"{"totalCalls":21,"failedCalls":4}"#)
        .create_async()
        .await;

    let mut query = CallQuery::page(2, 20);
    query.status = Some(CallStatus::NoAnswer);
    query.call_type = Some(CallType::Outbound);
    let (page, call_stats) = client(&server).calls_with_stats(&query).await;

    calls.assert_async().await;
    stats.assert_async().await;
    let page = page.unwrap();
    assert_eq!(page.total, 21);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 20);
    assert_eq!(page.calls[0].status, CallStatus::NoAnswer);
    assert_eq!(call_stats.unwrap().failed_calls, 4);
}

#[tokio::test]
async fn contacts_upload_is_multipart() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/campaigns/cmp1/contacts/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(Matcher::Regex("name=\"file\"".to_string()))
        .with_status(201)
        .with_body(r#"{"imported":2,"skipped":1}"#)
        .create_async()
        .await;

    let result = client(&server)
        .upload_contacts("cmp1", "contacts.csv", b"name,phone\nA,+1\n".to_vec())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.imported, 2);
    assert_eq!(result.skipped, 1);
}

#[tokio::test]
async fn document_upload_runs_three_steps_in_order() {
    let mut server = Server::new_async().await;
    let presigned = format!("{}/bucket/doc-9", server.url());
    let url = server
        .mock("POST", "/corpora/kb1/upload-url")
        .match_body(Matcher::Json(serde_json::json!({
            "fileName": "faq.md",
            "mimeType": "text/markdown"
        })))
        .with_status(200)
        .with_body(
            serde_json::json!({"presignedUrl": presigned, "documentId": "doc-9"}).to_string(),
        )
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/bucket/doc-9")
        .match_header("authorization", Matcher::Missing)
        .match_header("content-type", "text/markdown")
        .match_body("# FAQ")
        .with_status(200)
        .create_async()
        .await;
    let register = server
        .mock("POST", "/corpora/kb1/documents")
        .match_body(Matcher::Json(serde_json::json!({
            "documentId": "doc-9",
            "fileName": "faq.md"
        })))
        .with_status(201)
        .with_body(r#"{"documentId":"doc-9","fileName":"faq.md"}"#)
        .create_async()
        .await;

    let document = client(&server)
        .upload_document(
            "kb1",
            DocumentUpload {
                file_name: "faq.md".to_string(),
                mime_type: "text/markdown".to_string(),
                source_id: None,
                contents: b"# FAQ".to_vec(),
            },
        )
        .await
        .unwrap();

    url.assert_async().await;
    put.assert_async().await;
    register.assert_async().await;
    assert_eq!(document.id, "doc-9");
}

#[tokio::test]
async fn failed_put_skips_registration() {
    let mut server = Server::new_async().await;
    let presigned = format!("{}/bucket/doc-1", server.url());
    server
        .mock("POST", "/corpora/kb1/upload-url")
        .with_status(200)
        .with_body(
            serde_json::json!({"presignedUrl": presigned, "documentId": "doc-1"}).to_string(),
        )
        .create_async()
        .await;
    server
        .mock("PUT", "/bucket/doc-1")
        .with_status(403)
        .create_async()
        .await;
    let register = server
        .mock("POST", "/corpora/kb1/documents")
        .expect(0)
        .create_async()
        .await;

    let err = client(&server)
        .upload_document(
            "kb1",
            DocumentUpload {
                file_name: "a.txt".to_string(),
                mime_type: "text/plain".to_string(),
                source_id: None,
                contents: b"hello".to_vec(),
            },
        )
        .await
        .unwrap_err();

    register.assert_async().await;
    assert_eq!(err.stage, UploadStage::PutBytes);
}

#[tokio::test]
async fn rejected_presigned_url_keeps_the_session() {
    let mut server = Server::new_async().await;
    let presigned = format!("{}/bucket/doc-2", server.url());
    server
        .mock("POST", "/corpora/kb1/upload-url")
        .with_status(200)
        .with_body(
            serde_json::json!({"presignedUrl": presigned, "documentId": "doc-2"}).to_string(),
        )
        .create_async()
        .await;
    server
        .mock("PUT", "/bucket/doc-2")
        .with_status(401)
        .with_body("Request has expired")
        .create_async()
        .await;

    let err = client(&server)
        .upload_document(
            "kb1",
            DocumentUpload {
                file_name: "a.txt".to_string(),
                mime_type: "text/plain".to_string(),
                source_id: None,
                contents: b"hello".to_vec(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.stage, UploadStage::PutBytes);
    assert!(!err.source.is_unauthorized());
}

#[tokio::test]
async fn corpus_query_accepts_results_object() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/corpora/kb1/query")
        .match_body(Matcher::Json(serde_json::json!({
            "query": "refund policy",
            "maxResults": 3
        })))
        .with_status(200)
        .with_body(r#"{"results":[{"content":"Refunds within 30 days","score":0.91}]}"#)
        .create_async()
        .await;

    let chunks = client(&server)
        .query_corpus("kb1", "refund policy", 3)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "Refunds within 30 days");
}

#[tokio::test]
async fn settings_are_fetched_together() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/settings")
        .with_status(200)
        .with_body(r#"{"companyName":"Acme","timezone":"UTC"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/settings/telephony")
        .with_status(200)
        .with_body(r#"{"provider":"twilio","phoneNumbers":["+15550100"]}"#)
        .create_async()
        .await;

    let (general, telephony) = client(&server).all_settings().await.unwrap();
    assert_eq!(general.company_name.as_deref(), Some("Acme"));
    assert_eq!(telephony.phone_numbers, vec!["+15550100".to_string()]);
}
