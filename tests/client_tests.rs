mod common;

use common::*;
use futures::TryStreamExt;
use serde_json::json;
use whatsapp_webhook_rs::{
    media::UploadMedia,
    message::{
        Button, FlowAction, FlowParameters, Header, Image, InteractiveButtons, InteractiveCtaUrl,
        InteractiveFlow, InteractiveList, ListRow, ListSection, Text,
    },
    Client, Error,
};
use wiremock::{
    matchers::{bearer_token, body_json, body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .api_version("23.0")
        .access_token(ACCESS_TOKEN)
        .phone_number_id(PHONE_ID)
        .build()
        .unwrap()
}

fn sent(message_id: &str) -> serde_json::Value {
    json!({
        "messaging_product": "whatsapp",
        "contacts": [{"input": RECIPIENT_ID, "wa_id": RECIPIENT_ID}],
        "messages": [{"id": message_id}]
    })
}

#[tokio::test]
async fn test_send_text_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/messages")))
        .and(bearer_token(ACCESS_TOKEN))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": RECIPIENT_ID,
            "type": "text",
            "text": {"preview_url": true, "body": "https://example.com"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("wamid.text")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .send_text(RECIPIENT_ID, Text::new("https://example.com").preview_url(true))
        .await
        .unwrap();

    assert_eq!(response.message_id(), Some("wamid.text"));
    assert_eq!(response.contacts[0].wa_id.as_deref(), Some(RECIPIENT_ID));
}

#[tokio::test]
async fn test_send_image_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/messages")))
        .and(body_json(json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": RECIPIENT_ID,
            "type": "image",
            "image": {"id": "133489585902390", "caption": "Hello, world!"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("wamid.image")))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let response = client
        .send_image(RECIPIENT_ID, Image::with_id("133489585902390").caption("Hello, world!"))
        .await
        .unwrap();
    assert_eq!(response.message_id(), Some("wamid.image"));

    // rejected before any request
    let err = client
        .send_image(RECIPIENT_ID, Image::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_send_interactive_buttons() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/messages")))
        .and(body_json(json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": RECIPIENT_ID,
            "type": "interactive",
            "interactive": {
                "type": "button",
                "header": {"type": "text", "text": "Booking"},
                "body": {"text": "Confirm your booking?"},
                "action": {"buttons": [
                    {"type": "reply", "reply": {"id": "confirm", "title": "Confirm"}},
                    {"type": "reply", "reply": {"id": "cancel", "title": "Cancel"}}
                ]}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("wamid.buttons")))
        .mount(&mock_server)
        .await;

    let params = InteractiveButtons::new(
        "Confirm your booking?",
        vec![Button::reply("confirm", "Confirm"), Button::reply("cancel", "Cancel")],
    )
    .header(Header::text("Booking"));

    let response = client(&mock_server)
        .send_interactive_buttons(RECIPIENT_ID, params)
        .await
        .unwrap();
    assert_eq!(response.message_id(), Some("wamid.buttons"));
}

#[tokio::test]
async fn test_send_interactive_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/messages")))
        .and(body_string_contains(r#""type":"list""#))
        .and(body_string_contains(r#""button":"Menu""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("wamid.list")))
        .mount(&mock_server)
        .await;

    let params = InteractiveList::new(
        "What would you like?",
        "Menu",
        vec![ListSection::new(vec![
            ListRow::new("pizza", "Pizza"),
            ListRow::new("pasta", "Pasta").description("Fresh daily"),
        ])
        .title("Mains")],
    );

    let response = client(&mock_server)
        .send_interactive_list(RECIPIENT_ID, params)
        .await
        .unwrap();
    assert_eq!(response.message_id(), Some("wamid.list"));
}

#[tokio::test]
async fn test_send_interactive_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/messages")))
        .and(body_string_contains(r#""name":"flow""#))
        .and(body_string_contains(r#""flow_action":"navigate""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("wamid.flow")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let parameters = FlowParameters::new("token-1", "1234", "Book now", FlowAction::Navigate)
        .navigate_to("WELCOME", None);
    let response = client
        .send_interactive_flow(RECIPIENT_ID, InteractiveFlow::new("Book a table", parameters))
        .await
        .unwrap();
    assert_eq!(response.message_id(), Some("wamid.flow"));

    let missing_id = FlowParameters::new("token-1", "", "Book now", FlowAction::Navigate);
    let err = client
        .send_interactive_flow(RECIPIENT_ID, InteractiveFlow::new("Book a table", missing_id))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("flow_id is required"));
}

#[tokio::test]
async fn test_send_interactive_cta_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/messages")))
        .and(body_string_contains(r#""name":"cta_url""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("wamid.cta")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let response = client
        .send_interactive_cta_url(
            RECIPIENT_ID,
            InteractiveCtaUrl::new("See our deals", "Open", "https://example.com/deals"),
        )
        .await
        .unwrap();
    assert_eq!(response.message_id(), Some("wamid.cta"));

    let err = client
        .send_interactive_cta_url(RECIPIENT_ID, InteractiveCtaUrl::new("See our deals", "Open", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_api_error_is_decoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/messages")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "(#131030) Recipient phone number not in allowed list",
                "type": "OAuthException",
                "code": 131030,
                "error_data": {
                    "messaging_product": "whatsapp",
                    "details": "Recipient phone number not in allowed list"
                },
                "fbtrace_id": "Az8or2yhqkZfEZ-_4Qn_Bam"
            }
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .send_text(RECIPIENT_ID, "hello")
        .await
        .unwrap_err();

    match err {
        Error::Api { status, error } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(error.code, 131030);
            assert_eq!(error.fbtrace_id.as_deref(), Some("Az8or2yhqkZfEZ-_4Qn_Bam"));
            assert_eq!(error.details(), Some("Recipient phone number not in allowed list"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v23.0/42"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).get_media("42").await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedStatus(_)));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(502));
}

#[tokio::test]
async fn test_get_and_download_media() {
    let mock_server = MockServer::start().await;
    let download_url = format!("{}/whatsapp_business/attachments/?mid=42", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/v23.0/42"))
        .and(bearer_token(ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "url": download_url,
            "mime_type": "image/jpeg",
            "sha256": "e3b0c442",
            "file_size": 11,
            "id": "42"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/whatsapp_business/attachments/"))
        .and(bearer_token(ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello image".to_vec()))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let (info, bytes) = client.get_and_download_media_bytes("42").await.unwrap();
    assert_eq!(info.mime_type, "image/jpeg");
    assert_eq!(info.file_size, 11);
    assert_eq!(bytes, b"hello image");

    let chunks: Vec<_> = client.download_media(&download_url).try_collect().await.unwrap();
    assert_eq!(chunks.concat(), b"hello image");

    let (info, stream) = client.get_and_download_media("42").await.unwrap();
    assert_eq!(info.id, "42");
    let chunks: Vec<_> = stream.try_collect().await.unwrap();
    assert_eq!(chunks.concat(), b"hello image");

    let err = client.get_and_download_media("").await.err().unwrap();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_download_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/expired"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Media not found", "type": "OAuthException", "code": 100}
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .download_media_bytes(&format!("{}/expired", mock_server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { .. }));
}

#[tokio::test]
async fn test_upload_media() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v23.0/{PHONE_ID}/media")))
        .and(bearer_token(ACCESS_TOKEN))
        .and(body_string_contains(r#"name="messaging_product""#))
        .and(body_string_contains(r#"filename="banner.png""#))
        .and(body_string_contains("image/png"))
        .and(body_string_contains("0xf434rj4n5f4r0irj44xf2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "133489585902390"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let upload = UploadMedia::new(b"0xf434rj4n5f4r0irj44xf2".to_vec(), "banner.png", "image/png");
    let response = client.upload_media(upload).await.unwrap();
    assert_eq!(response.id, "133489585902390");

    let unsupported = UploadMedia::new(b"GIF89a".to_vec(), "a.gif", "image/gif");
    assert!(matches!(
        client.upload_media(unsupported).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn test_upload_media_from_missing_file() {
    let mock_server = MockServer::start().await;
    let err = client(&mock_server)
        .upload_media_from_file("/definitely/not/here.png", "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn test_delete_media() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v23.0/133489585902390"))
        .and(bearer_token(ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    assert!(client.delete_media("133489585902390").await.unwrap().success);

    let err = client.delete_media("").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid request parameters: media ID cannot be empty"
    );
}
