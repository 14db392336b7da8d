// --- CONSTANTS ---
#[allow(dead_code)]
pub const APP_SECRET: &str = "abc";
#[allow(dead_code)]
pub const VERIFY_TOKEN: &str = "my_verify_token";
#[allow(dead_code)]
pub const PHONE_ID: &str = "phone_id_222";
#[allow(dead_code)]
pub const ACCESS_TOKEN: &str = "EAAD...";
#[allow(dead_code)]
pub const RECIPIENT_ID: &str = "16505551234";

// A message notification as delivered by the platform.
#[allow(dead_code)]
pub const TEXT_NOTIFICATION: &str = r#"{
  "object": "whatsapp_business_account",
  "entry": [{
    "id": "102290129340398",
    "changes": [{
      "value": {
        "messaging_product": "whatsapp",
        "metadata": {"display_phone_number": "15550783881", "phone_number_id": "106540352242922"},
        "contacts": [{"profile": {"name": "Sheena Nelson"}, "wa_id": "16505551234"}],
        "messages": [{
          "from": "16505551234",
          "id": "wamid.HBgLMTY1MDM4Nzk0MzkVAgASGBQzQTRBNjU5OUFFRTAzODEwMTQ0RgA=",
          "timestamp": "1749416383",
          "type": "text",
          "text": {"body": "Does it come in another color?"}
        }]
      },
      "field": "messages"
    }]
  }]
}"#;

// --- SIGNING HELPERS ---

/// `sha256=<hex>` over `body` with `secret`.
#[allow(dead_code)]
pub fn sign_sha256(secret: &str, body: &[u8]) -> String {
    use hmac::Mac;

    let mut mac = <hmac::Hmac<sha2::Sha256> as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// `sha1=<hex>` over `body` with `secret`.
#[allow(dead_code)]
pub fn sign_sha1(secret: &str, body: &[u8]) -> String {
    use hmac::Mac;

    let mut mac = <hmac::Hmac<sha1::Sha1> as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(body);
    format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
}

/// A POST request carrying `body` signed with [`APP_SECRET`].
#[allow(dead_code)]
pub fn signed_post(body: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/webhook")
        .header("content-type", "application/json")
        .header("x-hub-signature-256", sign_sha256(APP_SECRET, body.as_bytes()))
        .body(axum::body::Body::from(body.to_owned()))
        .unwrap()
}

/// Collects a response body into a string.
#[allow(dead_code)]
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
