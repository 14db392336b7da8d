//! Outbound message types.
//!
//! These are the parameters accepted by the `send_*` methods of
//! [`Client`](crate::Client) and the response they return. They serialize to the
//! exact JSON the Cloud API `messages` endpoint expects.
//!
//! # Example
//! ```rust
//! use whatsapp_webhook_rs::message::{Button, Footer, Header, InteractiveButtons};
//!
//! let params = InteractiveButtons::new(
//!     "Did this answer your question?",
//!     vec![Button::reply("yes", "Yes"), Button::reply("no", "No")],
//! )
//! .header(Header::text("Quick check"))
//! .footer(Footer::new("Reply any time"));
//! # let _ = params;
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Maximum length of an image caption, in characters.
pub const MAX_CAPTION_LEN: usize = 1024;

/// A text message.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Text {
    /// Ask the recipient's app to render a preview of the first URL in `body`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub preview_url: bool,
    pub body: String,
}

impl Text {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            preview_url: false,
            body: body.into(),
        }
    }

    pub fn preview_url(mut self, preview_url: bool) -> Self {
        self.preview_url = preview_url;
        self
    }
}

impl From<&str> for Text {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

impl From<String> for Text {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

/// An image message, referencing either an uploaded media ID or a public link.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Image {
    /// An image previously uploaded with [`Client::upload_media`](crate::Client::upload_media).
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// An image the platform fetches from `link`. Must be 5 MiB or smaller.
    pub fn with_link(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Default::default()
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Exactly one of `id` and `link` must be set, and the caption must not exceed
    /// [`MAX_CAPTION_LEN`] characters.
    pub fn validate(&self) -> Result<(), Error> {
        let has_id = self.id.as_deref().is_some_and(|id| !id.is_empty());
        let has_link = self.link.as_deref().is_some_and(|link| !link.is_empty());

        match (has_id, has_link) {
            (false, false) => return Err(Error::validation("either id or link must be provided")),
            (true, true) => {
                return Err(Error::validation("only one of id or link should be provided"))
            }
            _ => {}
        }

        if let Some(caption) = &self.caption {
            if caption.chars().count() > MAX_CAPTION_LEN {
                return Err(Error::validation(format!(
                    "caption exceeds maximum length of {MAX_CAPTION_LEN} characters"
                )));
            }
        }

        Ok(())
    }
}

/// Media used in an interactive message header.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MediaObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl MediaObject {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_link(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Default::default()
        }
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Header of an interactive message.
///
/// List messages only accept [`Header::Text`].
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Header {
    Text { text: String },
    Image { image: MediaObject },
    Video { video: MediaObject },
    Document { document: MediaObject },
}

impl Header {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(image: MediaObject) -> Self {
        Self::Image { image }
    }

    pub fn video(video: MediaObject) -> Self {
        Self::Video { video }
    }

    pub fn document(document: MediaObject) -> Self {
        Self::Document { document }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Body {
    pub text: String,
}

impl Body {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Footer {
    pub text: String,
}

impl Footer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A button of a reply-buttons message.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Button {
    Reply { reply: ReplyButton },
}

impl Button {
    /// A reply button. `id` comes back in the
    /// [`ButtonReply`](crate::notification::ButtonReply) when the customer taps it.
    pub fn reply(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Reply {
            reply: ReplyButton {
                id: id.into(),
                title: title.into(),
            },
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReplyButton {
    pub id: String,
    /// At most 20 characters.
    pub title: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ListSection {
    /// At most 24 characters. Required when there is more than one section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rows: Vec<ListRow>,
}

impl ListSection {
    pub fn new(rows: Vec<ListRow>) -> Self {
        Self { title: None, rows }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListRow {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    Navigate,
    DataExchange,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    Draft,
    #[default]
    Published,
}

/// First screen and its input data, for [`FlowAction::Navigate`].
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FlowActionPayload {
    pub screen: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// Parameters of a flow message.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct FlowParameters {
    pub flow_message_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_mode: Option<FlowMode>,
    pub flow_token: String,
    pub flow_id: String,
    /// Text of the button that opens the flow.
    pub flow_cta: String,
    pub flow_action: FlowAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_action_payload: Option<FlowActionPayload>,
}

impl FlowParameters {
    /// Flow message version `3`.
    pub fn new(
        flow_token: impl Into<String>,
        flow_id: impl Into<String>,
        flow_cta: impl Into<String>,
        flow_action: FlowAction,
    ) -> Self {
        Self {
            flow_message_version: "3".to_owned(),
            flow_mode: None,
            flow_token: flow_token.into(),
            flow_id: flow_id.into(),
            flow_cta: flow_cta.into(),
            flow_action,
            flow_action_payload: None,
        }
    }

    pub fn flow_mode(mut self, flow_mode: FlowMode) -> Self {
        self.flow_mode = Some(flow_mode);
        self
    }

    pub fn navigate_to(mut self, screen: impl Into<String>, data: Option<Map<String, Value>>) -> Self {
        self.flow_action_payload = Some(FlowActionPayload {
            screen: screen.into(),
            data,
        });
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("flow_message_version", &self.flow_message_version),
            ("flow_token", &self.flow_token),
            ("flow_id", &self.flow_id),
            ("flow_cta", &self.flow_cta),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::validation(format!("invalid flow action: {name} is required")));
            }
        }
        Ok(())
    }
}

/// Parameters of a call-to-action URL button.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct CtaUrlParameters {
    pub display_text: String,
    pub url: String,
}

impl CtaUrlParameters {
    pub fn validate(&self) -> Result<(), Error> {
        if self.display_text.is_empty() {
            return Err(Error::validation("invalid CTA URL action: display_text is required"));
        }
        if self.url.is_empty() {
            return Err(Error::validation("invalid CTA URL action: url is required"));
        }
        Ok(())
    }
}

/// Parameters of an interactive reply-buttons message (up to 3 buttons).
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct InteractiveButtons {
    pub header: Option<Header>,
    pub body: Body,
    pub footer: Option<Footer>,
    pub buttons: Vec<Button>,
}

/// Parameters of an interactive list message.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct InteractiveList {
    pub header: Option<Header>,
    pub body: Body,
    pub footer: Option<Footer>,
    /// Label of the button that opens the list. At most 20 characters.
    pub button: String,
    pub sections: Vec<ListSection>,
}

/// Parameters of an interactive flow message.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct InteractiveFlow {
    pub header: Option<Header>,
    pub body: Body,
    pub footer: Option<Footer>,
    pub parameters: FlowParameters,
}

/// Parameters of an interactive call-to-action URL message.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct InteractiveCtaUrl {
    pub header: Option<Header>,
    pub body: Body,
    pub footer: Option<Footer>,
    pub parameters: CtaUrlParameters,
}

macro_rules! header_footer {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn header(mut self, header: Header) -> Self {
                    self.header = Some(header);
                    self
                }

                pub fn footer(mut self, footer: Footer) -> Self {
                    self.footer = Some(footer);
                    self
                }
            }
        )*
    };
}

header_footer!(InteractiveButtons, InteractiveList, InteractiveFlow, InteractiveCtaUrl);

impl InteractiveButtons {
    pub fn new(body: impl Into<Body>, buttons: Vec<Button>) -> Self {
        Self {
            header: None,
            body: body.into(),
            footer: None,
            buttons,
        }
    }
}

impl InteractiveList {
    pub fn new(body: impl Into<Body>, button: impl Into<String>, sections: Vec<ListSection>) -> Self {
        Self {
            header: None,
            body: body.into(),
            footer: None,
            button: button.into(),
            sections,
        }
    }
}

impl InteractiveFlow {
    pub fn new(body: impl Into<Body>, parameters: FlowParameters) -> Self {
        Self {
            header: None,
            body: body.into(),
            footer: None,
            parameters,
        }
    }
}

impl InteractiveCtaUrl {
    pub fn new(body: impl Into<Body>, display_text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            header: None,
            body: body.into(),
            footer: None,
            parameters: CtaUrlParameters {
                display_text: display_text.into(),
                url: url.into(),
            },
        }
    }
}

// --- Wire format ---

#[derive(Serialize, Debug)]
pub(crate) struct OutgoingMessage<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    #[serde(flatten)]
    content: OutgoingContent<'a>,
}

impl<'a> OutgoingMessage<'a> {
    pub(crate) fn new(to: &'a str, content: OutgoingContent<'a>) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            content,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum OutgoingContent<'a> {
    Text { text: &'a Text },
    Image { image: &'a Image },
    Interactive { interactive: Interactive<'a> },
}

#[derive(Serialize, Debug)]
pub(crate) struct Interactive<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<&'a Header>,
    body: &'a Body,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<&'a Footer>,
    action: Action<'a>,
}

#[derive(Serialize, Debug, Default)]
struct Action<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<ActionParameters<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buttons: Option<&'a [Button]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    button: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sections: Option<&'a [ListSection]>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum ActionParameters<'a> {
    Flow(&'a FlowParameters),
    CtaUrl(&'a CtaUrlParameters),
}

impl InteractiveButtons {
    pub(crate) fn to_wire(&self) -> Interactive<'_> {
        Interactive {
            kind: "button",
            header: self.header.as_ref(),
            body: &self.body,
            footer: self.footer.as_ref(),
            action: Action {
                buttons: Some(&self.buttons),
                ..Default::default()
            },
        }
    }
}

impl InteractiveList {
    pub(crate) fn to_wire(&self) -> Interactive<'_> {
        Interactive {
            kind: "list",
            header: self.header.as_ref(),
            body: &self.body,
            footer: self.footer.as_ref(),
            action: Action {
                button: Some(&self.button),
                sections: Some(&self.sections),
                ..Default::default()
            },
        }
    }
}

impl InteractiveFlow {
    pub(crate) fn to_wire(&self) -> Interactive<'_> {
        Interactive {
            kind: "flow",
            header: self.header.as_ref(),
            body: &self.body,
            footer: self.footer.as_ref(),
            action: Action {
                name: Some("flow"),
                parameters: Some(ActionParameters::Flow(&self.parameters)),
                ..Default::default()
            },
        }
    }
}

impl InteractiveCtaUrl {
    pub(crate) fn to_wire(&self) -> Interactive<'_> {
        Interactive {
            kind: "cta_url",
            header: self.header.as_ref(),
            body: &self.body,
            footer: self.footer.as_ref(),
            action: Action {
                name: Some("cta_url"),
                parameters: Some(ActionParameters::CtaUrl(&self.parameters)),
                ..Default::default()
            },
        }
    }
}

/// The API's answer to a send call.
///
/// It only means the request was accepted; delivery is reported later through
/// [`Status`](crate::notification::Status) webhooks.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MessagesResponse {
    #[serde(default)]
    pub messaging_product: String,
    #[serde(default)]
    pub contacts: Vec<MessagesResponseContact>,
    #[serde(default)]
    pub messages: Vec<MessagesResponseMessage>,
}

impl MessagesResponse {
    /// The ID of the accepted message, as it will appear in status webhooks.
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MessagesResponseContact {
    /// The phone number as sent in `to`.
    pub input: String,
    #[serde(default)]
    pub wa_id: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MessagesResponseMessage {
    pub id: String,
    /// Only set for paced template messages.
    #[serde(alias = "status", default)]
    pub message_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_request_shape() {
        let text = Text::new("hello");
        let request = OutgoingMessage::new("123", OutgoingContent::Text { text: &text });
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "123",
                "type": "text",
                "text": {"body": "hello"}
            })
        );

        let text = Text::new("https://example.com").preview_url(true);
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({"preview_url": true, "body": "https://example.com"})
        );
    }

    #[test]
    fn image_validation() {
        assert!(Image::with_id("1").validate().is_ok());
        assert!(Image::with_link("https://x/y.png").caption("hi").validate().is_ok());
        assert!(Image::default().validate().is_err());

        let both = Image {
            id: Some("1".into()),
            link: Some("https://x".into()),
            caption: None,
        };
        assert!(both.validate().is_err());

        let long = Image::with_id("1").caption("a".repeat(MAX_CAPTION_LEN + 1));
        assert!(matches!(long.validate(), Err(Error::Validation(_))));
        let max = Image::with_id("1").caption("é".repeat(MAX_CAPTION_LEN));
        assert!(max.validate().is_ok());
    }

    #[test]
    fn buttons_wire_shape() {
        let params = InteractiveButtons::new("Pick one", vec![Button::reply("a", "A")])
            .header(Header::image(MediaObject::with_link("https://x/h.png")))
            .footer(Footer::new("f"));
        assert_eq!(
            serde_json::to_value(params.to_wire()).unwrap(),
            json!({
                "type": "button",
                "header": {"type": "image", "image": {"link": "https://x/h.png"}},
                "body": {"text": "Pick one"},
                "footer": {"text": "f"},
                "action": {"buttons": [{"type": "reply", "reply": {"id": "a", "title": "A"}}]}
            })
        );
    }

    #[test]
    fn list_wire_shape() {
        let params = InteractiveList::new(
            "Menu",
            "Open",
            vec![ListSection::new(vec![ListRow::new("r1", "Row").description("d")]).title("S")],
        );
        assert_eq!(
            serde_json::to_value(params.to_wire()).unwrap(),
            json!({
                "type": "list",
                "body": {"text": "Menu"},
                "action": {
                    "button": "Open",
                    "sections": [{"title": "S", "rows": [{"id": "r1", "title": "Row", "description": "d"}]}]
                }
            })
        );
    }

    #[test]
    fn flow_wire_shape_and_validation() {
        let parameters = FlowParameters::new("tok", "flow-1", "Book!", FlowAction::Navigate)
            .navigate_to("WELCOME", None);
        assert!(parameters.validate().is_ok());

        let params = InteractiveFlow::new("Start", parameters);
        assert_eq!(
            serde_json::to_value(params.to_wire()).unwrap(),
            json!({
                "type": "flow",
                "body": {"text": "Start"},
                "action": {
                    "name": "flow",
                    "parameters": {
                        "flow_message_version": "3",
                        "flow_token": "tok",
                        "flow_id": "flow-1",
                        "flow_cta": "Book!",
                        "flow_action": "navigate",
                        "flow_action_payload": {"screen": "WELCOME"}
                    }
                }
            })
        );

        let missing = FlowParameters::new("", "flow-1", "Book!", FlowAction::DataExchange);
        let err = missing.validate().unwrap_err();
        assert!(err.to_string().contains("flow_token"));
    }

    #[test]
    fn cta_url_wire_shape_and_validation() {
        let params = InteractiveCtaUrl::new("Deals", "View", "https://example.com/deals");
        assert!(params.parameters.validate().is_ok());
        assert_eq!(
            serde_json::to_value(params.to_wire()).unwrap()["action"],
            json!({
                "name": "cta_url",
                "parameters": {"display_text": "View", "url": "https://example.com/deals"}
            })
        );

        let no_url = InteractiveCtaUrl::new("Deals", "View", "");
        assert!(no_url.parameters.validate().is_err());
        let no_text = InteractiveCtaUrl::new("Deals", "", "https://x");
        assert!(no_text.parameters.validate().is_err());
    }

    #[test]
    fn messages_response() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "messaging_product": "whatsapp",
            "contacts": [{"input": "16505551234", "wa_id": "16505551234"}],
            "messages": [{"id": "wamid.HBgL", "message_status": "accepted"}]
        }))
        .unwrap();
        assert_eq!(response.message_id(), Some("wamid.HBgL"));
        assert_eq!(response.messages[0].message_status.as_deref(), Some("accepted"));
    }
}
