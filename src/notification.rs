//! Typed webhook notifications.
//!
//! A POST delivery from the platform is one [`Notification`] envelope holding
//! entries, each entry holding changes, each change holding one [`Value`] with the
//! actual events: inbound [`Message`]s, outbound message [`Status`] updates and
//! platform errors ([`MetaError`]).
//!
//! ```text
//! Notification ─┬─ Entry ─┬─ Change ── Value ─┬─ messages: Option<Vec<Message>>
//!               │         │                   ├─ statuses: Option<Vec<Status>>
//!               │         │                   └─ errors:   Option<Vec<MetaError>>
//!               │         └─ Change ...
//!               └─ Entry ...
//! ```
//!
//! Every optional list keeps the distinction between an absent key (`None`) and an
//! empty array (`Some(vec![])`).

use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer, Serialize,
};
use serde_json::{Map, Value as JsonValue};

use crate::{
    rest::{deserialize_str, deserialize_str_opt},
    MetaError, Timestamp,
};

/// Value of [`Notification::object`] for WhatsApp Business Account deliveries.
pub const WHATSAPP_BUSINESS_ACCOUNT: &str = "whatsapp_business_account";

/// The top-level envelope of a webhook delivery.
#[derive(Deserialize, Clone, Debug, Default)]
#[non_exhaustive]
pub struct Notification {
    /// The product family the notification belongs to.
    ///
    /// The router never rejects a delivery because of this value; use
    /// [`is_whatsapp_business_account`](Self::is_whatsapp_business_account) to check it.
    #[serde(default)]
    pub object: String,

    /// Entries in the order the platform sent them.
    #[serde(default)]
    pub entry: Vec<Entry>,
}

impl Notification {
    /// Returns `true` if `object` is `whatsapp_business_account`.
    pub fn is_whatsapp_business_account(&self) -> bool {
        self.object == WHATSAPP_BUSINESS_ACCOUNT
    }

    /// Iterates over every change value in the delivery, in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entry
            .iter()
            .flat_map(|entry| entry.changes.iter())
            .map(|change| &change.value)
    }

    /// Iterates over every inbound message in the delivery, in order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.values()
            .flat_map(|value| value.messages.as_deref().unwrap_or_default())
    }

    /// Iterates over every status update in the delivery, in order.
    pub fn statuses(&self) -> impl Iterator<Item = &Status> {
        self.values()
            .flat_map(|value| value.statuses.as_deref().unwrap_or_default())
    }

    /// Iterates over every value-level error in the delivery, in order.
    pub fn errors(&self) -> impl Iterator<Item = &MetaError> {
        self.values()
            .flat_map(|value| value.errors.as_deref().unwrap_or_default())
    }

    pub(crate) fn partial(object: String) -> Self {
        Self {
            object,
            entry: Vec::new(),
        }
    }
}

/// One business account's batch of changes.
#[derive(Deserialize, Clone, Debug, Default)]
#[non_exhaustive]
pub struct Entry {
    /// The WhatsApp Business Account ID.
    #[serde(default)]
    pub id: String,

    /// When the notification was sent, if the platform included it.
    #[serde(default)]
    pub time: Option<Timestamp>,

    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[non_exhaustive]
pub struct Change {
    /// The subscribed field that changed, e.g. `messages`.
    #[serde(default)]
    pub field: String,

    #[serde(default)]
    pub value: Value,
}

/// The payload of a single change.
#[derive(Deserialize, Clone, Debug, Default)]
#[non_exhaustive]
pub struct Value {
    #[serde(default)]
    pub messaging_product: String,

    /// The business phone number that received the event.
    #[serde(default)]
    pub metadata: Metadata,

    /// Profiles of the customers involved in `messages`.
    pub contacts: Option<Vec<Contact>>,

    pub messages: Option<Vec<Message>>,

    pub statuses: Option<Vec<Status>>,

    pub errors: Option<Vec<MetaError>>,
}

/// Borrowed sum-type view over a [`Value`], see [`Value::kind`].
#[derive(Clone, Copy, Debug)]
pub enum ChangeKind<'a> {
    Messages(&'a [Message]),
    Statuses(&'a [Status]),
    Errors(&'a [MetaError]),
    /// None of the event lists is present.
    Other,
}

impl Value {
    /// Classifies the value by the first present event list
    /// (`messages`, then `statuses`, then `errors`).
    ///
    /// A present but empty list still counts as present.
    pub fn kind(&self) -> ChangeKind<'_> {
        if let Some(messages) = &self.messages {
            ChangeKind::Messages(messages)
        } else if let Some(statuses) = &self.statuses {
            ChangeKind::Statuses(statuses)
        } else if let Some(errors) = &self.errors {
            ChangeKind::Errors(errors)
        } else {
            ChangeKind::Other
        }
    }

    /// Finds the profile name of the customer with the given WhatsApp ID.
    pub fn contact_name(&self, wa_id: &str) -> Option<&str> {
        self.contacts
            .as_deref()?
            .iter()
            .find(|c| c.wa_id == wa_id)
            .map(|c| c.profile.name.as_str())
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Metadata {
    #[serde(default)]
    pub display_phone_number: String,
    #[serde(default)]
    pub phone_number_id: String,
}

/// A customer who sent one of the messages in the same [`Value`].
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Contact {
    #[serde(default)]
    pub profile: Profile,

    /// The customer's WhatsApp ID. It may differ from the phone number used to
    /// reach them.
    #[serde(default)]
    pub wa_id: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Profile {
    #[serde(default)]
    pub name: String,
}

/// An inbound message.
///
/// The common envelope fields sit on the struct; the type-specific payload lives
/// in [`content`](Self::content).
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Message {
    /// The sender's WhatsApp ID.
    pub from: String,
    pub id: String,
    pub timestamp: Timestamp,

    /// The `type` field exactly as sent; empty if the platform omitted it.
    pub r#type: String,

    /// Present when the message replies to, or forwards, another message.
    pub context: Option<MessageContext>,

    /// Present when the platform could not process the message.
    pub errors: Option<Vec<MetaError>>,

    /// Present when the customer arrived through an ad and the message
    /// itself is not a `referral` message.
    pub referral: Option<Referral>,

    pub content: MessageContent,
}

impl Message {
    /// Returns the media ID of image, audio, video, document and sticker messages.
    pub fn media_id(&self) -> Option<&str> {
        self.content.media().map(|media| media.id.as_str())
    }

    /// The kind used to pick [`content`](Self::content): the `type` field, or the
    /// inferred kind when `type` was absent.
    pub fn kind(&self) -> &str {
        self.content.kind()
    }
}

/// The type-specific payload of a [`Message`].
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum MessageContent {
    Text(Text),
    Image(Media),
    Audio(Media),
    Video(Media),
    Document(Media),
    Sticker(Media),
    Location(Location),
    Contacts(Vec<ContactCard>),
    /// A quick-reply button press on a template message.
    Button(QuickReply),
    Interactive(InteractiveReply),
    Order(Order),
    System(System),
    Reaction(Reaction),
    Referral(Referral),
    /// A message whose type is unknown, whose payload is missing, or whose
    /// interactive sub-type is unknown.
    Unsupported {
        kind: String,
        /// The message fields beyond the common envelope, untouched.
        raw: Map<String, JsonValue>,
    },
}

macro_rules! content_accessors {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        paste::paste! {
            impl MessageContent {
                $(
                    #[doc = "Returns the `" $variant "` payload, if this is one."]
                    #[inline]
                    pub fn [<as_ $variant:snake>](&self) -> Option<&$ty> {
                        match self {
                            Self::$variant(inner) => Some(inner),
                            _ => None,
                        }
                    }

                    #[doc = "Returns `true` for `" $variant "` content."]
                    #[inline]
                    pub fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, Self::$variant(_))
                    }
                )*
            }
        }
    };
}

content_accessors! {
    Text(Text),
    Image(Media),
    Audio(Media),
    Video(Media),
    Document(Media),
    Sticker(Media),
    Location(Location),
    Contacts(Vec<ContactCard>),
    Button(QuickReply),
    Interactive(InteractiveReply),
    Order(Order),
    System(System),
    Reaction(Reaction),
    Referral(Referral),
}

/// Payload keys the decoder understands, in inference priority order.
const KNOWN_KINDS: &[&str] = &[
    "text",
    "image",
    "audio",
    "video",
    "document",
    "sticker",
    "location",
    "contacts",
    "button",
    "interactive",
    "order",
    "system",
    "reaction",
    "referral",
];

impl MessageContent {
    /// The message kind this content was decoded as.
    pub fn kind(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Audio(_) => "audio",
            Self::Video(_) => "video",
            Self::Document(_) => "document",
            Self::Sticker(_) => "sticker",
            Self::Location(_) => "location",
            Self::Contacts(_) => "contacts",
            Self::Button(_) => "button",
            Self::Interactive(_) => "interactive",
            Self::Order(_) => "order",
            Self::System(_) => "system",
            Self::Reaction(_) => "reaction",
            Self::Referral(_) => "referral",
            Self::Unsupported { kind, .. } => kind,
        }
    }

    /// Returns the body of a text message.
    pub fn text_body(&self) -> Option<&str> {
        self.as_text().map(|text| text.body.as_str())
    }

    /// Returns the media payload of image, audio, video, document and sticker content.
    pub fn media(&self) -> Option<&Media> {
        match self {
            Self::Image(media)
            | Self::Audio(media)
            | Self::Video(media)
            | Self::Document(media)
            | Self::Sticker(media) => Some(media),
            _ => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    fn unsupported(kind: &str, raw: Map<String, JsonValue>) -> Self {
        Self::Unsupported {
            kind: kind.to_owned(),
            raw,
        }
    }

    /// Picks the payload for `kind` out of the remaining message fields.
    fn from_parts(kind: &str, mut rest: Map<String, JsonValue>) -> Result<Self, serde_json::Error> {
        if !KNOWN_KINDS.contains(&kind) {
            return Ok(Self::unsupported(kind, rest));
        }

        let payload = match rest.remove(kind) {
            Some(JsonValue::Null) | None => return Ok(Self::unsupported(kind, rest)),
            Some(payload) => payload,
        };

        let content = match kind {
            "text" => Self::Text(Text::deserialize(payload)?),
            "image" => Self::Image(Media::deserialize(payload)?),
            "audio" => Self::Audio(Media::deserialize(payload)?),
            "video" => Self::Video(Media::deserialize(payload)?),
            "document" => Self::Document(Media::deserialize(payload)?),
            "sticker" => Self::Sticker(Media::deserialize(payload)?),
            "location" => Self::Location(Location::deserialize(payload)?),
            "contacts" => Self::Contacts(Vec::deserialize(payload)?),
            "button" => Self::Button(QuickReply::deserialize(payload)?),
            "interactive" => match InteractiveReply::from_payload(&payload)? {
                Some(reply) => Self::Interactive(reply),
                None => {
                    rest.insert(kind.to_owned(), payload);
                    Self::unsupported(kind, rest)
                }
            },
            "order" => Self::Order(Order::deserialize(payload)?),
            "system" => Self::System(System::deserialize(payload)?),
            "reaction" => Self::Reaction(Reaction::deserialize(payload)?),
            "referral" => Self::Referral(Referral::deserialize(payload)?),
            _ => {
                rest.insert(kind.to_owned(), payload);
                Self::unsupported(kind, rest)
            }
        };

        Ok(content)
    }
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    from: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    timestamp: Timestamp,
    #[serde(rename = "type", default)]
    r#type: Option<String>,
    #[serde(default)]
    context: Option<MessageContext>,
    #[serde(default)]
    errors: Option<Vec<MetaError>>,
    #[serde(flatten)]
    rest: Map<String, JsonValue>,
}

fn infer_kind(rest: &Map<String, JsonValue>) -> Option<&'static str> {
    KNOWN_KINDS.iter().copied().find(|kind| rest.contains_key(*kind))
}

fn take<T: DeserializeOwned>(
    rest: &mut Map<String, JsonValue>,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match rest.remove(key) {
        Some(JsonValue::Null) | None => Ok(None),
        Some(value) => T::deserialize(value).map(Some),
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawMessage {
            from,
            id,
            timestamp,
            r#type,
            context,
            errors,
            mut rest,
        } = RawMessage::deserialize(deserializer)?;

        let kind = match r#type.as_deref() {
            Some(kind) => kind.to_owned(),
            None => infer_kind(&rest).unwrap_or_default().to_owned(),
        };

        let referral = if kind == "referral" {
            None
        } else {
            take(&mut rest, "referral").map_err(de::Error::custom)?
        };

        let content = MessageContent::from_parts(&kind, rest).map_err(de::Error::custom)?;

        Ok(Message {
            from,
            id,
            timestamp,
            r#type: r#type.unwrap_or_default(),
            context,
            errors,
            referral,
            content,
        })
    }
}

/// Reply/forward context of a [`Message`].
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct MessageContext {
    /// Sender of the message being replied to.
    #[serde(default)]
    pub from: Option<String>,

    /// ID of the message being replied to.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub referred_product: Option<ReferredProduct>,

    #[serde(default)]
    pub forwarded: bool,

    /// Forwarded more than 5 times.
    #[serde(default)]
    pub frequently_forwarded: bool,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ReferredProduct {
    pub catalog_id: String,
    pub product_retailer_id: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Text {
    pub body: String,
}

/// Image, audio, video, document or sticker attachment.
///
/// Fetch the bytes with [`Client::get_and_download_media_bytes`](crate::Client::get_and_download_media_bytes).
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Media {
    pub id: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub sha256: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Documents only.
    #[serde(default)]
    pub filename: Option<String>,
    /// Audio only: recorded as a voice note.
    #[serde(default)]
    pub voice: Option<bool>,
    /// Stickers only.
    #[serde(default)]
    pub animated: Option<bool>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A contact card shared by the customer.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ContactCard {
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub emails: Vec<Email>,
    #[serde(default)]
    pub name: Name,
    #[serde(default)]
    pub org: Option<Org>,
    #[serde(default)]
    pub phones: Vec<Phone>,
    #[serde(default)]
    pub urls: Vec<Url>,
}

/// Label attached to a contact card address, email, phone or URL.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum ContactFieldType {
    Home,
    Work,
    Cell,
    Main,
    Iphone,
    #[serde(untagged)]
    Other(String),
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(rename = "type", default)]
    pub r#type: Option<ContactFieldType>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Email {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub r#type: Option<ContactFieldType>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Name {
    #[serde(default)]
    pub formatted_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Org {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Phone {
    #[serde(default)]
    pub phone: String,
    /// Set when the number is on WhatsApp.
    #[serde(default)]
    pub wa_id: Option<String>,
    #[serde(rename = "type", default)]
    pub r#type: Option<ContactFieldType>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Url {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub r#type: Option<ContactFieldType>,
}

/// A quick-reply button pressed on a template message.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct QuickReply {
    /// The button label.
    #[serde(default)]
    pub text: String,
    /// The developer-defined payload of the button.
    #[serde(default)]
    pub payload: String,
}

/// The customer's answer to an interactive message.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum InteractiveReply {
    ButtonReply(ButtonReply),
    ListReply(ListReply),
    /// A completed WhatsApp Flow (`nfm_reply`).
    FlowReply(FlowReply),
}

impl InteractiveReply {
    /// `Ok(None)` for sub-types this crate does not model.
    fn from_payload(payload: &JsonValue) -> Result<Option<Self>, serde_json::Error> {
        let Some(sub_type) = payload.get("type").and_then(JsonValue::as_str) else {
            return Ok(None);
        };
        let Some(body) = payload.get(sub_type) else {
            return Ok(None);
        };

        let reply = match sub_type {
            "button_reply" => Self::ButtonReply(ButtonReply::deserialize(body)?),
            "list_reply" => Self::ListReply(ListReply::deserialize(body)?),
            "nfm_reply" => Self::FlowReply(FlowReply::deserialize(body)?),
            _ => return Ok(None),
        };
        Ok(Some(reply))
    }

    /// The ID of the chosen button or row. Flow replies have none.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::ButtonReply(reply) => Some(&reply.id),
            Self::ListReply(reply) => Some(&reply.id),
            Self::FlowReply(_) => None,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ButtonReply {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ListReply {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct FlowReply {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// The flow's response, itself a JSON document encoded as a string.
    #[serde(default)]
    pub response_json: String,
}

impl FlowReply {
    /// Parses [`response_json`](Self::response_json).
    pub fn response<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.response_json)
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Order {
    pub catalog_id: String,
    #[serde(default)]
    pub product_items: Vec<ProductItem>,
    /// Text sent along with the order.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ProductItem {
    pub product_retailer_id: String,
    #[serde(deserialize_with = "deserialize_str::<u64, __D>")]
    pub quantity: u64,
    #[serde(deserialize_with = "deserialize_str::<f64, __D>")]
    pub item_price: f64,
    #[serde(default)]
    pub currency: String,
}

/// A system notice, e.g. the customer changed their number.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct System {
    #[serde(default)]
    pub body: String,
    /// The customer's new WhatsApp ID after a number change.
    #[serde(alias = "wa_id", default)]
    pub new_wa_id: Option<String>,
    #[serde(rename = "type", default)]
    pub r#type: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Reaction {
    /// The message that was reacted to.
    pub message_id: String,
    /// Absent or empty when the reaction was removed.
    #[serde(default)]
    pub emoji: Option<String>,
}

impl Reaction {
    pub fn is_removal(&self) -> bool {
        self.emoji.as_deref().map_or(true, str::is_empty)
    }
}

/// Click-to-WhatsApp ad referral.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Referral {
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub source_id: String,
    /// `ad` or `post`.
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub ctwa_clid: Option<String>,
}

/// A delivery update for a message the business sent.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Status {
    /// The ID of the message this update is about.
    pub id: String,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub timestamp: Timestamp,
    #[serde(default)]
    pub recipient_id: String,
    #[serde(default)]
    pub conversation: Option<Conversation>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    pub errors: Option<Vec<MetaError>>,
    /// Echo of the `biz_opaque_callback_data` sent with the message.
    #[serde(default)]
    pub biz_opaque_callback_data: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
    Failed,
    /// Any status not enumerated
    #[serde(untagged)]
    Other(String),
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Failed => "failed",
            Self::Other(other) => other,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Conversation {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_str_opt::<i64, __D>")]
    pub expiration_timestamp: Option<i64>,
    #[serde(default)]
    pub origin: Option<ConversationOrigin>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct ConversationOrigin {
    #[serde(rename = "type")]
    pub r#type: ConversationCategory,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Pricing {
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub pricing_model: String,
    pub category: ConversationCategory,
    /// Newer per-message pricing, e.g. `regular`.
    #[serde(rename = "type", default)]
    pub r#type: Option<String>,
}

/// The type of conversation being billed
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ConversationCategory {
    Authentication,
    AuthenticationInternational,
    Marketing,
    MarketingLite,
    Utility,
    Service,
    ReferralConversion,
    /// Any category not enumerated
    #[serde(untagged)]
    Other(String),
}
