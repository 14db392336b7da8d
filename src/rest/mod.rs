//! Wire plumbing shared by the webhook router and the outbound client.
//!
//! `server` holds the inbound pipeline pieces (signature check, challenge, decode),
//! `client` holds request execution and Graph API error-body handling.

use serde::{Deserialize, Deserializer};
use std::{borrow::Cow, fmt::Display, str::FromStr};

pub(crate) mod client;
pub(crate) mod server;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOr<'a, T> {
    Raw(Cow<'a, str>),
    Tee(T),
}

/// Accepts either `T` itself or a string holding `T`.
///
/// The platform emits timestamps and some order fields in both forms.
pub(crate) fn deserialize_str<'de, T, D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    let v = <RawOr<T>>::deserialize(deserializer)?;
    match v {
        RawOr::Raw(s) => T::from_str(&s)
            .map_err(|err| <D::Error as serde::de::Error>::custom(format!("parsing value: {err}"))),
        RawOr::Tee(n) => Ok(n),
    }
}

pub(crate) fn deserialize_str_opt<'de, T, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    let v = <Option<RawOr<T>>>::deserialize(deserializer)?;
    match v {
        Some(RawOr::Raw(s)) => T::from_str(&s).map(Some).map_err(|err| {
            <D::Error as serde::de::Error>::custom(format!("parsing value: {err}"))
        }),
        Some(RawOr::Tee(n)) => Ok(Some(n)),
        None => Ok(None),
    }
}
