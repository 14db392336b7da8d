use axum::body::Bytes;
use futures::Stream;
use reqwest::{
    multipart::{Form, Part},
    RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::warn;

use crate::{error::Error, media::UploadMedia, MetaError};

/// Sends `request` and decodes a 200 answer into `T`.
pub(crate) async fn execute_request<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Error> {
    let response = request.send().await?;
    handle_response(response).await
}

pub(crate) async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    let body = response.bytes().await?;

    if status == StatusCode::OK {
        Ok(serde_json::from_slice(&body)?)
    } else {
        Err(handle_not_ok(status, &body))
    }
}

pub(crate) fn handle_not_ok(status: StatusCode, body: &[u8]) -> Error {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: MetaError,
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error }) => {
            warn!(%status, code = error.code, "API call failed: {error}");
            Error::Api {
                status,
                error: Box::new(error),
            }
        }
        Err(_) => {
            warn!(%status, "API call failed with an unrecognized body");
            Error::UnexpectedStatus(status)
        }
    }
}

/// Sends `request` lazily and streams the answer's body chunks.
pub(crate) fn media_stream(
    request: RequestBuilder,
) -> impl Stream<Item = Result<Bytes, Error>> + Send + 'static {
    async_stream::try_stream! {
        let mut response = request.send().await?;
        let status = response.status();
        if status == StatusCode::OK {
            while let Some(chunk) = response.chunk().await? {
                yield chunk;
            }
        } else {
            let body = response.bytes().await?;
            Err::<(), _>(handle_not_ok(status, &body))?;
        }
    }
}

pub(crate) fn upload_form(upload: UploadMedia) -> Result<Form, Error> {
    let UploadMedia {
        bytes,
        filename,
        mime_type,
    } = upload;

    let part = Part::bytes(bytes)
        .file_name(filename)
        .mime_str(&mime_type)
        .map_err(|err| Error::validation(format!("invalid MIME type {mime_type}: {err}")))?;

    Ok(Form::new()
        .text("messaging_product", "whatsapp")
        .text("type", mime_type.into_owned())
        .part("file", part))
}
