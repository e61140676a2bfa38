//! Request body normalization

use super::types::{ContentKind, RawRequest};
use crate::utils::error::{GatewayError, Result};
use actix_multipart::Multipart;
use actix_web::error::PayloadError;
use actix_web::http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use futures::StreamExt;
use serde_json::{Map, Value, json};
use tracing::debug;

/// Turn the raw body into the executor input according to `Content-Type`
pub fn parse_body(request: &RawRequest) -> Result<(Value, ContentKind)> {
    let media_type = request.media_type();
    let body = &request.body;

    match media_type.as_deref() {
        Some(mt) if mt == "application/json" || mt.ends_with("+json") => {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok((json!({}), ContentKind::Empty));
            }
            serde_json::from_slice(body)
                .map(|value| (value, ContentKind::Json))
                .map_err(|e| GatewayError::bad_request(format!("Invalid JSON: {}", e)))
        }
        Some("multipart/form-data") => Ok((parse_multipart(request), ContentKind::Form)),
        Some("application/x-www-form-urlencoded") => {
            let fields: Map<String, Value> = url::form_urlencoded::parse(body)
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect();
            Ok((Value::Object(fields), ContentKind::Form))
        }
        Some("text/plain") => Ok((
            Value::String(String::from_utf8_lossy(body).into_owned()),
            ContentKind::Text,
        )),
        _ if body.is_empty() => Ok((json!({}), ContentKind::Empty)),
        _ => Ok((
            Value::String(String::from_utf8_lossy(body).into_owned()),
            ContentKind::Text,
        )),
    }
}

/// Fields become strings; file parts become `{ filename, contentType, size }`.
/// Malformed input yields whatever was read before the error.
///
/// `Multipart` is `!Send`, so it is driven to completion here over the
/// in-memory body and never lives across an await of the caller.
fn parse_multipart(request: &RawRequest) -> Value {
    let Some(content_type) = request
        .header("content-type")
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    else {
        return Value::Object(Map::new());
    };
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, content_type);

    let body = request.body.clone();
    let stream = futures::stream::iter(vec![Ok::<_, PayloadError>(body)]);
    futures::executor::block_on(read_multipart(Multipart::new(&headers, stream)))
}

async fn read_multipart(mut multipart: Multipart) -> Value {
    let mut fields = Map::new();

    while let Some(item) = multipart.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                debug!("Stopped reading multipart body: {}", e);
                break;
            }
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let part_type = field.content_type().map(|mime| mime.to_string());

        let mut data = Vec::new();
        let mut complete = true;
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => data.extend_from_slice(&bytes),
                Err(e) => {
                    debug!(field = %name, "Stopped reading multipart field: {}", e);
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            break;
        }

        let value = match filename {
            Some(filename) => json!({
                "filename": filename,
                "contentType": part_type,
                "size": data.len(),
            }),
            None => Value::String(String::from_utf8_lossy(&data).into_owned()),
        };
        fields.insert(name, value);
    }

    Value::Object(fields)
}
