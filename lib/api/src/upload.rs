// Reads an uploaded table from either a multipart form (field `file`) or a
// raw request body, enforcing a byte limit while streaming.

use crate::error::ApiError;
use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpRequest};
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

/// Name of the multipart field carrying the table
pub const UPLOAD_FIELD: &str = "file";

pub async fn read_upload(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> Result<Bytes, ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.starts_with("multipart/form-data"));

    if !is_multipart {
        return collect(payload, limit).await;
    }

    let mut form = Multipart::new(req.headers(), payload);
    while let Some(item) = form.next().await {
        let field = item.map_err(|e| ApiError::Upload(e.to_string()))?;
        if field.name() == Some(UPLOAD_FIELD) {
            return collect(field, limit).await;
        }
    }
    Err(ApiError::MissingFile)
}

async fn collect<S, E>(stream: S, limit: usize) -> Result<Bytes, ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    futures_util::pin_mut!(stream);
    let mut body = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ApiError::Upload(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
