//! Decoding of create/update request bodies into [`PostInput`].
//!
//! Three encodings are accepted: `application/json`,
//! `application/x-www-form-urlencoded` (neither can carry a file) and
//! `multipart/form-data`. An empty body decodes to an empty input.

use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpMessage, HttpRequest, mime, web};
use futures::{StreamExt, TryStreamExt};

use quill_core::domain::{ImageField, PostInput, TextField, UploadedFile};
use quill_shared::dto::PostRequest;

use crate::middleware::error::{AppError, AppResult};

/// Read the request body according to its content type.
pub async fn read_post_input(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> AppResult<PostInput> {
    let mime_type = req
        .mime_type()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    match mime_type {
        Some(m) if m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA => {
            read_multipart(req, payload, limit).await
        }
        Some(m) if m.type_() == mime::APPLICATION && m.subtype() == mime::WWW_FORM_URLENCODED => {
            read_urlencoded(payload, limit).await
        }
        Some(m) if m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON) => {
            read_json(payload, limit).await
        }
        None => read_json(payload, limit).await,
        Some(m) => Err(AppError::UnsupportedMediaType(m.to_string())),
    }
}

async fn read_body(mut payload: web::Payload, limit: usize) -> AppResult<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn read_json(payload: web::Payload, limit: usize) -> AppResult<PostInput> {
    let body = read_body(payload, limit).await?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PostInput::default());
    }

    let request: PostRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    Ok(PostInput {
        title: json_text(request.title),
        description: json_text(request.description),
        image: json_image(request.image),
    })
}

async fn read_urlencoded(payload: web::Payload, limit: usize) -> AppResult<PostInput> {
    let body = read_body(payload, limit).await?;
    decode_urlencoded(&body)
}

fn decode_urlencoded(body: &[u8]) -> AppResult<PostInput> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid form body: {}", e)))?;

    let mut input = PostInput::default();
    for (name, value) in pairs {
        match name.as_str() {
            "title" => input.title = TextField::Text(value),
            "description" => input.description = TextField::Text(value),
            // A plain form field cannot carry a file either.
            "image" if value.is_empty() => input.image = ImageField::Absent,
            "image" => input.image = ImageField::Malformed,
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }
    Ok(input)
}

fn json_text(value: Option<serde_json::Value>) -> TextField {
    match value {
        None | Some(serde_json::Value::Null) => TextField::Absent,
        Some(serde_json::Value::String(s)) => TextField::Text(s),
        Some(_) => TextField::Malformed,
    }
}

// JSON cannot carry a file; only "no value" is acceptable.
fn json_image(value: Option<serde_json::Value>) -> ImageField {
    match value {
        None | Some(serde_json::Value::Null) => ImageField::Absent,
        Some(serde_json::Value::String(s)) if s.is_empty() => ImageField::Absent,
        Some(_) => ImageField::Malformed,
    }
}

async fn read_multipart(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> AppResult<PostInput> {
    let mut multipart = Multipart::new(req.headers(), payload);
    let mut input = PostInput::default();
    let mut total = 0usize;

    while let Some(mut field) = multipart.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            total += chunk.len();
            if total > limit {
                return Err(AppError::PayloadTooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "title" => input.title = TextField::Text(text_value(&name, bytes)?),
            "description" => input.description = TextField::Text(text_value(&name, bytes)?),
            "image" => input.image = image_part(filename, content_type, bytes),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(input)
}

fn image_part(filename: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> ImageField {
    match filename {
        // Browsers send an empty, unnamed file part when nothing was picked.
        Some(name) if name.is_empty() && bytes.is_empty() => ImageField::Absent,
        Some(name) => {
            let file = UploadedFile::new(name, bytes);
            ImageField::File(match content_type {
                Some(ct) => file.with_content_type(ct),
                None => file,
            })
        }
        None if bytes.is_empty() => ImageField::Absent,
        None => ImageField::Malformed,
    }
}

fn text_value(field: &str, bytes: Vec<u8>) -> AppResult<String> {
    String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest(format!("Field '{}' is not valid UTF-8", field)))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {}", err))
}
