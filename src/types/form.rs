use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use log::{debug, warn};
use percent_encoding::percent_decode;

/// Form field holding the page text
pub const BODY_FIELD: &str = "body";

/// Largest save request accepted, matching what browsers post for big pages
pub const MAX_FORM_BYTES: usize = 10 << 20;

/// The edit form as submitted. The body is kept as raw bytes, so whatever the
/// client encoded is stored without any charset conversion.
///
/// The field is read from an urlencoded or multipart body, falling back to
/// the query string. Any other content type, or a body without the field,
/// gives an empty page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveForm {
    pub body: Vec<u8>,
}

impl SaveForm {
    /// Value of `name` in an `application/x-www-form-urlencoded` payload,
    /// decoded to bytes. The first occurrence wins.
    pub fn urlencoded_value(input: &[u8], name: &str) -> Option<Vec<u8>> {
        input
            .split(|&b| b == b'&')
            .filter(|pair| !pair.is_empty())
            .find_map(|pair| {
                let (key, value) = match pair.iter().position(|&b| b == b'=') {
                    Some(i) => (&pair[..i], &pair[i + 1..]),
                    None => (pair, &pair[..0]),
                };
                (decode_component(key) == name.as_bytes()).then(|| decode_component(value))
            })
    }
}

/// `+` is a space, then `%XX` escapes
fn decode_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw.iter().map(|&b| if b == b'+' { b' ' } else { b }).collect();
    percent_decode(&spaced).collect()
}

/// Media type without parameters, lowercased
fn media_type(request: &Request) -> String {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// First multipart field called `name`. Malformed input reads as absent,
/// but an oversized body is passed back as its rejection.
async fn multipart_value(mut multipart: Multipart, name: &str) -> Result<Option<Vec<u8>>, Response> {
    loop {
        let read = match multipart.next_field().await {
            Ok(Some(field)) if field.name() != Some(name) => continue,
            Ok(Some(field)) => field.bytes().await.map(|bytes| Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        return match read {
            Ok(value) => Ok(value),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(e.into_response()),
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                Ok(None)
            }
        };
    }
}

#[async_trait]
impl<S> FromRequest<S> for SaveForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = req
            .uri()
            .query()
            .and_then(|q| Self::urlencoded_value(q.as_bytes(), BODY_FIELD));

        let posted = match media_type(&req).as_str() {
            "application/x-www-form-urlencoded" => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                Self::urlencoded_value(&bytes, BODY_FIELD)
            }
            "multipart/form-data" => match Multipart::from_request(req, state).await {
                Ok(multipart) => multipart_value(multipart, BODY_FIELD).await?,
                Err(e) => {
                    warn!("Rejected multipart body: {}", e);
                    None
                }
            },
            other => {
                debug!("Ignoring save body with content type '{}'", other);
                None
            }
        };

        Ok(Self { body: posted.or(from_query).unwrap_or_default() })
    }
}
