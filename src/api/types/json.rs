//! Custom JSON extractor that returns errors as JSON

use axum::{
    body::{Body, Bytes},
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Wrapper around `axum::Json` whose rejections use the API error format
///
/// Bodies that do not deserialize are a 400, including type mismatches that
/// plain `axum::Json` would report as 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(rejection_to_error(&rejection)),
        }
    }
}

/// Check a buffered body the way [`Json`] would, without a target type.
///
/// Rejects a missing JSON content type and malformed JSON with the same
/// errors as the extractor. Missing or mistyped fields are left to the handler.
pub async fn ensure_json_body(headers: &HeaderMap, body: Bytes) -> Result<(), ApiError> {
    let mut request = Request::new(Body::from(body));
    *request.headers_mut() = headers.clone();

    AxumJson::<serde_json::Value>::from_request(request, &())
        .await
        .map(|_| ())
        .map_err(|rejection| rejection_to_error(&rejection))
}

fn rejection_to_error(rejection: &JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            ApiError::bad_request("Invalid request body").with_message(err.body_text())
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::bad_request("Invalid JSON").with_message(err.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type",
        )
        .with_message("Expected 'Content-Type: application/json'"),
        other => ApiError::new(other.status(), "Invalid request body").with_message(other.body_text()),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let Json(payload) =
            Json::<Payload>::from_request(request(Some("application/json"), r#"{"name":"a"}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "a");
    }

    #[tokio::test]
    async fn test_type_mismatch_is_bad_request() {
        let err = Json::<Payload>::from_request(request(Some("application/json"), r#"{"name":1}"#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.error, "Invalid request body");
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let err = Json::<Payload>::from_request(request(Some("application/json"), "{"), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.error, "Invalid JSON");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let err = Json::<Payload>::from_request(request(None, r#"{"name":"a"}"#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_ensure_json_body_accepts_any_document() {
        assert!(ensure_json_body(&json_headers(), Bytes::from_static(br#"{"other":1}"#))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_ensure_json_body_rejections() {
        let err = ensure_json_body(&json_headers(), Bytes::from_static(b"not json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.error, "Invalid JSON");

        let err = ensure_json_body(&HeaderMap::new(), Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
