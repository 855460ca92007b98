//! JSON extractor that runs `validator` rules after deserializing
//!
//! Malformed bodies are answered with 400, rule violations with 422 and a
//! message naming every offending field, nested ones included
//! (`weeklySlots[1].weekday: ...`).

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::ApiError;

/// ```ignore
/// async fn handler(ValidatedJson(body): ValidatedJson<AssignPackRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => {
                ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
                    .into_response()
            }
            Self::Invalid(errors) => {
                let mut messages = Vec::new();
                collect_messages("", &errors, &mut messages);
                let message = if messages.is_empty() {
                    "Validation failed".to_string()
                } else {
                    messages.join("; ")
                };
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, message).into_response()
            }
        }
    }
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(format!("{}: {}", path, msg));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::{Deserialize, Serialize};
    use tower::ServiceExt;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct Slot {
        #[validate(range(max = 6))]
        weekday: u8,
    }

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        #[validate(length(min = 1, max = 20))]
        name: String,
        #[validate(length(min = 1), nested)]
        weekly_slots: Vec<Slot>,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<Payload>) -> &'static str {
        "ok"
    }

    async fn post_json(body: &'static str) -> (StatusCode, String) {
        let app = Router::new().route("/test", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let (status, body) = post_json(r#"{"name":"Ana","weeklySlots":[{"weekday":1}]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = post_json("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn nested_violation_names_the_item() {
        let (status, body) =
            post_json(r#"{"name":"Ana","weeklySlots":[{"weekday":1},{"weekday":9}]}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("weekly_slots[1].weekday"), "{}", body);
    }
}
