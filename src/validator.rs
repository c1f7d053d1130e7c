use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use estore_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request(anyhow!("Missing 'Content-Type: application/json' header"))
        }
        JsonRejection::JsonSyntaxError(_) => AppError::bad_request(anyhow!("Malformed JSON body")),
        JsonRejection::JsonDataError(err) => {
            let detail = err.body_text();
            match detail
                .split("missing field `")
                .nth(1)
                .and_then(|s| s.split('`').next())
            {
                Some(field) => AppError::bad_request(anyhow!("{field} is required")),
                None => AppError::bad_request(anyhow!("Invalid field type in request")),
            }
        }
        _ => AppError::bad_request(anyhow!("Invalid request body")),
    }
}

/// JSON body extractor that runs `validator` rules after deserializing.
///
/// Unparseable bodies and missing fields are rejected with 400; bodies that
/// parse but break a rule are rejected with 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn extract(req: Request) -> Result<ValidatedJson<Payload>, AppError> {
        ValidatedJson::<Payload>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let ValidatedJson(payload) = extract(request(Some("application/json"), r#"{"name":"alice"}"#))
            .await
            .unwrap();
        assert_eq!(payload.name, "alice");
    }

    #[tokio::test]
    async fn test_rule_violation_is_422() {
        let err = extract(request(Some("application/json"), r#"{"name":"al"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.public_message(), "Name must be at least 3 characters");
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let err = extract(request(Some("application/json"), "{}"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "name is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let err = extract(request(Some("application/json"), "{name"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_400() {
        let err = extract(request(None, r#"{"name":"alice"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.public_message().contains("Content-Type"));
    }
}
