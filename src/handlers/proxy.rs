//! Shared plumbing for the Discord proxy routes.
//!
//! Every proxied route authorizes the caller, validates its inputs, makes
//! exactly one upstream call through [`DiscordClient`] and wraps the result
//! in a one-key envelope.

use actix_web::{HttpRequest, HttpResponse, error::QueryPayloadError, web};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    error::ApiError,
    models::SuccessResponse,
    services::{DiscordClient, SimpleRateLimiter, UpstreamRequest, rate_limit_middleware},
    utils::http::extract_authorization,
};

/// An authorized caller bound to the shared Discord client
pub struct DiscordProxy<'a> {
    client: &'a DiscordClient,
    authorization: String,
}

impl<'a> DiscordProxy<'a> {
    /// Require a non-empty `Authorization` header, then apply the rate limit.
    pub fn authorize(req: &HttpRequest, client: &'a DiscordClient) -> Result<Self, ApiError> {
        let authorization = extract_authorization(req).ok_or(ApiError::Unauthorized)?;

        if let Some(limiter) = req.app_data::<web::Data<SimpleRateLimiter>>() {
            rate_limit_middleware(req, limiter)?;
        }

        Ok(Self {
            client,
            authorization,
        })
    }

    /// Bearer of an already known credential, used by token validation
    pub fn with_authorization(client: &'a DiscordClient, authorization: String) -> Self {
        Self {
            client,
            authorization,
        }
    }

    /// Make the call and return the decoded payload, unchanged.
    ///
    /// A non-2xx upstream status becomes [`ApiError::Upstream`] carrying that
    /// status and `failure` as the message.
    pub async fn fetch(
        &self,
        request: UpstreamRequest<'_>,
        failure: &'static str,
    ) -> Result<Value, ApiError> {
        let response = self.client.send(&self.authorization, request).await?;
        if !response.is_success() {
            return Err(ApiError::Upstream {
                status: response.status,
                message: failure,
            });
        }
        Ok(response.json()?)
    }

    /// Make the call and discard the payload. Discord answers most deletions with 204.
    pub async fn execute(
        &self,
        request: UpstreamRequest<'_>,
        failure: &'static str,
    ) -> Result<(), ApiError> {
        let response = self.client.send(&self.authorization, request).await?;
        if !response.is_success() {
            return Err(ApiError::Upstream {
                status: response.status,
                message: failure,
            });
        }
        Ok(())
    }
}

/// A present, non-blank field
pub fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

/// Decode a request body. An empty body reads as `{}`; anything that is not
/// a JSON object is rejected.
pub fn parse_body<T: DeserializeOwned + Default>(body: &web::Bytes) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(parse_object(body)?))
        .map_err(|_| ApiError::bad_request("Invalid JSON body"))
}

/// Decode a request body as a raw JSON object
pub fn parse_object(body: &web::Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::bad_request("Invalid JSON body")),
    }
}

/// The `limit` to forward: the caller's value as given, or `default` when absent.
/// Discord validates the value itself.
pub fn list_limit(limit: Option<&str>, default: u32) -> String {
    match limit.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value.to_string(),
        None => default.to_string(),
    }
}

/// Rejection for query strings the extractor cannot decode, such as a
/// repeated `guildId`. Callers without credentials still get 401 first.
pub fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    if extract_authorization(req).is_none() {
        return ApiError::Unauthorized.into();
    }

    tracing::debug!(error = %err, path = %req.path(), "Rejected query string");
    ApiError::bad_request("Invalid query string").into()
}

/// `200 {"<key>": payload}`
pub fn envelope(key: &str, payload: Value) -> HttpResponse {
    let mut body = Map::with_capacity(1);
    body.insert(key.to_string(), payload);
    HttpResponse::Ok().json(Value::Object(body))
}

/// `200 {"success": true}`
pub fn success() -> HttpResponse {
    HttpResponse::Ok().json(SuccessResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberTarget;

    #[test]
    fn required_rejects_blank_values() {
        assert_eq!(required(&Some("123".to_string())), Some("123"));
        assert_eq!(required(&Some("  ".to_string())), None);
        assert_eq!(required(&None), None);
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        let target: MemberTarget = parse_body(&web::Bytes::new()).unwrap();
        assert!(target.guild_id.is_none());

        let target: MemberTarget = parse_body(&web::Bytes::from_static(b" \n")).unwrap();
        assert!(target.user_id.is_none());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        for body in ["[1,2]", "\"text\"", "{not json", r#"{"guildId": true}"#] {
            let err = parse_body::<MemberTarget>(&web::Bytes::copy_from_slice(body.as_bytes()))
                .unwrap_err();
            assert_eq!(err.public_message(), "Invalid JSON body");
        }
    }

    #[test]
    fn numeric_identifiers_count_as_present() {
        let target: MemberTarget =
            parse_body(&web::Bytes::from_static(br#"{"guildId": 5, "userId": "6"}"#)).unwrap();
        assert_eq!(required(&target.guild_id), Some("5"));
        assert_eq!(required(&target.user_id), Some("6"));
    }

    #[test]
    fn limits() {
        assert_eq!(list_limit(None, 100), "100");
        assert_eq!(list_limit(Some(" "), 50), "50");
        assert_eq!(list_limit(Some("25"), 50), "25");
        assert_eq!(list_limit(Some("0"), 50), "0");
        assert_eq!(list_limit(Some("ten"), 50), "ten");
    }

    #[test]
    fn query_errors_check_authorization_first() {
        use actix_web::{ResponseError, http::StatusCode};

        let payload_error = || {
            QueryPayloadError::Deserialize(serde::de::Error::custom("duplicate field `guildId`"))
        };

        let anonymous = actix_web::test::TestRequest::default().to_http_request();
        let err = query_error(payload_error(), &anonymous);
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let authorized = actix_web::test::TestRequest::default()
            .insert_header(("Authorization", "Bot abc"))
            .to_http_request();
        let err = query_error(payload_error(), &authorized);
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn envelope_wraps_payload() {
        let resp = envelope("channels", serde_json::json!([{"id": "1"}]));
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({"channels": [{"id": "1"}]}));
    }
}
