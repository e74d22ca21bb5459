//! Bot token validation.

use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use tracing::info;

use crate::{
    error::ApiError,
    handlers::proxy::{DiscordProxy, parse_body, required},
    models::{BotProfile, ValidateTokenRequest, ValidateTokenResponse},
    services::{DiscordClient, Endpoint, SimpleRateLimiter, UpstreamRequest, rate_limit_middleware},
};

const VALIDATION_FAILED: &str = "Failed to validate token";

/// Validate a bot token
///
/// Resolves the token's bot user through `GET /users/@me`. Discord rejecting
/// the token for any reason is reported as 401.
#[api_v2_operation(
    summary = "Validate Bot Token",
    description = "Checks a bot token against Discord and returns the bot's identity. Body: {\"token\": \"...\"}.",
    tags("Authentication"),
    responses(
        (status = 200, description = "Token is valid", body = ValidateTokenResponse),
        (status = 400, description = "Token is required"),
        (status = 401, description = "Invalid bot token"),
        (status = 429, description = "Too Many Requests"),
        (status = 500, description = "Failed to validate token")
    )
)]
pub async fn validate_token(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    if let Some(limiter) = req.app_data::<web::Data<SimpleRateLimiter>>() {
        rate_limit_middleware(&req, limiter)?;
    }

    let payload: ValidateTokenRequest = parse_body(&body)?;
    let token = required(&payload.token).ok_or_else(|| ApiError::bad_request("Token is required"))?;

    let proxy = DiscordProxy::with_authorization(&client, format!("Bot {}", token.trim()));
    let user = proxy
        .fetch(UpstreamRequest::get(Endpoint::CurrentUser), VALIDATION_FAILED)
        .await
        .map_err(|err| match err {
            ApiError::Upstream { .. } => ApiError::InvalidToken,
            other => ApiError::Internal {
                public_message: VALIDATION_FAILED,
                detail: other.to_string(),
            },
        })?;

    let bot: BotProfile = serde_json::from_value(user).map_err(|e| ApiError::Internal {
        public_message: VALIDATION_FAILED,
        detail: format!("unexpected user object: {e}"),
    })?;

    info!(bot_id = %bot.id, username = %bot.username, "Bot token validated");

    Ok(HttpResponse::Ok().json(ValidateTokenResponse { success: true, bot }))
}
