//! Channel webhook routes.

use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use serde_json::json;

use crate::{
    error::ApiError,
    handlers::proxy::{DiscordProxy, envelope, parse_body, required, success},
    models::{
        ChannelQuery, CreateWebhookRequest, ModerationAction, ModerationAuditEvent, WebhookTarget,
    },
    services::{DiscordClient, Endpoint, UpstreamRequest},
};

/// List a channel's webhooks
///
/// Webhook objects include their execute tokens; they are returned to the
/// dashboard as-is but never logged.
#[api_v2_operation(
    summary = "List Webhooks",
    description = "Returns the channel's webhooks as {\"webhooks\": [...]}.",
    tags("Webhooks"),
    responses(
        (status = 200, description = "Webhook list"),
        (status = 400, description = "Channel ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn webhooks(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    query: web::Query<ChannelQuery>,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let channel_id =
        required(&query.channel_id).ok_or_else(|| ApiError::bad_request("Channel ID required"))?;

    let webhooks = proxy
        .fetch(
            UpstreamRequest::get(Endpoint::ChannelWebhooks { channel_id }),
            "Failed to fetch webhooks",
        )
        .await?;

    Ok(envelope("webhooks", webhooks))
}

/// Create a webhook
#[api_v2_operation(
    summary = "Create Webhook",
    description = "Body: {\"channelId\", \"name\"}. Returns {\"webhook\": {...}}.",
    tags("Webhooks"),
    responses(
        (status = 200, description = "Created webhook"),
        (status = 400, description = "Channel ID and name required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn create_webhook(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: CreateWebhookRequest = parse_body(&body)?;

    let (Some(channel_id), Some(name)) = (required(&payload.channel_id), required(&payload.name))
    else {
        return Err(ApiError::bad_request("Channel ID and name required").into());
    };

    let result = proxy
        .fetch(
            UpstreamRequest::post(Endpoint::ChannelWebhooks { channel_id })
                .json(json!({ "name": name })),
            "Failed to create webhook",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::CreateWebhook)
        .channel(channel_id)
        .record(&result);

    Ok(envelope("webhook", result?))
}

/// Delete a webhook
#[api_v2_operation(
    summary = "Delete Webhook",
    description = "Body: {\"webhookId\"}. Returns {\"success\": true}.",
    tags("Webhooks"),
    responses(
        (status = 200, description = "Webhook deleted"),
        (status = 400, description = "Webhook ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn delete_webhook(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: WebhookTarget = parse_body(&body)?;
    let webhook_id =
        required(&payload.webhook_id).ok_or_else(|| ApiError::bad_request("Webhook ID required"))?;

    let result = proxy
        .execute(
            UpstreamRequest::delete(Endpoint::Webhook { webhook_id }),
            "Failed to delete webhook",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::DeleteWebhook)
        .target(webhook_id)
        .record(&result);

    result?;
    Ok(success())
}
