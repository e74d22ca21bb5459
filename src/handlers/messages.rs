//! Message history and sending.

use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use serde_json::json;

use crate::{
    error::ApiError,
    handlers::proxy::{DiscordProxy, envelope, list_limit, parse_body, required},
    models::{MessagesQuery, ModerationAction, ModerationAuditEvent, SendMessageRequest},
    services::{DiscordClient, Endpoint, UpstreamRequest},
};

const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// Recent messages in a channel
#[api_v2_operation(
    summary = "List Messages",
    description = "Returns up to `limit` (default 50) recent messages as {\"messages\": [...]}.",
    tags("Messages"),
    responses(
        (status = 200, description = "Message list"),
        (status = 400, description = "Channel ID required, or Discord rejected the limit"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn messages(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    query: web::Query<MessagesQuery>,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let channel_id =
        required(&query.channel_id).ok_or_else(|| ApiError::bad_request("Channel ID required"))?;
    let limit = list_limit(query.limit.as_deref(), DEFAULT_MESSAGE_LIMIT);

    let messages = proxy
        .fetch(
            UpstreamRequest::get(Endpoint::ChannelMessages { channel_id }).query("limit", limit),
            "Failed to fetch messages",
        )
        .await?;

    Ok(envelope("messages", messages))
}

/// Post a message as the bot
#[api_v2_operation(
    summary = "Send Message",
    description = "Body: {\"channelId\", \"content\"}. Returns {\"message\": {...}}.",
    tags("Messages"),
    responses(
        (status = 200, description = "Created message"),
        (status = 400, description = "Channel ID and content required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn send_message(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: SendMessageRequest = parse_body(&body)?;

    let (Some(channel_id), Some(content)) =
        (required(&payload.channel_id), required(&payload.content))
    else {
        return Err(ApiError::bad_request("Channel ID and content required").into());
    };

    let result = proxy
        .fetch(
            UpstreamRequest::post(Endpoint::ChannelMessages { channel_id })
                .json(json!({ "content": content })),
            "Failed to send message",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::SendMessage)
        .channel(channel_id)
        .record(&result);

    Ok(envelope("message", result?))
}
