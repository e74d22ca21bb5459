//! Channel routes.

use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use serde_json::json;

use crate::{
    error::ApiError,
    handlers::proxy::{DiscordProxy, envelope, parse_body, required, success},
    models::{
        ChannelTarget, CreateChannelRequest, GuildQuery, ModerationAction, ModerationAuditEvent,
    },
    services::{DiscordClient, Endpoint, UpstreamRequest},
};

/// Discord channel type used when the caller does not pick one
const GUILD_TEXT: u32 = 0;

/// List a guild's channels
#[api_v2_operation(
    summary = "List Channels",
    description = "Returns the guild's channels as {\"channels\": [...]}.",
    tags("Channels"),
    responses(
        (status = 200, description = "Channel list"),
        (status = 400, description = "Guild ID required"),
        (status = 401, description = "Authorization required"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn channels(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    query: web::Query<GuildQuery>,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let guild_id =
        required(&query.guild_id).ok_or_else(|| ApiError::bad_request("Guild ID required"))?;

    let channels = proxy
        .fetch(
            UpstreamRequest::get(Endpoint::GuildChannels { guild_id }),
            "Failed to fetch channels",
        )
        .await?;

    Ok(envelope("channels", channels))
}

/// Create a channel
#[api_v2_operation(
    summary = "Create Channel",
    description = "Body: {\"guildId\", \"name\", \"type\"?}. The type defaults to 0 (text). Returns {\"channel\": {...}}.",
    tags("Channels"),
    responses(
        (status = 200, description = "Created channel"),
        (status = 400, description = "Guild ID and name required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn create_channel(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: CreateChannelRequest = parse_body(&body)?;

    let (Some(guild_id), Some(name)) = (required(&payload.guild_id), required(&payload.name))
    else {
        return Err(ApiError::bad_request("Guild ID and name required").into());
    };

    let result = proxy
        .fetch(
            UpstreamRequest::post(Endpoint::GuildChannels { guild_id }).json(json!({
                "name": name,
                "type": payload.channel_type.unwrap_or(GUILD_TEXT),
            })),
            "Failed to create channel",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::CreateChannel)
        .guild(guild_id)
        .record(&result);

    Ok(envelope("channel", result?))
}

/// Delete a channel
#[api_v2_operation(
    summary = "Delete Channel",
    description = "Body: {\"channelId\"}. Returns {\"success\": true}.",
    tags("Channels"),
    responses(
        (status = 200, description = "Channel deleted"),
        (status = 400, description = "Channel ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn delete_channel(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: ChannelTarget = parse_body(&body)?;
    let channel_id =
        required(&payload.channel_id).ok_or_else(|| ApiError::bad_request("Channel ID required"))?;

    let result = proxy
        .execute(
            UpstreamRequest::delete(Endpoint::Channel { channel_id }),
            "Failed to delete channel",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::DeleteChannel)
        .channel(channel_id)
        .record(&result);

    result?;
    Ok(success())
}
