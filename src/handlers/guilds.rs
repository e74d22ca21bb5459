//! Guild listing and guild settings routes.

use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

use crate::{
    error::ApiError,
    handlers::proxy::{DiscordProxy, envelope, parse_object, required},
    models::{GuildQuery, ModerationAction, ModerationAuditEvent},
    services::{DiscordClient, Endpoint, UpstreamRequest},
};

const GUILD_ID_REQUIRED: &str = "Guild ID required";

/// List the bot's guilds
#[api_v2_operation(
    summary = "List Guilds",
    description = "Returns the guilds the bot belongs to as {\"guilds\": [...]}.",
    tags("Guilds"),
    responses(
        (status = 200, description = "Guild list"),
        (status = 401, description = "Authorization required"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn guilds(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;

    let guilds = proxy
        .fetch(
            UpstreamRequest::get(Endpoint::CurrentUserGuilds),
            "Failed to fetch guilds",
        )
        .await?;

    Ok(envelope("guilds", guilds))
}

/// Fetch a guild's settings
#[api_v2_operation(
    summary = "Get Guild Settings",
    description = "Returns the full guild object as {\"guild\": {...}}.",
    tags("Guilds"),
    responses(
        (status = 200, description = "Guild object"),
        (status = 400, description = "Guild ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn guild_settings(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    query: web::Query<GuildQuery>,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let guild_id = required(&query.guild_id)
        .ok_or_else(|| ApiError::bad_request(GUILD_ID_REQUIRED))?;

    let guild = proxy
        .fetch(
            UpstreamRequest::get(Endpoint::Guild { guild_id }),
            "Failed to fetch guild settings",
        )
        .await?;

    Ok(envelope("guild", guild))
}

/// Update a guild's settings
///
/// Every body key except `guildId` is forwarded to Discord untouched, so any
/// field Discord accepts on `PATCH /guilds/{id}` can be changed.
#[api_v2_operation(
    summary = "Update Guild Settings",
    description = "Body: {\"guildId\": \"...\", ...fields}. Forwards the remaining fields and returns {\"guild\": {...}}.",
    tags("Guilds"),
    responses(
        (status = 200, description = "Updated guild object"),
        (status = 400, description = "Guild ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn update_guild_settings(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let mut settings = parse_object(&body)?;

    let guild_id = match settings.remove("guildId") {
        Some(serde_json::Value::String(id)) if !id.trim().is_empty() => id,
        Some(serde_json::Value::Number(id)) => id.to_string(),
        _ => return Err(ApiError::bad_request(GUILD_ID_REQUIRED).into()),
    };

    let result = proxy
        .fetch(
            UpstreamRequest::patch(Endpoint::Guild {
                guild_id: &guild_id,
            })
            .json(serde_json::Value::Object(settings)),
            "Failed to update guild settings",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::UpdateGuildSettings)
        .guild(&guild_id)
        .record(&result);

    Ok(envelope("guild", result?))
}
