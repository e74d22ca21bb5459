//! Role routes.

use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use serde_json::json;

use crate::{
    error::ApiError,
    handlers::proxy::{DiscordProxy, envelope, parse_body, required, success},
    models::{CreateRoleRequest, GuildQuery, ModerationAction, ModerationAuditEvent, RoleTarget},
    services::{DiscordClient, Endpoint, UpstreamRequest},
};

/// List a guild's roles
#[api_v2_operation(
    summary = "List Roles",
    description = "Returns the guild's roles as {\"roles\": [...]}.",
    tags("Roles"),
    responses(
        (status = 200, description = "Role list"),
        (status = 400, description = "Guild ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn roles(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    query: web::Query<GuildQuery>,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let guild_id =
        required(&query.guild_id).ok_or_else(|| ApiError::bad_request("Guild ID required"))?;

    let roles = proxy
        .fetch(
            UpstreamRequest::get(Endpoint::GuildRoles { guild_id }),
            "Failed to fetch roles",
        )
        .await?;

    Ok(envelope("roles", roles))
}

/// Create a role
#[api_v2_operation(
    summary = "Create Role",
    description = "Body: {\"guildId\", \"name\"}. Returns {\"role\": {...}}.",
    tags("Roles"),
    responses(
        (status = 200, description = "Created role"),
        (status = 400, description = "Guild ID and name required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn create_role(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: CreateRoleRequest = parse_body(&body)?;

    let (Some(guild_id), Some(name)) = (required(&payload.guild_id), required(&payload.name))
    else {
        return Err(ApiError::bad_request("Guild ID and name required").into());
    };

    let result = proxy
        .fetch(
            UpstreamRequest::post(Endpoint::GuildRoles { guild_id }).json(json!({ "name": name })),
            "Failed to create role",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::CreateRole)
        .guild(guild_id)
        .record(&result);

    Ok(envelope("role", result?))
}

/// Delete a role
#[api_v2_operation(
    summary = "Delete Role",
    description = "Body: {\"guildId\", \"roleId\"}. Returns {\"success\": true}.",
    tags("Roles"),
    responses(
        (status = 200, description = "Role deleted"),
        (status = 400, description = "Guild ID and Role ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn delete_role(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: RoleTarget = parse_body(&body)?;

    let (Some(guild_id), Some(role_id)) = (required(&payload.guild_id), required(&payload.role_id))
    else {
        return Err(ApiError::bad_request("Guild ID and Role ID required").into());
    };

    let result = proxy
        .execute(
            UpstreamRequest::delete(Endpoint::GuildRole { guild_id, role_id }),
            "Failed to delete role",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::DeleteRole)
        .guild(guild_id)
        .target(role_id)
        .record(&result);

    result?;
    Ok(success())
}
