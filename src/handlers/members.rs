//! Member routes: listing, role assignment and moderation.

use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

use crate::{
    error::ApiError,
    handlers::proxy::{DiscordProxy, envelope, list_limit, parse_body, required, success},
    models::{MemberRoleTarget, MemberTarget, MembersQuery, ModerationAction, ModerationAuditEvent},
    services::{DiscordClient, Endpoint, UpstreamRequest},
};

const DEFAULT_MEMBER_LIMIT: u32 = 100;

const ROLE_TARGET_REQUIRED: &str = "Guild ID, User ID, and Role ID required";
const MEMBER_TARGET_REQUIRED: &str = "Guild ID and User ID required";

/// List guild members
#[api_v2_operation(
    summary = "List Members",
    description = "Returns up to `limit` (default 100) guild members as {\"members\": [...]}.",
    tags("Members"),
    responses(
        (status = 200, description = "Member list"),
        (status = 400, description = "Guild ID required, or Discord rejected the limit"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn members(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    query: web::Query<MembersQuery>,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let guild_id =
        required(&query.guild_id).ok_or_else(|| ApiError::bad_request("Guild ID required"))?;
    let limit = list_limit(query.limit.as_deref(), DEFAULT_MEMBER_LIMIT);

    let members = proxy
        .fetch(
            UpstreamRequest::get(Endpoint::GuildMembers { guild_id }).query("limit", limit),
            "Failed to fetch members",
        )
        .await?;

    Ok(envelope("members", members))
}

/// Give a member a role
#[api_v2_operation(
    summary = "Assign Role",
    description = "Body: {\"guildId\", \"userId\", \"roleId\"}. Returns {\"success\": true}.",
    tags("Members"),
    responses(
        (status = 200, description = "Role assigned"),
        (status = 400, description = "Guild ID, User ID, and Role ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn assign_role(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    change_member_role(req, client, body, RoleChange::Assign).await
}

/// Take a role away from a member
#[api_v2_operation(
    summary = "Remove Role",
    description = "Body: {\"guildId\", \"userId\", \"roleId\"}. Returns {\"success\": true}.",
    tags("Members"),
    responses(
        (status = 200, description = "Role removed"),
        (status = 400, description = "Guild ID, User ID, and Role ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn remove_role(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    change_member_role(req, client, body, RoleChange::Remove).await
}

#[derive(Clone, Copy)]
enum RoleChange {
    Assign,
    Remove,
}

async fn change_member_role(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
    change: RoleChange,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: MemberRoleTarget = parse_body(&body)?;

    let (Some(guild_id), Some(user_id), Some(role_id)) = (
        required(&payload.guild_id),
        required(&payload.user_id),
        required(&payload.role_id),
    ) else {
        return Err(ApiError::bad_request(ROLE_TARGET_REQUIRED).into());
    };

    let endpoint = Endpoint::GuildMemberRole {
        guild_id,
        user_id,
        role_id,
    };
    let (request, failure, action) = match change {
        RoleChange::Assign => (
            UpstreamRequest::put(endpoint),
            "Failed to assign role",
            ModerationAction::AssignRole,
        ),
        RoleChange::Remove => (
            UpstreamRequest::delete(endpoint),
            "Failed to remove role",
            ModerationAction::RemoveRole,
        ),
    };

    let result = proxy.execute(request, failure).await;

    ModerationAuditEvent::new(&req, action)
        .guild(guild_id)
        .target(user_id)
        .record(&result);

    result?;
    Ok(success())
}

/// Remove a member from the guild
#[api_v2_operation(
    summary = "Kick Member",
    description = "Body: {\"guildId\", \"userId\"}. Returns {\"success\": true}.",
    tags("Members"),
    responses(
        (status = 200, description = "Member kicked"),
        (status = 400, description = "Guild ID and User ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn kick_member(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: MemberTarget = parse_body(&body)?;

    let (Some(guild_id), Some(user_id)) = (required(&payload.guild_id), required(&payload.user_id))
    else {
        return Err(ApiError::bad_request(MEMBER_TARGET_REQUIRED).into());
    };

    let result = proxy
        .execute(
            UpstreamRequest::delete(Endpoint::GuildMember { guild_id, user_id }),
            "Failed to kick member",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::KickMember)
        .guild(guild_id)
        .target(user_id)
        .record(&result);

    result?;
    Ok(success())
}

/// Ban a member
#[api_v2_operation(
    summary = "Ban Member",
    description = "Body: {\"guildId\", \"userId\"}. Creates a guild ban and returns {\"success\": true}.",
    tags("Members"),
    responses(
        (status = 200, description = "Member banned"),
        (status = 400, description = "Guild ID and User ID required"),
        (status = 401, description = "Authorization required")
    )
)]
pub async fn ban_member(
    req: HttpRequest,
    client: web::Data<DiscordClient>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let proxy = DiscordProxy::authorize(&req, &client)?;
    let payload: MemberTarget = parse_body(&body)?;

    let (Some(guild_id), Some(user_id)) = (required(&payload.guild_id), required(&payload.user_id))
    else {
        return Err(ApiError::bad_request(MEMBER_TARGET_REQUIRED).into());
    };

    let result = proxy
        .execute(
            UpstreamRequest::put(Endpoint::GuildBan { guild_id, user_id }),
            "Failed to ban member",
        )
        .await;

    ModerationAuditEvent::new(&req, ModerationAction::BanMember)
        .guild(guild_id)
        .target(user_id)
        .record(&result);

    result?;
    Ok(success())
}
