//! Moderation audit log entries.
//!
//! Every mutating route records one [`ModerationAuditEvent`] after the
//! upstream call, whatever the outcome. The bot token is never part of it.

use actix_web::HttpRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::ApiError,
    utils::http::{extract_client_ip, request_id},
};

/// Mutations the dashboard can perform on a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    CreateChannel,
    DeleteChannel,
    CreateRole,
    DeleteRole,
    AssignRole,
    RemoveRole,
    KickMember,
    BanMember,
    SendMessage,
    CreateWebhook,
    DeleteWebhook,
    UpdateGuildSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
}

/// Structured audit log entry for a guild mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationAuditEvent {
    pub action: ModerationAction,
    pub outcome: Option<AuditOutcome>,
    pub timestamp: DateTime<Utc>,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    /// User, role or webhook the action was aimed at
    pub target_id: Option<String>,
    /// Status returned to the dashboard
    pub status: Option<u16>,
    pub ip_address: String,
    pub request_id: Option<String>,
}

impl ModerationAuditEvent {
    pub fn new(req: &HttpRequest, action: ModerationAction) -> Self {
        Self {
            action,
            outcome: None,
            timestamp: Utc::now(),
            guild_id: None,
            channel_id: None,
            target_id: None,
            status: None,
            ip_address: extract_client_ip(req),
            request_id: request_id(req),
        }
    }

    pub fn guild(mut self, guild_id: &str) -> Self {
        self.guild_id = Some(guild_id.to_string());
        self
    }

    pub fn channel(mut self, channel_id: &str) -> Self {
        self.channel_id = Some(channel_id.to_string());
        self
    }

    pub fn target(mut self, target_id: &str) -> Self {
        self.target_id = Some(target_id.to_string());
        self
    }

    /// Fill in the outcome from the route result and emit the event
    pub fn record<T>(mut self, result: &Result<T, ApiError>) {
        use actix_web::ResponseError;

        match result {
            Ok(_) => {
                self.outcome = Some(AuditOutcome::Success);
                self.status = Some(200);
            }
            Err(err) => {
                self.outcome = Some(AuditOutcome::Failure);
                self.status = Some(err.status_code().as_u16());
            }
        }
        self.log();
    }

    /// Log the audit event using structured logging
    pub fn log(&self) {
        info!(
            target: "moderation_audit",
            action = ?self.action,
            outcome = ?self.outcome,
            timestamp = %self.timestamp,
            guild_id = ?self.guild_id,
            channel_id = ?self.channel_id,
            target_id = ?self.target_id,
            status = ?self.status,
            ip_address = %self.ip_address,
            request_id = ?self.request_id,
            "Moderation audit event"
        );
    }
}
