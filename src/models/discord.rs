//! Inputs accepted by the Discord proxy routes.
//!
//! Every identifier is optional at the type level so that a missing field
//! reaches the handler and produces the route's own 400 message instead of
//! a deserialization error.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Deserializer, Serialize};

/// `?guildId=` for channel, role and guild-settings listings
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct GuildQuery {
    pub guild_id: Option<String>,
}

/// `?guildId=&limit=` for member listings
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct MembersQuery {
    pub guild_id: Option<String>,
    /// Maximum number of members, defaults to 100
    pub limit: Option<String>,
}

/// `?channelId=` for webhook listings
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelQuery {
    pub channel_id: Option<String>,
}

/// `?channelId=&limit=` for message history
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQuery {
    pub channel_id: Option<String>,
    /// Maximum number of messages, defaults to 50
    pub limit: Option<String>,
}

/// Accept an identifier sent either as a JSON string or as a bare number
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    }))
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ValidateTokenRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub guild_id: Option<String>,
    pub name: Option<String>,
    /// Discord channel type; 0 (text) when absent
    #[serde(rename = "type")]
    pub channel_type: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTarget {
    #[serde(default, deserialize_with = "string_or_number")]
    pub channel_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub guild_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTarget {
    #[serde(default, deserialize_with = "string_or_number")]
    pub guild_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub role_id: Option<String>,
}

/// Kick and ban target
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTarget {
    #[serde(default, deserialize_with = "string_or_number")]
    pub guild_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
}

/// Role assignment and removal target
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRoleTarget {
    #[serde(default, deserialize_with = "string_or_number")]
    pub guild_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub role_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub channel_id: Option<String>,
    pub content: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub channel_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTarget {
    #[serde(default, deserialize_with = "string_or_number")]
    pub webhook_id: Option<String>,
}

/// The bot identity returned by `validate-token`, cut down from Discord's user object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct BotProfile {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ValidateTokenResponse {
    pub success: bool,
    pub bot: BotProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_use_camel_case_keys() {
        let body: MemberRoleTarget =
            serde_json::from_str(r#"{"guildId":"1","userId":"2","roleId":"3"}"#).unwrap();
        assert_eq!(body.guild_id.as_deref(), Some("1"));
        assert_eq!(body.user_id.as_deref(), Some("2"));
        assert_eq!(body.role_id.as_deref(), Some("3"));
    }

    #[test]
    fn numeric_identifiers_read_as_strings() {
        let body: MemberRoleTarget =
            serde_json::from_str(r#"{"guildId":1,"userId":"2","roleId":80351110224678912}"#).unwrap();
        assert_eq!(body.guild_id.as_deref(), Some("1"));
        assert_eq!(body.user_id.as_deref(), Some("2"));
        assert_eq!(body.role_id.as_deref(), Some("80351110224678912"));

        let body: ValidateTokenRequest = serde_json::from_str(r#"{"token":123}"#).unwrap();
        assert_eq!(body.token.as_deref(), Some("123"));

        let body: ChannelTarget = serde_json::from_str(r#"{"channelId":null}"#).unwrap();
        assert_eq!(body.channel_id, None);

        assert!(serde_json::from_str::<ChannelTarget>(r#"{"channelId":true}"#).is_err());
    }

    #[test]
    fn channel_type_reads_the_type_key() {
        let body: CreateChannelRequest =
            serde_json::from_str(r#"{"guildId":"1","name":"voice","type":2}"#).unwrap();
        assert_eq!(body.channel_type, Some(2));

        let body: CreateChannelRequest = serde_json::from_str(r#"{"type":null}"#).unwrap();
        assert_eq!(body.channel_type, None);
    }

    #[test]
    fn bot_profile_drops_unrelated_user_fields() {
        let user = serde_json::json!({
            "id": "80351110224678912",
            "username": "Nelly",
            "discriminator": "1337",
            "avatar": null,
            "bot": true,
            "mfa_enabled": false
        });
        let profile: BotProfile = serde_json::from_value(user).unwrap();
        let rendered = serde_json::to_value(&profile).unwrap();

        assert_eq!(
            rendered,
            serde_json::json!({
                "id": "80351110224678912",
                "username": "Nelly",
                "discriminator": "1337",
                "avatar": null
            })
        );
    }
}
