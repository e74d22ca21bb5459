//! HTTP client for the Discord REST API.
//!
//! Each proxied route makes exactly one call through [`DiscordClient::send`].
//! The caller's `Authorization` header is forwarded unchanged and the
//! upstream status and body are returned as they are. The client does not
//! retry, back off or cache; a non-success status is data for the caller,
//! not an error. Timeouts and metrics are applied per call.

use std::time::{Duration, Instant};

use actix_web::web::Bytes;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use reqwest::{Client, Method, header};
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

use crate::{config::DiscordClientConfig, telemetry::redact_sensitive_data};

/// Longest upstream error body echoed into logs
const LOG_SNIPPET_LIMIT: usize = 512;

/// A Discord REST resource, addressed by its identifiers.
///
/// Identifiers are pushed as single percent-encoded path segments, so a value
/// such as `"1/../2"` can never reach a different resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    CurrentUser,
    CurrentUserGuilds,
    Guild { guild_id: &'a str },
    GuildChannels { guild_id: &'a str },
    GuildRoles { guild_id: &'a str },
    GuildRole { guild_id: &'a str, role_id: &'a str },
    GuildMembers { guild_id: &'a str },
    GuildMember { guild_id: &'a str, user_id: &'a str },
    GuildMemberRole {
        guild_id: &'a str,
        user_id: &'a str,
        role_id: &'a str,
    },
    GuildBan { guild_id: &'a str, user_id: &'a str },
    Channel { channel_id: &'a str },
    ChannelMessages { channel_id: &'a str },
    ChannelWebhooks { channel_id: &'a str },
    Webhook { webhook_id: &'a str },
}

impl<'a> Endpoint<'a> {
    /// Route template used for metric labels and logs; never contains snowflakes.
    pub fn template(&self) -> &'static str {
        match self {
            Endpoint::CurrentUser => "/users/@me",
            Endpoint::CurrentUserGuilds => "/users/@me/guilds",
            Endpoint::Guild { .. } => "/guilds/{guild_id}",
            Endpoint::GuildChannels { .. } => "/guilds/{guild_id}/channels",
            Endpoint::GuildRoles { .. } => "/guilds/{guild_id}/roles",
            Endpoint::GuildRole { .. } => "/guilds/{guild_id}/roles/{role_id}",
            Endpoint::GuildMembers { .. } => "/guilds/{guild_id}/members",
            Endpoint::GuildMember { .. } => "/guilds/{guild_id}/members/{user_id}",
            Endpoint::GuildMemberRole { .. } => "/guilds/{guild_id}/members/{user_id}/roles/{role_id}",
            Endpoint::GuildBan { .. } => "/guilds/{guild_id}/bans/{user_id}",
            Endpoint::Channel { .. } => "/channels/{channel_id}",
            Endpoint::ChannelMessages { .. } => "/channels/{channel_id}/messages",
            Endpoint::ChannelWebhooks { .. } => "/channels/{channel_id}/webhooks",
            Endpoint::Webhook { .. } => "/webhooks/{webhook_id}",
        }
    }

    /// Path segments relative to the API base URL
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Endpoint::CurrentUser => vec!["users", "@me"],
            Endpoint::CurrentUserGuilds => vec!["users", "@me", "guilds"],
            Endpoint::Guild { guild_id } => vec!["guilds", guild_id],
            Endpoint::GuildChannels { guild_id } => vec!["guilds", guild_id, "channels"],
            Endpoint::GuildRoles { guild_id } => vec!["guilds", guild_id, "roles"],
            Endpoint::GuildRole { guild_id, role_id } => vec!["guilds", guild_id, "roles", role_id],
            Endpoint::GuildMembers { guild_id } => vec!["guilds", guild_id, "members"],
            Endpoint::GuildMember { guild_id, user_id } => {
                vec!["guilds", guild_id, "members", user_id]
            }
            Endpoint::GuildMemberRole {
                guild_id,
                user_id,
                role_id,
            } => vec!["guilds", guild_id, "members", user_id, "roles", role_id],
            Endpoint::GuildBan { guild_id, user_id } => vec!["guilds", guild_id, "bans", user_id],
            Endpoint::Channel { channel_id } => vec!["channels", channel_id],
            Endpoint::ChannelMessages { channel_id } => vec!["channels", channel_id, "messages"],
            Endpoint::ChannelWebhooks { channel_id } => vec!["channels", channel_id, "webhooks"],
            Endpoint::Webhook { webhook_id } => vec!["webhooks", webhook_id],
        }
    }
}

/// One upstream call: method, resource, optional query and JSON body.
#[derive(Debug, Clone)]
pub struct UpstreamRequest<'a> {
    pub method: Method,
    pub endpoint: Endpoint<'a>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl<'a> UpstreamRequest<'a> {
    pub fn new(method: Method, endpoint: Endpoint<'a>) -> Self {
        Self {
            method,
            endpoint,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(endpoint: Endpoint<'a>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: Endpoint<'a>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: Endpoint<'a>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: Endpoint<'a>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: Endpoint<'a>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and raw body of an upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON without reshaping it
    pub fn json(&self) -> Result<Value, DiscordClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Operation type for determining the appropriate timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationType {
    Read,
    Write,
}

impl OperationType {
    fn for_method(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD {
            OperationType::Read
        } else {
            OperationType::Write
        }
    }
}

/// Prometheus metrics for upstream Discord calls
#[derive(Clone)]
pub struct DiscordClientMetrics {
    /// Upstream requests by method, route template, and outcome
    pub upstream_requests_total: CounterVec,

    /// Upstream request duration by method and route template
    pub upstream_request_duration_seconds: HistogramVec,
}

impl DiscordClientMetrics {
    /// Create the collectors and register them with `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let upstream_requests_total = CounterVec::new(
            Opts::new(
                "discord_upstream_requests_total",
                "Total Discord API requests by method, route, and outcome",
            ),
            &["method", "route", "outcome"],
        )?;

        let upstream_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "discord_upstream_request_duration_seconds",
                "Duration of Discord API requests",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "route"],
        )?;

        registry.register(Box::new(upstream_requests_total.clone()))?;
        registry.register(Box::new(upstream_request_duration_seconds.clone()))?;

        Ok(Self {
            upstream_requests_total,
            upstream_request_duration_seconds,
        })
    }

    fn record(&self, method: &str, route: &str, outcome: &str, duration: Duration) {
        self.upstream_requests_total
            .with_label_values(&[method, route, outcome])
            .inc();
        self.upstream_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }
}

/// Shared client for the Discord REST API.
///
/// Cheap to clone: the connection pool and metric handles are reference counted.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    base_url: Url,
    config: DiscordClientConfig,
    metrics: Option<DiscordClientMetrics>,
}

impl DiscordClient {
    pub fn new(
        config: DiscordClientConfig,
        metrics: Option<DiscordClientMetrics>,
    ) -> Result<Self, DiscordClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DiscordClientError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(DiscordClientError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url,
            config,
            metrics,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the absolute URL for `endpoint`, percent-encoding every identifier.
    pub fn endpoint_url(
        &self,
        endpoint: &Endpoint<'_>,
        query: &[(&'static str, String)],
    ) -> Result<Url, DiscordClientError> {
        let segments = endpoint.segments();
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(DiscordClientError::InvalidPathSegment((*bad).to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DiscordClientError::InvalidBaseUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Perform one upstream call with `authorization` forwarded verbatim.
    ///
    /// Returns `Ok` for any HTTP response, including 4xx and 5xx. `Err` means
    /// no response was obtained (network failure, timeout, bad identifier).
    pub async fn send(
        &self,
        authorization: &str,
        request: UpstreamRequest<'_>,
    ) -> Result<UpstreamResponse, DiscordClientError> {
        let url = self.endpoint_url(&request.endpoint, &request.query)?;
        let route = request.endpoint.template();
        let method = request.method.as_str().to_owned();

        let timeout = match OperationType::for_method(&request.method) {
            OperationType::Read => Duration::from_secs(self.config.read_timeout_seconds),
            OperationType::Write => Duration::from_secs(self.config.write_timeout_seconds),
        };

        let mut builder = self
            .http
            .request(request.method, url)
            .header(header::AUTHORIZATION, authorization);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let result = tokio::time::timeout(timeout, async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(UpstreamResponse { status, body })
        })
        .await;
        let duration = start.elapsed();

        let (outcome, result) = match result {
            Ok(Ok(response)) if response.is_success() => {
                info!(
                    method = %method,
                    route = %route,
                    status = response.status,
                    duration_ms = duration.as_millis(),
                    "Discord request completed"
                );
                ("success", Ok(response))
            }
            Ok(Ok(response)) => {
                warn!(
                    method = %method,
                    route = %route,
                    status = response.status,
                    duration_ms = duration.as_millis(),
                    body = %log_snippet(&response.body),
                    "Discord request returned error status"
                );
                ("upstream_error", Ok(response))
            }
            Ok(Err(e)) => {
                error!(
                    method = %method,
                    route = %route,
                    error = %e,
                    duration_ms = duration.as_millis(),
                    "Discord request failed with network error"
                );
                ("network_error", Err(DiscordClientError::Network(e)))
            }
            Err(_) => {
                warn!(
                    method = %method,
                    route = %route,
                    timeout_seconds = timeout.as_secs(),
                    "Discord request timed out"
                );
                ("timeout", Err(DiscordClientError::Timeout(timeout)))
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record(&method, route, outcome, duration);
        }

        result
    }
}

/// Redacted, length-limited view of an upstream body for logs
fn log_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let cut = text
        .char_indices()
        .nth(LOG_SNIPPET_LIMIT)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    redact_sensitive_data(&text[..cut])
}

/// Errors raised when no usable upstream response was obtained
#[derive(Debug, thiserror::Error)]
pub enum DiscordClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid Discord API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> DiscordClient {
        let config = DiscordClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        DiscordClient::new(config, None).unwrap()
    }

    #[test]
    fn builds_urls_under_the_api_base() {
        let client = client_for("https://discord.com/api/v10");

        let url = client
            .endpoint_url(&Endpoint::CurrentUserGuilds, &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://discord.com/api/v10/users/@me/guilds");

        let url = client
            .endpoint_url(
                &Endpoint::GuildMemberRole {
                    guild_id: "1",
                    user_id: "2",
                    role_id: "3",
                },
                &[],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://discord.com/api/v10/guilds/1/members/2/roles/3"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let client = client_for("https://discord.com/api/v10/");
        let url = client
            .endpoint_url(&Endpoint::Channel { channel_id: "42" }, &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://discord.com/api/v10/channels/42");
    }

    #[test]
    fn identifiers_are_encoded_as_single_segments() {
        let client = client_for("https://discord.com/api/v10");
        let url = client
            .endpoint_url(&Endpoint::GuildChannels { guild_id: "1/../2" }, &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://discord.com/api/v10/guilds/1%2F..%2F2/channels"
        );
    }

    #[test]
    fn dot_segments_are_rejected() {
        let client = client_for("https://discord.com/api/v10");
        let err = client
            .endpoint_url(&Endpoint::Webhook { webhook_id: ".." }, &[])
            .unwrap_err();
        assert!(matches!(err, DiscordClientError::InvalidPathSegment(_)));
    }

    #[test]
    fn query_pairs_are_appended() {
        let client = client_for("https://discord.com/api/v10");
        let url = client
            .endpoint_url(
                &Endpoint::GuildMembers { guild_id: "9" },
                &[("limit", "100".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://discord.com/api/v10/guilds/9/members?limit=100"
        );
    }

    #[test]
    fn templates_never_embed_identifiers() {
        let endpoint = Endpoint::GuildBan {
            guild_id: "123",
            user_id: "456",
        };
        assert_eq!(endpoint.template(), "/guilds/{guild_id}/bans/{user_id}");
        assert_eq!(endpoint.segments(), vec!["guilds", "123", "bans", "456"]);
    }

    #[test]
    fn rejects_unusable_base_urls() {
        let config = DiscordClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            DiscordClient::new(config, None),
            Err(DiscordClientError::InvalidBaseUrl(_))
        ));

        let config = DiscordClientConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..Default::default()
        };
        assert!(DiscordClient::new(config, None).is_err());
    }

    #[test]
    fn operation_type_follows_method() {
        assert_eq!(OperationType::for_method(&Method::GET), OperationType::Read);
        assert_eq!(OperationType::for_method(&Method::PATCH), OperationType::Write);
        assert_eq!(OperationType::for_method(&Method::DELETE), OperationType::Write);
    }

    #[test]
    fn metrics_register_once_per_registry() {
        let registry = Registry::new();
        assert!(DiscordClientMetrics::new(&registry).is_ok());
        assert!(DiscordClientMetrics::new(&registry).is_err());
    }

    #[test]
    fn log_snippets_are_truncated_and_redacted() {
        let long = "x".repeat(LOG_SNIPPET_LIMIT * 2);
        assert_eq!(log_snippet(long.as_bytes()).len(), LOG_SNIPPET_LIMIT);

        let body = br#"{"token": "abc.def.ghi", "message": "Unknown Webhook"}"#;
        let snippet = log_snippet(body);
        assert!(!snippet.contains("abc.def.ghi"));
        assert!(snippet.contains("Unknown Webhook"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_network_error() {
        // Port 1 on loopback is never listening
        let client = client_for("http://127.0.0.1:1/api/v10");
        let result = client
            .send("Bot test", UpstreamRequest::get(Endpoint::CurrentUser))
            .await;
        assert!(matches!(result, Err(DiscordClientError::Network(_))));
    }

    #[test]
    fn success_range() {
        let ok = UpstreamResponse {
            status: 204,
            body: Bytes::new(),
        };
        let failed = UpstreamResponse {
            status: 404,
            body: Bytes::from_static(b"{}"),
        };
        assert!(ok.is_success());
        assert!(!failed.is_success());
        assert!(ok.json().is_err());
        assert!(failed.json().is_ok());
    }
}
