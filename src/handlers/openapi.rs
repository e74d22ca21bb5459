//! OpenAPI specification generation and app factory.

use crate::{
    config::AppConfig,
    error::StartupError,
    handlers::{
        assign_role, ban_member, channels, create_channel, create_role, create_webhook,
        dashboard_script, delete_channel, delete_role, delete_webhook, get_metrics, guild_settings,
        guilds, health, index, kick_member, members, messages, remove_role, roles, send_message,
        update_guild_settings, validate_token, version, webhooks,
        proxy::query_error,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders},
    services::{AppMetrics, DiscordClient, DiscordClientMetrics, SimpleRateLimiter},
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Bot Dashboard API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Authenticated proxy between the bot dashboard and the Discord REST API (v10).\n\n\
                ## Authorization\n\
                Every `/api/*` Discord route except `validate-token` requires an `Authorization` header, \
                normally `Bot <token>`. It is forwarded to Discord verbatim and never stored.\n\
                \n\
                ## Envelopes\n\
                - Success: `{\"<resource>\": <Discord JSON>}` or `{\"success\": true}`\n\
                - Failure: `{\"error\": \"<message>\"}`\n\
                \n\
                ## Status codes\n\
                - `400`: a required field is missing, the body is not a JSON object, or `limit` is not a positive integer\n\
                - `401`: missing `Authorization` header, or a rejected token on `validate-token`\n\
                - `429`: per-client rate limit exceeded\n\
                - Discord's own status is forwarded unchanged when Discord rejects a call\n\
                - `500`: Discord could not be reached or answered with an unreadable body".into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Long-lived components shared by every worker.
///
/// Built once before the server starts so that all workers share one Discord
/// connection pool, one rate limiter and one metrics registry.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub client: DiscordClient,
    pub limiter: SimpleRateLimiter,
    pub metrics: AppMetrics,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        let metrics = AppMetrics::new()?;
        let client_metrics = if config.metrics.enabled {
            Some(DiscordClientMetrics::new(&metrics.registry)?)
        } else {
            None
        };
        let client = DiscordClient::new(config.discord.clone(), client_metrics)?;
        let limiter = SimpleRateLimiter::new(config.rate_limit.clone());

        Ok(Self {
            config,
            client,
            limiter,
            metrics,
        })
    }

    pub fn from_env() -> Result<Self, StartupError> {
        Self::new(AppConfig::from_env())
    }
}

/// Creates the application with every route, middleware and shared component
///
/// Used by `main` for each worker and by the integration tests.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppState {
        config,
        client,
        limiter,
        metrics,
    } = state;

    let mut app = App::new()
        .wrap(SecurityHeaders::new(config.security.clone()))
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(client))
        .app_data(web::Data::new(limiter))
        .app_data(web::Data::new(config.metrics.clone()))
        .app_data(actix_web::web::QueryConfig::default().error_handler(query_error));

    if config.metrics.enabled {
        app = app.app_data(web::Data::new(metrics));
    }

    app
        // Service endpoints
        .service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/static/dashboard.js").route(web::get().to(dashboard_script)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        // Discord proxy
        .service(web::resource("/api/validate-token").route(web::post().to(validate_token)))
        .service(web::resource("/api/guilds").route(web::get().to(guilds)))
        .service(web::resource("/api/channels").route(web::get().to(channels)))
        .service(web::resource("/api/create-channel").route(web::post().to(create_channel)))
        .service(web::resource("/api/delete-channel").route(web::delete().to(delete_channel)))
        .service(web::resource("/api/roles").route(web::get().to(roles)))
        .service(web::resource("/api/create-role").route(web::post().to(create_role)))
        .service(web::resource("/api/delete-role").route(web::delete().to(delete_role)))
        .service(web::resource("/api/members").route(web::get().to(members)))
        .service(
            web::resource("/api/assign-role")
                .route(web::put().to(assign_role))
                .route(web::delete().to(remove_role)),
        )
        .service(web::resource("/api/kick-member").route(web::delete().to(kick_member)))
        .service(web::resource("/api/ban-member").route(web::post().to(ban_member)))
        .service(web::resource("/api/messages").route(web::get().to(messages)))
        .service(web::resource("/api/send-message").route(web::post().to(send_message)))
        .service(
            web::resource("/api/webhooks")
                .route(web::get().to(webhooks))
                .route(web::post().to(create_webhook)),
        )
        .service(web::resource("/api/delete-webhook").route(web::delete().to(delete_webhook)))
        .service(
            web::resource("/api/guild-settings")
                .route(web::get().to(guild_settings))
                .route(web::patch().to(update_guild_settings)),
        )
        .with_json_spec_at("/api/spec/v2")
        .build()
}
