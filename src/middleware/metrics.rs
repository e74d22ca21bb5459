//! Request metrics for the dashboard's own HTTP surface.
//!
//! Feeds `http_requests_total` and `http_request_duration_seconds` in
//! [`AppMetrics`]. Upstream Discord calls are counted separately by the
//! Discord client, so a proxied request shows up once here and once there.

use crate::{services::AppMetrics, utils::route::extract_route_pattern};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
    time::Instant,
};

/// Records method, status and latency per route.
///
/// The route label is the matched pattern (`/api/channels`, never the query
/// string), or `/unmatched` for 404s so that scanners cannot grow the label
/// set. Inactive unless [`AppMetrics`] is registered as app data, which
/// `create_app` only does when `METRICS_ENABLED` is on.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(metrics) = req.app_data::<web::Data<AppMetrics>>().cloned() else {
                return service.call(req).await;
            };

            let started = Instant::now();
            let method = req.method().to_string();
            let res = service.call(req).await?;

            // Resolved after routing, so the pattern is known by now
            let route = extract_route_pattern(res.request());
            metrics.record_request(&method, &route, res.status().as_u16(), started.elapsed());
            metrics.update_uptime();

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test};

    #[actix_web::test]
    async fn records_matched_pattern_and_unmatched_fallback() {
        let metrics = web::Data::new(AppMetrics::new().unwrap());
        let app = test::init_service(
            App::new()
                .wrap(MetricsMiddleware)
                .app_data(metrics.clone())
                .route(
                    "/api/channels",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                ),
        )
        .await;

        test::call_service(
            &app,
            test::TestRequest::get().uri("/api/channels?guildId=123").to_request(),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri("/wp-admin").to_request()).await;

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"route="/api/channels""#));
        assert!(text.contains(r#"route="/unmatched""#));
        assert!(!text.contains("wp-admin"));
    }

    #[actix_web::test]
    async fn passes_through_without_registry() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsMiddleware)
                .route("/api/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert!(resp.status().is_success());
    }
}
