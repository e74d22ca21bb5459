//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Label for requests that did not match any registered resource
pub const UNMATCHED_ROUTE: &str = "/unmatched";

/// Resolve the registered resource pattern for a request.
///
/// Unknown paths collapse into one label so that scanners cannot grow the
/// metrics label set without bound.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn known_and_unknown_routes() {
        let app = test::init_service(
            App::new()
                .route(
                    "/api/channels",
                    web::get().to(|req: HttpRequest| async move {
                        HttpResponse::Ok().body(extract_route_pattern(&req))
                    }),
                )
                .default_service(web::to(|req: HttpRequest| async move {
                    HttpResponse::NotFound().body(extract_route_pattern(&req))
                })),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/channels?guildId=1").to_request(),
        )
        .await;
        assert_eq!(test::read_body(resp).await, "/api/channels");

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/wp-login.php").to_request(),
        )
        .await;
        assert_eq!(test::read_body(resp).await, UNMATCHED_ROUTE);
    }
}
