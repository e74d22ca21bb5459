//! HTTP utility functions for extracting request information.

use actix_web::{HttpMessage, HttpRequest, http::header};

use crate::middleware::RequestId;

/// Extract client IP address from request headers
///
/// Attempts to extract the real client IP from various proxy headers,
/// falling back to the connection remote address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    // Check for common proxy headers in order of preference
    let ip_headers = ["X-Forwarded-For", "X-Real-IP", "CF-Connecting-IP"];

    for header_name in ip_headers {
        let Some(value) = req.headers().get(header_name).and_then(|h| h.to_str().ok()) else {
            continue;
        };
        // X-Forwarded-For can contain multiple IPs, take the first one
        let ip = value.split(',').next().unwrap_or(value).trim();
        if !ip.is_empty() {
            return ip.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// The caller's `Authorization` header, if present, valid and non-empty.
///
/// The value is forwarded upstream exactly as received.
pub fn extract_authorization(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Request ID assigned by [`RequestIdMiddleware`](crate::middleware::RequestIdMiddleware)
pub fn request_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn first_forwarded_address_wins() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "198.51.100.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "198.51.100.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.4:5555".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "192.0.2.4");
    }

    #[test]
    fn authorization_must_be_non_empty() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bot abc"))
            .to_http_request();
        assert_eq!(extract_authorization(&req).as_deref(), Some("Bot abc"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "   "))
            .to_http_request();
        assert_eq!(extract_authorization(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_authorization(&req), None);
    }

    #[test]
    fn request_id_comes_from_extensions() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(request_id(&req), None);

        req.extensions_mut().insert(RequestId("abc".to_string()));
        assert_eq!(request_id(&req).as_deref(), Some("abc"));
    }
}
