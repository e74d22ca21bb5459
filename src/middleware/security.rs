//! Security headers middleware implementation.

use crate::config::SecurityHeadersConfig;
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

/// Security headers middleware factory
///
/// Header values are validated once when the middleware is built; a
/// configured value that is not a legal header value is skipped with a warning.
pub struct SecurityHeaders {
    headers: Rc<Vec<(HeaderName, HeaderValue)>>,
}

impl SecurityHeaders {
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self {
            headers: Rc::new(security_headers(&config)),
        }
    }
}

/// Resolve the configured header set
fn security_headers(config: &SecurityHeadersConfig) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = Vec::new();

    if config.content_type_options {
        headers.push((
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ));
    }

    if config.xss_protection {
        headers.push((
            HeaderName::from_static("x-xss-protection"),
            HeaderValue::from_static("1; mode=block"),
        ));
    }

    let mut configured = vec![
        ("x-frame-options", config.frame_options.clone()),
        ("referrer-policy", config.referrer_policy.clone()),
    ];
    if config.csp_enabled {
        configured.push(("content-security-policy", config.csp_directives.clone()));
    }
    if config.hsts_enabled {
        configured.push((
            "strict-transport-security",
            format!("max-age={}", config.hsts_max_age),
        ));
    }

    for (name, value) in configured {
        match HeaderValue::from_str(&value) {
            Ok(value) => headers.push((HeaderName::from_static(name), value)),
            Err(_) => tracing::warn!(header = name, "Skipping invalid security header value"),
        }
    }

    headers
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service,
            headers: Rc::clone(&self.headers),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: S,
    headers: Rc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        let headers = Rc::clone(&self.headers);

        Box::pin(async move {
            let mut res = fut.await?;
            let response_headers = res.headers_mut();
            for (name, value) in headers.iter() {
                response_headers.insert(name.clone(), value.clone());
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CSP;

    fn header<'a>(headers: &'a [(HeaderName, HeaderValue)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .and_then(|(_, v)| v.to_str().ok())
    }

    #[test]
    fn default_header_set() {
        let headers = security_headers(&SecurityHeadersConfig::default());

        assert_eq!(header(&headers, "x-content-type-options"), Some("nosniff"));
        assert_eq!(header(&headers, "x-frame-options"), Some("DENY"));
        assert_eq!(header(&headers, "referrer-policy"), Some("no-referrer"));
        assert_eq!(header(&headers, "content-security-policy"), Some(DEFAULT_CSP));
        assert_eq!(
            header(&headers, "strict-transport-security"),
            Some("max-age=31536000")
        );
    }

    #[test]
    fn disabled_and_invalid_headers_are_left_out() {
        let config = SecurityHeadersConfig {
            csp_enabled: false,
            hsts_enabled: false,
            xss_protection: false,
            frame_options: "bad\nvalue".to_string(),
            ..SecurityHeadersConfig::default()
        };
        let headers = security_headers(&config);

        assert_eq!(header(&headers, "content-security-policy"), None);
        assert_eq!(header(&headers, "strict-transport-security"), None);
        assert_eq!(header(&headers, "x-xss-protection"), None);
        assert_eq!(header(&headers, "x-frame-options"), None);
        assert_eq!(header(&headers, "referrer-policy"), Some("no-referrer"));
    }
}
