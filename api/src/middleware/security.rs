//! Security middleware adding response headers.
//!
//! Every response gets `Cache-Control: no-store`, since send responses may
//! carry a passcode. In production the hardening headers (HSTS, CSP, frame
//! and sniffing protection) are added as well.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use pv_shared::config::Environment;

/// Security middleware factory
#[derive(Debug, Clone, Copy)]
pub struct SecurityMiddleware {
    /// Whether to add the production hardening headers
    add_security_headers: bool,
}

impl SecurityMiddleware {
    /// Creates the middleware for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        let add_security_headers = environment.is_production();
        tracing::info!(add_security_headers, "Security middleware configured");
        Self {
            add_security_headers,
        }
    }

    /// Only `Cache-Control` is added
    pub fn development() -> Self {
        Self {
            add_security_headers: false,
        }
    }

    /// Full header set
    pub fn production() -> Self {
        Self {
            add_security_headers: true,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            add_security_headers: self.add_security_headers,
        }))
    }
}

/// Security middleware service implementation
pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    add_security_headers: bool,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let add_security_headers = self.add_security_headers;

        Box::pin(async move {
            let mut response = service.call(req).await?;

            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

            if add_security_headers {
                add_security_response_headers(&mut response);
            }

            Ok(response)
        })
    }
}

fn add_security_response_headers<B>(response: &mut ServiceResponse<B>) {
    let headers = response.headers_mut();

    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none';"),
    );
}
