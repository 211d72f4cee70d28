use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::errors::AppError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Id of the current request, available through request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Middleware добавляющий trace/request id
///
/// Входящий `X-Request-Id` переиспользуется, иначе генерируется новый; id
/// возвращается в заголовке ответа. Ответ с [`AppError`] пересобирается с
/// `trace_id` в теле.
pub struct RequestIdTracing;

impl<S, B> Transform<S, ServiceRequest> for RequestIdTracing
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty() && value.len() <= 64)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        req.extensions_mut().insert(RequestId(id.clone()));
        log::debug!("request_id={} {} {}", id, req.method(), req.path());
        let fut = self.service.call(req);
        Box::pin(async move {
            let resp = fut.await?;
            let traced = resp
                .response()
                .error()
                .and_then(|err| err.as_error::<AppError>())
                .map(|err| err.traced_response(&id));
            let mut resp = match traced {
                Some(response) => resp.into_response(response).map_into_right_body(),
                None => resp.map_into_left_body(),
            };
            if let Ok(value) = HeaderValue::from_str(&id) {
                resp.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(resp)
        })
    }
}
