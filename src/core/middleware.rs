use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique_uuids() {
        let request = axum::http::Request::new(());
        let mut maker = MakeRequestUuid;

        let first = maker.make_request_id(&request).expect("request id");
        let second = maker.make_request_id(&request).expect("request id");

        let first = first.header_value().to_str().unwrap().to_string();
        let second = second.header_value().to_str().unwrap().to_string();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_is_set_and_propagated() {
        use axum::{body::Body, routing::get, Router};
        use tower::ServiceExt;
        use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};

        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        let response = app
            .clone()
            .oneshot(
                axum::http::Request::get("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let generated = response.headers().get("x-request-id").unwrap();
        assert!(Uuid::parse_str(generated.to_str().unwrap()).is_ok());

        let response = app
            .oneshot(
                axum::http::Request::get("/health")
                    .header("x-request-id", "client-supplied")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "client-supplied");
    }
}
