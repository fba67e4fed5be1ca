use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::from_fn;
use axum::{middleware::Next, response::Response, Router};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse the caller's `x-request-id` or mint one, and echo it on the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = header_value.clone() {
        req.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let mut response = next.run(req).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Span factory for `TraceLayer::make_span_with`.
pub fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}

/// Wrap `router` in the trace layer, with the request-id middleware outside it
/// so every span carries the id that is echoed back to the caller.
pub fn with_request_tracing<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[derive(Clone, Default)]
    struct SpanRequestIds(Arc<Mutex<Vec<String>>>);

    struct RequestIdField(Option<String>);

    impl Visit for RequestIdField {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "request_id" {
                self.0 = Some(format!("{:?}", value));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for SpanRequestIds {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            if attrs.metadata().name() != "http_request" {
                return;
            }
            let mut field = RequestIdField(None);
            attrs.record(&mut field);
            if let Some(request_id) = field.0 {
                self.0.lock().unwrap().push(request_id);
            }
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        address
    }

    #[tokio::test]
    async fn test_span_records_generated_request_id() {
        let recorded = SpanRequestIds::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let address =
            serve(with_request_tracing(Router::new().route("/", get(|| async { "ok" })))).await;

        let response = reqwest::get(format!("{}/", address)).await.unwrap();
        let echoed = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();

        assert_ne!(echoed, "-");
        assert_eq!(*recorded.0.lock().unwrap(), vec![echoed]);
    }

    #[tokio::test]
    async fn test_span_records_incoming_request_id() {
        let recorded = SpanRequestIds::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let address =
            serve(with_request_tracing(Router::new().route("/", get(|| async { "ok" })))).await;

        let response = reqwest::Client::new()
            .get(format!("{}/", address))
            .header(REQUEST_ID_HEADER, "req-42")
            .send()
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
        assert_eq!(*recorded.0.lock().unwrap(), vec!["req-42".to_string()]);
    }
}
