use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Prometheus collectors for one server instance, each registered with a
/// private [`Registry`].
///
/// - `http_requests_total{method, path, status}`
/// - `http_request_duration_seconds{method, path}`
/// - `db_query_duration_seconds{operation}`
/// - `wishlist_operations_total{operation}`
/// - `user_operations_total{operation}`
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration: HistogramVec,
    db_query_duration: HistogramVec,
    wishlist_operations: IntCounterVec,
    user_operations: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;
        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path"],
        )?;
        let db_query_duration = HistogramVec::new(
            HistogramOpts::new(
                "db_query_duration_seconds",
                "Database query duration in seconds",
            ),
            &["operation"],
        )?;
        let wishlist_operations = IntCounterVec::new(
            Opts::new(
                "wishlist_operations_total",
                "Total number of wishlist operations",
            ),
            &["operation"],
        )?;
        let user_operations = IntCounterVec::new(
            Opts::new("user_operations_total", "Total number of user operations"),
            &["operation"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(db_query_duration.clone()))?;
        registry.register(Box::new(wishlist_operations.clone()))?;
        registry.register(Box::new(user_operations.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
            db_query_duration,
            wishlist_operations,
            user_operations,
        })
    }

    pub fn observe_request(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, path])
            .observe(elapsed.as_secs_f64());
    }

    pub fn observe_query(&self, operation: &str, elapsed: Duration) {
        self.db_query_duration
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }

    pub fn wishlist_op(&self, operation: &str) {
        self.wishlist_operations
            .with_label_values(&[operation])
            .inc();
    }

    pub fn user_op(&self, operation: &str) {
        self.user_operations.with_label_values(&[operation]).inc();
    }

    /// Text exposition format of everything registered.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

/// Counts and times every request. Routes are labelled by their template
/// (`/api/wishlists/:id`), so ids never become label values.
pub async fn track_requests(
    State(metrics): State<Metrics>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;

    metrics.observe_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}
