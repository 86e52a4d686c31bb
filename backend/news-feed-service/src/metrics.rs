//! Prometheus metrics for news-feed-service.
//!
//! Exposes feed collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Feed service operations segmented by operation and result (ok, validation, not_found, error).
    pub static ref FEED_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_operations_total",
        "Feed service operations segmented by operation and result",
        &["operation", "result"]
    )
    .expect("failed to register feed_operations_total");

    /// Engagement edge toggles segmented by kind, action and outcome.
    pub static ref FEED_ENGAGEMENT_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_engagement_total",
        "Engagement edge toggles segmented by kind, action and outcome",
        &["kind", "action", "outcome"]
    )
    .expect("failed to register feed_engagement_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
