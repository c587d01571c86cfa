//! Metrics and observability utilities
//!
//! Prometheus-style metrics with standardized naming.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};

/// Metrics prefix for all DocSage metrics
pub const METRICS_PREFIX: &str = "docsage";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_documents_ingested_total", METRICS_PREFIX),
        Unit::Count,
        "Total documents uploaded and ingested"
    );

    describe_histogram!(
        format!("{}_ingestion_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Upload-to-index latency in seconds"
    );

    describe_counter!(
        format!("{}_questions_total", METRICS_PREFIX),
        Unit::Count,
        "Total questions asked"
    );

    describe_histogram!(
        format!("{}_question_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Question answering latency in seconds"
    );

    describe_counter!(
        format!("{}_challenges_generated_total", METRICS_PREFIX),
        Unit::Count,
        "Total challenge sets generated"
    );

    describe_counter!(
        format!("{}_evaluations_total", METRICS_PREFIX),
        Unit::Count,
        "Total challenge answers evaluated"
    );

    describe_gauge!(
        format!("{}_sessions_active", METRICS_PREFIX),
        Unit::Count,
        "Number of live sessions in the store"
    );

    tracing::info!("Metrics registered");
}

/// Record a completed document ingestion
pub fn record_ingestion(duration_secs: f64, chunk_count: usize) {
    counter!(format!("{}_documents_ingested_total", METRICS_PREFIX)).increment(1);
    histogram!(format!("{}_ingestion_duration_seconds", METRICS_PREFIX)).record(duration_secs);

    counter!(
        format!("{}_chunks_created_total", METRICS_PREFIX)
    )
    .increment(chunk_count as u64);
}

/// Record an answered question
pub fn record_question(duration_secs: f64, answered: bool) {
    let status = if answered { "answered" } else { "no_answer" };
    counter!(
        format!("{}_questions_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(format!("{}_question_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Record a generated challenge set
pub fn record_challenge(question_count: usize) {
    counter!(
        format!("{}_challenges_generated_total", METRICS_PREFIX),
        "questions" => question_count.to_string()
    )
    .increment(1);
}

/// Record an evaluation
pub fn record_evaluation(score: f32) {
    let bucket = if score >= 0.7 {
        "high"
    } else if score >= 0.4 {
        "medium"
    } else {
        "low"
    };
    counter!(
        format!("{}_evaluations_total", METRICS_PREFIX),
        "score" => bucket.to_string()
    )
    .increment(1);
}

/// Update the live-session gauge
pub fn set_active_sessions(count: usize) {
    gauge!(format!("{}_sessions_active", METRICS_PREFIX)).set(count as f64);
}
