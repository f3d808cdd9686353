use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_counter,
    register_int_counter_vec, CounterVec, Encoder, HistogramVec, IntCounter, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Cache Metrics (Redis puzzle cache)
    pub static ref CACHE_HIT_RATIO: CounterVec = register_counter_vec!(
        "cache_hit_ratio",
        "Puzzle cache hit/miss ratio",
        &["result"]
    )
    .unwrap();

    // Business Metrics
    pub static ref GUESSES_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "guesses_submitted_total",
        "Total number of guesses accepted",
        &["correct"]
    )
    .unwrap();

    pub static ref PUZZLES_SOLVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "puzzles_solved_total",
        "Total number of daily puzzles solved",
        &["language"]
    )
    .unwrap();

    pub static ref HINTS_REVEALED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "hints_revealed_total",
        "Total number of hints disclosed",
        &["hint_level"]
    )
    .unwrap();

    pub static ref DAILY_LIMIT_REJECTIONS_TOTAL: IntCounter = register_int_counter!(
        "daily_limit_rejections_total",
        "Submissions rejected because the daily slot was already consumed"
    )
    .unwrap();

    pub static ref USER_LOCK_TIMEOUTS_TOTAL: IntCounter = register_int_counter!(
        "user_lock_timeouts_total",
        "Per-user lock acquisitions that timed out"
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Record cache hit
pub fn record_cache_hit() {
    CACHE_HIT_RATIO.with_label_values(&["hit"]).inc();
}

/// Record cache miss
pub fn record_cache_miss() {
    CACHE_HIT_RATIO.with_label_values(&["miss"]).inc();
}
