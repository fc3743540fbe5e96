use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Metrics collection for the cart store
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // Cart metrics
    pub cart_operations_total: CounterVec,
    pub cart_items: Gauge,
    pub notifications_total: CounterVec,

    // Lookup metrics
    pub lookup_requests_total: CounterVec,
    pub lookup_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Create a new metrics instance with all required metrics registered
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        info!("Initializing Prometheus metrics");

        let cart_operations_total = CounterVec::new(
            Opts::new(
                "cart_operations_total",
                "Total number of cart operations; adding a product already in the cart also counts as an amount update",
            ),
            &["operation", "status"],
        )?;

        let cart_items = Gauge::new("cart_items", "Number of distinct products in the cart")?;

        let notifications_total = CounterVec::new(
            Opts::new(
                "cart_notifications_total",
                "Total number of user-facing notifications emitted",
            ),
            &["operation", "kind"],
        )?;

        let lookup_requests_total = CounterVec::new(
            Opts::new(
                "lookup_requests_total",
                "Total number of product catalog and stock lookups",
            ),
            &["service", "status"],
        )?;

        let lookup_duration_seconds = HistogramVec::new(
            HistogramOpts::new("lookup_duration_seconds", "Lookup duration in seconds")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["service"],
        )?;

        registry.register(Box::new(cart_operations_total.clone()))?;
        registry.register(Box::new(cart_items.clone()))?;
        registry.register(Box::new(notifications_total.clone()))?;
        registry.register(Box::new(lookup_requests_total.clone()))?;
        registry.register(Box::new(lookup_duration_seconds.clone()))?;

        info!("Prometheus metrics initialized successfully");

        Ok(Metrics {
            registry,
            cart_operations_total,
            cart_items,
            notifications_total,
            lookup_requests_total,
            lookup_duration_seconds,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    /// Record the outcome of a cart operation; `status` is "success" or an error kind
    pub fn record_cart_operation(&self, operation: &str, status: &str) {
        self.cart_operations_total
            .with_label_values(&[operation, status])
            .inc();
    }

    pub fn record_notification(&self, operation: &str, kind: &str) {
        self.notifications_total
            .with_label_values(&[operation, kind])
            .inc();
    }

    /// Record a catalog or stock lookup
    pub fn record_lookup(&self, service: &str, success: bool, duration_seconds: f64) {
        let status = if success { "success" } else { "error" };

        self.lookup_requests_total
            .with_label_values(&[service, status])
            .inc();

        self.lookup_duration_seconds
            .with_label_values(&[service])
            .observe(duration_seconds);
    }

    pub fn set_cart_items(&self, count: usize) {
        self.cart_items.set(count as f64);
    }
}
