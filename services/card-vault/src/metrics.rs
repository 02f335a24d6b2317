use card_core::CardError;
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    // Card lifecycle metrics
    pub static ref CARDS_ENROLLED: IntCounter = IntCounter::new(
        "cards_enrolled_total",
        "Total card credentials sealed and stored"
    ).expect("metric can be created");

    pub static ref CARDS_UPDATED: IntCounter = IntCounter::new(
        "cards_updated_total",
        "Total card credentials updated"
    ).expect("metric can be created");

    pub static ref CARDS_DELETED: IntCounter = IntCounter::new(
        "cards_deleted_total",
        "Total card credentials deleted"
    ).expect("metric can be created");

    pub static ref SALT_ROTATIONS: IntCounter = IntCounter::new(
        "salt_rotations_total",
        "Total updates that changed secret material and rotated the salt"
    ).expect("metric can be created");

    pub static ref VALIDATION_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "card_validation_failures_total",
            "Total card submissions rejected by format validation, by field"
        ),
        &["field"]
    ).expect("metric can be created");

    // Verification metrics
    pub static ref VERIFICATION_ATTEMPTS: IntCounter = IntCounter::new(
        "verification_attempts_total",
        "Total presented cards checked against stored credentials"
    ).expect("metric can be created");

    pub static ref VERIFICATION_MATCHES: IntCounter = IntCounter::new(
        "verification_matches_total",
        "Total presented cards that matched a stored credential"
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), Box<dyn std::error::Error>> {
    registry.register(Box::new(CARDS_ENROLLED.clone()))?;
    registry.register(Box::new(CARDS_UPDATED.clone()))?;
    registry.register(Box::new(CARDS_DELETED.clone()))?;
    registry.register(Box::new(SALT_ROTATIONS.clone()))?;
    registry.register(Box::new(VALIDATION_FAILURES.clone()))?;
    registry.register(Box::new(VERIFICATION_ATTEMPTS.clone()))?;
    registry.register(Box::new(VERIFICATION_MATCHES.clone()))?;

    Ok(())
}

/// Count a card format rejection under the field that failed
pub fn record_card_rejection(err: &CardError) {
    let field = match err {
        CardError::UnknownNetwork => "network",
        CardError::InvalidNumberFormat { .. } => "number",
        CardError::InvalidCvvFormat { .. } => "cvv",
        CardError::InvalidExpiryFormat { .. } => "expiry",
    };
    VALIDATION_FAILURES.with_label_values(&[field]).inc();
}

/// Generate metrics output in Prometheus text format
pub fn metrics_handler() -> Result<String, Box<dyn std::error::Error>> {
    let registry = Registry::new();
    register_metrics(&registry)?;

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
