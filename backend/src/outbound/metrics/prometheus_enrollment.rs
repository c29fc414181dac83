//! Prometheus adapter for enrollment outcome metrics.
//!
//! # Metric Specification
//!
//! - **Name**: `registrar_enrollment_outcomes_total`
//! - **Type**: Counter
//! - **Labels**:
//!   - `outcome`: `enrolled`, `cancelled`, or the rejecting rule name
//!     (`capacity_exceeded`, `already_enrolled`, ...)

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{EnrollmentMetrics, EnrollmentMetricsError, EnrollmentOutcomeLabel};

/// Prometheus-backed enrollment outcome recorder.
pub struct PrometheusEnrollmentMetrics {
    outcomes_total: CounterVec,
}

impl PrometheusEnrollmentMetrics {
    /// Create and register the counter with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let outcomes_total = CounterVec::new(
            Opts::new(
                "registrar_enrollment_outcomes_total",
                "Enrollment attempts and cancellations by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(outcomes_total.clone()))?;
        Ok(Self { outcomes_total })
    }
}

#[async_trait]
impl EnrollmentMetrics for PrometheusEnrollmentMetrics {
    async fn record(&self, outcome: EnrollmentOutcomeLabel) -> Result<(), EnrollmentMetricsError> {
        self.outcomes_total
            .get_metric_with_label_values(&[outcome.as_str()])
            .map_err(|err| EnrollmentMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}
