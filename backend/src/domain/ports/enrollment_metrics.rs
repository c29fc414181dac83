//! Domain port surface for recording enrollment outcomes.
//!
//! Implementations may export to Prometheus or discard outcomes in tests.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording enrollment metrics.
    pub enum EnrollmentMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "enrollment metrics exporter failed: {message}",
    }
}

/// Outcome label attached to every enrollment metric write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentOutcomeLabel {
    Enrolled,
    Cancelled,
    /// Refused by a business rule; carries the rule's stable name.
    Rejected(&'static str),
}

impl EnrollmentOutcomeLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Cancelled => "cancelled",
            Self::Rejected(reason) => reason,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentMetrics: Send + Sync {
    async fn record(&self, outcome: EnrollmentOutcomeLabel) -> Result<(), EnrollmentMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEnrollmentMetrics;

#[async_trait]
impl EnrollmentMetrics for NoOpEnrollmentMetrics {
    async fn record(&self, _outcome: EnrollmentOutcomeLabel) -> Result<(), EnrollmentMetricsError> {
        Ok(())
    }
}
