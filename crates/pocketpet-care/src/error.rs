//! Error types for the pocketpet-care crate.
//!
//! Precondition failures are not errors: they surface as
//! [`pocketpet_types::ActionOutcome::Rejected`]. The variants here cover
//! arithmetic that cannot be represented, which only corrupt or extreme
//! records can trigger.

/// Errors that can occur while applying care logic to a pet record.
#[derive(Debug, thiserror::Error)]
pub enum CareError {
    /// An arithmetic overflow occurred during a computation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// A timestamp fell outside the representable range.
    #[error("timestamp out of range: {context}")]
    TimeOutOfRange {
        /// Description of which timestamp was being computed.
        context: String,
    },
}

impl CareError {
    pub(crate) fn overflow(context: &str) -> Self {
        Self::ArithmeticOverflow {
            context: String::from(context),
        }
    }
}
