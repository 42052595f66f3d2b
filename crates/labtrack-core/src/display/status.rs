//! Status and confirmation message types for operation feedback.

use std::fmt;

use crate::tracker::OperationState;

/// Wrapper type for displaying operation confirmation messages.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }

    /// Status line for a finished tracker operation. `None` while the
    /// operation is idle or pending.
    pub fn from_state(operation: &str, state: &OperationState) -> Option<Self> {
        match state {
            OperationState::Succeeded => Some(Self::success(format!("{operation} succeeded"))),
            OperationState::Failed(reason) => {
                Some(Self::failure(format!("{operation} failed: {reason}")))
            }
            OperationState::Idle | OperationState::Pending => None,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", if self.success { "Success:" } else { "Error:" }, self.message)
    }
}
