#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("step {target} is not reachable from step {current} (highest reached: {high_water})")]
    NavigationRejected {
        current: u32,
        target: u32,
        high_water: u32,
    },
    #[error("operation rejected: {reason}")]
    OperationInProgress { reason: &'static str },
    #[error("`{operation}` is not available at step {step}")]
    NotAtStep { operation: &'static str, step: u32 },
    #[error("wizard session is closed")]
    Closed,
    #[error("invalid wizard step definitions: {0}")]
    Configuration(String),
}

impl WizardError {
    /// Operator-facing rejections that leave the wizard usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NavigationRejected { .. } | Self::OperationInProgress { .. } | Self::NotAtStep { .. }
        )
    }
}
