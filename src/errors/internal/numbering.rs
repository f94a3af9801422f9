use thiserror::Error;

#[derive(Error, Debug)]
pub enum NumberingError {
    /// The counter's owning row could not be loaded. Callers must surface
    /// this instead of substituting a default serial.
    #[error("Counter owner unavailable: {entity}")]
    EntityUnavailable { entity: String },
}

impl NumberingError {
    pub fn entity_unavailable(entity: impl Into<String>) -> Self {
        NumberingError::EntityUnavailable {
            entity: entity.into(),
        }
    }
}
