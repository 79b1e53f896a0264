// Setup-time errors. The per-tick path never fails; it degrades silently.

/// A tuning value that would make a controller divide by zero or run backwards
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TuningError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{lower} ({lower_value}) must not exceed {upper} ({upper_value})")]
    OutOfOrder {
        lower: &'static str,
        lower_value: f32,
        upper: &'static str,
        upper_value: f32,
    },
}

/// Why an entity could not be added to the arena
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpawnError {
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),

    #[error("a player is already spawned")]
    PlayerExists,
}

/// Require `value > 0`
pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive { field, value })
    }
}

/// Require `value >= 0`
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { field, value })
    }
}
