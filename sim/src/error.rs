use shared::{ParameterError, Position};

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A coordinate outside the grid was passed to a grid operation.
    #[error("position {position} is outside the {width}x{height} grid")]
    InvalidPosition {
        position: Position,
        width: usize,
        height: usize,
    },

    /// The grid and the agent table disagree. Always a bug; aborts the tick.
    #[error("inconsistent simulation state: {0}")]
    InconsistentState(String),

    /// A uniform choice was requested over no candidates.
    #[error("cannot choose from an empty sequence")]
    EmptySequence,

    /// A caller supplied an out-of-range argument, such as a probability above 1.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SimError {
    pub(crate) fn inconsistent(message: impl Into<String>) -> Self {
        SimError::InconsistentState(message.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, SimError::InconsistentState(_))
    }
}

impl From<ParameterError> for SimError {
    fn from(err: ParameterError) -> Self {
        SimError::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_inconsistent_state_is_fatal() {
        assert!(SimError::inconsistent("agent in two cells").is_fatal());
        assert!(!SimError::EmptySequence.is_fatal());
        assert!(!SimError::InvalidArgument("p".into()).is_fatal());
        assert!(!SimError::InvalidPosition {
            position: Position::new(9, 9),
            width: 3,
            height: 3
        }
        .is_fatal());
    }

    #[test]
    fn test_parameter_error_conversion() {
        let err: SimError = ParameterError::ZeroRadius.into();
        assert!(matches!(err, SimError::InvalidArgument(msg) if msg.contains("radius")));
    }

    #[test]
    fn test_invalid_position_message() {
        let err = SimError::InvalidPosition {
            position: Position::new(5, 0),
            width: 5,
            height: 5,
        };
        assert_eq!(err.to_string(), "position (5, 0) is outside the 5x5 grid");
    }
}
