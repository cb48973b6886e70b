use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid input length: expected {expected}, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },

    #[error("non-finite state in neuron {neuron_id}")]
    NonFiniteState { neuron_id: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}
