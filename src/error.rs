use thiserror::Error;

/// Returned when calling a wrapper that holds no callable.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Error)]
#[error("tried to call an empty function")]
pub struct BadFunctionCall;
