use thiserror::Error;

/// Errors raised while configuring or driving a tick [`Producer`](crate::producer::Producer).
///
/// Disposal never fails, so nothing on the subscription side returns this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("tick interval must be greater than zero")]
    ZeroInterval,
    #[error("producer has been stopped and cannot be restarted")]
    Stopped,
    #[error("no tokio runtime available to drive the producer timer")]
    NoRuntime,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
