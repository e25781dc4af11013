use thiserror::Error;

#[derive(Debug, Error)]
pub enum BreathError {
    #[error("invalid noise level for {channel}: {source}")]
    InvalidNoise {
        channel: &'static str,
        #[source]
        source: rand_distr::NormalError,
    },

    #[error("sample worker is no longer running")]
    WorkerDisconnected,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BreathError>;
