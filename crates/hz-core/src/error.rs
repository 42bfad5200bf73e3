use thiserror::Error;

pub type HzResult<T> = Result<T, HzError>;

#[derive(Error, Debug)]
pub enum HzError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown zone index: {index}")]
    UnknownZone { index: u32 },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
