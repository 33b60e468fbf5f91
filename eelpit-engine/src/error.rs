// error.rs - Construction errors
//
// Ticks never fail. Only building a world (or decoding the host's
// options for one) can go wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PitError {
    #[error("invalid viewport {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("could not decode pit options: {0}")]
    Options(String),
}

impl From<serde_wasm_bindgen::Error> for PitError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Options(err.to_string())
    }
}
