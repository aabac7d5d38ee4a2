pub mod config;
pub mod decode;
pub mod gui;
pub mod scan;

pub use config::InspectorConfig;
pub use decode::{BitDepths, DecodeGif, GifAnimation, RgbaDecoder};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("GUI error: {0}")]
    Gui(String),
    #[error("Decode error: {0}")]
    Decode(#[from] decode::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
