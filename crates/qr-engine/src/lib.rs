//! Styled QR code rendering engine.
//!
//! Turns a [`RenderConfig`] into a raster image: matrix generation via the
//! `qrcode` crate, per-module shape drawing, finder-pattern styling, optional
//! centered logo, and PNG export.

pub mod config;
pub mod logo;
pub mod render;
mod shapes;

pub use config::{CornerStyle, DotStyle, QrSize, RenderConfig};
pub use render::{AppliedOptions, QrRenderer};

/// Fraction of the canvas width the embedded logo may occupy.
pub const LOGO_SIZE_RATIO: f32 = 0.4;

/// Padding in pixels kept clear around the embedded logo.
pub const LOGO_MARGIN: u32 = 10;

/// Quiet-zone width in modules around the symbol.
pub const QUIET_ZONE_MODULES: u32 = 2;

/// Unified error type for the qr-engine crate.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("QR encode error: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    #[error("logo decode error: {0}")]
    LogoDecode(String),

    #[error("PNG encode error: {0}")]
    Png(#[from] image::ImageError),

    #[error("nothing rendered yet")]
    NoRender,
}
