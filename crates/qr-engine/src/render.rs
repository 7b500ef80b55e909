//! The renderer: applies a full configuration and keeps the current output.

use image::{DynamicImage, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::config::{CornerStyle, DotStyle, RenderConfig, parse_hex_color};
use crate::{EngineError, QUIET_ZONE_MODULES, logo, shapes};

/// Options as consumed by the last completed render.
///
/// Kept alongside the raster so callers can inspect the output's provenance
/// without re-deriving it from the editable configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AppliedOptions {
    pub data: String,
    pub width: u32,
    pub height: u32,
    pub image: Option<String>,
    pub dots_color: String,
    pub dots_type: DotStyle,
    pub corners_square_type: CornerStyle,
    pub corners_dot_color: String,
}

/// Styled QR renderer.
///
/// Created once and reused for every generate call; [`QrRenderer::update`]
/// replaces the current output wholesale from the full configuration.
#[derive(Default)]
pub struct QrRenderer {
    applied: Option<AppliedOptions>,
    output: Option<RgbaImage>,
}

impl QrRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-render from the full configuration, replacing the previous output.
    ///
    /// On error the previous output and applied options are left untouched.
    pub fn update(&mut self, config: &RenderConfig) -> Result<(), EngineError> {
        let data = config.content.trim().to_string();
        let color = parse_hex_color(&config.dot_color)?;
        let size = config.size.pixels();

        // The logo obscures center modules, so buy headroom with level H.
        let ec = if config.logo.is_some() {
            EcLevel::H
        } else {
            EcLevel::M
        };
        let code = QrCode::with_error_correction_level(data.as_bytes(), ec)?;

        let mut canvas = draw_symbol(&code, size, color, config.dot_style);
        if let Some(uri) = config.logo.as_deref() {
            logo::embed(&mut canvas, uri)?;
        }

        debug!(
            size,
            modules = code.width(),
            style = ?config.dot_style,
            "Rendered QR symbol"
        );

        self.applied = Some(AppliedOptions {
            data,
            width: size,
            height: size,
            image: config.logo.clone(),
            dots_color: config.dot_color.clone(),
            dots_type: config.dot_style,
            corners_square_type: config.dot_style.corner_square_style(),
            corners_dot_color: config.dot_color.clone(),
        });
        self.output = Some(canvas);
        Ok(())
    }

    /// Options consumed by the last completed render.
    pub fn last_applied(&self) -> Option<&AppliedOptions> {
        self.applied.as_ref()
    }

    /// Current raster output.
    pub fn output(&self) -> Option<&RgbaImage> {
        self.output.as_ref()
    }

    /// Encode the current output as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, EngineError> {
        let img = self.output.as_ref().ok_or(EngineError::NoRender)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Rasterize a QR matrix onto an exactly `size`×`size` transparent canvas.
fn draw_symbol(code: &QrCode, size: u32, color: Rgba<u8>, style: DotStyle) -> RgbaImage {
    let modules = code.to_colors();
    let count = code.width() as u32;

    let scale = (size / (count + 2 * QUIET_ZONE_MODULES)).max(1);
    let symbol_px = count * scale;
    let offset = size.saturating_sub(symbol_px) / 2;

    let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));

    for (i, module) in modules.iter().enumerate() {
        if *module != qrcode::Color::Dark {
            continue;
        }
        let mx = (i as u32) % count;
        let my = (i as u32) / count;
        if in_finder(mx, my, count) {
            continue;
        }
        shapes::draw_module(
            &mut canvas,
            offset + mx * scale,
            offset + my * scale,
            scale,
            style,
            color,
        );
    }

    for (fx, fy) in finder_origins(count) {
        shapes::draw_finder(
            &mut canvas,
            offset + fx * scale,
            offset + fy * scale,
            scale,
            style.corner_square_style(),
            color,
        );
    }

    canvas
}

/// Top-left module coordinates of the three finder patterns.
fn finder_origins(count: u32) -> [(u32, u32); 3] {
    [(0, 0), (count - 7, 0), (0, count - 7)]
}

fn in_finder(x: u32, y: u32, count: u32) -> bool {
    (x < 7 && y < 7) || (x >= count - 7 && y < 7) || (x < 7 && y >= count - 7)
}
