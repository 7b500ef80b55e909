//! Logo embedding: data-URI decoding, fitting, background clearing, overlay.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::{EngineError, LOGO_MARGIN, LOGO_SIZE_RATIO};

/// Cheap shape check for logo values arriving over the wire.
pub fn is_image_data_uri(value: &str) -> bool {
    value
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(','))
        .is_some()
}

/// Decode a `data:image/...;base64,` URI into an image.
pub fn decode_data_uri(uri: &str) -> Result<DynamicImage, EngineError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EngineError::LogoDecode("not a data URI".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| EngineError::LogoDecode("missing data payload".into()))?;

    if !meta.starts_with("image/") {
        return Err(EngineError::LogoDecode(format!(
            "unsupported media type {meta:?}"
        )));
    }
    if !meta.ends_with(";base64") {
        return Err(EngineError::LogoDecode("expected base64 encoding".into()));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| EngineError::LogoDecode(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| EngineError::LogoDecode(e.to_string()))
}

/// Embed a logo into the center of a rendered symbol.
///
/// The logo is fitted into a `LOGO_SIZE_RATIO` box, the modules behind it
/// (plus `LOGO_MARGIN`) are cleared, and the logo is alpha-composited on top.
pub fn embed(canvas: &mut RgbaImage, data_uri: &str) -> Result<(), EngineError> {
    let logo = decode_data_uri(data_uri)?;

    let box_side = ((canvas.width() as f32) * LOGO_SIZE_RATIO).round() as u32;
    let scaled = fit_within(&logo, box_side.max(1));

    let x0 = (canvas.width() - scaled.width()) / 2;
    let y0 = (canvas.height() - scaled.height()) / 2;

    clear_behind(canvas, x0, y0, scaled.width(), scaled.height());
    overlay(canvas, &scaled, x0, y0);

    debug!(
        logo_w = scaled.width(),
        logo_h = scaled.height(),
        "Embedded logo"
    );
    Ok(())
}

/// Fit an image inside a `side`×`side` box, preserving aspect ratio.
///
/// Uses Lanczos3 filtering; the image is returned unchanged if it already fits.
fn fit_within(img: &DynamicImage, side: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    if w <= side && h <= side {
        return img.clone();
    }

    if w >= h {
        let ratio = f64::from(side) / f64::from(w);
        let new_h = ((f64::from(h) * ratio).round() as u32).max(1);
        img.resize_exact(side, new_h, FilterType::Lanczos3)
    } else {
        let ratio = f64::from(side) / f64::from(h);
        let new_w = ((f64::from(w) * ratio).round() as u32).max(1);
        img.resize_exact(new_w, side, FilterType::Lanczos3)
    }
}

/// Clear the modules behind the logo area plus its margin.
fn clear_behind(canvas: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32) {
    let left = x0.saturating_sub(LOGO_MARGIN);
    let top = y0.saturating_sub(LOGO_MARGIN);
    let right = (x0 + w + LOGO_MARGIN).min(canvas.width());
    let bottom = (y0 + h + LOGO_MARGIN).min(canvas.height());

    for y in top..bottom {
        for x in left..right {
            canvas.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }
}

/// Alpha-composite `top` onto `base` at the given position.
fn overlay(base: &mut RgbaImage, top: &DynamicImage, x: u32, y: u32) {
    let top_rgba = top.to_rgba8();
    for (dx, dy, pixel) in top_rgba.enumerate_pixels() {
        let tx = x + dx;
        let ty = y + dy;
        if tx >= base.width() || ty >= base.height() {
            continue;
        }
        let alpha = pixel[3] as f32 / 255.0;
        if alpha > 0.99 {
            base.put_pixel(tx, ty, *pixel);
        } else if alpha > 0.01 {
            let bg = *base.get_pixel(tx, ty);
            base.put_pixel(tx, ty, blend_pixel(&bg, pixel, alpha));
        }
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Encode a solid-colored PNG as a data URI.
    fn png_data_uri(width: u32, height: u32, color: Rgba<u8>) -> String {
        let img = RgbaImage::from_pixel(width, height, color);
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(&bytes))
    }

    #[test]
    fn data_uri_shape_check() {
        assert!(is_image_data_uri("data:image/png;base64,AAAA"));
        assert!(is_image_data_uri("data:image/jpeg;base64,/9j/4AAQ"));
        assert!(!is_image_data_uri("data:text/plain;base64,AAAA"));
        assert!(!is_image_data_uri("https://example.com/logo.png"));
        assert!(!is_image_data_uri("data:image/png;base64"));
    }

    #[test]
    fn decode_roundtrips_png_payload() {
        let uri = png_data_uri(12, 8, Rgba([200, 10, 10, 255]));
        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!(decoded.width(), 12);
        assert_eq!(decoded.height(), 8);
    }

    #[test]
    fn decode_rejects_non_image_and_malformed_uris() {
        for bad in [
            "https://example.com/a.png",
            "data:text/plain;base64,AAAA",
            "data:image/png;base64",
            "data:image/png;base64,!!!not-base64!!!",
        ] {
            assert!(decode_data_uri(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn fit_within_downscales_but_never_upscales() {
        let tall = DynamicImage::ImageRgba8(RgbaImage::new(10, 100));
        let fitted = fit_within(&tall, 40);
        assert_eq!(fitted.height(), 40);
        assert_eq!(fitted.width(), 4);

        let small = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        assert_eq!(fit_within(&small, 40).width(), 10);
    }

    #[test]
    fn embed_centers_the_logo_and_clears_behind_it() {
        let mut canvas = RgbaImage::from_pixel(200, 200, Rgba([0, 0, 255, 255]));
        let uri = png_data_uri(400, 400, Rgba([255, 0, 0, 255]));
        embed(&mut canvas, &uri).unwrap();

        // Center pixel comes from the logo, the margin ring is cleared,
        // pixels outside the cleared area keep the symbol color.
        assert_eq!(*canvas.get_pixel(100, 100), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(100, 55), Rgba([0, 0, 0, 0]));
        assert_eq!(*canvas.get_pixel(5, 5), Rgba([0, 0, 255, 255]));
    }
}
