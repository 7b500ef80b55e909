//! Low-level module and finder-pattern drawing.
//!
//! Everything here writes pixels directly (no blending): the finder rings are
//! built by painting the outer shape and punching the inner area back to
//! transparent.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::config::{CornerStyle, DotStyle};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Per-corner rounding radii for a square cell, in pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CornerRadii {
    pub tl: f32,
    pub tr: f32,
    pub br: f32,
    pub bl: f32,
}

impl CornerRadii {
    pub(crate) fn uniform(radius: f32) -> Self {
        Self {
            tl: radius,
            tr: radius,
            br: radius,
            bl: radius,
        }
    }

    /// Main diagonal (top-left and bottom-right) rounded, off diagonal flatter.
    pub(crate) fn diagonal(main: f32, off: f32) -> Self {
        Self {
            tl: main,
            tr: off,
            br: main,
            bl: off,
        }
    }
}

/// Fill a `side`×`side` square at (`x0`, `y0`) with per-corner rounding.
pub(crate) fn fill_rounded_square(
    img: &mut RgbaImage,
    x0: u32,
    y0: u32,
    side: u32,
    radii: CornerRadii,
    color: Rgba<u8>,
) {
    let s = side as f32;
    let clamp = |r: f32| r.clamp(0.0, s / 2.0);
    let (tl, tr, br, bl) = (clamp(radii.tl), clamp(radii.tr), clamp(radii.br), clamp(radii.bl));

    for dy in 0..side {
        for dx in 0..side {
            // Sample at pixel centers so the circular corners stay symmetric.
            let fx = dx as f32 + 0.5;
            let fy = dy as f32 + 0.5;

            let inside = if tl > 0.0 && fx < tl && fy < tl {
                dist_sq(fx, fy, tl, tl) <= tl * tl
            } else if tr > 0.0 && fx > s - tr && fy < tr {
                dist_sq(fx, fy, s - tr, tr) <= tr * tr
            } else if br > 0.0 && fx > s - br && fy > s - br {
                dist_sq(fx, fy, s - br, s - br) <= br * br
            } else if bl > 0.0 && fx < bl && fy > s - bl {
                dist_sq(fx, fy, bl, s - bl) <= bl * bl
            } else {
                true
            };

            if inside {
                let px = x0 + dx;
                let py = y0 + dy;
                if px < img.width() && py < img.height() {
                    img.put_pixel(px, py, color);
                }
            }
        }
    }
}

fn dist_sq(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy
}

/// Draw one data module at (`x`, `y`) with a cell side of `scale` pixels.
pub(crate) fn draw_module(
    img: &mut RgbaImage,
    x: u32,
    y: u32,
    scale: u32,
    style: DotStyle,
    color: Rgba<u8>,
) {
    let s = scale as f32;
    match style {
        DotStyle::Square => fill_rounded_square(img, x, y, scale, CornerRadii::uniform(0.0), color),
        DotStyle::Rounded => {
            fill_rounded_square(img, x, y, scale, CornerRadii::uniform(s * 0.25), color)
        }
        DotStyle::ExtraRounded => {
            fill_rounded_square(img, x, y, scale, CornerRadii::uniform(s * 0.5), color)
        }
        DotStyle::Dots => {
            // Inset circle, leaving a gap between neighboring dots.
            let radius = ((s * 0.4).round() as i32).max(1);
            let center = ((x + scale / 2) as i32, (y + scale / 2) as i32);
            draw_filled_circle_mut(img, center, radius, color);
        }
        DotStyle::Classy => {
            fill_rounded_square(img, x, y, scale, CornerRadii::diagonal(s * 0.5, 0.0), color)
        }
        DotStyle::ClassyRounded => {
            fill_rounded_square(img, x, y, scale, CornerRadii::diagonal(s * 0.5, s * 0.25), color)
        }
    }
}

/// Draw one finder pattern whose top-left corner sits at (`x`, `y`).
///
/// The 7-module ring takes the corner-square style; the 3-module center is
/// always the round dot type with the same color.
pub(crate) fn draw_finder(
    img: &mut RgbaImage,
    x: u32,
    y: u32,
    scale: u32,
    style: CornerStyle,
    color: Rgba<u8>,
) {
    let outer = scale * 7;
    let inner = scale * 5;

    let (outer_radii, inner_radii) = match style {
        CornerStyle::Square => (CornerRadii::uniform(0.0), CornerRadii::uniform(0.0)),
        CornerStyle::ExtraRounded => (
            CornerRadii::uniform(outer as f32 * 0.35),
            CornerRadii::uniform(inner as f32 * 0.35),
        ),
    };

    fill_rounded_square(img, x, y, outer, outer_radii, color);
    fill_rounded_square(img, x + scale, y + scale, inner, inner_radii, TRANSPARENT);

    let radius = ((scale * 3) as f32 / 2.0).round() as i32;
    let center = ((x + outer / 2) as i32, (y + outer / 2) as i32);
    draw_filled_circle_mut(img, center, radius, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(side: u32) -> RgbaImage {
        RgbaImage::from_pixel(side, side, TRANSPARENT)
    }

    #[test]
    fn zero_radius_fills_the_whole_cell() {
        let mut img = canvas(20);
        fill_rounded_square(&mut img, 5, 5, 10, CornerRadii::uniform(0.0), Rgba([1, 2, 3, 255]));
        assert_eq!(*img.get_pixel(5, 5), Rgba([1, 2, 3, 255]));
        assert_eq!(*img.get_pixel(14, 14), Rgba([1, 2, 3, 255]));
        assert_eq!(*img.get_pixel(4, 4), TRANSPARENT);
    }

    #[test]
    fn full_radius_clips_the_corners() {
        let mut img = canvas(20);
        fill_rounded_square(&mut img, 0, 0, 20, CornerRadii::uniform(10.0), Rgba([9, 9, 9, 255]));
        // Center stays filled, extreme corner pixels fall outside the circle.
        assert_eq!(*img.get_pixel(10, 10), Rgba([9, 9, 9, 255]));
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(19, 19), TRANSPARENT);
    }

    #[test]
    fn diagonal_radii_only_round_the_main_diagonal() {
        let mut img = canvas(20);
        fill_rounded_square(
            &mut img,
            0,
            0,
            20,
            CornerRadii::diagonal(10.0, 0.0),
            Rgba([7, 7, 7, 255]),
        );
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(19, 19), TRANSPARENT);
        assert_eq!(*img.get_pixel(19, 0), Rgba([7, 7, 7, 255]));
        assert_eq!(*img.get_pixel(0, 19), Rgba([7, 7, 7, 255]));
    }

    #[test]
    fn finder_draws_ring_and_center_dot() {
        let scale = 10u32;
        let mut img = canvas(scale * 7);
        let color = Rgba([10, 20, 30, 255]);
        draw_finder(&mut img, 0, 0, scale, CornerStyle::Square, color);

        // Outer ring, white gap, center dot.
        assert_eq!(*img.get_pixel(2, 35), color);
        assert_eq!(*img.get_pixel(15, 35), TRANSPARENT);
        assert_eq!(*img.get_pixel(35, 35), color);
    }

    #[test]
    fn fill_is_clipped_to_the_canvas() {
        let mut img = canvas(10);
        fill_rounded_square(&mut img, 5, 5, 10, CornerRadii::uniform(0.0), Rgba([1, 1, 1, 255]));
        assert_eq!(*img.get_pixel(9, 9), Rgba([1, 1, 1, 255]));
    }
}
