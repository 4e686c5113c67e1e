use std::ops::Range;

use image::RgbaImage;

use crate::{
    assets::decode::{PersonImage, ProductImage},
    foundation::error::{TryOnError, TryOnResult},
    render::resample::resize_window,
};

/// Fraction of the person image width the product is scaled to.
pub const DEFAULT_WIDTH_FRACTION: f64 = 0.5;

/// The product's top edge sits at `person_height / DEFAULT_VERTICAL_DIVISOR`.
pub const DEFAULT_VERTICAL_DIVISOR: u32 = 3;

/// Straight RGBA8 pixel.
pub type Rgba8 = [u8; 4];

#[derive(Clone, Copy, Debug, PartialEq)]
/// Tunables of the placement heuristic.
pub struct PlacementParams {
    /// Product width as a fraction of the person width.
    pub width_fraction: f64,
    /// Vertical anchor divisor applied to the person height.
    pub vertical_divisor: u32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            width_fraction: DEFAULT_WIDTH_FRACTION,
            vertical_divisor: DEFAULT_VERTICAL_DIVISOR,
        }
    }
}

impl PlacementParams {
    /// Build validated params. `width_fraction` must be finite and > 0, `vertical_divisor` >= 1.
    pub fn new(width_fraction: f64, vertical_divisor: u32) -> TryOnResult<Self> {
        if !width_fraction.is_finite() || width_fraction <= 0.0 {
            return Err(TryOnError::validation(
                "placement width_fraction must be finite and > 0",
            ));
        }
        if vertical_divisor == 0 {
            return Err(TryOnError::validation(
                "placement vertical_divisor must be >= 1",
            ));
        }
        Ok(Self {
            width_fraction,
            vertical_divisor,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where and how large the product lands on the person canvas.
pub struct Placement {
    /// Left edge in canvas pixels; may lie outside the canvas.
    pub x: i64,
    /// Top edge in canvas pixels; may lie outside the canvas.
    pub y: i64,
    /// Scaled product width.
    pub width: u32,
    /// Scaled product height.
    pub height: u32,
}

#[derive(Clone, Debug)]
/// Composited canvas plus the placement that produced it.
pub struct CompositeResult {
    /// Output pixels, same size as the person image.
    pub image: RgbaImage,
    /// Placement of the scaled product.
    pub placement: Placement,
}

/// Compute the scaled size and offset of a `product` sized image over a `person` sized canvas.
///
/// Width is `floor(pw * width_fraction)`; height keeps the product aspect ratio and is floored.
/// The product is centered horizontally and its top edge anchored at `floor(ph / divisor)`.
pub fn compute_placement(
    person: (u32, u32),
    product: (u32, u32),
    params: PlacementParams,
) -> Placement {
    let (pw, ph) = person;
    let (dw, dh) = product;

    let width = (f64::from(pw) * params.width_fraction).floor() as u32;
    let height = if dw == 0 {
        0
    } else {
        let scale = f64::from(width) / f64::from(dw);
        (f64::from(dh) * scale).floor() as u32
    };

    let x = i64::from(pw / 2) - i64::from(width / 2);
    let y = i64::from(ph / params.vertical_divisor.max(1));

    Placement {
        x,
        y,
        width,
        height,
    }
}

/// Overlay `product` onto a copy of `person` using the placement heuristic.
///
/// The product is Lanczos-resampled to the placement size and pasted with its own alpha as the
/// mask. The canvas never grows; anything outside it is clipped. Only the part of the scaled
/// product that lands on the canvas is ever resampled. Inputs are left untouched.
#[tracing::instrument(skip_all, fields(
    person_w = person.width(),
    person_h = person.height(),
    product_w = product.width(),
    product_h = product.height()
))]
pub fn composite(
    person: &PersonImage,
    product: &ProductImage,
    params: PlacementParams,
) -> CompositeResult {
    let placement = compute_placement(
        (person.width(), person.height()),
        (product.width(), product.height()),
        params,
    );

    let mut canvas = person.as_rgba().clone();
    if let Some((cols, rows)) = visible_window(placement, canvas.dimensions()) {
        let scaled = resize_window(
            product.as_rgba(),
            placement.width,
            placement.height,
            cols.clone(),
            rows.clone(),
        );
        paste_masked(
            &mut canvas,
            &scaled,
            placement.x + i64::from(cols.start),
            placement.y + i64::from(rows.start),
        );
    }
    tracing::debug!(?placement, "composited product");

    CompositeResult {
        image: canvas,
        placement,
    }
}

/// Columns and rows of the scaled product that overlap a `canvas` sized image, in product
/// coordinates. `None` when nothing overlaps.
pub fn visible_window(
    placement: Placement,
    canvas: (u32, u32),
) -> Option<(Range<u32>, Range<u32>)> {
    let axis = |offset: i64, len: u32, canvas_len: u32| {
        let start = (-offset).clamp(0, i64::from(len));
        let end = (i64::from(canvas_len) - offset).clamp(0, i64::from(len));
        (start < end).then(|| start as u32..end as u32)
    };
    let cols = axis(placement.x, placement.width, canvas.0)?;
    let rows = axis(placement.y, placement.height, canvas.1)?;
    Some((cols, rows))
}

/// Paste `src` onto `dst` at `(x, y)`, blending every channel by the source alpha.
///
/// Regions of `src` that fall outside `dst` are skipped.
pub fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for cy in y0..y1 {
        for cx in x0..x1 {
            let s = src.get_pixel((cx - x) as u32, (cy - y) as u32).0;
            let d = dst.get_pixel_mut(cx as u32, cy as u32);
            d.0 = mask_blend(d.0, s);
        }
    }
}

/// Blend `src` over `dst` with `src` alpha as the mask, alpha channel included.
pub fn mask_blend(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let m = u16::from(src[3]);
    if m == 0 {
        return dst;
    }
    if m == 255 {
        return src;
    }

    let inv = 255 - m;
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = div255(u16::from(src[i]) * m + u16::from(dst[i]) * inv);
    }
    out
}

fn div255(x: u16) -> u8 {
    ((u32::from(x) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
