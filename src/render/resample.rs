use std::{f32::consts::PI, ops::Range};

use image::RgbaImage;

/// Lanczos3 lobe count; also the kernel support radius in source pixels at 1:1.
const LANCZOS_SUPPORT: f32 = 3.0;

/// Resample `src` to a virtual `out_w × out_h` image with Lanczos3 and return only the
/// `cols × rows` window of it.
///
/// Memory is proportional to the window, never to the full virtual target, so a huge scale
/// factor costs nothing for the parts that are cropped away. The window must lie inside the
/// virtual target.
pub fn resize_window(
    src: &RgbaImage,
    out_w: u32,
    out_h: u32,
    cols: Range<u32>,
    rows: Range<u32>,
) -> RgbaImage {
    let (win_w, win_h) = (cols.len() as u32, rows.len() as u32);
    let (sw, sh) = src.dimensions();
    if win_w == 0 || win_h == 0 || sw == 0 || sh == 0 {
        return RgbaImage::new(win_w, win_h);
    }
    if (out_w, out_h) == (sw, sh) {
        return image::imageops::crop_imm(src, cols.start, rows.start, win_w, win_h).to_image();
    }

    let tmp = vertical_pass(src, out_h, rows);
    horizontal_pass(&tmp, sw, win_h, out_w, cols)
}

/// Filter taps for one output sample: first source index and normalized weights.
struct Taps {
    first: u32,
    weights: Vec<f32>,
}

fn taps(in_len: u32, out_len: u32, out_idx: u32) -> Taps {
    let ratio = in_len as f32 / out_len as f32;
    let sratio = ratio.max(1.0);
    let support = LANCZOS_SUPPORT * sratio;

    let center = (out_idx as f32 + 0.5) * ratio;
    let last = in_len as i64 - 1;
    let left = ((center - support).floor() as i64).clamp(0, last);
    let right = ((center + support).ceil() as i64).clamp(left + 1, in_len as i64);

    let center = center - 0.5;
    let mut weights: Vec<f32> = (left..right)
        .map(|i| lanczos3((i as f32 - center) / sratio))
        .collect();
    let sum: f32 = weights.iter().sum();
    if sum != 0.0 {
        for w in &mut weights {
            *w /= sum;
        }
    }
    Taps {
        first: left as u32,
        weights,
    }
}

/// Rows of the window at full source width, straight RGBA as `f32`.
fn vertical_pass(src: &RgbaImage, out_h: u32, rows: Range<u32>) -> Vec<[f32; 4]> {
    let (sw, sh) = src.dimensions();
    let mut out = Vec::with_capacity(sw as usize * rows.len());
    for oy in rows {
        let t = taps(sh, out_h, oy);
        for x in 0..sw {
            let mut acc = [0f32; 4];
            for (k, &w) in t.weights.iter().enumerate() {
                let px = src.get_pixel(x, t.first + k as u32).0;
                for c in 0..4 {
                    acc[c] += w * f32::from(px[c]);
                }
            }
            out.push(acc);
        }
    }
    out
}

fn horizontal_pass(
    tmp: &[[f32; 4]],
    src_w: u32,
    win_h: u32,
    out_w: u32,
    cols: Range<u32>,
) -> RgbaImage {
    let col_taps: Vec<Taps> = cols.clone().map(|ox| taps(src_w, out_w, ox)).collect();
    let mut out = RgbaImage::new(cols.len() as u32, win_h);
    for y in 0..win_h {
        let start = y as usize * src_w as usize;
        let row = &tmp[start..start + src_w as usize];
        for (x, t) in col_taps.iter().enumerate() {
            let mut acc = [0f32; 4];
            for (k, &w) in t.weights.iter().enumerate() {
                let px = row[(t.first + k as u32) as usize];
                for c in 0..4 {
                    acc[c] += w * px[c];
                }
            }
            out.put_pixel(x as u32, y, image::Rgba(acc.map(to_u8)));
        }
    }
    out
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn sinc(t: f32) -> f32 {
    if t == 0.0 {
        1.0
    } else {
        let a = t * PI;
        a.sin() / a
    }
}

fn lanczos3(x: f32) -> f32 {
    if x.abs() < LANCZOS_SUPPORT {
        sinc(x) * sinc(x / LANCZOS_SUPPORT)
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/resample.rs"]
mod tests;
