use image::RgbaImage;

#[derive(Clone, Debug, PartialEq)]
/// Decoded upload, straight (non-premultiplied) RGBA8.
pub struct PersonImage(RgbaImage);

#[derive(Clone, Debug, PartialEq)]
/// Decoded product reference image, straight (non-premultiplied) RGBA8.
pub struct ProductImage(RgbaImage);

macro_rules! rgba_wrapper {
    ($ty:ident) => {
        impl $ty {
            /// Wrap an already-decoded RGBA8 buffer.
            pub fn from_rgba(img: RgbaImage) -> Self {
                Self(img)
            }

            /// Width in pixels.
            pub fn width(&self) -> u32 {
                self.0.width()
            }

            /// Height in pixels.
            pub fn height(&self) -> u32 {
                self.0.height()
            }

            /// Borrow the pixel buffer.
            pub fn as_rgba(&self) -> &RgbaImage {
                &self.0
            }

            /// Take ownership of the pixel buffer.
            pub fn into_rgba(self) -> RgbaImage {
                self.0
            }
        }
    };
}

rgba_wrapper!(PersonImage);
rgba_wrapper!(ProductImage);

/// Decode encoded image bytes into straight RGBA8.
///
/// The container format is sniffed from the bytes themselves. Sources without an alpha channel
/// come back fully opaque.
pub fn decode_rgba8(bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
    let dyn_img = image::load_from_memory(bytes)?;
    Ok(dyn_img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
