//! Abstracts over the actual image codec so the store core and its tests
//! never depend on a real JPEG decoder.
//!
//! [`ImageBackend`] is the seam: [`JpegBackend`] wraps the `image` crate for
//! production use, [`FakeBackend`] is a deterministic stand-in used by the
//! test suite so resize behavior is verifiable without real JPEG bytes.

use crate::error::{Result, StoreError};

/// Decoded pixel dimensions.
pub type Dimensions = (u32, u32);

/// Operations the store core needs from a JPEG codec.
pub trait ImageBackend: Send + Sync {
    /// Reads the pixel dimensions of a JPEG without fully decoding it.
    fn dimensions(&self, jpeg_bytes: &[u8]) -> Result<Dimensions>;

    /// Decodes, resizes to fit within `target` preserving aspect ratio, and
    /// re-encodes as JPEG. `target` is never exceeded in either axis.
    fn resize(&self, jpeg_bytes: &[u8], target: Dimensions) -> Result<Vec<u8>>;
}

/// Production backend built on the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegBackend;

impl ImageBackend for JpegBackend {
    fn dimensions(&self, jpeg_bytes: &[u8]) -> Result<Dimensions> {
        let img = image::load_from_memory_with_format(jpeg_bytes, image::ImageFormat::Jpeg)
            .map_err(|e| StoreError::ImgLib(e.to_string()))?;
        Ok((img.width(), img.height()))
    }

    fn resize(&self, jpeg_bytes: &[u8], target: Dimensions) -> Result<Vec<u8>> {
        let img = image::load_from_memory_with_format(jpeg_bytes, image::ImageFormat::Jpeg)
            .map_err(|e| StoreError::ImgLib(e.to_string()))?;

        let (tw, th) = clamp_no_upscale(img.width(), img.height(), target);
        let resized = img.resize(tw, th, image::imageops::FilterType::Lanczos3);

        let mut out = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut out);
        resized
            .write_to(&mut cursor, image::ImageFormat::Jpeg)
            .map_err(|e| StoreError::ImgLib(e.to_string()))?;
        Ok(out)
    }
}

/// A resize never enlarges an image: the shrink factor is clamped to at
/// most 1.0 on each axis independently before `image::resize` computes the
/// aspect-preserving fit.
fn clamp_no_upscale(orig_w: u32, orig_h: u32, target: Dimensions) -> Dimensions {
    (target.0.min(orig_w).max(1), target.1.min(orig_h).max(1))
}

/// Deterministic backend for tests: treats the first 8 bytes of the input
/// as a little-endian `(width, height)` pair instead of real JPEG data, and
/// "encodes" by appending the resized dimensions back onto a fixed header.
/// This lets tests assert exact byte content without a real codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeBackend;

impl FakeBackend {
    pub const MAGIC: &'static [u8; 4] = b"FAKE";

    pub fn encode(width: u32, height: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + payload.len());
        out.extend_from_slice(Self::MAGIC);
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn decode(bytes: &[u8]) -> Result<(u32, u32, &[u8])> {
        if bytes.len() < 12 || &bytes[0..4] != Self::MAGIC {
            return Err(StoreError::ImgLib("not a fake-encoded image".into()));
        }
        let w = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        let h = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
        Ok((w, h, &bytes[12..]))
    }
}

impl ImageBackend for FakeBackend {
    fn dimensions(&self, jpeg_bytes: &[u8]) -> Result<Dimensions> {
        let (w, h, _) = Self::decode(jpeg_bytes)?;
        Ok((w, h))
    }

    fn resize(&self, jpeg_bytes: &[u8], target: Dimensions) -> Result<Vec<u8>> {
        let (w, h, payload) = Self::decode(jpeg_bytes)?;
        let (tw, th) = clamp_no_upscale(w, h, target);
        Ok(Self::encode(tw, th, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_backend_round_trips_dimensions() {
        let backend = FakeBackend;
        let bytes = FakeBackend::encode(800, 600, b"pixels");
        assert_eq!(backend.dimensions(&bytes).unwrap(), (800, 600));
    }

    #[test]
    fn fake_backend_resize_never_upscales() {
        let backend = FakeBackend;
        let bytes = FakeBackend::encode(100, 50, b"");
        let resized = backend.resize(&bytes, (4000, 4000)).unwrap();
        assert_eq!(backend.dimensions(&resized).unwrap(), (100, 50));
    }

    #[test]
    fn fake_backend_resize_shrinks_proportionally() {
        let backend = FakeBackend;
        let bytes = FakeBackend::encode(200, 100, b"");
        let resized = backend.resize(&bytes, (50, 50)).unwrap();
        assert_eq!(backend.dimensions(&resized).unwrap(), (50, 50));
    }

    #[test]
    fn rejects_malformed_input() {
        let backend = FakeBackend;
        assert!(backend.dimensions(b"not an image").is_err());
    }
}
