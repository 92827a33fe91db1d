//! Bitmap encoding to and from `data:<mime>;base64,<payload>` strings
//!
//! This is the only place data URIs are built or parsed.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use data_url::DataUrl;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::constants::BACKGROUND_COLOR;

/// A decoded bitmap, straight-alpha RGBA
pub type Bitmap = RgbaImage;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Not a data URI: {0}")]
    InvalidDataUri(String),

    #[error("Invalid base64 payload")]
    Base64,

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Encoded image formats the surface can export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Lossless
    #[default]
    Png,
    /// Lossy, no alpha channel
    Jpeg,
}

impl ImageFormat {
    /// Resolve a MIME type; unknown types fall back to PNG
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
            "image/png" => ImageFormat::Png,
            other => {
                debug!("Unsupported export type {:?}, using image/png", other);
                ImageFormat::Png
            }
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Map a 0-1 quality to the JPEG encoder's 1-100 scale
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_finite() { quality } else { 1.0 };
    ((quality.clamp(0.0, 1.0) * 100.0).round() as u8).max(1)
}

/// Encode a bitmap to raw image bytes
pub fn encode_bitmap(bitmap: &Bitmap, format: ImageFormat, quality: f32) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let (width, height) = bitmap.dimensions();

    match format {
        ImageFormat::Png => {
            PngEncoder::new(&mut out)
                .write_image(bitmap.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
        ImageFormat::Jpeg => {
            let flattened = flatten_onto_background(bitmap);
            JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality))
                .write_image(flattened.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
    }

    Ok(out)
}

/// Wrap encoded bytes in a data URI
pub fn to_data_uri(bytes: &[u8], format: ImageFormat) -> String {
    format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes))
}

/// Encode a bitmap straight to a data URI
pub fn encode_data_uri(bitmap: &Bitmap, format: ImageFormat, quality: f32) -> Result<String, CodecError> {
    let bytes = encode_bitmap(bitmap, format, quality)?;
    Ok(to_data_uri(&bytes, format))
}

/// Extract the payload bytes of a data URI
pub fn data_uri_bytes(data: &str) -> Result<Vec<u8>, CodecError> {
    let url = DataUrl::process(data.trim()).map_err(|e| CodecError::InvalidDataUri(format!("{e:?}")))?;
    let (bytes, _fragment) = url.decode_to_vec().map_err(|_| CodecError::Base64)?;
    Ok(bytes)
}

/// Decode a data URI into a bitmap
pub fn decode_data_uri(data: &str) -> Result<Bitmap, CodecError> {
    let bytes = data_uri_bytes(data)?;
    let image = image::load_from_memory(&bytes)?;
    debug!(
        "Decoded data URI: {} bytes -> {}x{}",
        bytes.len(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgba8())
}

/// Decode a data URI on a blocking worker
///
/// The caller keeps running while the image decodes; decode failures come
/// back as [`CodecError`], never as a panic.
pub async fn decode_data_uri_async(data: String) -> Result<Bitmap, CodecError> {
    tokio::task::spawn_blocking(move || decode_data_uri(&data))
        .await
        .map_err(|e| CodecError::Task(e.to_string()))?
}

/// Scale a bitmap to exactly `width` x `height`
pub fn rescale(bitmap: &Bitmap, width: u32, height: u32) -> Bitmap {
    if bitmap.dimensions() == (width, height) {
        return bitmap.clone();
    }
    image::imageops::resize(bitmap, width, height, FilterType::Triangle)
}

fn flatten_onto_background(bitmap: &Bitmap) -> RgbImage {
    let background = [
        BACKGROUND_COLOR[0] as f32,
        BACKGROUND_COLOR[1] as f32,
        BACKGROUND_COLOR[2] as f32,
    ];
    RgbImage::from_fn(bitmap.width(), bitmap.height(), |x, y| {
        let [r, g, b, a] = bitmap.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let mix = |c: u8, bg: f32| (c as f32 * alpha + bg * (1.0 - alpha)).round() as u8;
        image::Rgb([mix(r, background[0]), mix(g, background[1]), mix(b, background[2])])
    })
}
