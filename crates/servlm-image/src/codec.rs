//! Base64 image codec with `data:` URL support.
//!
//! Requests carry images as base64 strings, optionally wrapped in a
//! `data:<mime>;base64,` prefix. Decoding keeps both the pixel data and the
//! encoded bytes around: the pixels provide the metadata reported back to
//! the caller, the bytes are what gets forwarded to the inference adapter.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};

/// An image decoded from a request payload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Decoded pixel data.
    pub image: DynamicImage,
    /// Detected encoding of the original bytes.
    pub format: ImageFormat,
    /// The original encoded bytes.
    pub data: Bytes,
}

impl DecodedImage {
    /// Returns the image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the MIME type of the original encoding.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Decodes a base64 image string, with or without a `data:` URL prefix.
///
/// # Errors
///
/// Fails when the base64 payload is malformed or the decoded bytes are not
/// a readable image.
pub fn decode_base64(text: &str) -> Result<DecodedImage> {
    let encoded = match text.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => text,
    };

    let data = STANDARD.decode(encoded.trim())?;
    let format = image::guess_format(&data).map_err(|_| Error::UnknownFormat)?;
    let image = image::load_from_memory(&data)?;

    Ok(DecodedImage {
        image,
        format,
        data: Bytes::from(data),
    })
}

/// Encodes an image to a base64 string in the given format.
///
/// With `url_prefix`, the result is a `data:<mime>;base64,...` URL.
pub fn encode_base64(image: &DynamicImage, format: ImageFormat, url_prefix: bool) -> Result<String> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;

    let encoded = STANDARD.encode(buffer.get_ref());
    if url_prefix {
        Ok(format_data_url(format.to_mime_type(), &encoded))
    } else {
        Ok(encoded)
    }
}

/// Wraps already-encoded image bytes in a `data:` URL.
///
/// # Errors
///
/// Fails when the bytes are not a recognizable image encoding.
pub fn data_url(data: &[u8]) -> Result<String> {
    let format = image::guess_format(data).map_err(|_| Error::UnknownFormat)?;
    Ok(format_data_url(format.to_mime_type(), &STANDARD.encode(data)))
}

fn format_data_url(mime_type: &str, encoded: &str) -> String {
    format!("data:{mime_type};base64,{encoded}")
}
