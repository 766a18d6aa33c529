#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod codec;
mod draw;
mod error;

pub use codec::{DecodedImage, data_url, decode_base64, encode_base64};
pub use draw::{draw_boxes, draw_polys};
pub use error::{Error, Result};
// Re-exported so downstream crates can name the types in our public API
// without depending on the imaging backend directly.
pub use image::{DynamicImage, ImageFormat};
