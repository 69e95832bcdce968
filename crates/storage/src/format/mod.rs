//! On-disk formats
//!
//! - `image`: single-file image of the whole bucket tree

pub mod image;

pub use image::{
    decode_image, encode_image, read_image, write_image, ImageError, StoreImage, IMAGE_FORMAT_VERSION,
    IMAGE_MAGIC,
};
