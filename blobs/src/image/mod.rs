//! Pixel containers tagged with their layout.
//!
//! Blob operations receive images as untyped byte buffers plus a
//! [`ColorFormat`], and check the tag at runtime before touching any pixel.
//! Rows are tightly packed; storage is 4-byte aligned so an `L_U32` label
//! image can be borrowed as `&[Label]` in place.

mod aligned_bytes;
mod color_format;


pub use aligned_bytes::AlignedBytes;
pub use color_format::{ChannelCount, ChannelSize, ChannelType, ColorFormat};

use image::{ImageBuffer, Rgb, RgbImage};

use crate::blob::Label;
use crate::error::{Error, ImageRole, Result};

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    desc: ImageDesc,
    bytes: AlignedBytes,
}

impl ImageDesc {
    pub fn new(width: u32, height: u32, color_format: ColorFormat) -> Self {
        Self {
            width,
            height,
            color_format,
        }
    }

    /// Number of bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.color_format.byte_count() as usize
    }

    pub fn size_in_bytes(&self) -> usize {
        self.height as usize * self.row_bytes()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub(crate) fn expect_format(&self, role: ImageRole, expected: ColorFormat) -> Result<()> {
        if self.color_format != expected {
            return Err(Error::Format {
                role,
                expected,
                actual: self.color_format,
            });
        }
        Ok(())
    }

    /// Fails unless `other` has the same width and height.
    pub(crate) fn expect_same_size(&self, other: &ImageDesc) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::DimensionMismatch {
                expected: *self,
                actual: *other,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for ImageDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.color_format)
    }
}

impl Image {
    /// Returns the image descriptor.
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Returns the image bytes as a slice.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Returns the image bytes as a mutable slice.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.bytes.as_mut_slice()
    }

    /// Zero-filled image.
    pub fn new_empty(desc: ImageDesc) -> Image {
        Image {
            desc,
            bytes: AlignedBytes::new_zeroed(desc.size_in_bytes()),
        }
    }

    pub fn new_with_data(desc: ImageDesc, bytes: &[u8]) -> Result<Image> {
        if bytes.len() != desc.size_in_bytes() {
            return Err(Error::InvalidImageData {
                expected: desc.size_in_bytes(),
                actual: bytes.len(),
            });
        }

        Ok(Image {
            desc,
            bytes: AlignedBytes::from_slice(bytes),
        })
    }

    /// Wraps a row-major label buffer as an `L_U32` image without copying.
    pub fn from_labels(width: u32, height: u32, labels: Vec<Label>) -> Result<Image> {
        let desc = ImageDesc::new(width, height, ColorFormat::L_U32);
        if labels.len() != desc.pixel_count() {
            return Err(Error::InvalidImageData {
                expected: desc.size_in_bytes(),
                actual: labels.len() * std::mem::size_of::<Label>(),
            });
        }

        Ok(Image {
            desc,
            bytes: AlignedBytes::from_words(labels),
        })
    }

    /// Borrows the pixels of a label image, one [`Label`] per pixel.
    pub fn labels(&self) -> Result<&[Label]> {
        self.desc
            .expect_format(ImageRole::Label, ColorFormat::L_U32)?;
        Ok(bytemuck::cast_slice(self.bytes.as_slice()))
    }

    pub fn labels_mut(&mut self) -> Result<&mut [Label]> {
        self.desc
            .expect_format(ImageRole::Label, ColorFormat::L_U32)?;
        Ok(bytemuck::cast_slice_mut(self.bytes.as_mut_slice()))
    }

    pub fn from_rgb_image(image: &RgbImage) -> Image {
        Image {
            desc: ImageDesc::new(image.width(), image.height(), ColorFormat::RGB_U8),
            bytes: AlignedBytes::from_slice(image.as_raw()),
        }
    }

    /// Copies an `RGB_U8` image into an [`RgbImage`], e.g. for saving to disk.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        self.desc
            .expect_format(ImageRole::Source, ColorFormat::RGB_U8)?;
        RgbImage::from_raw(self.desc.width, self.desc.height, self.bytes().to_vec()).ok_or(
            Error::InvalidImageData {
                expected: self.desc.size_in_bytes(),
                actual: self.bytes.len(),
            },
        )
    }

    /// Borrows an `RGB_U8` image as an `image` crate buffer, for drawing in place.
    pub(crate) fn rgb_view_mut(&mut self) -> Result<ImageBuffer<Rgb<u8>, &mut [u8]>> {
        self.desc
            .expect_format(ImageRole::Destination, ColorFormat::RGB_U8)?;
        let (width, height) = (self.desc.width, self.desc.height);
        let expected = self.desc.size_in_bytes();
        let actual = self.bytes.len();
        ImageBuffer::from_raw(width, height, self.bytes.as_mut_slice())
            .ok_or(Error::InvalidImageData { expected, actual })
    }
}
