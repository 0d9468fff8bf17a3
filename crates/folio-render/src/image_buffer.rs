//! CPU-side image buffer for derivative generation.
//!
//! [`ImageBuffer`] wraps `image::DynamicImage` with the handful of
//! operations the derivative pipeline needs: load, flatten to RGB, resize by
//! width, and encode.
//!
//! ```ignore
//! use folio_render::{ImageBuffer, OutputFormat, ResizeFilter};
//!
//! let card = ImageBuffer::from_file("portfolio/kitchen.jpg")?
//!     .to_rgb()
//!     .resize_to_width(640, ResizeFilter::Lanczos3)?;
//! card.save_with_format("out/kitchen-640.webp", OutputFormat::WebP)?;
//! ```

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder};

use crate::error::{ParseNameError, RenderError, RenderResult};

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    /// Nearest neighbor interpolation. Fast but pixelated.
    Nearest,
    /// Bilinear interpolation.
    Triangle,
    /// Catmull-Rom bicubic interpolation.
    CatmullRom,
    /// Lanczos interpolation with window size 3. Sharpest downscales.
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResizeFilter::Nearest => image::imageops::FilterType::Nearest,
            ResizeFilter::Triangle => image::imageops::FilterType::Triangle,
            ResizeFilter::CatmullRom => image::imageops::FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Output format for image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG (lossless).
    Png,
    /// JPEG at the given quality, 1-100.
    Jpeg { quality: u8 },
    /// WebP. The encoder is lossless.
    WebP,
}

impl OutputFormat {
    /// JPEG quality used when none is given.
    pub const DEFAULT_JPEG_QUALITY: u8 = 75;

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::WebP => "webp",
        }
    }

    /// Check format parameters.
    pub fn validate(self) -> RenderResult<()> {
        match self {
            OutputFormat::Jpeg { quality } if !(1..=100).contains(&quality) => {
                Err(RenderError::InvalidQuality(quality))
            }
            _ => Ok(()),
        }
    }

    /// The format named `name` (`webp`, `jpeg`/`jpg` or `png`), with
    /// `quality` applied to JPEG.
    pub fn from_name(name: &str, quality: u8) -> Result<Self, ParseNameError> {
        let kind: FormatKind = name.parse()?;
        Ok(kind.with_quality(quality))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg { quality } => write!(f, "jpeg (quality {quality})"),
            other => f.write_str(other.extension()),
        }
    }
}

/// An output format without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Png,
    Jpeg,
    WebP,
}

impl FormatKind {
    pub fn with_quality(self, quality: u8) -> OutputFormat {
        match self {
            FormatKind::Png => OutputFormat::Png,
            FormatKind::Jpeg => OutputFormat::Jpeg { quality },
            FormatKind::WebP => OutputFormat::WebP,
        }
    }
}

impl FromStr for FormatKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(FormatKind::Png),
            "jpg" | "jpeg" => Ok(FormatKind::Jpeg),
            "webp" => Ok(FormatKind::WebP),
            _ => Err(ParseNameError {
                kind: "format",
                name: s.to_owned(),
                expected: "webp, jpeg, png",
            }),
        }
    }
}

/// A CPU-side image.
#[derive(Clone)]
pub struct ImageBuffer {
    inner: DynamicImage,
}

impl ImageBuffer {
    /// Load an image from a file, guessing the format from its contents.
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let inner = image::ImageReader::open(path)
            .map_err(|source| RenderError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .with_guessed_format()
            .map_err(|source| RenderError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .decode()
            .map_err(|source| RenderError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { inner })
    }

    /// Decode an image from encoded bytes.
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        Ok(Self {
            inner: image::load_from_memory(bytes)?,
        })
    }

    /// Wrap an already decoded image.
    pub fn from_dynamic(inner: DynamicImage) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Drop alpha and convert to 8-bit RGB.
    #[must_use]
    pub fn to_rgb(&self) -> Self {
        Self {
            inner: DynamicImage::ImageRgb8(self.inner.to_rgb8()),
        }
    }

    /// Resize the image to exact dimensions.
    #[must_use]
    pub fn resize(&self, width: u32, height: u32, filter: ResizeFilter) -> Self {
        Self {
            inner: self
                .inner
                .resize_exact(width, height, filter.to_image_filter()),
        }
    }

    /// Height that keeps the aspect ratio at `width`, rounded down but at
    /// least one pixel.
    pub fn scaled_height(&self, width: u32) -> RenderResult<u32> {
        let (src_width, src_height) = self.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: src_width,
                height: src_height,
            });
        }
        let height = u64::from(src_height) * u64::from(width) / u64::from(src_width);
        Ok(u32::try_from(height).unwrap_or(u32::MAX).max(1))
    }

    /// Resize to `width`, preserving the aspect ratio.
    pub fn resize_to_width(&self, width: u32, filter: ResizeFilter) -> RenderResult<Self> {
        if width == 0 {
            return Err(RenderError::InvalidWidths(vec![width]));
        }
        let height = self.scaled_height(width)?;
        Ok(self.resize(width, height, filter))
    }

    /// Encode the image to bytes in the specified format.
    pub fn encode(&self, format: OutputFormat) -> RenderResult<Vec<u8>> {
        format.validate()?;
        let mut buffer = Cursor::new(Vec::new());
        let (width, height) = self.dimensions();

        match format {
            OutputFormat::Png => {
                let rgba = self.inner.to_rgba8();
                PngEncoder::new(&mut buffer).write_image(
                    rgba.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgba8,
                )?;
            }
            OutputFormat::Jpeg { quality } => {
                let rgb = self.inner.to_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
                encoder.encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
            }
            OutputFormat::WebP => {
                let rgb = self.inner.to_rgb8();
                WebPEncoder::new_lossless(&mut buffer).encode(
                    rgb.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )?;
            }
        }
        Ok(buffer.into_inner())
    }

    /// Encode and write the image to `path`.
    pub fn save_with_format(&self, path: impl AsRef<Path>, format: OutputFormat) -> RenderResult<()> {
        let path = path.as_ref();
        let bytes = self.encode(format)?;
        std::fs::write(path, bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Access the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.inner
    }
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("color", &self.inner.color())
            .finish()
    }
}
