use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Delay, DynamicImage, ImageFormat, ImageReader, RgbaImage};
use tracing::debug;

use crate::common::{QRError, QRResult};

// Animation frame
//------------------------------------------------------------------------------

/// One frame of an animation with its display delay & canvas offset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub image: RgbaImage,
    pub delay: Delay,
    pub left: u32,
    pub top: u32,
}

impl AnimationFrame {
    pub fn new(image: RgbaImage, delay: Delay) -> Self {
        Self { image, delay, left: 0, top: 0 }
    }

    /// Same timing & placement, different pixels.
    pub fn with_image(&self, image: RgbaImage) -> Self {
        Self { image, delay: self.delay, left: self.left, top: self.top }
    }
}

impl From<image::Frame> for AnimationFrame {
    fn from(frame: image::Frame) -> Self {
        let (delay, left, top) = (frame.delay(), frame.left(), frame.top());
        Self { image: frame.into_buffer(), delay, left, top }
    }
}

impl From<AnimationFrame> for image::Frame {
    fn from(frame: AnimationFrame) -> Self {
        image::Frame::from_parts(frame.image, frame.left, frame.top, frame.delay)
    }
}

// Mask source
//------------------------------------------------------------------------------

/// Picture blended into the free pixels of the code.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSource {
    /// Decoded at render time. GIF files with more than one frame are animated.
    Path(PathBuf),
    Image(DynamicImage),
    Frames(Vec<AnimationFrame>),
}

/// Pixels of a mask source, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedSource {
    Still(RgbaImage),
    Animated(Vec<AnimationFrame>),
}

impl DecodedSource {
    pub fn frame_count(&self) -> usize {
        match self {
            Self::Still(_) => 1,
            Self::Animated(frames) => frames.len(),
        }
    }
}

impl MaskSource {
    pub fn decode(&self) -> QRResult<DecodedSource> {
        match self {
            Self::Path(path) => decode_file(path),
            Self::Image(img) => Ok(DecodedSource::Still(img.to_rgba8())),
            Self::Frames(frames) => from_frames(frames.clone()),
        }
    }
}

fn decode_file(path: &Path) -> QRResult<DecodedSource> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    if reader.format() != Some(ImageFormat::Gif) {
        return Ok(DecodedSource::Still(reader.decode()?.to_rgba8()));
    }

    let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
    let frames = decoder.into_frames().collect_frames()?;
    debug!(path = %path.display(), frames = frames.len(), "Decoded gif mask source");
    from_frames(frames.into_iter().map(AnimationFrame::from).collect())
}

fn from_frames(mut frames: Vec<AnimationFrame>) -> QRResult<DecodedSource> {
    match frames.len() {
        0 => Err(QRError::SourceDecode("animation has no frames".to_string())),
        1 => Ok(DecodedSource::Still(frames.remove(0).image)),
        _ => Ok(DecodedSource::Animated(frames)),
    }
}
