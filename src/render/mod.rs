mod option;
mod source;

pub use option::*;
pub use source::*;

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, ImageError, Rgba, RgbaImage};
use imageproc::rect::Rect;
use rayon::prelude::*;
use tracing::debug;

use crate::builder::QR;
use crate::common::{QRError, QRResult};

/// Sub-blocks per module side. The center one always carries the module color.
pub const SUB_BLOCKS: u32 = 3;

/// Pixels per sub-block side.
pub const SUB_BLOCK_PX: u32 = 3;

pub const MODULE_PX: u32 = SUB_BLOCKS * SUB_BLOCK_PX;

// Rendered code
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedCode {
    Still(RgbaImage),
    Animated(Vec<AnimationFrame>),
}

impl RenderedCode {
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// PNG bytes for a still code, looping GIF bytes for an animated one.
    pub fn encode(&self) -> QRResult<Vec<u8>> {
        let mut buf = Vec::new();
        match self {
            Self::Still(img) => {
                PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive)
                    .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
                    .map_err(encode_error)?;
            }
            Self::Animated(frames) => {
                let mut encoder = GifEncoder::new(&mut buf);
                encoder.set_repeat(Repeat::Infinite).map_err(encode_error)?;
                encoder
                    .encode_frames(frames.iter().cloned().map(image::Frame::from))
                    .map_err(encode_error)?;
            }
        }
        Ok(buf)
    }
}

fn encode_error(err: ImageError) -> QRError {
    QRError::ImageEncode(err.to_string())
}

// Halftone renderer
//------------------------------------------------------------------------------

/// Side of the rendered raster: every module of the quiet-zone padded grid is
/// `MODULE_PX` pixels wide.
pub fn raster_size(qr: &QR) -> u32 {
    qr.padded_width() as u32 * MODULE_PX
}

/// Renders the symbol, blending the mask source into the free pixels when one is
/// set. `point_width` is a size hint only; the module scale is fixed.
pub fn render(qr: &QR, option: &RenderOption, point_width: u32) -> QRResult<RenderedCode> {
    let size = raster_size(qr);
    let (fg, bg) = (option.foreground(), option.background());

    if option.embed() && (option.mask().is_none() || option.mask_rect().is_none()) {
        return Err(QRError::MaskGeometry("embedding needs a mask source and a rectangle".into()));
    }

    let source = match option.mask() {
        Some(mask) => mask.decode()?,
        None => {
            debug!(size, point_width, "Rendering plain code");
            return Ok(RenderedCode::Still(render_frame(qr, fg, bg, None)));
        }
    };
    debug!(
        size,
        point_width,
        frames = source.frame_count(),
        embed = option.embed(),
        "Rendering halftone code"
    );

    // Validate every frame before producing any output
    match &source {
        DecodedSource::Still(img) => check_geometry(img, option, size)?,
        DecodedSource::Animated(frames) => {
            frames.iter().try_for_each(|f| check_geometry(&f.image, option, size))?
        }
    }

    let draw = |src: &RgbaImage| {
        let mask = prepare_mask(src, option.mask_rect(), size);
        let code = render_frame(qr, fg, bg, Some(&mask));
        match option.mask_rect() {
            Some(rect) if option.embed() => embed(src, &code, rect),
            _ => code,
        }
    };

    match source {
        DecodedSource::Still(img) => Ok(RenderedCode::Still(draw(&img))),
        DecodedSource::Animated(frames) => {
            let frames = frames.par_iter().map(|f| f.with_image(draw(&f.image))).collect();
            Ok(RenderedCode::Animated(frames))
        }
    }
}

fn check_geometry(src: &RgbaImage, option: &RenderOption, size: u32) -> QRResult<()> {
    let (w, h) = src.dimensions();
    if let Some(rect) = option.mask_rect() {
        if !rect_within(rect, w, h) {
            return Err(QRError::MaskGeometry(format!(
                "rectangle {}x{} at ({}, {}) exceeds the {w}x{h} source",
                rect.width(),
                rect.height(),
                rect.left(),
                rect.top()
            )));
        }
    }
    if option.embed() && (w < size || h < size) {
        return Err(QRError::MaskGeometry(format!(
            "{w}x{h} source cannot hold the {size}x{size} code"
        )));
    }
    Ok(())
}

fn rect_within(rect: Rect, w: u32, h: u32) -> bool {
    let (left, top) = (rect.left() as i64, rect.top() as i64);
    left >= 0
        && top >= 0
        && left + rect.width() as i64 <= w as i64
        && top + rect.height() as i64 <= h as i64
}

// Crops the source to the rectangle and resizes it to the raster
fn prepare_mask(src: &RgbaImage, rect: Option<Rect>, size: u32) -> RgbaImage {
    match rect {
        Some(rect) => {
            let (x, y) = (rect.left() as u32, rect.top() as u32);
            let cropped = imageops::crop_imm(src, x, y, rect.width(), rect.height()).to_image();
            imageops::resize(&cropped, size, size, FilterType::Lanczos3)
        }
        None => imageops::resize(src, size, size, FilterType::Lanczos3),
    }
}

// Scales the code to the rectangle and composites it onto the full source
fn embed(src: &RgbaImage, code: &RgbaImage, rect: Rect) -> RgbaImage {
    let scaled = imageops::resize(code, rect.width(), rect.height(), FilterType::Lanczos3);
    let mut res = src.clone();
    imageops::overlay(&mut res, &scaled, rect.left() as i64, rect.top() as i64);
    res
}

fn render_frame(qr: &QR, fg: Rgba<u8>, bg: Rgba<u8>, mask: Option<&RgbaImage>) -> RgbaImage {
    let pw = qr.padded_width() as u32;
    let size = pw * MODULE_PX;
    let mut canvas = RgbaImage::from_pixel(size, size, bg);

    for r in 0..pw {
        for c in 0..pw {
            let module = qr.get_padded(r as usize, c as usize);
            let clr = module.select(fg, bg);
            // Function modules never show the picture
            let free = module.is_data() || !module.is_used();

            for i in 0..SUB_BLOCKS {
                for j in 0..SUB_BLOCKS {
                    let center = i == SUB_BLOCKS / 2 && j == SUB_BLOCKS / 2;
                    let y0 = r * MODULE_PX + i * SUB_BLOCK_PX;
                    let x0 = c * MODULE_PX + j * SUB_BLOCK_PX;
                    for y in y0..y0 + SUB_BLOCK_PX {
                        for x in x0..x0 + SUB_BLOCK_PX {
                            let px = match mask {
                                Some(mask) if free && !center => *mask.get_pixel(x, y),
                                _ => clr,
                            };
                            canvas.put_pixel(x, y, px);
                        }
                    }
                }
            }
        }
    }

    canvas
}
