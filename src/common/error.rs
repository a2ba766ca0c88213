use thiserror::Error;

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QRError {
    // QR builder
    #[error("no content given")]
    EmptyData,
    #[error("content too long to encode")]
    DataTooLong,
    #[error("{mode:?} segment of {len} chars exceeds the count field limit of {max}")]
    SegmentTooLong { mode: Mode, len: usize, max: usize },

    // Renderer
    #[error("invalid mask geometry: {0}")]
    MaskGeometry(String),
    #[error("cannot decode mask source: {0}")]
    SourceDecode(String),
    #[error("cannot encode output image: {0}")]
    ImageEncode(String),
}

impl From<std::io::Error> for QRError {
    fn from(err: std::io::Error) -> Self {
        Self::SourceDecode(err.to_string())
    }
}

impl From<image::ImageError> for QRError {
    fn from(err: image::ImageError) -> Self {
        Self::SourceDecode(err.to_string())
    }
}

pub type QRResult<T> = Result<T, QRError>;
