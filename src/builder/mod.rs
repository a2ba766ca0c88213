mod qr;

pub use qr::{Module, QR};

use tracing::debug;

use crate::common::{
    codec::{encode, encode_with_version, pad},
    ec::encode_blocks,
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};
use crate::render::{render, OptionField, OptionUpdate, RenderOption, RenderedCode};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!("{{ Version: {:?}, Ec level: {:?} }}", *v, self.ec_level),
            None => format!("{{ Version: None, Ec level: {:?} }}", self.ec_level),
        }
    }
}

impl QRBuilder<'_> {
    /// Runs the whole pipeline: encode, pad, add ecc, place and mask.
    pub fn build(&self) -> QRResult<HalftoneQR> {
        debug!(len = self.data.len(), metadata = %self.metadata(), "Generating QR");

        let (payload, spec) = match self.version {
            Some(v) => encode_with_version(self.data, self.ec_level, v)?,
            None => encode(self.data, self.ec_level)?,
        };
        let padded = pad(&payload, spec);
        let codewords = encode_blocks(&padded, spec);

        let mut qr = QR::new(spec.version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&codewords);

        let qr = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                qr
            }
            None => apply_best_mask(&qr),
        };

        let total = qr.width() * qr.width();
        debug!(
            version = *qr.version(),
            mask = ?qr.mask(),
            encoded_bits = payload.bits.len(),
            capacity = spec.data_bit_capacity(),
            dark_pct = qr.count_dark_modules() * 100 / total,
            "QR generated"
        );

        Ok(HalftoneQR {
            content: self.data.to_vec(),
            ec_level: self.ec_level,
            version: qr.version(),
            qr,
            option: RenderOption::default(),
        })
    }
}

// Halftone QR
//------------------------------------------------------------------------------

/// A finished symbol together with the content it carries and how to render it.
#[derive(Debug, Clone, PartialEq)]
pub struct HalftoneQR {
    content: Vec<u8>,
    ec_level: ECLevel,
    version: Version,
    qr: QR,
    option: RenderOption,
}

impl HalftoneQR {
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn mask(&self) -> MaskPattern {
        self.qr.mask().expect("bug: built symbol without a mask")
    }

    pub fn symbol(&self) -> &QR {
        &self.qr
    }

    pub fn option(&self) -> &RenderOption {
        &self.option
    }

    pub fn add_option(&mut self, update: OptionUpdate) -> &mut Self {
        self.option.apply(update);
        self
    }

    pub fn remove_option(&mut self, field: OptionField) -> &mut Self {
        self.option.reset(field);
        self
    }

    pub fn to_str(&self, invert: bool) -> String {
        self.qr.to_str(invert)
    }

    pub fn bitmap(&self) -> Vec<Vec<bool>> {
        self.qr.bitmap()
    }

    pub fn render(&self, point_width: u32) -> QRResult<RenderedCode> {
        render(&self.qr, &self.option, point_width)
    }

    /// PNG bytes, or GIF bytes when the mask source is animated.
    pub fn image_data(&self, point_width: u32) -> QRResult<Vec<u8>> {
        self.render(point_width)?.encode()
    }
}
