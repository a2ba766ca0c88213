//! # qart
//!
//! A Rust library for generating halftone QR codes: standard QR symbols whose free
//! pixels are blended with a picture or an animation while staying scannable.
//!
//! ## Features
//!
//! - **QR Code Generation**: Numeric, alphanumeric & byte modes with mode optimisation,
//!   versions 1-40, error correction levels L, M, Q & H, and penalty based mask selection
//! - **Halftone Rendering**: Every module is split into 3x3 sub-blocks. The center keeps the
//!   module color, the rest shows the picture wherever the module carries data
//! - **Animations**: GIF sources are rendered frame by frame into a looping GIF
//! - **Embedding**: Paste the rendered code back into the source picture
//! - **Text Art**: Print the symbol with block characters
//!
//! ## Quick Start
//!
//! ### Plain QR Code
//!
//! ```rust
//! use qart::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! let png = qr.image_data(3)?;
//! std::fs::write(std::env::temp_dir().join("simple_qr.png"), png)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Halftone QR Code
//!
//! ```rust,no_run
//! use qart::{ECLevel, MaskSource, OptionUpdate, QRBuilder, Rect};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut qr = QRBuilder::new(b"https://example.com")
//!     .ec_level(ECLevel::H)               // High recovery leaves room for the picture
//!     .build()?;
//!
//! qr.add_option(
//!     OptionUpdate::new()
//!         .mask(MaskSource::Path("cat.gif".into()))
//!         .mask_rect(Rect::at(40, 40).of_size(300, 300)),
//! );
//!
//! let gif = qr.image_data(3)?;            // Animated source, animated code
//! std::fs::write("cat_qr.gif", gif)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Text Art
//!
//! ```rust
//! use qart::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"01234567").build()?;
//! println!("{}", qr.to_str(false));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub mod common;
pub mod render;

pub use builder::{HalftoneQR, QRBuilder};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
pub use imageproc::rect::Rect;
pub use render::{AnimationFrame, MaskSource, OptionField, OptionUpdate, RenderOption, RenderedCode};
