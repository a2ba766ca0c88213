use image::Rgba;
use imageproc::rect::Rect;

use super::MaskSource;

// Render option
//------------------------------------------------------------------------------

/// Resolved rendering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOption {
    foreground: Rgba<u8>,
    background: Rgba<u8>,
    mask: Option<MaskSource>,
    mask_rect: Option<Rect>,
    embed: bool,
}

impl Default for RenderOption {
    fn default() -> Self {
        Self {
            foreground: Self::DEFAULT_FOREGROUND,
            background: Self::DEFAULT_BACKGROUND,
            mask: None,
            mask_rect: None,
            embed: false,
        }
    }
}

impl RenderOption {
    pub const DEFAULT_FOREGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
    pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

    pub fn foreground(&self) -> Rgba<u8> {
        self.foreground
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn mask(&self) -> Option<&MaskSource> {
        self.mask.as_ref()
    }

    pub fn mask_rect(&self) -> Option<Rect> {
        self.mask_rect
    }

    pub fn embed(&self) -> bool {
        self.embed
    }

    /// Overwrites the fields present in the update and leaves the rest as is.
    pub fn apply(&mut self, update: OptionUpdate) {
        let OptionUpdate { foreground, background, mask, mask_rect, embed } = update;
        if let Some(foreground) = foreground {
            self.foreground = foreground;
        }
        if let Some(background) = background {
            self.background = background;
        }
        if let Some(mask) = mask {
            self.mask = Some(mask);
        }
        if let Some(mask_rect) = mask_rect {
            self.mask_rect = Some(mask_rect);
        }
        if let Some(embed) = embed {
            self.embed = embed;
        }
    }

    /// Restores a single field to its default.
    pub fn reset(&mut self, field: OptionField) {
        match field {
            OptionField::Foreground => self.foreground = Self::DEFAULT_FOREGROUND,
            OptionField::Background => self.background = Self::DEFAULT_BACKGROUND,
            OptionField::Mask => self.mask = None,
            OptionField::MaskRect => self.mask_rect = None,
            OptionField::Embed => self.embed = false,
        }
    }
}

// Option update
//------------------------------------------------------------------------------

/// Partial configuration. Absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionUpdate {
    pub foreground: Option<Rgba<u8>>,
    pub background: Option<Rgba<u8>>,
    pub mask: Option<MaskSource>,
    pub mask_rect: Option<Rect>,
    pub embed: Option<bool>,
}

impl OptionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foreground(mut self, color: Rgba<u8>) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn background(mut self, color: Rgba<u8>) -> Self {
        self.background = Some(color);
        self
    }

    pub fn mask(mut self, mask: MaskSource) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn mask_rect(mut self, rect: Rect) -> Self {
        self.mask_rect = Some(rect);
        self
    }

    pub fn embed(mut self, embed: bool) -> Self {
        self.embed = Some(embed);
        self
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum OptionField {
    Foreground,
    Background,
    Mask,
    MaskRect,
    Embed,
}
