use std::ops::Deref;

use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::*;
use crate::common::BitStream;

/// One cell of the symbol. `Empty` is an unused cell: a hole before placement,
/// or the quiet zone around the symbol.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

impl Module {
    pub fn is_used(&self) -> bool {
        !matches!(self, Module::Empty)
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Module::Data(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub const QUIET_ZONE: usize = 4;

    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    /// Width including the quiet zone on both sides.
    pub fn padded_width(&self) -> usize {
        self.w + 2 * Self::QUIET_ZONE
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    pub fn count_empty_modules(&self) -> usize {
        self.grid.iter().filter(|m| !m.is_used()).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be in -w..w: {r}");
        debug_assert!(-w <= c && c < w, "column should be in -w..w: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r as usize) * self.w + c as usize
    }

    /// Negative coordinates count from the bottom & right edges.
    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }

    /// Module at (r, c) of the grid surrounded by the quiet zone. Quiet zone
    /// modules are unused.
    pub fn get_padded(&self, r: usize, c: usize) -> Module {
        let qz = Self::QUIET_ZONE;
        if r < qz || c < qz || r >= qz + self.w || c >= qz + self.w {
            return Module::Empty;
        }
        self.grid[(r - qz) * self.w + c - qz]
    }
}

#[cfg(test)]
mod qr_util_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_index_wrap() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = QR::new(Version::new(1), ECLevel::L);
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_out_of_bound() {
        let qr = QR::new(Version::new(1), ECLevel::L);
        let w = qr.w as i16;
        qr.get(0, w);
    }

    #[test]
    fn test_padded_access() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.set(0, 0, Module::Func(Color::Dark));
        qr.set(-1, -1, Module::Data(Color::Light));
        assert_eq!(qr.padded_width(), 29);
        assert_eq!(qr.get_padded(4, 4), Module::Func(Color::Dark));
        assert_eq!(qr.get_padded(24, 24), Module::Data(Color::Light));
        assert_eq!(qr.get_padded(3, 4), Module::Empty);
        assert_eq!(qr.get_padded(4, 25), Module::Empty);
        assert_eq!(qr.get_padded(28, 28), Module::Empty);
    }

    #[test]
    fn test_module_flags() {
        assert!(!Module::Empty.is_used());
        assert_eq!(*Module::Empty, Color::Light);
        assert!(Module::Format(Color::Dark).is_used());
        assert!(!Module::Format(Color::Dark).is_data());
        assert!(Module::Data(Color::Light).is_data());
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Also draws the separator on the sides facing the symbol
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        self.draw_line(6, 8, 6, last);
        self.draw_line(8, 6, last, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        let clr = |k: i16| if k & 1 == 0 { Color::Dark } else { Color::Light };
        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(clr(j)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(clr(i)));
            }
        }
    }
}

#[cfg(test)]
mod timing_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_timing_pattern_1() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.draw_timing_pattern();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........fFfFf........\n\
             .....................\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Overlaps a finder pattern
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    // Placeholder so data placement skips the format area
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        let (off, on) = (Module::Format(Color::Light), Module::Format(Color::Dark));
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_SIDE);
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        let (off, on) = (Module::Version(Color::Light), Module::Version(Color::Dark));
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_TR);
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_BL);
    }

    // Coordinates are ordered from the most significant bit
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Reserves the format area, draws the version info, then places the
    /// codeword stream (remainder bits included) along the zig-zag path.
    pub fn draw_encoding_region(&mut self, payload: &BitStream) {
        self.reserve_format_area();
        self.draw_version_info();

        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload.iter() {
            let module = Module::Data(Color::from(bit));
            let (r, c) = coords
                .by_ref()
                .find(|&(r, c)| !self.get(r, c).is_used())
                .expect("bug: payload longer than the encoding region");
            self.set(r, c, module);
        }

        let empty = self.count_empty_modules();
        assert!(empty == 0, "bug: {empty} unfilled modules after placing the payload");
    }

    /// Flips data modules selected by the pattern and draws the matching
    /// format info. Function modules are never touched.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if let Module::Data(clr) = self.get(r, c) {
                    if mask_fn(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}

// Text art
//------------------------------------------------------------------------------

impl QR {
    /// Two characters per module over the quiet-zone padded grid: a full block
    /// pair for dark modules and two spaces for light ones, swapped on `invert`.
    pub fn to_str(&self, invert: bool) -> String {
        let pw = self.padded_width();
        let mut canvas = String::with_capacity(pw * (pw * 2 * 3 + 1));
        for r in 0..pw {
            for c in 0..pw {
                let dark = *self.get_padded(r, c) == Color::Dark;
                canvas.push_str(if dark != invert { "██" } else { "  " });
            }
            canvas.push('\n');
        }
        canvas
    }

    /// Quiet-zone padded grid, `true` for dark modules.
    pub fn bitmap(&self) -> Vec<Vec<bool>> {
        let pw = self.padded_width();
        (0..pw).map(|r| (0..pw).map(|c| *self.get_padded(r, c) == Color::Dark).collect()).collect()
    }
}
