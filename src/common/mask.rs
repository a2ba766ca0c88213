use std::ops::Deref;

use rayon::prelude::*;
use tracing::{debug, trace};

use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const COUNT: u8 = 8;

    pub fn new(pattern: u8) -> Self {
        assert!(pattern < Self::COUNT, "Invalid masking pattern: {pattern}");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        (p & 1) + (p % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((p & 1) + (p % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        (((r + c) as i32 & 1) + (p % 3)) & 1 == 0
    }
}

impl MaskPattern {
    /// Predicate over (row, column); data modules where it holds get flipped.
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}

// Mask selection
//------------------------------------------------------------------------------

/// Masks a copy of the unmasked symbol with every pattern and keeps the one with
/// the lowest penalty. Ties go to the lower pattern.
pub fn apply_best_mask(qr: &QR) -> QR {
    let mut candidates = (0..MaskPattern::COUNT)
        .into_par_iter()
        .map(|m| {
            let pattern = MaskPattern::new(m);
            let mut candidate = qr.clone();
            candidate.apply_mask(pattern);
            let penalty = compute_total_penalty(&candidate);
            (pattern, candidate, penalty)
        })
        .collect::<Vec<_>>();

    let best = select_lowest(candidates.iter().map(|(m, _, pen)| (*m, *pen)));
    let (_, qr, penalty) = candidates.swap_remove(*best as usize);
    debug!(mask = *best, penalty, "Selected mask");
    qr
}

// Keeps the first strictly lowest penalty, so ties go to the earlier pattern
fn select_lowest(candidates: impl IntoIterator<Item = (MaskPattern, u32)>) -> MaskPattern {
    let mut best: Option<(MaskPattern, u32)> = None;
    for (pattern, penalty) in candidates {
        trace!(mask = *pattern, penalty, "Evaluated mask");
        if best.map_or(true, |(_, best_penalty)| penalty < best_penalty) {
            best = Some((pattern, penalty));
        }
    }
    best.expect("bug: no mask candidate evaluated").0
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// Runs of 5 or more same colored modules in a row or column
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for is_hor in [true, false] {
        for i in 0..w {
            let get = |j| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
            let mut run_clr = get(0);
            let mut run_len = 1;
            for j in 1..w {
                let clr = get(j);
                if clr == run_clr {
                    run_len += 1;
                    continue;
                }
                if run_len >= 5 {
                    pen += run_len - 2;
                }
                run_clr = clr;
                run_len = 1;
            }
            if run_len >= 5 {
                pen += run_len - 2;
            }
        }
    }
    pen
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// 1:1:3:1:1 finder-like runs with 4 light modules on either side. Modules
// beyond the symbol edge count as light.
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let get = |j| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        let is_light = |j: i16| j < 0 || j >= w || get(j) == Color::Light;
        for j in 0..w - 6 {
            if (j..j + 7).map(get).ne(PATTERN.iter().copied()) {
                continue;
            }
            if (j - 4..j).all(is_light) || (j + 7..j + 11).all(is_light) {
                pen += 40;
            }
        }
    }
    pen
}

// Deviation of the dark ratio from 50%, in steps of 5%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let pct = (dark_cnt * 100 / (w * w)) as i32;
    let prev = pct - pct % 5;
    let next = prev + 5;
    let dev = ((prev - 50).abs() / 5).min((next - 50).abs() / 5);
    (dev * 10) as u32
}
