use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Walks column pairs from the right edge, alternating upwards and downwards,
/// and skips the vertical timing column. Yields every coordinate on the path;
/// callers skip the ones already taken by function patterns.
pub struct EncRegionIter {
    // Right column of the current column pair
    right: i16,
    vert: i16,
    // Offset inside the column pair
    j: i16,
    width: i16,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { right: w - 1, vert: 0, j: 0, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.right < 1 {
            return None;
        }

        let upward = (self.right + 1) & 2 == 0;
        let c = self.right - self.j;
        let r = if upward { self.width - 1 - self.vert } else { self.vert };

        self.j += 1;
        if self.j == 2 {
            self.j = 0;
            self.vert += 1;
            if self.vert == self.width {
                self.vert = 0;
                self.right -= 2;
                if self.right == 6 {
                    self.right = 5;
                }
            }
        }
        Some((r, c))
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_path_start() {
        let coords = EncRegionIter::new(Version::new(1)).take(6).collect::<Vec<_>>();
        assert_eq!(coords, [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19)]);
    }

    #[test]
    fn test_direction_flips() {
        let coords = EncRegionIter::new(Version::new(1)).skip(40).take(4).collect::<Vec<_>>();
        assert_eq!(coords, [(0, 20), (0, 19), (0, 18), (0, 17)]);
    }

    #[test]
    fn test_skips_timing_column() {
        let coords = EncRegionIter::new(Version::new(1)).collect::<Vec<_>>();
        assert!(coords.iter().all(|&(_, c)| c != 6));
        assert_eq!(coords[coords.len() - 2..], [(20, 1), (20, 0)]);
    }

    #[test]
    fn test_covers_every_module_once() {
        for v in 1..=40 {
            let ver = Version::new(v);
            let w = ver.width();
            let coords = EncRegionIter::new(ver).collect::<Vec<_>>();
            let unique = coords.iter().copied().collect::<HashSet<_>>();
            assert_eq!(coords.len(), w * (w - 1));
            assert_eq!(unique.len(), coords.len());
        }
    }
}
