use std::sync::OnceLock;

use super::codec::DataEncoder;
use super::metadata::{ECLevel, Version};

// Version spec
//------------------------------------------------------------------------------

/// A run of blocks sharing the same length.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct BlockGroup {
    pub num_blocks: usize,
    pub num_codewords: usize,
    pub num_data_codewords: usize,
}

impl BlockGroup {
    pub fn num_ec_codewords(&self) -> usize {
        self.num_codewords - self.num_data_codewords
    }
}

/// Capacity & block layout of a version at a given error correction level.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VersionSpec {
    pub version: Version,
    pub ec_level: ECLevel,
    pub total_codewords: usize,
    pub data_codewords: usize,
    pub remainder_bits: usize,
    pub blocks: Vec<BlockGroup>,
}

impl VersionSpec {
    fn new(version: Version, ec_level: ECLevel) -> Self {
        let raw_modules = raw_data_modules(*version);
        let total_codewords = raw_modules >> 3;
        let ecc_per_block = ECC_CODEWORDS_PER_BLOCK[ec_level as usize][*version - 1];
        let num_blocks = NUM_ERROR_CORRECTION_BLOCKS[ec_level as usize][*version - 1];

        // Short blocks come first, long blocks carry one more data codeword
        let short_len = total_codewords / num_blocks;
        let num_long = total_codewords % num_blocks;
        let mut blocks = vec![BlockGroup {
            num_blocks: num_blocks - num_long,
            num_codewords: short_len,
            num_data_codewords: short_len - ecc_per_block,
        }];
        if num_long > 0 {
            blocks.push(BlockGroup {
                num_blocks: num_long,
                num_codewords: short_len + 1,
                num_data_codewords: short_len + 1 - ecc_per_block,
            });
        }

        let data_codewords = total_codewords - ecc_per_block * num_blocks;
        Self {
            version,
            ec_level,
            total_codewords,
            data_codewords,
            remainder_bits: raw_modules & 7,
            blocks,
        }
    }

    pub fn width(&self) -> usize {
        self.version.width()
    }

    pub fn data_bit_capacity(&self) -> usize {
        self.data_codewords << 3
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.iter().map(|g| g.num_blocks).sum()
    }

    pub fn ecc_per_block(&self) -> usize {
        self.blocks[0].num_ec_codewords()
    }

    /// Terminator zeros to append after `bit_len` bits: four, or fewer when the
    /// capacity runs out first.
    pub fn num_terminator_bits_required(&self, bit_len: usize) -> usize {
        debug_assert!(bit_len <= self.data_bit_capacity(), "Bit length exceeds capacity");

        (self.data_bit_capacity() - bit_len).min(4)
    }

    /// Zeros needed to align `len` bits to a codeword boundary.
    pub fn num_bits_to_pad_to_codeword(len: usize) -> usize {
        (8 - (len & 7)) & 7
    }
}

// Raw modules available for data & ecc codewords, after subtracting every
// function pattern and the format & version areas
fn raw_data_modules(ver: usize) -> usize {
    let mut res = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let num_align = ver / 7 + 2;
        res -= (25 * num_align - 10) * num_align - 55;
        if ver >= 7 {
            res -= 36;
        }
    }
    res
}

// Version database
//------------------------------------------------------------------------------

static VERSION_DB: OnceLock<Vec<VersionSpec>> = OnceLock::new();

fn version_db() -> &'static [VersionSpec] {
    VERSION_DB.get_or_init(|| {
        (Version::MIN..=Version::MAX)
            .flat_map(|v| ECLevel::ALL.map(|ecl| VersionSpec::new(Version::new(v), ecl)))
            .collect()
    })
}

pub fn version_spec(version: Version, ec_level: ECLevel) -> &'static VersionSpec {
    &version_db()[(*version - 1) * 4 + ec_level as usize]
}

/// Smallest version in the encoder's range whose data capacity holds `bit_len`
/// bits.
pub fn choose_version(
    ec_level: ECLevel,
    encoder: DataEncoder,
    bit_len: usize,
) -> Option<&'static VersionSpec> {
    encoder
        .version_range()
        .map(|v| version_spec(Version::new(v), ec_level))
        .find(|spec| spec.data_bit_capacity() >= bit_len)
}

#[cfg(test)]
mod version_db_tests {
    use test_case::test_case;

    use super::{choose_version, raw_data_modules, version_spec, BlockGroup, VersionSpec};
    use crate::common::codec::DataEncoder;
    use crate::common::metadata::{ECLevel, Version};

    fn group(num_blocks: usize, num_codewords: usize, num_data_codewords: usize) -> BlockGroup {
        BlockGroup { num_blocks, num_codewords, num_data_codewords }
    }

    #[test_case(1, 208, 26)]
    #[test_case(2, 359, 44)]
    #[test_case(7, 1568, 196)]
    #[test_case(40, 29648, 3706)]
    fn test_raw_data_modules(ver: usize, exp_modules: usize, exp_codewords: usize) {
        assert_eq!(raw_data_modules(ver), exp_modules);
        assert_eq!(version_spec(Version::new(ver), ECLevel::L).total_codewords, exp_codewords);
    }

    #[test_case(1, 0)]
    #[test_case(2, 7)]
    #[test_case(6, 7)]
    #[test_case(7, 0)]
    #[test_case(14, 3)]
    #[test_case(21, 4)]
    #[test_case(28, 3)]
    #[test_case(35, 0)]
    fn test_remainder_bits(ver: usize, exp: usize) {
        assert_eq!(version_spec(Version::new(ver), ECLevel::M).remainder_bits, exp);
    }

    #[test_case(1, ECLevel::L, &[group(1, 26, 19)])]
    #[test_case(1, ECLevel::H, &[group(1, 26, 9)])]
    #[test_case(5, ECLevel::Q, &[group(2, 33, 15), group(2, 34, 16)])]
    #[test_case(7, ECLevel::H, &[group(4, 39, 13), group(1, 40, 14)])]
    #[test_case(40, ECLevel::H, &[group(20, 45, 15), group(61, 46, 16)])]
    fn test_block_groups(ver: usize, ecl: ECLevel, exp: &[BlockGroup]) {
        let spec = version_spec(Version::new(ver), ecl);
        assert_eq!(spec.blocks, exp);
        assert_eq!(spec.version, Version::new(ver));
        assert_eq!(spec.ec_level, ecl);
    }

    #[test]
    fn test_block_layout_adds_up() {
        for v in 1..=40 {
            for ecl in ECLevel::ALL {
                let spec = version_spec(Version::new(v), ecl);
                let total = spec.blocks.iter().map(|g| g.num_blocks * g.num_codewords).sum::<usize>();
                let data =
                    spec.blocks.iter().map(|g| g.num_blocks * g.num_data_codewords).sum::<usize>();
                assert_eq!(total, spec.total_codewords);
                assert_eq!(data, spec.data_codewords);
                assert!(spec.blocks.iter().all(|g| g.num_ec_codewords() == spec.ecc_per_block()));
            }
        }
    }

    #[test_case(ECLevel::L, 152)]
    #[test_case(ECLevel::M, 128)]
    #[test_case(ECLevel::Q, 104)]
    #[test_case(ECLevel::H, 72)]
    fn test_data_bit_capacity(ecl: ECLevel, exp: usize) {
        assert_eq!(version_spec(Version::new(1), ecl).data_bit_capacity(), exp);
    }

    #[test]
    fn test_padding_arithmetic() {
        let spec = version_spec(Version::new(1), ECLevel::H);
        assert_eq!(spec.num_terminator_bits_required(41), 4);
        assert_eq!(spec.num_terminator_bits_required(70), 2);
        assert_eq!(spec.num_terminator_bits_required(72), 0);
        assert_eq!(VersionSpec::num_bits_to_pad_to_codeword(45), 3);
        assert_eq!(VersionSpec::num_bits_to_pad_to_codeword(48), 0);
    }

    #[test]
    fn test_choose_version() {
        let enc = DataEncoder::Versions1To9;
        assert_eq!(*choose_version(ECLevel::M, enc, 128).unwrap().version, 1);
        assert_eq!(*choose_version(ECLevel::M, enc, 129).unwrap().version, 2);
        assert!(choose_version(ECLevel::H, enc, 10_000).is_none());

        let enc = DataEncoder::Versions10To26;
        assert_eq!(*choose_version(ECLevel::L, enc, 1).unwrap().version, 10);
        let enc = DataEncoder::Versions27To40;
        assert_eq!(*choose_version(ECLevel::L, enc, 23648).unwrap().version, 40);
        assert!(choose_version(ECLevel::L, enc, 23649).is_none());
    }
}

// Global constants
//------------------------------------------------------------------------------

static ECC_CODEWORDS_PER_BLOCK: [[usize; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

static NUM_ERROR_CORRECTION_BLOCKS: [[usize; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13, 14,
        15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
