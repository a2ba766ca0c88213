mod block;
mod galois;

pub use block::*;
pub use galois::MAX_EC_SIZE;

use std::ops::Deref;

use tracing::trace;

use super::version_db::VersionSpec;
use super::BitStream;

/// Splits the padded payload into the version's blocks, computes ecc for each
/// block, interleaves data then ecc codewords and appends the remainder bits.
pub fn encode_blocks(payload: &BitStream, spec: &VersionSpec) -> BitStream {
    let blocks = blockify(payload.data(), spec);
    trace!(blocks = blocks.len(), ecc_per_block = spec.ecc_per_block(), "Computed ecc blocks");

    let data_blocks = blocks.iter().map(|b| b.data()).collect::<Vec<_>>();
    let ecc_blocks = blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>();

    let mut res = BitStream::with_capacity((spec.total_codewords << 3) + spec.remainder_bits);
    res.extend(&interleave(&data_blocks));
    res.extend(&interleave(&ecc_blocks));
    res.push_n(false, spec.remainder_bits);
    res
}

pub fn blockify(data: &[u8], spec: &VersionSpec) -> Vec<DataBlock> {
    assert!(
        data.len() == spec.data_codewords,
        "bug: payload of {} codewords doesn't fill the {} data codewords",
        data.len(),
        spec.data_codewords
    );

    let mut res = Vec::with_capacity(spec.num_blocks());
    let mut cursor = 0;
    for group in spec.blocks.iter() {
        for _ in 0..group.num_blocks {
            let next = cursor + group.num_data_codewords;
            res.push(DataBlock::new(&data[cursor..next], group.num_ec_codewords()));
            cursor = next;
        }
    }
    res
}

/// Takes the i-th element of every block in block order, for increasing i,
/// skipping blocks that have run out.
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

#[cfg(test)]
mod ec_tests {
    use super::{blockify, encode_blocks, interleave};
    use crate::common::metadata::{ECLevel, Version};
    use crate::common::version_db::version_spec;
    use crate::common::BitStream;

    const MSG_5Q: &[u8] = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                            \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                            \x11\xec\x11\xec";

    #[test]
    fn test_blockify_complex() {
        let expected_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let spec = version_spec(Version::new(5), ECLevel::Q);
        let blocks = blockify(MSG_5Q, spec);
        assert_eq!(blocks.iter().map(|b| b.data().len()).collect::<Vec<_>>(), [15, 15, 16, 16]);
        assert_eq!(blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>(), expected_ec);
    }

    #[test]
    fn test_encode_blocks_layout() {
        let spec = version_spec(Version::new(5), ECLevel::Q);
        let encoded = encode_blocks(&BitStream::from(MSG_5Q), spec);
        assert_eq!(encoded.len(), spec.total_codewords * 8 + spec.remainder_bits);

        let bytes = encoded.data();
        // Data codewords of each block, round robin
        assert_eq!(&bytes[..4], [MSG_5Q[0], MSG_5Q[15], MSG_5Q[30], MSG_5Q[46]]);
        // The long blocks' last data codewords close the data section
        assert_eq!(&bytes[60..62], [MSG_5Q[45], MSG_5Q[61]]);
        // Then the first ecc codeword of every block
        assert_eq!(&bytes[62..66], b"\xd5\x57\x94\xeb");
    }

    #[test]
    fn test_remainder_bits_appended() {
        let spec = version_spec(Version::new(2), ECLevel::L);
        let data = vec![0x11; spec.data_codewords];
        let encoded = encode_blocks(&BitStream::from(&data), spec);
        assert_eq!(spec.remainder_bits, 7);
        assert_eq!(encoded.len(), spec.total_codewords * 8 + 7);
        assert!(!encoded.substr(spec.total_codewords * 8, encoded.len()).iter().any(|b| b));
    }

    #[test]
    #[should_panic]
    fn test_blockify_wrong_length() {
        blockify(&[0; 10], version_spec(Version::new(1), ECLevel::L));
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
    }
}
