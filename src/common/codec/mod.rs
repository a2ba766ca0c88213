pub mod encoder;
pub mod types;

pub use encoder::*;
pub use types::*;

use tracing::{debug, trace};

use super::metadata::{ECLevel, Version};
use super::version_db::{choose_version, version_spec, VersionSpec};
use super::{BitStream, QRError, QRResult};

/// Bit stream produced by a data encoder, tagged with the encoder whose char
/// count widths it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub bits: BitStream,
    pub encoder: DataEncoder,
}

/// Encodes with each encoder variant in turn and picks the smallest version that
/// fits. A variant that cannot represent a segment falls through to the next.
pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(EncodedPayload, &'static VersionSpec)> {
    if data.is_empty() {
        return Err(QRError::EmptyData);
    }

    for encoder in DataEncoder::ALL {
        let bits = match encoder.encode(data) {
            Ok(bits) => bits,
            Err(err) => {
                trace!(?encoder, %err, "Encoder cannot represent data");
                continue;
            }
        };
        if let Some(spec) = choose_version(ecl, encoder, bits.len()) {
            debug!(?encoder, version = *spec.version, bits = bits.len(), "Chose version");
            return Ok((EncodedPayload { bits, encoder }, spec));
        }
    }
    Err(QRError::DataTooLong)
}

pub fn encode_with_version(
    data: &[u8],
    ecl: ECLevel,
    version: Version,
) -> QRResult<(EncodedPayload, &'static VersionSpec)> {
    if data.is_empty() {
        return Err(QRError::EmptyData);
    }

    let encoder = DataEncoder::ALL
        .into_iter()
        .find(|e| e.version_range().contains(&*version))
        .expect("bug: every version belongs to an encoder");
    let bits = encoder.encode(data).map_err(|_| QRError::DataTooLong)?;
    let spec = version_spec(version, ecl);
    if bits.len() > spec.data_bit_capacity() {
        return Err(QRError::DataTooLong);
    }
    Ok((EncodedPayload { bits, encoder }, spec))
}

/// Terminates the payload, aligns it to a codeword and fills the remaining
/// data capacity with alternating pad codewords.
pub fn pad(payload: &EncodedPayload, spec: &VersionSpec) -> BitStream {
    let capacity = spec.data_bit_capacity();
    let mut res = BitStream::with_capacity(capacity);
    res.append(&payload.bits);

    res.push_n(false, spec.num_terminator_bits_required(res.len()));
    res.push_n(false, VersionSpec::num_bits_to_pad_to_codeword(res.len()));
    for &pad in PADDING_CODEWORDS.iter().cycle().take((capacity - res.len()) >> 3) {
        res.push_bits(pad, 8);
    }

    assert!(
        res.len() == capacity,
        "bug: padded payload is {} bits, data capacity is {capacity}",
        res.len()
    );
    res
}

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

#[cfg(test)]
mod codec_tests {
    use test_case::test_case;

    use super::{encode, encode_with_version, pad, DataEncoder};
    use crate::common::metadata::{ECLevel, Version};
    use crate::common::QRError;

    #[test_case("01234567", ECLevel::M, 1)]
    #[test_case("HELLO WORLD", ECLevel::M, 1)]
    #[test_case("hello world", ECLevel::H, 2)]
    #[test_case(&"1".repeat(41), ECLevel::L, 1)]
    #[test_case(&"1".repeat(42), ECLevel::L, 2)]
    fn test_encode_version(data: &str, ecl: ECLevel, exp: usize) {
        let (_, spec) = encode(data.as_bytes(), ecl).unwrap();
        assert_eq!(*spec.version, exp);
    }

    #[test]
    fn test_encoder_fall_through() {
        // 256 bytes overflow the byte count field of versions 1 to 9
        let data = vec![b'a'; 256];
        let (payload, spec) = encode(&data, ECLevel::L).unwrap();
        assert_eq!(payload.encoder, DataEncoder::Versions10To26);
        assert_eq!(*spec.version, 10);
    }

    #[test]
    fn test_too_long() {
        let data = "0".repeat(7090);
        assert_eq!(encode(data.as_bytes(), ECLevel::L), Err(QRError::DataTooLong));
        assert_eq!(encode(b"", ECLevel::L), Err(QRError::EmptyData));
    }

    #[test]
    fn test_encode_with_version() {
        let (payload, spec) = encode_with_version(b"HELLO", ECLevel::Q, Version::new(12)).unwrap();
        assert_eq!(payload.encoder, DataEncoder::Versions10To26);
        assert_eq!(*spec.version, 12);
        let data = "A".repeat(30);
        assert_eq!(
            encode_with_version(data.as_bytes(), ECLevel::H, Version::new(1)),
            Err(QRError::DataTooLong)
        );
    }

    #[test]
    fn test_pad() {
        let (payload, spec) = encode(b"01234567", ECLevel::M).unwrap();
        let padded = pad(&payload, spec);
        assert_eq!(padded.len(), 128);
        assert_eq!(
            padded.data(),
            b"\x10\x20\x0c\x56\x61\x80\xec\x11\xec\x11\xec\x11\xec\x11\xec\x11"
        );
    }

    #[test]
    fn test_pad_short_terminator() {
        // 71 of 72 bits used, a single terminator bit fits
        let (payload, spec) = encode("1".repeat(17).as_bytes(), ECLevel::H).unwrap();
        assert_eq!(payload.bits.len(), 4 + 10 + 57);
        let padded = pad(&payload, spec);
        assert_eq!(padded.len(), 72);
    }
}
