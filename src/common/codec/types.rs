// Mode
//------------------------------------------------------------------------------

/// Character encoding modes, ordered from narrowest to widest.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    pub const INDICATOR_LEN: usize = 4;

    pub fn indicator(self) -> u8 {
        self as u8
    }

    /// Narrowest mode able to represent the byte.
    pub fn of(byte: u8) -> Self {
        if Self::Numeric.contains(byte) {
            Self::Numeric
        } else if Self::Alphanumeric.contains(byte) {
            Self::Alphanumeric
        } else {
            Self::Byte
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    /// Number of input chars packed into one chunk.
    pub fn chunk_size(&self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric => 2,
            Self::Byte => 1,
        }
    }

    /// Returns the packed value of a chunk along with its bit length.
    pub fn encode_chunk(&self, data: &[u8]) -> (u16, usize) {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!((1..=3).contains(&len), "Invalid numeric chunk length: {len}");
                (data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b)), 1 + 3 * len)
            }
            Self::Alphanumeric => {
                debug_assert!((1..=2).contains(&len), "Invalid alphanumeric chunk length: {len}");
                (data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b)), 1 + 5 * len)
            }
            Self::Byte => {
                debug_assert!(len == 1, "Invalid byte chunk length: {len}");
                (data[0] as u16, 8)
            }
        }
    }

    /// Bit length of `len` chars, excluding the mode indicator & char count.
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => 10 * (len / 3) + if len % 3 == 0 { 0 } else { 1 + 3 * (len % 3) },
            Self::Alphanumeric => 11 * (len / 2) + 6 * (len % 2),
            Self::Byte => len * 8,
        }
    }
}

#[cfg(test)]
mod mode_tests {
    use test_case::test_case;

    use super::Mode;
    use super::Mode::*;

    #[test]
    fn test_comparison() {
        assert!(Numeric < Alphanumeric);
        assert!(Numeric < Byte);
        assert!(Alphanumeric < Byte);
        assert_eq!(Numeric.max(Byte), Byte);
    }

    #[test_case(b'7', Numeric)]
    #[test_case(b'Q', Alphanumeric)]
    #[test_case(b':', Alphanumeric)]
    #[test_case(b' ', Alphanumeric)]
    #[test_case(b'q', Byte)]
    #[test_case(b'#', Byte)]
    #[test_case(0xF0, Byte)]
    fn test_classify(byte: u8, exp: Mode) {
        assert_eq!(Mode::of(byte), exp);
    }

    #[test_case(Numeric, b"012", 12, 10)]
    #[test_case(Numeric, b"45", 45, 7)]
    #[test_case(Numeric, b"6", 6, 4)]
    #[test_case(Alphanumeric, b"AC", 462, 11)]
    #[test_case(Alphanumeric, b"-", 41, 6)]
    #[test_case(Byte, b"a", 97, 8)]
    fn test_encode_chunk(mode: Mode, chunk: &[u8], exp_val: u16, exp_len: usize) {
        assert_eq!(mode.encode_chunk(chunk), (exp_val, exp_len));
    }

    #[test_case(Numeric, 8, 27)]
    #[test_case(Numeric, 9, 30)]
    #[test_case(Numeric, 1, 4)]
    #[test_case(Alphanumeric, 5, 28)]
    #[test_case(Byte, 3, 24)]
    fn test_encoded_len(mode: Mode, len: usize, exp: usize) {
        assert_eq!(mode.encoded_len(len), exp);
    }
}

// Segment
//------------------------------------------------------------------------------

/// Contiguous run of the input encoded in a single mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Segment<'a> {
    pub mode: Mode,
    pub data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, data: &'a [u8]) -> Self {
        Self { mode, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
