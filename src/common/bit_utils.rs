use std::fmt::Display;

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

/// Growable, MSB-first sequence of bits. Bits are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self { data: Vec::with_capacity((bit_capacity + 7) >> 3), len: 0 }
    }

    pub fn from(inp: &[u8]) -> Self {
        Self { data: inp.to_vec(), len: inp.len() << 3 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Backing bytes; the trailing partial byte is zero padded.
    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }

    pub fn get(&self, pos: usize) -> bool {
        assert!(pos < self.len, "Out of bitstream bounds: Len {}, Pos {}", self.len, pos);

        (self.data[pos >> 3] << (pos & 7)) & 0b10000000 != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }
}

// Append bits to bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }
        self.len += 1;
    }

    /// Appends the lowest `size` bits of `bits`, most significant first.
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = T::zero().count_zeros() as usize;
        debug_assert!(size <= max_bits, "Cannot push {size} bits from a {max_bits} bit integer");
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );

        for i in (0..size).rev() {
            self.push((bits >> i) & T::one() == T::one());
        }
    }

    pub fn push_n(&mut self, bit: bool, n: usize) {
        for _ in 0..n {
            self.push(bit);
        }
    }

    pub fn append(&mut self, other: &BitStream) {
        if self.len & 7 == 0 {
            self.extend(other.data());
            self.len -= (other.data().len() << 3) - other.len;
            return;
        }
        other.iter().for_each(|b| self.push(b));
    }

    pub fn extend(&mut self, arr: &[u8]) {
        if self.len & 7 != 0 {
            arr.iter().for_each(|b| self.push_bits(*b, 8));
            return;
        }
        self.data.truncate(self.len >> 3);
        self.data.extend_from_slice(arr);
        self.len += arr.len() << 3;
    }

    /// Copies bits `[start, end)` into a new stream.
    pub fn substr(&self, start: usize, end: usize) -> BitStream {
        assert!(
            start <= end && end <= self.len,
            "Invalid substring range: Start {start}, End {end}, Len {}",
            self.len
        );

        let mut res = BitStream::with_capacity(end - start);
        if start & 7 == 0 {
            let (from, to) = (start >> 3, end >> 3);
            res.extend(&self.data[from..to]);
            (to << 3..end).for_each(|i| res.push(self.get(i)));
        } else {
            (start..end).for_each(|i| res.push(self.get(i)));
        }
        res
    }
}



#[cfg(test)]
mod bit_stream_proptests {

    use proptest::prelude::*;

    use super::BitStream;

    proptest! {
        #[test]
        fn proptest_substr_matches_bits(bits in prop::collection::vec(any::<bool>(), 0..200), a in 0usize..200, b in 0usize..200) {
            let mut bs = BitStream::new();
            bits.iter().for_each(|b| bs.push(*b));
            let (start, end) = (a.min(b).min(bits.len()), a.max(b).min(bits.len()));
            let sub = bs.substr(start, end);
            prop_assert_eq!(sub.len(), end - start);
            prop_assert_eq!(sub.iter().collect::<Vec<_>>(), bits[start..end].to_vec());
        }
    }
}
