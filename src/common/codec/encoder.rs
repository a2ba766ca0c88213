use std::ops::RangeInclusive;

use tracing::trace;

use super::{Mode, Segment};
use crate::common::{BitStream, QRError, QRResult};

// Data encoder
//------------------------------------------------------------------------------

/// Encoder variants. They differ only in the width of the char count field,
/// which depends on the version range the symbol will fall into.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum DataEncoder {
    Versions1To9,
    Versions10To26,
    Versions27To40,
}

impl DataEncoder {
    pub const ALL: [DataEncoder; 3] =
        [DataEncoder::Versions1To9, DataEncoder::Versions10To26, DataEncoder::Versions27To40];

    pub fn version_range(self) -> RangeInclusive<usize> {
        match self {
            Self::Versions1To9 => 1..=9,
            Self::Versions10To26 => 10..=26,
            Self::Versions27To40 => 27..=40,
        }
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        match (self, mode) {
            (Self::Versions1To9, Mode::Numeric) => 10,
            (Self::Versions1To9, Mode::Alphanumeric) => 9,
            (Self::Versions1To9, Mode::Byte) => 8,
            (Self::Versions10To26, Mode::Numeric) => 12,
            (Self::Versions10To26, Mode::Alphanumeric) => 11,
            (Self::Versions10To26, Mode::Byte) => 16,
            (Self::Versions27To40, Mode::Numeric) => 14,
            (Self::Versions27To40, Mode::Alphanumeric) => 13,
            (Self::Versions27To40, Mode::Byte) => 16,
        }
    }

    /// Total bit length of a segment of `len` chars, including header. Fails when
    /// the char count field cannot represent `len`.
    pub fn segment_len(self, mode: Mode, len: usize) -> QRResult<usize> {
        let cnt_bits = self.char_cnt_bits(mode);
        let max = (1 << cnt_bits) - 1;
        if len > max {
            return Err(QRError::SegmentTooLong { mode, len, max });
        }
        Ok(Mode::INDICATOR_LEN + cnt_bits + mode.encoded_len(len))
    }

    pub fn encode(self, data: &[u8]) -> QRResult<BitStream> {
        if data.is_empty() {
            return Err(QRError::EmptyData);
        }

        let (segs, widest) = classify(data);
        let mut segs = self.optimise(data, &segs)?;

        // A single segment in the widest mode may still beat the mix
        let mut optimised_len = 0;
        for seg in segs.iter() {
            optimised_len += self.segment_len(seg.mode, seg.len())?;
        }
        if matches!(self.segment_len(widest, data.len()), Ok(len) if len <= optimised_len) {
            segs = vec![Segment::new(widest, data)];
        }
        trace!(encoder = ?self, segments = segs.len(), "Segmented data");

        let mut bs = BitStream::new();
        for seg in segs {
            self.push_segment(seg, &mut bs);
        }
        Ok(bs)
    }

    // Greedily merges each segment with its successors while the successor is
    // no wider and merging is strictly shorter
    fn optimise<'a>(self, data: &'a [u8], segs: &[Segment]) -> QRResult<Vec<Segment<'a>>> {
        let mut res = Vec::with_capacity(segs.len());
        let mut offset = 0;
        let mut i = 0;
        while i < segs.len() {
            let mode = segs[i].mode;
            let mut len = segs[i].len();

            let mut j = i + 1;
            while let Some(next) = segs.get(j) {
                if next.mode > mode {
                    break;
                }
                let merged = self.segment_len(mode, len + next.len())?;
                let separate =
                    self.segment_len(mode, len)? + self.segment_len(next.mode, next.len())?;
                if merged >= separate {
                    break;
                }
                len += next.len();
                j += 1;
            }

            res.push(Segment::new(mode, &data[offset..offset + len]));
            offset += len;
            i = j;
        }
        Ok(res)
    }

    fn push_segment(self, seg: Segment, bs: &mut BitStream) {
        bs.push_bits(seg.mode.indicator(), Mode::INDICATOR_LEN);
        bs.push_bits(seg.len() as u32, self.char_cnt_bits(seg.mode));
        for chunk in seg.data.chunks(seg.mode.chunk_size()) {
            let (bits, len) = seg.mode.encode_chunk(chunk);
            bs.push_bits(bits, len);
        }
    }
}

// Splits data into runs of the narrowest mode per byte. Also returns the widest
// mode required by the data.
fn classify(data: &[u8]) -> (Vec<Segment<'_>>, Mode) {
    let mut segs = vec![];
    let mut widest = Mode::Numeric;
    let mut seg_start = 0;
    let mut seg_mode = Mode::of(data[0]);
    for (i, &b) in data.iter().enumerate() {
        let mode = Mode::of(b);
        if mode != seg_mode {
            segs.push(Segment::new(seg_mode, &data[seg_start..i]));
            seg_mode = mode;
            seg_start = i;
        }
        widest = widest.max(mode);
    }
    segs.push(Segment::new(seg_mode, &data[seg_start..]));
    (segs, widest)
}
