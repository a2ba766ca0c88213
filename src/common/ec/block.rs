use super::galois::{generator_polynomial, EXP_TABLE, LOG_TABLE};

// Data block
//------------------------------------------------------------------------------

/// Data codewords of one block followed by their parity codewords.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataBlock {
    codewords: Vec<u8>,
    // Index of the first ecc codeword
    ec_start: usize,
}

impl DataBlock {
    pub fn new(data: &[u8], ecc_len: usize) -> Self {
        let mut codewords = Vec::with_capacity(data.len() + ecc_len);
        codewords.extend_from_slice(data);
        codewords.extend(ecc_per_block(data, ecc_len));
        Self { codewords, ec_start: data.len() }
    }

    pub fn len(&self) -> usize {
        self.codewords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codewords.is_empty()
    }

    pub fn ec_start(&self) -> usize {
        self.ec_start
    }

    pub fn full(&self) -> &[u8] {
        &self.codewords
    }

    pub fn data(&self) -> &[u8] {
        &self.codewords[..self.ec_start]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.codewords[self.ec_start..]
    }
}

// Performs polynomial long division of the data polynomial by the generator
// polynomial; the coefficients of the remainder are the ecc
pub fn ecc_per_block(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let len = block.len();
    let gen_poly = generator_polynomial(ecc_count);

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i] as usize;
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = LOG_TABLE[lead_coeff] as usize;
        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            let log_sum = (*v as usize + log_lead_coeff) % 255;
            *u ^= EXP_TABLE[log_sum];
        }
    }

    res.split_off(len)
}
