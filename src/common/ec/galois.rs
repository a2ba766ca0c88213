use std::sync::OnceLock;

// GF(256) arithmetic over the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const PRIMITIVE: u16 = 0x11D;

pub static EXP_TABLE: [u8; 256] = exp_table();

pub static LOG_TABLE: [u8; 256] = log_table();

const fn exp_table() -> [u8; 256] {
    let mut res = [0; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        res[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    res
}

const fn log_table() -> [u8; 256] {
    let exp = exp_table();
    let mut res = [0; 256];
    let mut i = 0;
    while i < 255 {
        res[exp[i] as usize] = i as u8;
        i += 1;
    }
    res
}

pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = (LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize) % 255;
    EXP_TABLE[log_sum]
}

// Generator polynomials
//------------------------------------------------------------------------------

pub const MAX_EC_SIZE: usize = 30;

static GENERATOR_POLYNOMIALS: OnceLock<Vec<Vec<u8>>> = OnceLock::new();

/// Generator polynomial (x - a^0)(x - a^1)...(x - a^(deg-1)) in log form, highest
/// degree first, with the implicit leading 1 dropped.
pub fn generator_polynomial(deg: usize) -> &'static [u8] {
    assert!((1..=MAX_EC_SIZE).contains(&deg), "Unsupported ecc length: {deg}");

    &GENERATOR_POLYNOMIALS.get_or_init(|| (0..=MAX_EC_SIZE).map(log_generator).collect())[deg]
}

fn log_generator(deg: usize) -> Vec<u8> {
    let mut poly = vec![1u8];
    for i in 0..deg {
        let root = EXP_TABLE[i];
        let mut next = vec![0u8; poly.len() + 1];
        for (j, &coeff) in poly.iter().enumerate() {
            next[j] ^= coeff;
            next[j + 1] ^= mul(coeff, root);
        }
        poly = next;
    }
    poly[1..]
        .iter()
        .map(|&c| {
            debug_assert!(c != 0, "Zero coefficient in generator polynomial");
            LOG_TABLE[c as usize]
        })
        .collect()
}

#[cfg(test)]
mod galois_tests {
    use super::{generator_polynomial, mul, EXP_TABLE, LOG_TABLE};

    #[test]
    fn test_tables() {
        assert_eq!(EXP_TABLE[0], 1);
        assert_eq!(EXP_TABLE[8], 0x1D);
        assert_eq!(EXP_TABLE[255], 1);
        for i in 1..=255usize {
            assert_eq!(EXP_TABLE[LOG_TABLE[i] as usize] as usize, i);
        }
    }

    #[test]
    fn test_mul() {
        assert_eq!(mul(0, 0x53), 0);
        assert_eq!(mul(1, 0x53), 0x53);
        assert_eq!(mul(2, 0x80), 0x1D);
        assert_eq!(mul(0x53, 0xCA), mul(0xCA, 0x53));
    }

    #[test]
    fn test_generator_polynomial() {
        // x^2 + 3x + 2
        assert_eq!(generator_polynomial(2), [25, 1]);
        // Degree 7 generator from the QR standard annex
        assert_eq!(generator_polynomial(7), [87, 229, 146, 149, 238, 102, 21]);
    }
}
