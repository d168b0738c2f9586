//! Brazilian company tax document (CNPJ) generators.

use crate::FixtureRng;

const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Generate a formatted CNPJ (`NN.NNN.NNN/0001-NN`) with valid check digits.
///
/// The branch block is always `0001` (head office).
pub fn cnpj_formatted(rng: &mut FixtureRng) -> String {
    let mut digits: Vec<u32> = (0..8).map(|_| rng.int(0..=9) as u32).collect();
    digits.extend([0, 0, 0, 1]);
    let first = check_digit(&digits, &FIRST_WEIGHTS);
    digits.push(first);
    let second = check_digit(&digits, &SECOND_WEIGHTS);
    digits.push(second);

    let s: String = digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect();
    format!(
        "{}.{}.{}/{}-{}",
        &s[0..2],
        &s[2..5],
        &s[5..8],
        &s[8..12],
        &s[12..14]
    )
}

/// Generate 14 unformatted random digits (no check digit calculation).
pub fn cnpj_digits(rng: &mut FixtureRng) -> String {
    (0..14)
        .filter_map(|_| char::from_digit(rng.int(0..=9) as u32, 10))
        .collect()
}

/// Check a CNPJ's check digits, ignoring punctuation.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 14 {
        return false;
    }
    check_digit(&digits[..12], &FIRST_WEIGHTS) == digits[12]
        && check_digit(&digits[..13], &SECOND_WEIGHTS) == digits[13]
}
