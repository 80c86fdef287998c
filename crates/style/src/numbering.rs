//! Page number formatting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NumberStyle {
    #[default]
    Decimal,
    UpperRoman,
    LowerRoman,
    UpperAlpha,
    LowerAlpha,
    None,
}

const ROMAN: [(usize, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

impl NumberStyle {
    /// Formats a one-based page number. Zero has no roman or alphabetic form and
    /// falls back to decimal.
    pub fn format(self, number: usize) -> String {
        match self {
            NumberStyle::None => String::new(),
            NumberStyle::Decimal => number.to_string(),
            _ if number == 0 => number.to_string(),
            NumberStyle::UpperRoman => to_roman(number),
            NumberStyle::LowerRoman => to_roman(number).to_lowercase(),
            NumberStyle::UpperAlpha => to_alpha(number),
            NumberStyle::LowerAlpha => to_alpha(number).to_lowercase(),
        }
    }
}

fn to_roman(mut number: usize) -> String {
    let mut out = String::new();
    for &(value, glyph) in ROMAN.iter() {
        while number >= value {
            out.push_str(glyph);
            number -= value;
        }
    }
    out
}

// Bijective base-26: 1 -> A, 26 -> Z, 27 -> AA.
fn to_alpha(mut number: usize) -> String {
    let mut letters = Vec::new();
    while number > 0 {
        number -= 1;
        letters.push((b'A' + (number % 26) as u8) as char);
        number /= 26;
    }
    letters.iter().rev().collect()
}
