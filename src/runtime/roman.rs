use thiserror::Error;

/// The only Roman forms accepted as operands, indexed by `value - 1`.
pub const ROMAN_NUMERALS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// Value/symbol pairs for the greedy subtractive conversion, largest first.
pub const CONVERSIONS: [(i64, &str); 13] = [
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

pub const DECIMAL_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RomanErr {
    #[error("not a roman number, {0:?}")]
    NotRoman(String),
    #[error("roman number must be greater than zero, got {0}")]
    NonPositiveResult(i64),
}

pub fn is_roman(value: &str) -> bool {
    ROMAN_NUMERALS.contains(&value)
}

pub fn is_decimal(value: &str) -> bool {
    value
        .parse::<i64>()
        .is_ok_and(|x| DECIMAL_RANGE.contains(&x))
}

/// Only the ten canonical numerals are understood, `"XI"` or `"iv"` are rejected.
pub fn to_integer(value: &str) -> Result<i64, RomanErr> {
    ROMAN_NUMERALS
        .iter()
        .position(|numeral| *numeral == value)
        .map(|index| index as i64 + 1)
        .ok_or_else(|| RomanErr::NotRoman(value.to_string()))
}

pub fn to_roman(mut number: i64) -> Result<String, RomanErr> {
    if number < 1 {
        return Err(RomanErr::NonPositiveResult(number));
    }

    let mut roman = String::new();
    for (value, digit) in CONVERSIONS {
        while number >= value {
            roman.push_str(digit);
            number -= value;
        }
    }

    Ok(roman)
}
