//! As-you-type formatters for payment fields.
//!
//! Formatters never reject input. When there is nothing sensible to format
//! they hand back what the shopper typed so a partial entry is not lost.

/// Longest card number the form accepts, in digits.
const MAX_CARD_DIGITS: usize = 16;

/// Shortest digit run worth grouping.
const MIN_CARD_DIGITS: usize = 4;

/// Digits per displayed card number block.
const CARD_BLOCK: usize = 4;

/// Longest CVC, in digits.
const MAX_CVC_DIGITS: usize = 4;

fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Format a card number as blocks of four digits.
///
/// Non-digits are stripped and at most 16 digits are kept. Input with fewer
/// than four digits is returned unchanged.
///
/// ```
/// use ethos_core::checkout::format_card_number;
///
/// assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
/// assert_eq!(format_card_number("4242-42"), "4242 42");
/// assert_eq!(format_card_number("abc"), "abc");
/// ```
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() < MIN_CARD_DIGITS {
        return raw.to_string();
    }

    let kept: Vec<char> = digits.chars().take(MAX_CARD_DIGITS).collect();
    kept.chunks(CARD_BLOCK)
        .map(|block| block.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an expiry date as `MM/YY`.
///
/// Non-digits are stripped. With two or more digits a slash is inserted after
/// the month and the year is cut to two digits; otherwise the digits are
/// returned as typed.
///
/// ```
/// use ethos_core::checkout::format_expiry;
///
/// assert_eq!(format_expiry("1225"), "12/25");
/// assert_eq!(format_expiry("12/2025"), "12/20");
/// assert_eq!(format_expiry("1"), "1");
/// ```
#[must_use]
pub fn format_expiry(raw: &str) -> String {
    let digits = digits(raw);
    match (digits.get(..2), digits.get(2..)) {
        (Some(month), Some(year)) => {
            let year: String = year.chars().take(2).collect();
            format!("{month}/{year}")
        }
        _ => digits,
    }
}

/// Keep only digits, at most four.
#[must_use]
pub fn format_cvc(raw: &str) -> String {
    digits(raw).chars().take(MAX_CVC_DIGITS).collect()
}
