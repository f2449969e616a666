//! Shared text utilities: whitespace normalisation and digit spelling.
//!
//! Both are pure functions used by every dialect. Marks on the certificates
//! are spelled digit by digit ("91" is printed as "NINE ONE"), not as number
//! words, so the encoder never groups by place value.

const DIGIT_WORDS: [&str; 10] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
];

/// Collapse whitespace runs to single spaces and trim.
///
/// Returns `None` when nothing but whitespace remains, so callers never
/// store empty strings. Idempotent.
pub fn normalize(text: &str) -> Option<String> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Spell each decimal digit of `value` as an uppercase word.
///
/// `69` becomes `"SIX NINE"`, `100` becomes `"ONE ZERO ZERO"`.
pub fn digits_to_words(value: u32) -> String {
    value
        .to_string()
        .bytes()
        .map(|b| DIGIT_WORDS[usize::from(b - b'0')])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inverse of [`digits_to_words`].
///
/// Case-insensitive; returns `None` for an empty input, an unknown word, or
/// a value that overflows `u32`.
pub fn words_to_digits(words: &str) -> Option<u32> {
    let mut value: u32 = 0;
    let mut seen = false;
    for word in words.split_whitespace() {
        let digit = DIGIT_WORDS
            .iter()
            .position(|w| w.eq_ignore_ascii_case(word))?;
        value = value.checked_mul(10)?.checked_add(digit as u32)?;
        seen = true;
    }
    seen.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_collapses_and_trims() {
        assert_eq!(
            normalize("  SATYAM \t  JHA\n").as_deref(),
            Some("SATYAM JHA")
        );
    }

    #[test]
    fn normalize_blank_is_absent() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize(" \n\t "), None);
    }

    #[test]
    fn digits_spelled_in_order() {
        assert_eq!(digits_to_words(69), "SIX NINE");
        assert_eq!(digits_to_words(91), "NINE ONE");
        assert_eq!(digits_to_words(100), "ONE ZERO ZERO");
        assert_eq!(digits_to_words(0), "ZERO");
    }

    #[test]
    fn words_decode() {
        assert_eq!(words_to_digits("EIGHT NINE"), Some(89));
        assert_eq!(words_to_digits("zero seven"), Some(7));
        assert_eq!(words_to_digits("EIGHTY"), None);
        assert_eq!(words_to_digits(""), None);
    }

    #[test]
    fn encoding_is_injective_up_to_999() {
        let mut seen = std::collections::HashSet::new();
        for n in 0..=999u32 {
            assert!(seen.insert(digits_to_words(n)), "collision at {n}");
        }
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            let twice = once.as_deref().and_then(normalize);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn normalized_output_has_no_whitespace_runs(s in "[ A-Z\t\n]{0,40}") {
            if let Some(out) = normalize(&s) {
                prop_assert!(!out.contains("  "));
                prop_assert_eq!(out.trim(), out.as_str());
            }
        }

        #[test]
        fn words_round_trip(n in 0u32..=999) {
            prop_assert_eq!(words_to_digits(&digits_to_words(n)), Some(n));
        }
    }
}
