//! Pattern-based repair of digit/letter confusions in decoded name tokens.
//!
//! MRZ name fields are alphabetic, so a digit inside a name token is almost
//! always an optical misread of a similar glyph. Repair is pattern-based,
//! not dictionary-based: each rule is a single left-to-right scan, applied
//! in a fixed order, and each rule sees the token as mutated by the rules
//! before it. Rules are intentionally not iterated to a fixed point, which
//! keeps the repair from over-correcting.

/// Characters stripped from the end of a repaired token. `<` is the MRZ
/// filler, `|` and `K` are its common misreads.
const STRAY_TRAILING: [char; 3] = ['K', '<', '|'];

fn is_vowel(c: char) -> bool {
    matches!(c, 'A' | 'E' | 'I' | 'O' | 'U')
}

/// Repairs one whitespace-delimited, filler-stripped token.
///
/// Rule order is significant and must not change:
///
/// a. `0` preceded by a letter becomes `O` (`TAR0` -> `TARO`).
/// b. `1` at the start, or preceded by a letter, becomes `I` (`1AN` -> `IAN`).
/// c. `5` at the start becomes `S` (`5ATO` -> `SATO`).
/// d. `5` elsewhere preceded by a vowel becomes `S` (`MA5AYA` -> `MASAYA`).
/// e. `3` anywhere except the start becomes `E` (`TYL3R` -> `TYLER`).
/// f. `8` anywhere becomes `B` (`8EN` -> `BEN`).
///
/// Trailing stray padding characters are then trimmed. The result may be
/// empty; callers drop empty tokens.
pub fn repair_token(token: &str) -> String {
    let mut chars: Vec<char> = token.chars().collect();

    // Rule a: 0 after a letter -> O.
    for i in 0..chars.len() {
        if chars[i] == '0' && i > 0 && chars[i - 1].is_alphabetic() {
            chars[i] = 'O';
        }
    }

    // Rule b: leading 1, or 1 after a letter -> I.
    for i in 0..chars.len() {
        if chars[i] == '1' && (i == 0 || chars[i - 1].is_alphabetic()) {
            chars[i] = 'I';
        }
    }

    // Rule c: leading 5 -> S.
    if chars.first() == Some(&'5') {
        chars[0] = 'S';
    }

    // Rule d: 5 after a vowel -> S.
    for i in 1..chars.len() {
        if chars[i] == '5' && is_vowel(chars[i - 1]) {
            chars[i] = 'S';
        }
    }

    // Rule e: non-leading 3 -> E.
    for i in 1..chars.len() {
        if chars[i] == '3' {
            chars[i] = 'E';
        }
    }

    // Rule f: 8 -> B.
    for c in chars.iter_mut() {
        if *c == '8' {
            *c = 'B';
        }
    }

    let repaired: String = chars.into_iter().collect();
    repaired.trim_end_matches(STRAY_TRAILING).to_string()
}

/// Repairs every whitespace-delimited token in `text`, dropping tokens that
/// are empty after trimming. Joins survivors with single spaces.
pub fn repair_text(text: &str) -> String {
    text.split_whitespace()
        .map(repair_token)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
