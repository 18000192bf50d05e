//! Date canonicalization for decoded MRZ fields.
//!
//! Decoders emit birth dates in several encodings depending on how much of
//! the zone they managed to parse. Everything recognized is normalized to
//! `dd/mm/yyyy`; anything else passes through unchanged so a partially
//! readable value is never destroyed.

/// Two-digit years at or below this value are mapped into the 2000s.
const CENTURY_PIVOT: u32 = 30;

/// Canonicalizes a decoded date string into `dd/mm/yyyy`.
///
/// Accepted encodings:
/// * `dd/mm/yyyy` - returned unchanged.
/// * `yyyy/mm/dd` - reordered.
/// * `yyyy-mm-dd` (exactly 10 characters) - reordered.
/// * raw six-digit `yymmdd` (MRZ native) - expanded, with `yy <= 30`
///   mapping to `2000 + yy` and anything later to `1900 + yy`.
///
/// Unrecognized formats are returned as-is. Never fails.
pub fn normalize_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if raw.contains('/') {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() <= 2 && parts[1].len() <= 2 && parts[2].len() == 4 {
                return raw.to_string();
            }
            if parts[0].len() == 4 {
                return format!("{}/{}/{}", parts[2], parts[1], parts[0]);
            }
        }
    }

    if raw.contains('-') && raw.len() == 10 {
        let parts: Vec<&str> = raw.split('-').collect();
        if parts.len() == 3 && parts[0].len() == 4 {
            return format!("{}/{}/{}", parts[2], parts[1], parts[0]);
        }
    }

    if raw.len() == 6 && raw.chars().all(|c| c.is_ascii_digit()) {
        let yy: u32 = raw[0..2].parse().unwrap_or(0);
        let mm: u32 = raw[2..4].parse().unwrap_or(0);
        let dd: u32 = raw[4..6].parse().unwrap_or(0);
        let year = if yy <= CENTURY_PIVOT { 2000 + yy } else { 1900 + yy };
        return format!("{:02}/{:02}/{}", dd, mm, year);
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form_passes_through() {
        assert_eq!(normalize_date("01/01/1999"), "01/01/1999");
        assert_eq!(normalize_date("31/12/2004"), "31/12/2004");
    }

    #[test]
    fn test_year_first_slash_form_reordered() {
        assert_eq!(normalize_date("1999/01/31"), "31/01/1999");
    }

    #[test]
    fn test_iso_dash_form_reordered() {
        assert_eq!(normalize_date("2004-12-31"), "31/12/2004");
        // Dash form must be exactly 10 characters.
        assert_eq!(normalize_date("2004-1-31"), "2004-1-31");
    }

    #[test]
    fn test_mrz_native_six_digit_form() {
        assert_eq!(normalize_date("300101"), "01/01/2030");
        assert_eq!(normalize_date("990101"), "01/01/1999");
        assert_eq!(normalize_date("310101"), "01/01/1931");
        assert_eq!(normalize_date("000704"), "04/07/2000");
    }

    #[test]
    fn test_unrecognized_passes_through() {
        assert_eq!(normalize_date("tomorrow"), "tomorrow");
        assert_eq!(normalize_date("12345"), "12345");
        assert_eq!(normalize_date("12a456"), "12a456");
        assert_eq!(normalize_date(""), "");
    }
}
