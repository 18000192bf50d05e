//! MRZ name field normalization.
//!
//! Name fields use the `<` filler: a single filler stands for padding or a
//! space, a doubled filler separates the surname from the given names.
//! Cleaning preserves the part boundary while stripping noise, then runs
//! each part through the OCR repair rules.

use super::ocr_repair::repair_text;

/// Internal marker substituted for the doubled filler before single fillers
/// are turned into spaces. A control character cannot survive the decoder's
/// character set, so it can never collide with field content.
const PART_SEPARATOR: char = '\u{1f}';

/// Characters stripped from both ends of a repaired part: filler misreads
/// and padding left over at part boundaries.
const STRAY_BOUNDARY: [char; 4] = ['K', '<', '|', ' '];

/// Cleans a raw MRZ name field into space-separated name parts.
///
/// Steps: mark the doubled-filler separator, turn single fillers into
/// spaces, split on the marker, sanitize each part to alphanumerics and
/// spaces, collapse whitespace, apply OCR repair, strip stray boundary
/// characters, and join the surviving parts with single spaces.
///
/// The output contains only letters, digits, and single interior spaces.
/// Empty input yields empty output; this function never fails.
pub fn clean_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let marked = name
        .replace("<<", &PART_SEPARATOR.to_string())
        .replace('<', " ");

    let mut cleaned_parts: Vec<String> = Vec::new();

    for part in marked.split(PART_SEPARATOR) {
        let sanitized: String = part
            .chars()
            .map(|c| if c.is_alphanumeric() || c == ' ' { c } else { ' ' })
            .collect();

        let collapsed = sanitized.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            continue;
        }

        let repaired = repair_text(&collapsed);
        let trimmed = repaired.trim_matches(STRAY_BOUNDARY).to_string();

        if !trimmed.is_empty() {
            cleaned_parts.push(trimmed);
        }
    }

    cleaned_parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surname_given_names_separator() {
        assert_eq!(clean_name("SMITH<<JOHN<PAUL"), "SMITH JOHN PAUL");
    }

    #[test]
    fn test_single_filler_becomes_space() {
        assert_eq!(clean_name("VAN<DER<BERG"), "VAN DER BERG");
    }

    #[test]
    fn test_padding_fillers_dropped() {
        assert_eq!(clean_name("GARCIA<<MARIA<<<<<<<<"), "GARCIA MARIA");
    }

    #[test]
    fn test_ocr_repair_applied_per_part() {
        assert_eq!(clean_name("5MITH<<TAR0"), "SMITH TARO");
        assert_eq!(clean_name("TYL3R<<8EN"), "TYLER BEN");
    }

    #[test]
    fn test_special_characters_become_spaces() {
        assert_eq!(clean_name("O'BRIEN<<SEAN"), "O BRIEN SEAN");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_name(""), "");
        assert_eq!(clean_name("<<<<<<<<"), "");
    }

    #[test]
    fn test_output_charset() {
        let out = clean_name("D0E<<J4NE*<<X");
        assert!(
            out.chars().all(|c| c.is_alphanumeric() || c == ' '),
            "unexpected character in {:?}",
            out
        );
        assert!(!out.contains("  "), "double space in {:?}", out);
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "SMITH<<JOHN<PAUL",
            "5MITH<<TAR0",
            "GARCIA<<MARIA<<<<<<<<",
            "VAN<DER<BERG",
            "",
        ] {
            let once = clean_name(input);
            assert_eq!(clean_name(&once), once, "not idempotent for {:?}", input);
        }
    }
}
