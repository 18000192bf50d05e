//! Domain types: raw decoder output and the final guest record.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::normalize::{clean_name, normalize_date};

/// Raw MRZ fields as produced by the external decode capability.
///
/// Field values may carry OCR noise and filler characters; nothing here is
/// assumed well-formed. Normalization happens when a [`GuestRecord`] is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMrzFields {
    /// Surname field, MRZ filler conventions included.
    pub surname: String,
    /// Given names field, MRZ filler conventions included.
    pub given_names: String,
    /// Document number.
    pub number: String,
    /// Birth date in whatever encoding the decoder produced.
    pub date_of_birth: String,
    /// Sex code as read from the document.
    pub sex: String,
    /// Issuing country code.
    pub country: String,
    /// Nationality code.
    pub nationality: String,
}

/// Gender as recorded on the document.
///
/// Any sex code other than `M` or `F` maps to [`Gender::Unspecified`],
/// which serializes as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    M,
    /// Female.
    F,
    /// Unreadable or absent sex code.
    Unspecified,
}

impl Gender {
    /// Maps a raw MRZ sex code to a gender value.
    pub fn from_sex_code(code: &str) -> Self {
        match code {
            "M" => Gender::M,
            "F" => Gender::F,
            _ => Gender::Unspecified,
        }
    }

    /// String form used in records: `"M"`, `"F"`, or empty.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
            Gender::Unspecified => "",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully normalized identity record extracted from one document image.
///
/// Built only after a successful decode plus normalization; immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRecord {
    /// Surname followed by given names, OCR-repaired and filler-free.
    pub full_name: String,
    /// Document number as decoded.
    pub passport_number: String,
    /// Birth date in canonical `dd/mm/yyyy` form.
    pub date_of_birth: String,
    /// Gender code.
    pub gender: Gender,
    /// Issuing country code.
    pub issuing_country: String,
    /// Nationality code.
    pub nationality: String,
    /// File name of the source image.
    pub source_image: String,
    /// Local time the record was produced.
    pub scanned_at: DateTime<Local>,
}

impl GuestRecord {
    /// Builds a record from raw decoder output, applying name, date, and
    /// gender normalization.
    pub fn from_raw(fields: &RawMrzFields, source_image: &Path) -> Self {
        let surname = clean_name(&fields.surname);
        let given_names = clean_name(&fields.given_names);
        let full_name = format!("{} {}", surname, given_names)
            .trim()
            .to_string();

        Self {
            full_name,
            passport_number: fields.number.clone(),
            date_of_birth: normalize_date(&fields.date_of_birth),
            gender: Gender::from_sex_code(&fields.sex),
            issuing_country: fields.country.clone(),
            nationality: fields.nationality.clone(),
            source_image: source_image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            scanned_at: Local::now(),
        }
    }
}

impl std::fmt::Display for GuestRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.full_name, self.passport_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_fields() -> RawMrzFields {
        RawMrzFields {
            surname: "5MITH".to_string(),
            given_names: "JOHN<<PAUL".to_string(),
            number: "AB1234567".to_string(),
            date_of_birth: "990101".to_string(),
            sex: "M".to_string(),
            country: "GBR".to_string(),
            nationality: "GBR".to_string(),
        }
    }

    #[test]
    fn test_gender_from_sex_code() {
        assert_eq!(Gender::from_sex_code("M"), Gender::M);
        assert_eq!(Gender::from_sex_code("F"), Gender::F);
        assert_eq!(Gender::from_sex_code("X"), Gender::Unspecified);
        assert_eq!(Gender::from_sex_code(""), Gender::Unspecified);
        assert_eq!(Gender::Unspecified.as_str(), "");
    }

    #[test]
    fn test_from_raw_normalizes_all_fields() {
        let record = GuestRecord::from_raw(&sample_fields(), &PathBuf::from("/inbox/scan1.jpg"));

        assert_eq!(record.full_name, "SMITH JOHN PAUL");
        assert_eq!(record.passport_number, "AB1234567");
        assert_eq!(record.date_of_birth, "01/01/1999");
        assert_eq!(record.gender, Gender::M);
        assert_eq!(record.issuing_country, "GBR");
        assert_eq!(record.nationality, "GBR");
        assert_eq!(record.source_image, "scan1.jpg");
    }

    #[test]
    fn test_from_raw_with_empty_names() {
        let fields = RawMrzFields {
            surname: String::new(),
            given_names: String::new(),
            ..sample_fields()
        };
        let record = GuestRecord::from_raw(&fields, &PathBuf::from("scan2.png"));
        assert_eq!(record.full_name, "");
    }

    #[test]
    fn test_record_display() {
        let record = GuestRecord::from_raw(&sample_fields(), &PathBuf::from("scan1.jpg"));
        assert_eq!(record.to_string(), "SMITH JOHN PAUL - AB1234567");
    }
}
