//! Text normalization for decoded MRZ fields.
//!
//! Three layers, each best-effort and total (never failing):
//!
//! * [`ocr_repair`] - token-level digit-to-letter repair of common optical
//!   confusions (`0`/`O`, `1`/`I`, `5`/`S`, `3`/`E`, `8`/`B`).
//! * [`name`] - MRZ filler handling and name assembly, built on the repair
//!   rules.
//! * [`date`] - canonicalization of the date encodings decoders emit into
//!   `dd/mm/yyyy`.

pub mod date;
pub mod name;
pub mod ocr_repair;

pub use date::normalize_date;
pub use name::clean_name;
pub use ocr_repair::{repair_text, repair_token};
