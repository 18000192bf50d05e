//! Image processors: orientation normalization and MRZ band enhancement.

pub mod clahe;
pub mod denoise;
pub mod enhance;
pub mod orientation;

pub use clahe::clahe;
pub use denoise::nl_means_denoise;
pub use enhance::enhance_mrz_band;
pub use orientation::normalize_orientation;
