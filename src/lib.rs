//! # mrz-scan
//!
//! Decode-support pipeline for reading the machine-readable zone (MRZ) of
//! photographed travel documents: orientation correction, MRZ-band image
//! enhancement, a two-attempt decode orchestration strategy, deterministic
//! OCR-noise repair for names, date canonicalization, and a deduplicating
//! folder-watch dispatcher.
//!
//! The MRZ decoder itself is external: this crate hands it an image path
//! through the [`pipeline::MrzDecoder`] trait and turns whatever comes back
//! into a clean [`domain::GuestRecord`].
//!
//! ## Components
//!
//! - **Orientation Normalizer**: rotates portrait photos to landscape.
//! - **MRZ Region Enhancer**: crops the MRZ band and sharpens it into
//!   two-level strokes (upscale, denoise, CLAHE, Otsu, closing).
//! - **Decode Orchestrator**: raw-image-then-enhanced-image retry with
//!   scoped cleanup of every derived artifact.
//! - **Text/Date Normalizers**: MRZ filler handling, pattern-based
//!   digit-to-letter repair, and date canonicalization.
//! - **Folder Watch Dispatcher**: deduplicated file-creation events fed to
//!   a bounded decode worker pool.
//!
//! ## Modules
//!
//! * [`core`] - error and configuration types
//! * [`domain`] - raw decoder fields and the final guest record
//! * [`processors`] - pixel-level orientation and enhancement work
//! * [`normalize`] - name and date text repair
//! * [`pipeline`] - decode orchestration and artifact lifecycle
//! * [`watcher`] - folder watching and dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::mpsc;
//! use mrz_scan::prelude::*;
//!
//! # struct MyDecoder;
//! # impl MrzDecoder for MyDecoder {
//! #     fn decode(&self, _: &Path) -> MrzResult<Option<RawMrzFields>> { Ok(None) }
//! # }
//! # fn main() -> MrzResult<()> {
//! let orchestrator = DecodeOrchestrator::new(MyDecoder);
//!
//! // One-off scan of a dropped file:
//! match orchestrator.scan_image(Path::new("passport1.jpg")) {
//!     ScanOutcome::Decoded(record) => println!("{}", record),
//!     ScanOutcome::NotDecodable { source_image } => eprintln!("skipped {source_image}"),
//! }
//!
//! // Or watch a folder and stream records out of a channel:
//! let (tx, rx) = mpsc::channel();
//! let mut dispatcher =
//!     FolderWatchDispatcher::new(DecodeOrchestrator::new(MyDecoder), WatcherConfig::default(), tx)?;
//! dispatcher.start(Path::new("/inbox"))?;
//! for record in rx {
//!     println!("{}", record);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod normalize;
pub mod pipeline;
pub mod processors;
pub mod watcher;

/// Prelude module for convenient imports.
///
/// Brings the essentials into scope with a single use statement:
///
/// ```rust
/// use mrz_scan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        ConfigValidator, EnhanceConfig, MrzError, MrzResult, PipelineConfig, WatcherConfig,
    };
    pub use crate::domain::{Gender, GuestRecord, RawMrzFields};
    pub use crate::normalize::{clean_name, normalize_date, repair_token};
    pub use crate::pipeline::{DecodeOrchestrator, MrzDecoder, ScanOutcome};
    pub use crate::processors::{enhance_mrz_band, normalize_orientation};
    pub use crate::watcher::{FolderWatchDispatcher, WatchedFileRegistry};
}
