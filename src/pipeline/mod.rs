//! Decode orchestration: the two-attempt strategy, the external decoder
//! seam, and derived-artifact lifecycle.

pub mod artifacts;
pub mod decoder;
pub mod orchestrator;

pub use artifacts::{
    ENHANCED_SUFFIX, IMAGE_EXTENSIONS, ImageArtifact, ROTATED_SUFFIX, TempArtifact, derived_path,
    has_image_extension, is_derived_artifact,
};
pub use decoder::MrzDecoder;
pub use orchestrator::{DecodeOrchestrator, ScanOutcome};
