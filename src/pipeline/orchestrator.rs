//! Two-pass decode orchestration.
//!
//! The first attempt always runs on the unmodified (orientation-normalized)
//! image: some decoders rely on the subtle glyph anti-aliasing that
//! enhancement destroys. Enhancement is a deliberately lossy fallback for
//! poor lighting or print quality, used only when the first attempt comes
//! back empty.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info, warn};

use super::artifacts::{
    ENHANCED_SUFFIX, ImageArtifact, ROTATED_SUFFIX, TempArtifact, derived_path,
};
use super::decoder::MrzDecoder;
use crate::core::EnhanceConfig;
use crate::domain::{GuestRecord, RawMrzFields};
use crate::processors::{enhance_mrz_band, normalize_orientation};

/// The definitive result of scanning one image.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// Both normalization and decoding succeeded.
    Decoded(GuestRecord),
    /// Neither decode attempt produced a result. Non-fatal; the caller
    /// records it and moves on.
    NotDecodable {
        /// File name of the image that could not be decoded.
        source_image: String,
    },
}

impl ScanOutcome {
    /// The record, if this outcome carries one.
    pub fn record(&self) -> Option<&GuestRecord> {
        match self {
            ScanOutcome::Decoded(record) => Some(record),
            ScanOutcome::NotDecodable { .. } => None,
        }
    }
}

/// Runs the two-attempt decode strategy against an external decoder,
/// managing the lifecycle of every derived artifact it creates.
#[derive(Debug)]
pub struct DecodeOrchestrator<D> {
    decoder: D,
    enhance_config: EnhanceConfig,
}

impl<D: MrzDecoder> DecodeOrchestrator<D> {
    /// Creates an orchestrator with default enhancement parameters.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            enhance_config: EnhanceConfig::default(),
        }
    }

    /// Overrides the enhancement parameters.
    pub fn with_enhance_config(mut self, config: EnhanceConfig) -> Self {
        self.enhance_config = config;
        self
    }

    /// Scans one image to a definitive outcome.
    ///
    /// Every derived artifact (rotated, enhanced) is owned by this call and
    /// deleted before it returns, on every path. Expected decode failures
    /// and decoder faults both collapse to [`ScanOutcome::NotDecodable`];
    /// this method never propagates them.
    pub fn scan_image(&self, image: &Path) -> ScanOutcome {
        let normalized = self.normalize_artifact(image);

        debug!(path = %normalized.path().display(), "decode attempt on unmodified image");
        let mut fields = self.attempt_decode(normalized.path());

        if fields.is_none() {
            let enhanced = self.enhance_artifact(normalized.path());
            let second_input = enhanced
                .as_ref()
                .map(|a| a.path())
                .unwrap_or_else(|| normalized.path());

            debug!(path = %second_input.display(), "decode attempt on enhanced image");
            fields = self.attempt_decode(second_input);
        }

        match fields {
            Some(fields) => {
                let record = GuestRecord::from_raw(&fields, image);
                info!(source = %record.source_image, name = %record.full_name, "decoded MRZ");
                ScanOutcome::Decoded(record)
            }
            None => {
                info!(path = %image.display(), "MRZ not decodable after both attempts");
                ScanOutcome::NotDecodable {
                    source_image: image
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                }
            }
        }
        // Derived artifacts drop here, deleting their files.
    }

    /// Scans a batch of images sequentially. Items are isolated: one
    /// failure never affects another.
    pub fn scan_batch(&self, images: &[PathBuf]) -> Vec<ScanOutcome> {
        images.iter().map(|path| self.scan_image(path)).collect()
    }

    /// One decoder invocation with the per-item fault boundary: a decoder
    /// fault is logged and treated as "no result".
    fn attempt_decode(&self, image: &Path) -> Option<RawMrzFields> {
        match self.decoder.decode(image) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(path = %image.display(), error = %e, "decoder fault, treating as no result");
                None
            }
        }
    }

    /// Orientation normalization at the file level. Unreadable images and
    /// artifact write failures degrade to the original path; this never
    /// fails.
    fn normalize_artifact<'a>(&self, image: &'a Path) -> ImageArtifact<'a> {
        let rgb = match self.load_rgb(image) {
            Some(rgb) => rgb,
            None => return ImageArtifact::Original(image),
        };

        let Some(rotated) = normalize_orientation(&rgb) else {
            return ImageArtifact::Original(image);
        };

        let path = derived_path(image, ROTATED_SUFFIX);
        match rotated.save(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "wrote rotated artifact");
                ImageArtifact::Derived(TempArtifact::new(path))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to write rotated artifact");
                ImageArtifact::Original(image)
            }
        }
    }

    /// Band enhancement at the file level. Any fault degrades to `None`,
    /// in which case the second attempt reuses the unenhanced image.
    fn enhance_artifact(&self, image: &Path) -> Option<TempArtifact> {
        let rgb = self.load_rgb(image)?;

        let enhanced = match enhance_mrz_band(&rgb, &self.enhance_config) {
            Ok(enhanced) => enhanced,
            Err(e) => {
                warn!(path = %image.display(), error = %e, "enhancement failed, using unenhanced image");
                return None;
            }
        };

        let path = derived_path(image, ENHANCED_SUFFIX);
        match enhanced.save(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "wrote enhanced artifact");
                Some(TempArtifact::new(path))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to write enhanced artifact");
                None
            }
        }
    }

    fn load_rgb(&self, image: &Path) -> Option<RgbImage> {
        match image::open(image) {
            Ok(img) => Some(img.to_rgb8()),
            Err(e) => {
                warn!(path = %image.display(), error = %e, "unreadable image, passing through");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MrzError, MrzResult};
    use std::sync::{Arc, Mutex};

    /// Decoder stub that records every path it is handed.
    struct StubDecoder {
        fields: Option<RawMrzFields>,
        fault: bool,
        seen: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl StubDecoder {
        fn returning(fields: Option<RawMrzFields>) -> (Self, Arc<Mutex<Vec<PathBuf>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    fields,
                    fault: false,
                    seen: Arc::clone(&seen),
                },
                seen,
            )
        }

        fn faulting() -> Self {
            Self {
                fields: None,
                fault: true,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl MrzDecoder for StubDecoder {
        fn decode(&self, image: &Path) -> MrzResult<Option<RawMrzFields>> {
            self.seen.lock().unwrap().push(image.to_path_buf());
            if self.fault {
                return Err(MrzError::decode_error(std::io::Error::other(
                    "decoder crashed",
                )));
            }
            Ok(self.fields.clone())
        }
    }

    fn sample_fields() -> RawMrzFields {
        RawMrzFields {
            surname: "SMITH".to_string(),
            given_names: "JOHN<PAUL".to_string(),
            number: "X123".to_string(),
            date_of_birth: "990101".to_string(),
            sex: "F".to_string(),
            country: "USA".to_string(),
            nationality: "USA".to_string(),
        }
    }

    /// Writes a small portrait photo (forces the rotation path) with a
    /// plausible dark band for the enhancer.
    fn write_portrait_image(dir: &Path) -> PathBuf {
        let img = RgbImage::from_fn(16, 40, |x, y| {
            if x < 4 && (y / 4) % 2 == 0 {
                image::Rgb([30, 30, 30])
            } else {
                image::Rgb([210, 210, 210])
            }
        });
        let path = dir.join("passport1.png");
        img.save(&path).expect("save test image");
        path
    }

    fn derived_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| super::super::artifacts::is_derived_artifact(p))
            .collect()
    }

    #[test]
    fn test_first_attempt_success_skips_enhancement() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = write_portrait_image(dir.path());

        let (decoder, seen) = StubDecoder::returning(Some(sample_fields()));
        let orchestrator = DecodeOrchestrator::new(decoder);

        let outcome = orchestrator.scan_image(&image);
        let record = outcome.record().expect("should decode");
        assert_eq!(record.full_name, "SMITH JOHN PAUL");
        assert_eq!(record.date_of_birth, "01/01/1999");
        assert_eq!(record.source_image, "passport1.png");

        // Exactly one attempt, on the rotated artifact.
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].to_string_lossy().contains(ROTATED_SUFFIX));
    }

    #[test]
    fn test_both_attempts_fail_cleans_up_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = write_portrait_image(dir.path());

        let (decoder, seen) = StubDecoder::returning(None);
        let orchestrator = DecodeOrchestrator::new(decoder);

        let outcome = orchestrator.scan_image(&image);
        assert!(matches!(
            outcome,
            ScanOutcome::NotDecodable { ref source_image } if source_image == "passport1.png"
        ));

        // Two attempts: rotated first, enhanced second.
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].to_string_lossy().contains(ROTATED_SUFFIX));
        assert!(seen[1].to_string_lossy().contains(ENHANCED_SUFFIX));

        // No derived artifacts remain, only the original.
        assert!(derived_files(dir.path()).is_empty());
        assert!(image.exists());
    }

    #[test]
    fn test_decoder_fault_becomes_not_decodable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = write_portrait_image(dir.path());

        let orchestrator = DecodeOrchestrator::new(StubDecoder::faulting());
        let outcome = orchestrator.scan_image(&image);

        assert!(outcome.record().is_none());
        assert!(derived_files(dir.path()).is_empty());
    }

    #[test]
    fn test_unreadable_image_passes_through_to_decoder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bogus = dir.path().join("not_an_image.jpg");
        std::fs::write(&bogus, b"garbage").expect("write");

        let (decoder, seen) = StubDecoder::returning(None);
        let orchestrator = DecodeOrchestrator::new(decoder);

        let outcome = orchestrator.scan_image(&bogus);
        assert!(outcome.record().is_none());

        // Both attempts ran against the original path; no artifacts were
        // created for an unreadable input.
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], bogus);
        assert_eq!(seen[1], bogus);
        assert!(derived_files(dir.path()).is_empty());
    }

    #[test]
    fn test_scan_batch_isolates_items() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = write_portrait_image(dir.path());
        let missing = dir.path().join("missing.jpg");

        let (decoder, _) = StubDecoder::returning(Some(sample_fields()));
        let orchestrator = DecodeOrchestrator::new(decoder);

        let outcomes = orchestrator.scan_batch(&[missing, good]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].record().is_some());
        assert!(outcomes[1].record().is_some());
    }
}
