//! The external MRZ decode capability, seen from this crate as a trait.

use std::path::Path;

use crate::core::MrzResult;
use crate::domain::RawMrzFields;

/// An opaque capability that turns an image file into raw MRZ fields.
///
/// Implementations wrap whatever decoder the application ships (its
/// segmentation and checksum logic is not this crate's concern). The
/// contract distinguishes two failure shapes:
///
/// * `Ok(None)` - the decoder ran and found no readable zone. This is the
///   expected failure the two-pass strategy retries on.
/// * `Err(_)` - the decoder itself faulted. The orchestrator catches this
///   at the per-item boundary and treats the attempt as yielding no result.
pub trait MrzDecoder: Send + Sync {
    /// Attempts to decode the MRZ of the image at `image`.
    fn decode(&self, image: &Path) -> MrzResult<Option<RawMrzFields>>;
}

impl<D: MrzDecoder + ?Sized> MrzDecoder for std::sync::Arc<D> {
    fn decode(&self, image: &Path) -> MrzResult<Option<RawMrzFields>> {
        (**self).decode(image)
    }
}
