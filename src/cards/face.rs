//! Card faces.
//!
//! A `FaceId` names one of the distinct pictures a deck is built from.
//! The engine never resolves a face to an image or a path; hosts keep
//! their own `FaceId -> asset` mapping.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a card face.
///
/// Two cards in every deck share each face. The engine only compares
/// faces for equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub u32);

impl FaceId {
    /// Create a new face ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Build `count` distinct faces, `FaceId(0)..FaceId(count)`.
    ///
    /// ```
    /// use memory_pairs::cards::FaceId;
    ///
    /// let faces = FaceId::range(3);
    /// assert_eq!(faces, vec![FaceId(0), FaceId(1), FaceId(2)]);
    /// ```
    #[must_use]
    pub fn range(count: u32) -> Vec<Self> {
        (0..count).map(Self).collect()
    }
}

impl std::fmt::Display for FaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Face({})", self.0)
    }
}
