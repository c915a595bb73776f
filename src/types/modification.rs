//! Modification flags carried by document nodes.
//!
//! The flags are owned by the documents. The matching core only reads them
//! so consumers can tell modified pairs from unmodified ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask of independent modification flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modification(u8);

impl Modification {
    /// The node is unchanged.
    pub const UNMODIFIED: Self = Self(0b0000_0001);
    /// The node itself changed.
    pub const MODIFIED: Self = Self(0b0000_0010);
    /// Something below the node changed.
    pub const SUB_MODIFIED: Self = Self(0b0000_0100);
    /// The node only exists in the newer document.
    pub const INSERT: Self = Self(0b0000_1000);
    /// The node only exists in the older document.
    pub const DELETE: Self = Self(0b0001_0000);
    /// The node was moved to a different parent.
    pub const MOVED: Self = Self(0b0010_0000);
    /// The node was copied.
    pub const COPIED: Self = Self(0b0100_0000);
    /// The node was glued to a partner in a later pass.
    pub const GLUED: Self = Self(0b1000_0000);

    /// Empty mask.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a mask from raw bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set.
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// True if the node or something below it changed.
    pub const fn is_changed(&self) -> bool {
        self.intersects(Self(Self::MODIFIED.0 | Self::SUB_MODIFIED.0))
    }
}

impl BitOr for Modification {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modification {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Modification, &str); 8] = [
            (Modification::UNMODIFIED, "unmodified"),
            (Modification::MODIFIED, "modified"),
            (Modification::SUB_MODIFIED, "sub_modified"),
            (Modification::INSERT, "insert"),
            (Modification::DELETE, "delete"),
            (Modification::MOVED, "moved"),
            (Modification::COPIED, "copied"),
            (Modification::GLUED, "glued"),
        ];

        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();

        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}
