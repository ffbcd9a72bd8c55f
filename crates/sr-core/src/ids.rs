//! Typed identifiers into the road graph.
//!
//! Ids are dense indices assigned by the graph builder, so they double as
//! positions in the graph's per-vertex and per-edge arrays.  Use `.index()`
//! rather than reaching for the inner integer.

use std::fmt;

/// Generate a `u32`-backed id newtype.
macro_rules! graph_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "not assigned" (`u32::MAX`).
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

graph_id! {
    /// A road-graph vertex (intersection or way end point).
    pub struct NodeId;
}

graph_id! {
    /// A road-graph edge: one physical road segment, traversable in up to
    /// two directions.
    pub struct EdgeId;
}
