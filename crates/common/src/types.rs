use serde::{Deserialize, Serialize};

/// Orientation of a lattice element.
///
/// Bars run infinitely (as far as the viewer can tell) along one world axis.
/// Platforms are small slabs placed at every lattice node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    Platform,
}

impl Axis {
    /// The three bar orientations, in pool slot order.
    pub const BARS: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn is_bar(self) -> bool {
        !matches!(self, Axis::Platform)
    }

    /// Short tag used in log output.
    pub fn tag(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::Platform => "n",
        }
    }
}

/// Value of `k` carried by bar keys, which have no third index.
pub const BAR_K: i32 = -1;

/// Identifies exactly one slot of the lattice pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticeKey {
    pub i: i32,
    pub j: i32,
    pub axis: Axis,
    pub k: i32,
}

impl LatticeKey {
    pub fn new(i: i32, j: i32, axis: Axis, k: i32) -> Self {
        Self { i, j, axis, k }
    }

    /// Key of the bar along `axis` at lattice coordinates `(i, j)`.
    pub fn bar(i: i32, j: i32, axis: Axis) -> Self {
        debug_assert!(axis.is_bar(), "bar key built with {axis:?}");
        Self::new(i, j, axis, BAR_K)
    }

    /// Key of the platform at lattice node `(i, j, k)`.
    pub fn platform(i: i32, j: i32, k: i32) -> Self {
        Self::new(i, j, Axis::Platform, k)
    }
}

impl std::fmt::Display for LatticeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}_{}", self.i, self.j, self.k, self.axis.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_keys_default_k() {
        let key = LatticeKey::bar(2, -3, Axis::Y);
        assert_eq!(key.k, BAR_K);
        assert!(key.axis.is_bar());
    }

    #[test]
    fn platform_keys_keep_k() {
        let key = LatticeKey::platform(1, 2, 3);
        assert_eq!(key.k, 3);
        assert!(!key.axis.is_bar());
    }

    #[test]
    fn keys_are_distinct_across_axes() {
        let x = LatticeKey::bar(0, 0, Axis::X);
        let y = LatticeKey::bar(0, 0, Axis::Y);
        let p = LatticeKey::platform(0, 0, -1);
        assert_ne!(x, y);
        assert_ne!(x, p);
    }

    #[test]
    fn display_matches_log_format() {
        assert_eq!(LatticeKey::bar(1, -2, Axis::Z).to_string(), "1_-2_-1_z");
        assert_eq!(LatticeKey::platform(0, 4, 5).to_string(), "0_4_5_n");
    }
}
