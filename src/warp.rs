//! The warp data model.
//!
//! A warp is a named point in a world. Names are unique per world; the
//! visibility flag controls whether the warp shows up in world-wide listings.

use serde::Serialize;

/// Stored flag value meaning "public".
pub const FLAG_PUBLIC: &str = "0";

/// Stored flag value meaning "hidden".
pub const FLAG_HIDDEN: &str = "1";

/// A named, world-scoped point with integer coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warp {
    /// Lookup key, unique within `world_id`.
    pub name: String,
    /// Identifier of the owning world.
    pub world_id: String,
    pub x: i32,
    pub y: i32,
    /// Hidden warps are excluded from public listings.
    pub hidden: bool,
}

impl Warp {
    /// Create a public warp at the given position.
    pub fn new(name: impl Into<String>, world_id: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            world_id: world_id.into(),
            x,
            y,
            hidden: false,
        }
    }

    /// The stored flag string for this warp's visibility.
    #[must_use]
    pub fn visibility_flag(&self) -> &'static str {
        if self.hidden {
            FLAG_HIDDEN
        } else {
            FLAG_PUBLIC
        }
    }
}

/// Decode a stored visibility flag.
///
/// A missing or malformed value reads as public; only an exact `"1"`
/// marks a warp hidden.
#[must_use]
pub fn hidden_from_flag(flag: Option<&str>) -> bool {
    matches!(flag, Some(FLAG_HIDDEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_flag_decoding() {
        assert!(!hidden_from_flag(Some("0")));
        assert!(hidden_from_flag(Some("1")));
        // Malformed or absent values default to public
        assert!(!hidden_from_flag(Some("yes")));
        assert!(!hidden_from_flag(Some("")));
        assert!(!hidden_from_flag(None));
    }

    #[test]
    fn test_visibility_flag_round_trip() {
        let mut warp = Warp::new("spawn", "world-1", 10, -4);
        assert_eq!(warp.visibility_flag(), FLAG_PUBLIC);

        warp.hidden = true;
        assert_eq!(warp.visibility_flag(), FLAG_HIDDEN);
        assert!(hidden_from_flag(Some(warp.visibility_flag())));
    }
}
