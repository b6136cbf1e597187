//! An opaque version string plus a precedence check against a fixed
//! registry of released versions.
//!
//! `version_le` deliberately does not parse semver: the original
//! implementation compares opaque build identifiers by table lookup rather
//! than by numeric rule, so two versions are only ever ordered if both
//! appear in the registry below.

/// Released versions, oldest first. `version()` always returns the last
/// entry.
const REGISTRY: &[&str] = &["0.1.0"];

/// The running crate's version string.
#[must_use]
pub fn version() -> &'static str {
    REGISTRY.last().copied().unwrap_or("unknown")
}

/// Is `v1` no later than `v2`, according to release order in the registry?
///
/// Equal strings are always ordered, even when `v1`/`v2` name a version not
/// present in the registry. Otherwise returns `false` for any version not
/// present in the registry — an unknown version has no defined position to
/// compare from.
#[must_use]
pub fn version_le(v1: &str, v2: &str) -> bool {
    if v1 == v2 {
        return true;
    }
    let Some(i1) = REGISTRY.iter().position(|&v| v == v1) else {
        return false;
    };
    let Some(i2) = REGISTRY.iter().position(|&v| v == v2) else {
        return false;
    };
    i1 <= i2
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn version_is_reflexively_ordered() {
        assert!(version_le(version(), version()));
    }

    #[test]
    fn unknown_versions_compare_false() {
        assert!(!version_le("nonexistent", version()));
        assert!(!version_le(version(), "nonexistent"));
    }

    #[test]
    fn unregistered_version_is_reflexively_ordered_against_itself() {
        assert!(version_le("nonexistent", "nonexistent"));
    }

    #[test]
    fn antisymmetry_holds_for_registered_versions() {
        let v = version();
        assert_eq!(version_le(v, v) && version_le(v, v), true);
    }
}
