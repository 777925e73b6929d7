use crate::types::Sha256Digest;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A library jar embedded in the application, identified by the name and
/// version parsed from its file name and fingerprinted by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JarDependency {
    pub name: String,
    pub version: String,
    pub sha256: Sha256Digest,
}

impl JarDependency {
    /// Order by name, then version, comparing bytes.
    ///
    /// Versions are compared as plain strings, so "10.0.0" sorts before
    /// "9.0.0".
    pub fn cmp_coordinates(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.version.cmp(&other.version))
    }
}

/// Sort dependencies into their canonical `(name, version)` order.
pub fn sort_dependencies(deps: &mut [JarDependency]) {
    deps.sort_by(JarDependency::cmp_coordinates);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(name: &str, version: &str) -> JarDependency {
        JarDependency {
            name: name.to_owned(),
            version: version.to_owned(),
            sha256: Sha256Digest::new("00"),
        }
    }

    #[test]
    fn sorts_by_name_then_version() {
        let mut deps = vec![dep("b", "1"), dep("a", "2"), dep("a", "1")];
        sort_dependencies(&mut deps);
        let coords: Vec<_> = deps
            .iter()
            .map(|d| (d.name.as_str(), d.version.as_str()))
            .collect();
        assert_eq!(coords, vec![("a", "1"), ("a", "2"), ("b", "1")]);
    }

    #[test]
    fn version_order_is_lexical_not_semantic() {
        let mut deps = vec![dep("lib", "9.0.0"), dep("lib", "10.0.0")];
        sort_dependencies(&mut deps);
        assert_eq!(deps[0].version, "10.0.0");
        assert_eq!(deps[1].version, "9.0.0");
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        let mut deps = vec![dep("alpha", "1"), dep("Zeta", "1")];
        sort_dependencies(&mut deps);
        assert_eq!(deps[0].name, "Zeta");
    }
}
