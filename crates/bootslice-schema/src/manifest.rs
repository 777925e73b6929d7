use crate::ManifestError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Key/value attributes read from a JAR `META-INF/MANIFEST.MF`.
///
/// Only the attribute lines are interpreted. Section boundaries are not
/// tracked, so a key repeated in a later section overrides the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), but treats a blank value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn parse_manifest_str(input: &str) -> Manifest {
    let mut entries: BTreeMap<String, String> = BTreeMap::new();
    let mut last_key: Option<String> = None;

    for raw in input.lines() {
        let line = raw.trim_end_matches('\r');

        // Continuation lines start with exactly one space.
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some(value) = last_key.as_ref().and_then(|k| entries.get_mut(k)) {
                value.push_str(rest);
            }
            continue;
        }

        if line.trim().is_empty() {
            last_key = None;
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            last_key = None;
            continue;
        };
        // Only the single separator space is dropped; a trailing space may be
        // part of a value wrapped onto the next line.
        let value = value.strip_prefix(' ').unwrap_or(value);
        let key = key.trim().to_owned();
        entries.insert(key.clone(), value.to_owned());
        last_key = Some(key);
    }

    Manifest { entries }
}

/// Read and parse a manifest file. A missing file is an empty manifest.
pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Manifest::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_manifest_str(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spring_boot_manifest() {
        let input = "
Spring-Boot-Classes: test-classes
Spring-Boot-Lib: test-lib
Start-Class: test-start-class
Spring-Boot-Version: test-version";
        let manifest = parse_manifest_str(input);
        assert_eq!(manifest.len(), 4);
        assert_eq!(manifest.get("Spring-Boot-Classes"), Some("test-classes"));
        assert_eq!(manifest.get("Spring-Boot-Lib"), Some("test-lib"));
        assert_eq!(manifest.get("Start-Class"), Some("test-start-class"));
        assert_eq!(manifest.get("Spring-Boot-Version"), Some("test-version"));
    }

    #[test]
    fn joins_continuation_lines() {
        let input = "Manifest-Version: 1.0\r\nStart-Class: org.example.very.long.pac\r\n kage.Application\r\n";
        let manifest = parse_manifest_str(input);
        assert_eq!(
            manifest.get("Start-Class"),
            Some("org.example.very.long.package.Application")
        );
    }

    #[test]
    fn continuation_keeps_space_before_wrap() {
        let input = "Class-Path: lib/a.jar \r\n lib/b.jar\r\nImplementation-Title: My \n App\n";
        let manifest = parse_manifest_str(input);
        assert_eq!(manifest.get("Class-Path"), Some("lib/a.jar lib/b.jar"));
        assert_eq!(manifest.get("Implementation-Title"), Some("My App"));
    }

    #[test]
    fn separator_space_is_not_part_of_value() {
        let manifest = parse_manifest_str("Start-Class: org.example.App\nMain-Class:a.B\n");
        assert_eq!(manifest.get("Start-Class"), Some("org.example.App"));
        assert_eq!(manifest.get("Main-Class"), Some("a.B"));
    }

    #[test]
    fn ignores_lines_without_separator() {
        let manifest = parse_manifest_str("garbage\nKey: value\n");
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.get("Key"), Some("value"));
    }

    #[test]
    fn later_keys_override() {
        let manifest = parse_manifest_str("Key: one\n\nName: entry\nKey: two\n");
        assert_eq!(manifest.get("Key"), Some("two"));
    }

    #[test]
    fn value_may_contain_colons() {
        let manifest = parse_manifest_str("Implementation-URL: https://example.com:8443/x\n");
        assert_eq!(
            manifest.get("Implementation-URL"),
            Some("https://example.com:8443/x")
        );
    }

    #[test]
    fn blank_value_is_absent_for_get_non_empty() {
        let manifest = parse_manifest_str("Spring-Boot-Layers-Index:   \n");
        assert_eq!(manifest.get("Spring-Boot-Layers-Index"), Some("  "));
        assert_eq!(manifest.get_non_empty("Spring-Boot-Layers-Index"), None);
    }

    #[test]
    fn missing_file_is_empty_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = parse_manifest_file(dir.path().join("MANIFEST.MF")).unwrap();
        assert!(manifest.is_empty());
    }
}
