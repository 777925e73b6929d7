use crate::slicer::{Slice, Slicer, Slices};
use crate::walk::for_each_relative_file;
use crate::SliceError;
use bootslice_schema::Metadata;
use std::path::{Path, PathBuf};

const META_INF_PREFIX: &str = "META-INF/";
const SNAPSHOT_MARKER: &str = "SNAPSHOT";

/// The five fixed buckets of the default slicer, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultBucket {
    Launch,
    Dependency,
    SnapshotDependency,
    Application,
    Remainder,
}

impl DefaultBucket {
    pub const ORDER: [Self; 5] = [
        Self::Launch,
        Self::Dependency,
        Self::SnapshotDependency,
        Self::Application,
        Self::Remainder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Dependency => "dependency",
            Self::SnapshotDependency => "snapshot-dependency",
            Self::Application => "application",
            Self::Remainder => "remainder",
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Launch => 0,
            Self::Dependency => 1,
            Self::SnapshotDependency => 2,
            Self::Application => 3,
            Self::Remainder => 4,
        }
    }
}

/// Classifies every file of the application into one of five fixed buckets
/// using the classes and lib directories from the manifest.
#[derive(Debug, Clone)]
pub struct DefaultSlicer {
    application_root: PathBuf,
    metadata: Metadata,
}

impl DefaultSlicer {
    pub fn new(application_root: impl Into<PathBuf>, metadata: Metadata) -> Self {
        Self {
            application_root: application_root.into(),
            metadata,
        }
    }

    pub fn application_root(&self) -> &Path {
        &self.application_root
    }

    /// Bucket for a root-relative path. Predicates are tried in a fixed
    /// priority order and the first match wins; this order differs from the
    /// output order.
    pub fn classify(&self, path: &str) -> DefaultBucket {
        if self.is_application(path) {
            DefaultBucket::Application
        } else if self.is_dependency(path) {
            DefaultBucket::Dependency
        } else if self.is_launch(path) {
            DefaultBucket::Launch
        } else if self.is_snapshot_dependency(path) {
            DefaultBucket::SnapshotDependency
        } else {
            DefaultBucket::Remainder
        }
    }

    fn is_application(&self, path: &str) -> bool {
        path.starts_with(&self.metadata.classes)
    }

    fn is_dependency(&self, path: &str) -> bool {
        self.is_lib_jar(path) && !path.contains(SNAPSHOT_MARKER)
    }

    fn is_launch(&self, path: &str) -> bool {
        !path.starts_with(&self.metadata.classes)
            && !path.starts_with(&self.metadata.lib)
            && !path.starts_with(META_INF_PREFIX)
    }

    fn is_snapshot_dependency(&self, path: &str) -> bool {
        self.is_lib_jar(path) && path.contains(SNAPSHOT_MARKER)
    }

    fn is_lib_jar(&self, path: &str) -> bool {
        path.starts_with(&self.metadata.lib) && has_jar_extension(path)
    }
}

/// Extension is the text after the last `.` of the final component, so a
/// bare `.jar` file name counts as a jar.
fn has_jar_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| ext == "jar")
}

impl Slicer for DefaultSlicer {
    fn slice(&self) -> Result<Slices, SliceError> {
        let mut slices: Slices = DefaultBucket::ORDER
            .iter()
            .map(|bucket| Slice::new(bucket.name()))
            .collect();

        for_each_relative_file(&self.application_root, |rel| {
            let bucket = self.classify(&rel);
            slices[bucket.position()].paths.push(rel);
        })?;

        Ok(slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn metadata(root: &Path) -> Metadata {
        Metadata {
            classes: "test-classes".to_owned(),
            class_path: vec![root.join("test-classes")],
            lib: "test-lib".to_owned(),
            start_class: "test-start-class".to_owned(),
            version: "test-version".to_owned(),
            layers_index: None,
        }
    }

    fn fixture() -> (tempfile::TempDir, DefaultSlicer) {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "META-INF/MANIFEST.MF");
        let slicer = DefaultSlicer::new(dir.path(), metadata(dir.path()));
        (dir, slicer)
    }

    fn expected(buckets: [&[&str]; 5]) -> Slices {
        DefaultBucket::ORDER
            .iter()
            .zip(buckets)
            .map(|(b, paths)| Slice::with_paths(b.name(), paths.iter().copied()))
            .collect()
    }

    #[test]
    fn adds_application_files_to_slice() {
        let (dir, slicer) = fixture();
        touch(dir.path(), "test-classes/org/cloudfoundry/Test.class");
        assert_eq!(
            slicer.slice().unwrap(),
            expected([
                &[],
                &[],
                &[],
                &["test-classes/org/cloudfoundry/Test.class"],
                &["META-INF/MANIFEST.MF"],
            ])
        );
    }

    #[test]
    fn adds_dependency_files_to_slice() {
        let (dir, slicer) = fixture();
        touch(dir.path(), "test-lib/test-1.2.3.jar");
        assert_eq!(
            slicer.slice().unwrap(),
            expected([
                &[],
                &["test-lib/test-1.2.3.jar"],
                &[],
                &[],
                &["META-INF/MANIFEST.MF"],
            ])
        );
    }

    #[test]
    fn adds_launch_files_to_slice() {
        let (dir, slicer) = fixture();
        touch(dir.path(), "org/cloudfoundry/Test.class");
        assert_eq!(
            slicer.slice().unwrap(),
            expected([
                &["org/cloudfoundry/Test.class"],
                &[],
                &[],
                &[],
                &["META-INF/MANIFEST.MF"],
            ])
        );
    }

    #[test]
    fn adds_snapshot_files_to_slice() {
        let (dir, slicer) = fixture();
        touch(dir.path(), "test-lib/test-1.2.3-SNAPSHOT.jar");
        assert_eq!(
            slicer.slice().unwrap(),
            expected([
                &[],
                &[],
                &["test-lib/test-1.2.3-SNAPSHOT.jar"],
                &[],
                &["META-INF/MANIFEST.MF"],
            ])
        );
    }

    #[test]
    fn adds_remainder_files_to_slice() {
        let (dir, slicer) = fixture();
        touch(dir.path(), "META-INF/test-file");
        assert_eq!(
            slicer.slice().unwrap(),
            expected([
                &[],
                &[],
                &[],
                &[],
                &["META-INF/MANIFEST.MF", "META-INF/test-file"],
            ])
        );
    }

    #[test]
    fn non_jar_under_lib_is_remainder() {
        let (_dir, slicer) = fixture();
        assert_eq!(slicer.classify("test-lib/notes.txt"), DefaultBucket::Remainder);
        assert_eq!(slicer.classify("test-lib/x-SNAPSHOT.zip"), DefaultBucket::Remainder);
    }

    #[test]
    fn dot_jar_file_name_is_a_dependency() {
        let (dir, slicer) = fixture();
        assert_eq!(slicer.classify("test-lib/.jar"), DefaultBucket::Dependency);
        assert_eq!(
            slicer.classify("test-lib/-SNAPSHOT.jar"),
            DefaultBucket::SnapshotDependency
        );
        assert_eq!(slicer.classify("test-lib/jar"), DefaultBucket::Remainder);

        touch(dir.path(), "test-lib/.jar");
        assert_eq!(
            slicer.slice().unwrap(),
            expected([&[], &["test-lib/.jar"], &[], &[], &["META-INF/MANIFEST.MF"]])
        );
    }

    #[test]
    fn application_wins_over_every_other_predicate() {
        let (_dir, slicer) = fixture();
        assert_eq!(
            slicer.classify("test-classes/lib/x-1.0-SNAPSHOT.jar"),
            DefaultBucket::Application
        );
    }

    #[test]
    fn output_names_follow_fixed_order() {
        let (_dir, slicer) = fixture();
        let names: Vec<_> = slicer
            .slice()
            .unwrap()
            .into_iter()
            .map(|s| s.name.into_inner())
            .collect();
        assert_eq!(
            names,
            vec![
                "launch",
                "dependency",
                "snapshot-dependency",
                "application",
                "remainder"
            ]
        );
    }

    #[test]
    fn missing_root_fails_without_partial_result() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("absent");
        let slicer = DefaultSlicer::new(&root, metadata(&root));
        assert!(matches!(slicer.slice(), Err(SliceError::Walk(_))));
    }

    fn rel_path() -> impl Strategy<Value = String> {
        let head = prop_oneof![
            Just("test-classes".to_owned()),
            Just("test-lib".to_owned()),
            Just("META-INF".to_owned()),
            Just("org".to_owned()),
        ];
        let tail = prop_oneof![
            Just("a-1.0.jar".to_owned()),
            Just("b-2.0-SNAPSHOT.jar".to_owned()),
            Just("C.class".to_owned()),
            Just("readme.txt".to_owned()),
        ];
        (head, "[a-z]{1,4}", tail).prop_map(|(h, mid, t)| format!("{h}/{mid}/{t}"))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn buckets_partition_the_tree(paths in prop::collection::btree_set(rel_path(), 0..12)) {
            let (dir, slicer) = fixture();
            for p in &paths {
                touch(dir.path(), p);
            }

            let slices = slicer.slice().unwrap();
            let mut seen = BTreeSet::new();
            let mut total = 0;
            for s in &slices {
                for p in &s.paths {
                    total += 1;
                    prop_assert!(seen.insert(p.clone()), "duplicate path {}", p);
                }
            }

            let mut all = paths.clone();
            all.insert("META-INF/MANIFEST.MF".to_owned());
            prop_assert_eq!(total, all.len());
            prop_assert_eq!(seen, all);
        }
    }
}
