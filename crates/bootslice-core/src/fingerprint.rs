use crate::CoreError;
use bootslice_schema::{sort_dependencies, JarDependency, Sha256Digest};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info};
use walkdir::WalkDir;

/// File names of versioned library jars: `<name>-<digit...>.jar`.
pub const JAR_FILE_PATTERN: &str = r"^.*/([^/]*)-(\d[^/]*)\.jar$";

/// Identifies and fingerprints the library jars under a directory.
///
/// Each candidate file is hashed on its own thread; results are fanned back
/// in over a channel and sorted by `(name, version)` before returning, so the
/// output never depends on completion order.
#[derive(Debug, Clone)]
pub struct FingerprintEngine {
    pattern: Regex,
}

impl FingerprintEngine {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            pattern: Regex::new(JAR_FILE_PATTERN)?,
        })
    }

    /// Fingerprint every versioned jar under `lib_root`.
    ///
    /// A missing `lib_root` yields an empty list. The first walk or hash error,
    /// or a thread the OS refuses to start, is returned and every collected
    /// result is discarded. Threads already started still run to completion
    /// before this returns.
    pub fn dependencies(&self, lib_root: &Path) -> Result<Vec<JarDependency>, CoreError> {
        if !lib_root.exists() {
            debug!("lib directory {} absent, no dependencies", lib_root.display());
            return Ok(Vec::new());
        }

        let mut dependencies = thread::scope(|scope| -> Result<Vec<JarDependency>, CoreError> {
            let (tx, rx) = mpsc::channel();

            for entry in WalkDir::new(lib_root).sort_by_file_name() {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let tx = tx.clone();
                let path = entry.into_path();
                let worker_path = path.clone();
                // Workers already running are joined when the scope ends.
                thread::Builder::new()
                    .name("bootslice-hash".to_owned())
                    .spawn_scoped(scope, move || {
                        // A closed receiver means an error was already taken.
                        let _ = tx.send(self.fingerprint(&worker_path));
                    })
                    .map_err(|source| CoreError::Spawn { path, source })?;
            }

            // The channel closes once every worker has dropped its sender.
            drop(tx);
            collect_results(rx)
        })?;

        sort_dependencies(&mut dependencies);
        info!(
            "fingerprinted {} dependencies under {}",
            dependencies.len(),
            lib_root.display()
        );
        Ok(dependencies)
    }

    /// Parse the jar coordinates from `path` and hash its content. Paths that
    /// do not look like a versioned jar are skipped with `Ok(None)`.
    pub fn fingerprint(&self, path: &Path) -> Result<Option<JarDependency>, CoreError> {
        let Some(caps) = path.to_str().and_then(|p| self.pattern.captures(p)) else {
            debug!("skipping {}", path.display());
            return Ok(None);
        };

        let file = File::open(path).map_err(|source| CoreError::Hash {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(JarDependency {
            name: caps[1].to_owned(),
            version: caps[2].to_owned(),
            sha256: hash_content(path, file)?,
        }))
    }
}

/// Stream `reader` through SHA-256. Read failures are reported against `path`.
fn hash_content(path: &Path, mut reader: impl Read) -> Result<Sha256Digest, CoreError> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).map_err(|source| CoreError::Hash {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Sha256Digest::new(hex::encode(hasher.finalize())))
}

/// Gather worker results. The first error is returned and every dependency
/// collected before it is dropped.
fn collect_results(
    results: impl IntoIterator<Item = Result<Option<JarDependency>, CoreError>>,
) -> Result<Vec<JarDependency>, CoreError> {
    results.into_iter().filter_map(Result::transpose).collect()
}
