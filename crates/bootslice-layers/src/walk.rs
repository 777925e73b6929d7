use crate::SliceError;
use std::path::Path;
use walkdir::WalkDir;

/// Visit every non-directory entry under `root` in lexical walk order,
/// passing its root-relative, `/`-separated path.
///
/// The first walk error aborts the traversal.
pub(crate) fn for_each_relative_file(
    root: &Path,
    mut visit: impl FnMut(String),
) -> Result<(), SliceError> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(Path::to_str)
            .ok_or_else(|| SliceError::InvalidPath(entry.path().display().to_string()))?;
        visit(rel.to_owned());
    }
    Ok(())
}
