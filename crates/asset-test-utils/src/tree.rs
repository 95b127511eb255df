//! Tree comparison helpers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Option<u64>>) {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("Could not list {}: {e}", dir.display()));
    for entry in entries {
        let path = entry.unwrap().path();
        let relative = path
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        if path.is_dir() {
            out.insert(relative, None);
            walk(root, &path, out);
        } else {
            out.insert(relative, Some(fs::metadata(&path).unwrap().len()));
        }
    }
}

/// Every entry below `root`, keyed by `/`-separated relative path; files map
/// to their length and directories to `None`.
pub fn relative_files(root: &Path) -> BTreeMap<String, Option<u64>> {
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

/// Assert that `dest` holds exactly the tree under `bundle_root`, file
/// lengths included.
///
/// Names in `bundle_only` are ignored when found directly under
/// `bundle_root`; names in `dest_only` are ignored directly under `dest`.
///
/// # Panics
/// Panics with both listings when the trees differ.
pub fn assert_mirrors(bundle_root: &Path, dest: &Path, bundle_only: &[&str], dest_only: &[&str]) {
    let mut expected = relative_files(bundle_root);
    for name in bundle_only {
        expected.remove(*name);
    }
    let mut actual = relative_files(dest);
    for name in dest_only {
        actual.remove(*name);
    }
    assert_eq!(
        expected,
        actual,
        "Destination {} does not mirror bundle {}",
        dest.display(),
        bundle_root.display()
    );
}
