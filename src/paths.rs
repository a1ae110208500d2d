//! Path helpers for output naming and relative import computation.

use std::path::{Component, Path};

/// Strips the final extension from a path, leaving the rest intact.
pub fn strip_extension(path: &str) -> String {
    match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') && dot > 0 => path[..dot].to_owned(),
        _ => path.to_owned(),
    }
}

/// Returns the file name of `path` without its extension; output files
/// and result-map keys are named this way.
pub fn file_name_without_extension(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    strip_extension(base)
}

/// Computes the module specifier to import `target` from `source`,
/// relative to the source file's directory, extension stripped, and
/// `./`-prefixed unless the path already ascends.
pub fn get_import_path(source: &str, target: &str) -> String {
    let target = strip_extension(target);
    let source_dir: Vec<&str> = normalize(Path::new(source));
    let source_dir = &source_dir[..source_dir.len().saturating_sub(1)];
    let target_parts = normalize(Path::new(&target));

    let common = source_dir
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..source_dir.len() {
        parts.push("..".to_owned());
    }
    for p in &target_parts[common..] {
        parts.push((*p).to_owned());
    }

    let joined = parts.join("/");
    if joined.starts_with("../") {
        joined
    } else {
        format!("./{}", joined)
    }
}

/// Flattens a path to its plain components, dropping `.` segments.
fn normalize(path: &Path) -> Vec<&str> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(p) => p.to_str(),
            Component::ParentDir => Some(".."),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_trimming() {
        assert_eq!(file_name_without_extension("/this/is/a/path/to/../foo.bar"), "foo");
        assert_eq!(file_name_without_extension("foo.js"), "foo");
        assert_eq!(file_name_without_extension("foo"), "foo");
    }

    #[test]
    fn extension_stripping() {
        assert_eq!(strip_extension("a/b/c.js"), "a/b/c");
        assert_eq!(strip_extension("a/b.x/c"), "a/b.x/c");
    }

    #[test]
    fn sibling_import() {
        assert_eq!(get_import_path("app/main.js", "app/util.js"), "./util");
    }

    #[test]
    fn ascending_import() {
        assert_eq!(get_import_path("app/sub/main.js", "lib/widget.js"), "../../lib/widget");
    }

    #[test]
    fn descending_import() {
        assert_eq!(get_import_path("main.js", "lib/widget.js"), "./lib/widget");
    }
}
