//! Collision-free destination naming.

use std::path::Path;

/// Resolve a filename that does not collide with any existing file in `dir`.
///
/// When `filename` is taken, the smallest unused numeric disambiguator is
/// inserted before the extension: `drawing.png` becomes `drawing(1).png`,
/// then `drawing(2).png`, and so on. Resolution is deterministic for a given
/// directory state; callers that need the name to stay free must create the
/// file while holding whatever lock serializes their starts.
pub fn resolve_unique_name(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }

    let (stem, extension) = split_extension(filename);
    for n in 1u32.. {
        let candidate = match extension {
            Some(ext) => format!("{stem}({n}).{ext}"),
            None => format!("{stem}({n})"),
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
    }
    unreachable!("disambiguator space exhausted")
}

/// Split at the last dot, treating a leading dot (hidden files) as part of
/// the stem rather than an extension separator.
fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    }
}
