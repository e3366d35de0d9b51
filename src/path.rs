//! Helpers for `/`-separated virtual paths.
//!
//! Archive entry names always use `/` regardless of the host platform, so
//! none of these go through [`std::path`].

/// Separator between path segments inside an archive.
pub const PATH_SEPARATOR: char = '/';

/// Separator between the components of a Java package name.
pub const PACKAGE_SEPARATOR: char = '.';

/// The segment after the last `/`, or `path` itself when there is none.
pub fn basename(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Everything before the last `/`, or `"."` when there is none.
pub fn dirname(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Non-empty segments of `path`, in order.
///
/// A leading `.` segment means "no directory left" and is dropped, so
/// `split_segments(dirname("file.txt"))` is empty.
pub fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()).peekable();
    if segments.peek() == Some(&".") {
        segments.next();
    }
    segments.collect()
}

/// Joins directory segments into a dotted package name.
pub fn join_dotted<S: AsRef<str>>(segments: &[S]) -> String {
    let mut name = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            name.push(PACKAGE_SEPARATOR);
        }
        name.push_str(segment.as_ref());
    }
    name
}

/// Appends `name` to `base` with a single `/`. An empty base yields `name`.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        return name.to_string();
    }
    if name.is_empty() {
        return base.to_string();
    }
    format!("{base}{PATH_SEPARATOR}{name}")
}

/// `path` with the `base` prefix and the following separator removed.
///
/// Returns `None` when `path` is not inside `base`. Prefix matching is by
/// whole segments: `a/bc` is not inside `a/b`.
pub fn relative_to<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(PATH_SEPARATOR)
}
