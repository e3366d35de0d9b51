//! Composite addresses for entries inside (possibly nested) archives.
//!
//! An address has the shape `scheme:path[!/inner]*`. Every `!/` descends into
//! an entry of the archive named so far, e.g.
//! `jar:/a/outer.jar!/b/inner.jar!/c/file.txt` is the entry `c/file.txt` of
//! the archive `b/inner.jar` stored in `/a/outer.jar`.
//!
//! Addresses are compared as plain strings everywhere; nothing here
//! canonicalizes them.

/// Marks the boundary between an archive and a path inside it.
pub const NESTING_SEPARATOR: &str = "!/";

/// Suffix appended to an archive address to form its content root.
pub const CONTENT_ROOT_SUFFIX: &str = "!";

/// Scheme used when promoting a bare file system path to an address.
pub const JAR_SCHEME: &str = "jar";

/// Splits `address` at the last nesting separator.
///
/// The base is everything before the separator and may itself be nested.
/// The remainder starts at the separator's `/`, so it is either empty (no
/// separator) or begins with `/`.
pub fn split(address: &str) -> (&str, &str) {
    match address.rfind(NESTING_SEPARATOR) {
        Some(idx) => (&address[..idx], &address[idx + 1..]),
        None => (address, ""),
    }
}

/// Strips every leading `/` so the result can be used as an entry name.
pub fn trim(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Number of nesting separators in `address`.
pub fn nesting_depth(address: &str) -> usize {
    address.matches(NESTING_SEPARATOR).count()
}

/// The outermost archive address: the text before the first separator.
pub fn outermost(address: &str) -> &str {
    match address.find(NESTING_SEPARATOR) {
        Some(idx) => &address[..idx],
        None => address,
    }
}

/// The physical locator (file path or URL) the outermost archive is read from.
///
/// One leading URI scheme such as `jar:` is stripped, then a `file:` scheme
/// with its optional `//` authority marker. `http(s)://` locators are kept
/// intact.
pub fn physical_locator(address: &str) -> &str {
    let mut rest = outermost(address);
    if !is_network(rest) && !rest.starts_with("file:") {
        if let Some(len) = scheme_len(rest) {
            rest = &rest[len + 1..];
        }
    }
    match rest.strip_prefix("file:") {
        Some(path) => path.strip_prefix("//").unwrap_or(path),
        None => rest,
    }
}

/// Address of the content root of the archive at `address`.
pub fn content_root(address: &str) -> String {
    format!("{address}{CONTENT_ROOT_SUFFIX}")
}

/// Prefixes `input` with `jar:` unless it already carries a scheme.
pub fn with_default_scheme(input: &str) -> String {
    if scheme_len(input).is_some() {
        input.to_string()
    } else {
        format!("{JAR_SCHEME}:{input}")
    }
}

fn is_network(address: &str) -> bool {
    address.starts_with("http://") || address.starts_with("https://")
}

/// Length of the URI scheme at the start of `address`, if there is one.
///
/// Single letters are not accepted, so `C:\x.jar` is not mistaken for a
/// scheme.
fn scheme_len(address: &str) -> Option<usize> {
    let idx = address.find(':')?;
    let scheme = &address[..idx];
    let mut chars = scheme.chars();
    let valid = scheme.len() >= 2
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(idx)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("folder/file.ext", "folder/file.ext")]
    #[case("/folder/file.ext", "folder/file.ext")]
    #[case("//folder/file.ext", "folder/file.ext")]
    #[case("", "")]
    fn test_trim(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(trim(input), expected);
    }

    #[rstest]
    #[case("file:/folder/file.ext", "file:/folder/file.ext", "")]
    #[case("jar:/folder/archive.jar!/path/file.ext", "jar:/folder/archive.jar", "/path/file.ext")]
    #[case(
        "jar:/folder/outer.jar!/inner.jar!/path/file.ext",
        "jar:/folder/outer.jar!/inner.jar",
        "/path/file.ext"
    )]
    #[case("jar:/a.jar!/x.jar!/p/f.ext", "jar:/a.jar!/x.jar", "/p/f.ext")]
    #[case("jar:/a.jar!/", "jar:/a.jar", "/")]
    fn test_split(#[case] address: &str, #[case] base: &str, #[case] remainder: &str) {
        assert_eq!(split(address), (base, remainder));
    }

    #[test]
    fn split_keeps_bang_without_slash() {
        assert_eq!(split("jar:/we!rd.jar"), ("jar:/we!rd.jar", ""));
    }

    #[test]
    fn test_nesting_depth() {
        assert_eq!(nesting_depth("jar:/a.jar"), 0);
        assert_eq!(nesting_depth("jar:/a.jar!/b.jar!/c"), 2);
    }

    #[rstest]
    #[case("jar:/a/outer.jar!/b/inner.jar!/c.txt", "/a/outer.jar")]
    #[case("jar:file:///a/outer.jar", "/a/outer.jar")]
    #[case("file:/a/outer.jar", "/a/outer.jar")]
    #[case("file:///a/outer.jar", "/a/outer.jar")]
    #[case("jar:https://host/x.jar!/y", "https://host/x.jar")]
    #[case("https://host/x.jar", "https://host/x.jar")]
    #[case("/plain/x.jar", "/plain/x.jar")]
    #[case("C:/x.jar", "C:/x.jar")]
    fn test_physical_locator(#[case] address: &str, #[case] expected: &str) {
        assert_eq!(physical_locator(address), expected);
    }

    #[test]
    fn test_with_default_scheme() {
        assert_eq!(with_default_scheme("/x.jar"), "jar:/x.jar");
        assert_eq!(with_default_scheme("jar:/x.jar"), "jar:/x.jar");
        assert_eq!(with_default_scheme("lib/x.jar"), "jar:lib/x.jar");
    }
}
