//! Virtual path helpers.
//!
//! Virtual paths are `/`-rooted and `/`-separated regardless of the host
//! platform. They address entries relative to the served root; translating
//! them to real filesystem paths is the resolver's job (`fs::resolve`).

/// Normalize a virtual path: collapse repeated separators, drop empty
/// segments, and guarantee a single leading `/`.
pub fn normalize(p: &str) -> String {
    let joined = p.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("/");
    format!("/{}", joined)
}

/// Join a child name onto a base virtual path.
pub fn join(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

/// Parent of a virtual path; the root is its own parent.
pub fn parent(p: &str) -> String {
    if p == "/" || p.is_empty() {
        return "/".to_string();
    }
    let mut parts: Vec<&str> = p.split('/').filter(|s| !s.is_empty()).collect();
    parts.pop();
    format!("/{}", parts.join("/"))
}

/// Last segment of a virtual path; empty for the root.
pub fn basename(p: &str) -> &str {
    p.split('/').filter(|s| !s.is_empty()).next_back().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_root_forms() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("//"), "/");
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize("/a//b/"), "/a/b");
        assert_eq!(normalize("a/b"), "/a/b");
    }

    #[test]
    fn join_handles_root_and_nested() {
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/a", "b"), "/a/b");
        assert_eq!(join("/a/", "b"), "/a/b");
    }

    #[test]
    fn parent_walks_up() {
        assert_eq!(parent("/a/b"), "/a");
        assert_eq!(parent("/a"), "/");
        assert_eq!(parent("/"), "/");
        assert_eq!(parent(""), "/");
    }

    #[test]
    fn basename_returns_last_segment() {
        assert_eq!(basename("/a/b"), "b");
        assert_eq!(basename("/a"), "a");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn join_then_parent_round_trips() {
        let p = join("/music", "album");
        assert_eq!(parent(&p), "/music");
        assert_eq!(basename(&p), "album");
    }
}
