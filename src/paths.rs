//! Path helpers shared by the asset rewriter and the coordinator.
//!
//! Note paths are opaque strings handed over by the platform. The only
//! normalisation applied is separator conversion, so Windows-style paths
//! resolve the same way as POSIX ones.

/// Replace every backslash separator with a forward slash.
#[must_use]
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize `path` and make sure it ends with exactly the directory form `/`.
#[must_use]
pub fn with_trailing_slash(path: &str) -> String {
    let mut normalized = normalize(path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalize_converts_backslashes() {
        assert_eq!(normalize(r"C:\notes\nb\n1"), "C:/notes/nb/n1");
        assert_eq!(normalize("/nb/n1"), "/nb/n1");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_with_trailing_slash() {
        assert_eq!(with_trailing_slash("/nb/n1"), "/nb/n1/");
        assert_eq!(with_trailing_slash("/nb/n1/"), "/nb/n1/");
        assert_eq!(with_trailing_slash(r"nb\n1\"), "nb/n1/");
        assert_eq!(with_trailing_slash(""), "/");
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(path in r"[a-zA-Z0-9 ./\\:_-]{0,40}") {
            let once = normalize(&path);
            prop_assert_eq!(normalize(&once), once.clone());
            prop_assert!(!once.contains('\\'));
        }

        #[test]
        fn prop_with_trailing_slash_idempotent(path in r"[a-zA-Z0-9 ./\\:_-]{0,40}") {
            let once = with_trailing_slash(&path);
            prop_assert_eq!(with_trailing_slash(&once), once.clone());
            prop_assert!(once.ends_with('/'));
        }
    }
}
