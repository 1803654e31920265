use uuid::Uuid;

/// Reduces an uploaded filename to a safe basename: path components are
/// stripped and anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Builds the name an upload is stored under. A UUID prefix keeps two users
/// uploading `leaf.jpg` from clobbering each other.
pub fn stored_filename(original: &str) -> String {
    let safe = sanitize_filename(original);
    let safe = if safe.is_empty() || safe == "." || safe == ".." {
        "upload".to_string()
    } else {
        safe
    };
    format!("{}_{}", Uuid::new_v4().simple(), safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directory_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\x\\leaf.jpg"), "leaf.jpg");
    }

    #[test]
    fn replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my leaf (1).jpg"), "my_leaf__1_.jpg");
    }

    #[test]
    fn stored_name_is_never_empty() {
        let name = stored_filename("..");
        assert!(name.ends_with("_upload"));
        assert!(name.len() > "upload".len());
    }

    #[test]
    fn stored_names_are_unique_per_call() {
        assert_ne!(stored_filename("leaf.jpg"), stored_filename("leaf.jpg"));
    }
}
