use url::Url;

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Joins `path` onto `base`, keeping any path prefix `base` already has
/// (e.g. `/api/v1`).
pub fn endpoint(base: &str, path: &str) -> Result<Url, url::ParseError> {
    let base = normalize_url(base);
    Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))
}

/// `needle_lower` must already be lowercase; only `haystack` is folded.
pub fn contains_lowered(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_scheme_and_trims_slash() {
        assert_eq!(normalize_url(" chat.example.com/ "), "https://chat.example.com");
        assert_eq!(normalize_url("http://127.0.0.1:8000/api/v1/"), "http://127.0.0.1:8000/api/v1");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = endpoint("http://127.0.0.1:8000/api/v1", "/apps/chat/chats/4").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/v1/apps/chat/chats/4");
    }

    #[test]
    fn contains_is_case_insensitive_on_haystack() {
        assert!(contains_lowered("Jason Miller", "as"));
        assert!(contains_lowered("ASH", "as"));
        assert!(!contains_lowered("Brian Lambert", "as"));
    }
}
