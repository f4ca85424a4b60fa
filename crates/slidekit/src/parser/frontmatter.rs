use super::DeckMeta;

/// Split a leading `---` YAML block off `content`.
///
/// Returns default metadata and the untouched content when there is no
/// frontmatter; malformed YAML is logged and ignored.
pub fn extract(content: &str) -> (DeckMeta, String) {
    let normalized = content.replace("\r\n", "\n");
    let Some(rest) = normalized.strip_prefix("---\n") else {
        return (DeckMeta::default(), normalized);
    };

    let mut yaml_end = None;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            yaml_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let Some((yaml_len, body_start)) = yaml_end else {
        return (DeckMeta::default(), normalized);
    };

    let yaml = &rest[..yaml_len];
    let body = rest[body_start..].to_string();
    let meta = if yaml.trim().is_empty() {
        DeckMeta::default()
    } else {
        serde_yaml::from_str(yaml).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed frontmatter: {e}");
            DeckMeta::default()
        })
    };
    (meta, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_known_fields() {
        let content = "---\ntitle: Circuits\ntheme: dark\nwebsite: https://example.org\n---\n# One\n";
        let (meta, body) = extract(content);
        assert_eq!(meta.title.as_deref(), Some("Circuits"));
        assert_eq!(meta.theme.as_deref(), Some("dark"));
        assert_eq!(meta.website.as_deref(), Some("https://example.org"));
        assert_eq!(body, "# One\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let (meta, body) = extract("# Just a slide");
        assert!(meta.title.is_none());
        assert_eq!(body, "# Just a slide");
    }

    #[test]
    fn test_unterminated_frontmatter_is_body() {
        let (meta, body) = extract("---\ntitle: x\n# Slide");
        assert!(meta.title.is_none());
        assert!(body.starts_with("---"));
    }

    #[test]
    fn test_malformed_yaml_ignored() {
        let (meta, body) = extract("---\ntitle: [unclosed\n---\nBody");
        assert!(meta.title.is_none());
        assert_eq!(body, "Body");
    }
}
