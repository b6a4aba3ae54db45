//! The `"qualifier/field"` tag grammar used by composite projection:
//! `tag := ( qualifier "/" )? field-name`, split on the first `/`.

/// A parsed member tag: an optional qualifying class name and the field
/// name proper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub qualifier: Option<&'a str>,
    pub field: &'a str,
}

pub fn parse(tag: &str) -> Tag<'_> {
    match tag.split_once('/') {
        Some((qualifier, field)) => Tag {
            qualifier: Some(qualifier),
            field,
        },
        None => Tag {
            qualifier: None,
            field: tag,
        },
    }
}

/// Infers a qualifying class name from a target composite's declared
/// location: strip `prefix` (if `package_path` starts with it), replace
/// `::`-separated module path components with dots, append `simple_name`.
pub fn infer_qualifier(package_path: &str, simple_name: &str, prefixes: &[String]) -> String {
    let stripped = prefixes
        .iter()
        .find_map(|prefix| package_path.strip_prefix(prefix.as_str()))
        .unwrap_or(package_path);
    let stripped = stripped.trim_start_matches("::");

    let dotted = stripped.replace("::", ".");
    if dotted.is_empty() {
        simple_name.to_string()
    } else {
        format!("{dotted}.{simple_name}")
    }
}
