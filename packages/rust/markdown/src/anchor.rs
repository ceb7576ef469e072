//! In-document anchor slugs for heading links.

/// Derive the link fragment for a heading.
///
/// Emphasis and code markers are dropped, anything that is not alphanumeric,
/// whitespace or `-` is removed, whitespace runs become a single `-`, and the
/// result is lower-cased. Non-Latin letters survive as-is.
///
/// Equal headings produce equal slugs; no `-1`, `-2` suffixes are added.
pub fn anchor(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if matches!(c, '*' | '_' | '`') {
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(c.is_alphanumeric() || c == '-') {
            continue;
        }
        if pending_space {
            slug.push('-');
            pending_space = false;
        }
        slug.extend(c.to_lowercase());
    }

    if pending_space {
        slug.push('-');
    }

    slug
}
