//! Area tag slug normalizer
//!
//! Tags are addressed by slug everywhere: the store keeps `slug` unique,
//! public filtering uses it in URLs, and two display names that normalize
//! to the same slug are the same tag.

use thiserror::Error;

/// Convert a display name into its canonical slug.
///
/// Lowercase and trim, drop everything that is not an ASCII word character,
/// whitespace or hyphen, then collapse whitespace/underscore/hyphen runs into a
/// single `-` with no leading or trailing hyphen.
///
/// ```
/// use shared::slug::normalize;
///
/// assert_eq!(normalize("St. Thomas"), "st-thomas");
/// assert_eq!(normalize("  Pop-Up!! "), "pop-up");
/// ```
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for ch in lowered.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// A requested tag after trimming and normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedTag {
    /// Display name as requested (trimmed)
    pub name: String,
    /// Canonical slug of `name`
    pub slug: String,
}

impl RequestedTag {
    pub fn new(name: &str) -> Result<Self, TagNameError> {
        let name = name.trim();
        let slug = normalize(name);
        if slug.is_empty() {
            return Err(TagNameError::Unusable(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            slug,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagNameError {
    #[error("Tag name '{0}' does not contain any letters or digits")]
    Unusable(String),
}

/// Normalize a requested tag list, keeping the first occurrence of each slug.
///
/// Insertion order is preserved, so `["VIP", "vip", "  VIP "]` yields a
/// single `VIP` entry.
pub fn dedupe_tag_names<I, S>(names: I) -> Result<Vec<RequestedTag>, TagNameError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<RequestedTag> = Vec::new();
    for name in names {
        let tag = RequestedTag::new(name.as_ref())?;
        if !tags.iter().any(|t| t.slug == tag.slug) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Denormalized display form stored in `reservation.tags_summary`
pub fn tags_summary(tags: &[RequestedTag]) -> String {
    tags.iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
