//! Key-name heuristics used by the form projection and template inference
//! engines.
//!
//! The content schema is not known statically, so widget selection and
//! placeholder synthesis run off field names. All keyword tables live here as
//! plain data so the heuristics stay independently testable and extensible;
//! engine code never embeds its own string checks.

/// Field names that hold a media URL, matched case-insensitively as
/// substrings. A matching text field projects as a file-reference widget.
pub const FILE_REFERENCE_KEYWORDS: &[&str] =
    &["image", "logo", "avatar", "document", "photo", "src"];

/// Field names that hold long-form prose regardless of current value length.
pub const LONG_TEXT_KEYWORDS: &[&str] = &[
    "description",
    "bio",
    "mission",
    "excerpt",
    "details",
    "content",
    "metadescription",
];

/// Field names whose text value is replaced by a placeholder URL (rather
/// than a "New ..." string) when a list element template is synthesized.
/// Narrower than [`FILE_REFERENCE_KEYWORDS`] on purpose: an `icon` field is
/// usually a glyph name, not a URL.
pub const TEMPLATE_URL_KEYWORDS: &[&str] = &["image", "src"];

/// Placeholder URL substituted into synthesized image fields.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400";

/// Text value length above which a field projects as long text.
pub const LONG_TEXT_THRESHOLD: usize = 80;

/// Scalar-list field names edited as one joined value instead of a
/// repeatable list.
pub const JOINED_LIST_KEYWORDS: &[&str] = &["tags"];

/// Delimiter for joined scalar-list editing. Values containing the raw
/// delimiter character are rejected before join so the round trip stays
/// lossless.
pub const JOIN_DELIMITER: &str = ", ";

/// Fields consulted, in order, when labelling an object-list element.
pub const ELEMENT_LABEL_KEYWORDS: &[&str] = &["title", "role", "alt", "label"];

/// Sections whose lists are shared across both language branches. An append
/// into one branch is mirrored into the other in the same logical
/// operation. Currently only the image gallery, which the published site
/// presents language-agnostically.
pub const DUAL_WRITE_SECTIONS: &[&str] = &["gallery"];

/// Returns true when `field_name` matches any keyword in `table`
/// (case-insensitive substring match).
pub fn matches_keyword(field_name: &str, table: &[&str]) -> bool {
    let lowered = field_name.to_lowercase();
    table.iter().any(|kw| lowered.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Keyword Matching Tests ====================

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(matches_keyword("heroImage", FILE_REFERENCE_KEYWORDS));
        assert!(matches_keyword("IMAGE", FILE_REFERENCE_KEYWORDS));
        assert!(matches_keyword("companyLogo", FILE_REFERENCE_KEYWORDS));
    }

    #[test]
    fn test_match_is_substring() {
        assert!(matches_keyword("profileAvatarUrl", FILE_REFERENCE_KEYWORDS));
        assert!(matches_keyword("metaDescription", LONG_TEXT_KEYWORDS));
    }

    #[test]
    fn test_no_match_for_unrelated_names() {
        assert!(!matches_keyword("email", FILE_REFERENCE_KEYWORDS));
        assert!(!matches_keyword("title", LONG_TEXT_KEYWORDS));
    }

    #[test]
    fn test_icon_is_not_a_template_url_field() {
        // icon fields hold glyph names; they must get a "New Icon" text
        // placeholder, not an image URL.
        assert!(!matches_keyword("icon", TEMPLATE_URL_KEYWORDS));
        assert!(matches_keyword("imageSrc", TEMPLATE_URL_KEYWORDS));
    }

    #[test]
    fn test_tags_edits_as_joined_value() {
        assert!(matches_keyword("tags", JOINED_LIST_KEYWORDS));
        assert!(!matches_keyword("responsibilities", JOINED_LIST_KEYWORDS));
    }
}
