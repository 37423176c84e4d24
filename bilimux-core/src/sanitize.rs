//! Filesystem-safe cleanup of metadata-derived names.
//!
//! Titles arrive from an external metadata document and routinely contain
//! characters that are not legal in file names on every platform we care
//! about. Output paths are built from the cleaned form only.

/// Characters that cannot appear in file names on common filesystems.
const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replacement for every reserved character.
const PLACEHOLDER: char = '_';

/// Replaces every reserved character in `name` with an underscore.
///
/// The substitution is one-to-one, so the result has the same character
/// count as the input and applying the function twice changes nothing.
///
/// # Examples
///
/// ```rust
/// use bilimux_core::sanitize_name;
///
/// assert_eq!(sanitize_name("My:Video"), "My_Video");
/// assert_eq!(sanitize_name("a/b\\c"), "a_b_c");
/// ```
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { PLACEHOLDER } else { c })
        .collect()
}
