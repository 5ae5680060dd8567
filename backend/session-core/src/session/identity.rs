//! Display identity derived from the session user name.

/// Initials shown when no user name is known.
pub const FALLBACK_INITIALS: &str = "JW";

const MAX_INITIALS: usize = 2;

/// Uppercased first letter of each whitespace-separated word, at most two.
///
/// `"John Watson"` → `"JW"`, `"  ada  "` → `"A"`, `""` → [`FALLBACK_INITIALS`].
pub fn user_initials(display_name: &str) -> String {
    let initials: String = display_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(MAX_INITIALS)
        .collect();

    if initials.is_empty() {
        FALLBACK_INITIALS.to_string()
    } else {
        initials
    }
}
