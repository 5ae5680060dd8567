use crate::session::{FALLBACK_INITIALS, Session, user_initials};

/// **VALUE**: Verifies initials come from the first letter of the first two words.
///
/// **WHY THIS MATTERS**: The header avatar shows these letters for the signed-in user.
///
/// **BUG THIS CATCHES**: Would catch taking letters from every word or from the wrong end.
#[test]
fn given_multi_word_name_when_initials_then_first_two_words_uppercased() {
    assert_eq!(user_initials("John Watson"), "JW");
    assert_eq!(user_initials("mary jane morstan"), "MJ");
    assert_eq!(user_initials("Sherlock"), "S");
}

/// **VALUE**: Verifies runs of whitespace never produce empty words.
///
/// **BUG THIS CATCHES**: Would catch splitting on a single space, which turns
/// `"  ada  lovelace "` into empty segments and drops letters.
#[test]
fn given_irregular_whitespace_when_initials_then_ignores_empty_segments() {
    assert_eq!(user_initials("  ada  lovelace "), "AL");
    assert_eq!(user_initials("\tgrace\nhopper"), "GH");
}

/// **VALUE**: Verifies the fallback is used when there is no name at all.
///
/// **WHY THIS MATTERS**: Before `init_session_user` runs, or after logout, the
/// avatar must still render something.
#[test]
fn given_blank_name_when_initials_then_fallback() {
    assert_eq!(user_initials(""), FALLBACK_INITIALS);
    assert_eq!(user_initials("   "), FALLBACK_INITIALS);
}

#[test]
fn given_session_when_initials_then_uses_display_name() {
    let session = Session::new("tok-77", "Irene Adler");

    assert_eq!(session.initials(), "IA");
    assert_eq!(session.token.as_str(), "tok-77");
}
