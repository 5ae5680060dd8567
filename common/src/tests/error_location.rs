use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error in the workspace renders its location. If capture
/// breaks, all error messages lose their debugging value.
///
/// **BUG THIS CATCHES**: Would catch if `Location::caller()` stops resolving to the
/// call site or if line/column extraction breaks.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: Current caller location
    // WHEN: Creating ErrorLocation from caller
    let location = ErrorLocation::from(Location::caller());
    let expected_line = line!() - 1;

    // THEN: Should capture file, line, and column
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line, expected_line, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the "[file:line:column]" Display format.
///
/// **WHY THIS MATTERS**: Every `thiserror` message in the workspace appends this
/// rendering. A format change silently changes every error string.
///
/// **BUG THIS CATCHES**: Would catch removed brackets or a missing component.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: Should produce "[file:line:column]" format
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert!(
        formatted.contains(&format!(":{}:{}]", location.line, location.column)),
        "Should include line and column"
    );
}

/// **VALUE**: Verifies that `#[track_caller]` propagation reports the outer call site.
///
/// **WHY THIS MATTERS**: Error constructors are `#[track_caller]`. Without propagation
/// every error would point at the constructor instead of the failing operation.
///
/// **BUG THIS CATCHES**: Would catch a helper losing `#[track_caller]` in a refactor.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    // GIVEN: A helper function that captures location
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::from(Location::caller())
    }

    // WHEN: Capturing location from different call sites
    let loc1 = capture_location();
    let loc2 = capture_location();

    // THEN: Should have same file but sequential line numbers
    assert_eq!(loc1.file, loc2.file, "Should have same file");
    assert_eq!(loc1.line + 1, loc2.line, "Lines should be sequential");
}
