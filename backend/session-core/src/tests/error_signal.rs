use crate::error_signal::{DEFAULT_ERROR_TITLE, ErrorNotice, ErrorSignal};

#[test]
fn given_new_signal_when_read_then_closed_with_default_title() {
    let signal = ErrorSignal::new();

    assert!(!signal.is_open());
    assert_eq!(signal.current(), ErrorNotice::default());
    assert_eq!(signal.current().title, DEFAULT_ERROR_TITLE);
}

/// **VALUE**: Verifies `show` opens the channel with the default title.
///
/// **WHY THIS MATTERS**: Every failure in the console goes through `show`; the
/// dialog reads title, message and open flag from here.
#[test]
fn given_message_when_show_then_open_with_message() {
    let signal = ErrorSignal::new();

    signal.show("Invalid PIN. Please try again.");

    let notice = signal.current();
    assert!(notice.is_open);
    assert_eq!(notice.title, "Error");
    assert_eq!(notice.message, "Invalid PIN. Please try again.");
}

/// **VALUE**: Verifies `close` only clears the open flag.
///
/// **BUG THIS CATCHES**: Would catch resetting the message on close, which makes
/// a closing dialog flash empty text.
#[test]
fn given_open_signal_when_closed_then_message_kept() {
    let signal = ErrorSignal::new();
    signal.show_titled("Server unreachable", "Connection");

    signal.close();

    let notice = signal.current();
    assert!(!notice.is_open);
    assert_eq!(notice.title, "Connection");
    assert_eq!(notice.message, "Server unreachable");
}

/// **VALUE**: Verifies clones share one channel and subscribers are notified.
///
/// **WHY THIS MATTERS**: The login flow, the request authorizer and the
/// display layer each hold their own clone.
#[tokio::test]
async fn given_subscriber_when_clone_shows_then_subscriber_sees_it() {
    let signal = ErrorSignal::new();
    let raiser = signal.clone();
    let mut rx = signal.subscribe();

    raiser.show("boom");

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().message, "boom");
    assert!(signal.is_open());
}

#[test]
fn given_closed_signal_when_closed_again_then_subscribers_not_notified() {
    let signal = ErrorSignal::new();
    let rx = signal.subscribe();

    signal.close();

    assert!(!rx.has_changed().unwrap());
}
