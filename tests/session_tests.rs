//! Session-level behavior through the public API
//!
//! Every test runs against the headless device, feeding input bytes through
//! its handle and checking what the windows and the device report back.

use std::io::Write as _;

use mochi_curses::key::{ERR, KEY_LEFT, KEY_MOUSE};
use mochi_curses::mouse::{
    ALL_MOUSE_EVENTS, BUTTON1_CLICKED, BUTTON1_PRESSED, BUTTON1_RELEASED, BUTTON2_PRESSED,
    BUTTON_CTRL, REPORT_MOUSE_POSITION,
};
use mochi_curses::{
    CursesError, HeadlessHandle, InputMode, MousePoll, MouseTracking, Session, SessionConfig,
    Window,
};

fn session(cols: usize, rows: usize) -> (Session, Window, HeadlessHandle) {
    Session::headless(SessionConfig::default().headless_size(cols, rows)).unwrap()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_child_window_lifecycle() {
    let (session, root, handle) = session(13, 8);
    let child = root.create_child(5, 10, 2, 3).unwrap();
    child.write("hi").unwrap();
    child.refresh().unwrap();
    session.commit_all().unwrap();
    assert_eq!(handle.row_text(3), "  hi");

    child.destroy().unwrap();
    session.end().unwrap();
    assert!(handle.is_restored());
}

#[test]
fn test_child_must_fit_parent() {
    let (_session, root, _) = session(13, 8);
    assert!(root.create_child(5, 11, 3, 0).is_err());
    assert!(root.create_child(1, 1, 13, 0).is_err());

    let err = root.create_child(9, 1, 0, 0).unwrap_err();
    match err {
        CursesError::Placement {
            parent_width,
            parent_height,
            ..
        } => assert_eq!((parent_width, parent_height), (13, 8)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_oversized_request_is_placement_error() {
    let (session, root, _) = session(13, 8);
    let before = session.live_windows();
    assert!(matches!(
        root.create_child(1, usize::MAX, 1, 0),
        Err(CursesError::Placement { .. })
    ));
    assert!(matches!(
        root.create_child(usize::MAX, 1, 0, usize::MAX),
        Err(CursesError::Placement { .. })
    ));
    assert!(matches!(
        session.new_window(1, usize::MAX, 1, 0),
        Err(CursesError::Placement { .. })
    ));
    assert_eq!(session.live_windows(), before);
}

#[test]
fn test_to_local_at_far_coordinates() {
    let (_session, root, _) = session(13, 8);
    let child = root.create_child(2, 3, 10, 6).unwrap();
    assert_eq!(child.to_local(12, 7).unwrap(), Some((2, 1)));
    assert_eq!(child.to_local(usize::MAX, 7).unwrap(), None);
    assert!(!child.encloses(7, usize::MAX).unwrap());
}

#[test]
fn test_zero_size_extends_to_edge() {
    let (_session, root, _) = session(13, 8);
    let child = root.create_child(0, 0, 3, 2).unwrap();
    assert_eq!(child.bounds().unwrap(), (10, 6));
}

#[test]
fn test_windows_after_end_report_session_ended() {
    let (session, root, _) = session(10, 4);
    session.end().unwrap();
    assert!(matches!(root.read_line(), Err(CursesError::SessionEnded)));
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_write_line_at_replaces_previous_text() {
    let (session, root, handle) = session(20, 4);
    root.write_line_at(0, 1, "ab").unwrap();
    root.write_line_at(0, 1, "a").unwrap();
    root.refresh().unwrap();
    session.commit_all().unwrap();
    assert_eq!(handle.row_text(1), "a");
}

#[test]
fn test_clear_keeps_cursor() {
    let (session, root, handle) = session(20, 4);
    root.write_at(3, 2, "text").unwrap();
    root.refresh().unwrap();
    session.commit_all().unwrap();
    assert_eq!(handle.row_text(2), "   text");

    root.clear().unwrap();
    assert_eq!(root.cursor_position().unwrap(), (7, 2));
    root.refresh().unwrap();
    session.commit_all().unwrap();
    assert_eq!(handle.row_text(2), "");
}

#[test]
fn test_write_past_last_cell_overflows() {
    let (_session, root, _) = session(4, 2);
    let err = root.write("abcdefghi").unwrap_err();
    assert!(matches!(err, CursesError::WriteOverflow(id) if id == root.id()));
    assert_eq!(root.row_text(1).unwrap(), "efgh");
}

#[test]
fn test_move_to_clamps_into_window() {
    let (_session, root, _) = session(10, 4);
    root.move_to(50, 50).unwrap();
    assert_eq!(root.cursor_position().unwrap(), (9, 3));
}

#[test]
fn test_touch_tracking() {
    let (_session, root, _) = session(10, 4);
    root.refresh().unwrap();
    assert!(!root.is_touched().unwrap());

    root.write_at(0, 2, "x").unwrap();
    assert!(root.is_touched().unwrap());
    assert!(root.is_line_touched(2).unwrap());
    assert!(!root.is_line_touched(1).unwrap());

    root.refresh().unwrap();
    assert!(!root.is_touched().unwrap());
    root.mark_dirty().unwrap();
    assert!(root.is_line_touched(0).unwrap());
    assert!(root.is_line_touched(3).unwrap());
}

#[test]
fn test_commit_skips_unchanged_rows() {
    let (session, root, handle) = session(10, 4);
    root.write("same").unwrap();
    root.refresh().unwrap();
    session.commit_all().unwrap();
    let written = handle.lines_written();

    root.mark_dirty().unwrap();
    root.refresh().unwrap();
    session.commit_all().unwrap();
    assert_eq!(handle.lines_written(), written);
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_half_delay_timeout_returns_err() {
    let (session, root, handle) = session(10, 4);
    session.half_delay(1).unwrap();
    assert_eq!(handle.input_mode(), InputMode::HalfDelay(1));
    assert_eq!(root.read_char().unwrap(), ERR);
}

#[test]
fn test_read_char_echoes() {
    let (session, root, handle) = session(10, 4);
    handle.push_str("ok");
    assert_eq!(root.read_char().unwrap(), b'o' as i32);
    assert_eq!(root.read_char().unwrap(), b'k' as i32);
    assert_eq!(root.row_text(0).unwrap().trim_end(), "ok");

    session.no_echo();
    handle.push_str("z");
    root.read_char().unwrap();
    assert_eq!(root.row_text(0).unwrap().trim_end(), "ok");
}

#[test]
fn test_read_line() {
    let (session, root, handle) = session(20, 4);
    session.no_echo();
    handle.push_str("hellp\x7fo\nrest");
    assert_eq!(root.read_line().unwrap(), "hello");
    assert_eq!(handle.pending_input(), 4);
}

#[test]
fn test_read_line_ends_at_half_delay_timeout() {
    let (session, root, handle) = session(20, 4);
    session.no_echo();
    session.half_delay(1).unwrap();
    handle.push_str("part");
    assert_eq!(root.read_line().unwrap(), "part");
    assert_eq!(root.read_line().unwrap(), "");
    assert_eq!(root.read_char().unwrap(), ERR);
}

#[test]
fn test_special_keys_off_returns_raw_bytes() {
    let (session, root, handle) = session(10, 4);
    session.no_echo();
    handle.push_input(b"\x1b[D");
    assert_eq!(root.read_char().unwrap(), 0x1b);

    root.set_special_keys(true).unwrap();
    handle.push_input(b"\x1b[D");
    // The rest of the first sequence is still queued
    assert_eq!(root.read_char().unwrap(), b'[' as i32);
    assert_eq!(root.read_char().unwrap(), b'D' as i32);
    assert_eq!(root.read_char().unwrap(), KEY_LEFT);
}

// ============================================================================
// Mouse
// ============================================================================

#[test]
fn test_mouse_event_through_read() {
    let (session, root, handle) = session(40, 10);
    session.no_echo();
    root.set_special_keys(true).unwrap();
    let mut mouse = session.init_mouse(BUTTON1_PRESSED).unwrap();
    assert_eq!(handle.mouse_tracking(), MouseTracking::Buttons);

    handle.push_input(b"\x1b[<0;5;3M");
    assert_eq!(root.read_char().unwrap(), KEY_MOUSE);
    let event = mouse.poll().event().unwrap();
    assert_eq!(event.state, BUTTON1_PRESSED);
    assert_eq!((event.x, event.y), (4, 2));
    assert_eq!((mouse.x(), mouse.y()), (4, 2));
}

#[test]
fn test_failed_poll_keeps_last_event() {
    let (session, root, handle) = session(40, 10);
    session.no_echo();
    root.set_special_keys(true).unwrap();
    let mut mouse = session.init_mouse(BUTTON1_PRESSED).unwrap();
    assert_eq!(mouse.poll(), MousePoll::NoEvent);
    assert_eq!(mouse.state(), 0);

    handle.push_input(b"\x1b[<16;10;7M");
    assert_eq!(root.read_char().unwrap(), KEY_MOUSE);
    assert!(mouse.poll().is_event());
    let seen = mouse.last_event();
    assert_eq!(seen.state, BUTTON1_PRESSED | BUTTON_CTRL);

    assert_eq!(mouse.poll(), MousePoll::NoEvent);
    assert_eq!(mouse.last_event(), seen);
    assert_eq!((mouse.x(), mouse.y()), (9, 6));
}

#[test]
fn test_click_reported_on_release() {
    let (session, root, handle) = session(40, 10);
    session.no_echo();
    root.set_special_keys(true).unwrap();
    let mut mouse = session.init_mouse(BUTTON1_CLICKED).unwrap();

    handle.push_input(b"\x1b[<0;2;2M\x1b[<0;2;2m");
    // The press is filtered out, so one read yields the click
    assert_eq!(root.read_char().unwrap(), KEY_MOUSE);
    assert_eq!(mouse.poll().event().unwrap().state, BUTTON1_CLICKED);
    assert_eq!(handle.pending_input(), 0);
}

#[test]
fn test_filtered_report_then_key() {
    let (session, root, handle) = session(40, 10);
    session.no_echo();
    root.set_special_keys(true).unwrap();
    let mut mouse = session.init_mouse(BUTTON2_PRESSED).unwrap();

    handle.push_input(b"\x1b[<0;1;1Mx");
    assert_eq!(root.read_char().unwrap(), b'x' as i32);
    assert_eq!(mouse.poll(), MousePoll::NoEvent);
}

#[test]
fn test_mask_add_and_remove() {
    let (session, _root, handle) = session(40, 10);
    let mut mouse = session.init_mouse(BUTTON1_PRESSED).unwrap();

    let mask = mouse.add_events(BUTTON1_RELEASED | REPORT_MOUSE_POSITION).unwrap();
    assert_eq!(mask, BUTTON1_PRESSED | BUTTON1_RELEASED | REPORT_MOUSE_POSITION);
    assert_eq!(handle.mouse_tracking(), MouseTracking::AllMotion);

    let mask = mouse.remove_events(REPORT_MOUSE_POSITION | BUTTON1_PRESSED).unwrap();
    assert_eq!(mask, BUTTON1_RELEASED);
    assert!(mouse.mask().contains(BUTTON1_RELEASED));
    assert!(!mouse.mask().contains(BUTTON1_PRESSED));
    assert_eq!(handle.mouse_tracking(), MouseTracking::Buttons);

    mouse.remove_events(ALL_MOUSE_EVENTS).unwrap();
    assert_eq!(mouse.mask().bits(), 0);
    assert_eq!(handle.mouse_tracking(), MouseTracking::Off);
}

#[test]
fn test_mask_limited_by_device() {
    let mut config = SessionConfig::default().headless_size(40, 10);
    config.headless.mouse_events = BUTTON1_PRESSED | BUTTON1_RELEASED;
    let (session, _root, _) = Session::headless(config).unwrap();

    let mut mouse = session.init_mouse(ALL_MOUSE_EVENTS).unwrap();
    assert_eq!(mouse.mask().bits(), BUTTON1_PRESSED | BUTTON1_RELEASED);
    assert_eq!(
        mouse.add_events(BUTTON2_PRESSED).unwrap(),
        BUTTON1_PRESSED | BUTTON1_RELEASED
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_drives_headless_session() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"input_mode": "Raw", "echo": false, "keypad": true, "headless": {{"cols": 16, "rows": 5}}}}"#
    )
    .unwrap();

    let config = SessionConfig::load(file.path()).unwrap();
    let (session, root, handle) = Session::headless(config).unwrap();
    assert_eq!(session.screen_size(), (16, 5));
    assert_eq!(session.input_mode(), InputMode::Raw);
    assert_eq!(handle.input_mode(), InputMode::Raw);
    assert!(!session.echo_enabled());
    assert!(root.special_keys().unwrap());
}

#[test]
fn test_bad_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(matches!(
        SessionConfig::load(file.path()),
        Err(CursesError::Config(_))
    ));
}
