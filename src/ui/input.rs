//! Keyboard and mouse input handling.
//!
//! Translates terminal events into `App` state transitions. While the
//! notification overlay is open it captures all input; otherwise keys are
//! routed to the focused form field.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};

use crate::app::{App, AppState, FormFocus};

/// Handle a key event. Returns `true` when the application should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    // The notification overlay is modal: it swallows everything and
    // closes on Enter or Esc.
    if app.notice.is_open() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.notice.close();
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Tab | KeyCode::Down => {
            app.focus = app.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.focus = app.focus.prev();
        }
        KeyCode::F(2) => {
            app.show_social_login();
        }
        KeyCode::F(3) => {
            app.show_register();
        }
        KeyCode::Enter => match app.focus {
            // Enter in an input field submits exactly like the button
            // once the form is submittable; before that it advances focus.
            FormFocus::Identifier | FormFocus::Password => {
                if app.can_submit() {
                    app.submit();
                } else {
                    app.focus = app.focus.next();
                }
            }
            FormFocus::Remember => {
                app.toggle_remember();
            }
            FormFocus::Button => {
                app.submit();
            }
        },
        KeyCode::Backspace => match app.focus {
            FormFocus::Identifier => app.pop_identifier_char(),
            FormFocus::Password => app.pop_password_char(),
            _ => {}
        },
        KeyCode::Char(c) => match app.focus {
            FormFocus::Identifier => app.push_identifier_char(c),
            FormFocus::Password => app.push_password_char(c),
            FormFocus::Remember => {
                if c == ' ' {
                    app.toggle_remember();
                }
            }
            FormFocus::Button => {}
        },
        _ => {}
    }

    Ok(false)
}

/// Handle a mouse event. A click anywhere dismisses the notification
/// overlay, matching the Enter/Esc paths.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.notice.is_open() {
        if let MouseEventKind::Down(_) = mouse.kind {
            app.notice.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyModifiers, MouseButton};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click() -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn test_app(dir: &std::path::Path) -> App {
        let config = Config {
            cache_dir: Some(dir.to_path_buf()),
            config_path: Some(dir.join("config.json")),
            ..Config::default()
        };
        App::with_config(config).expect("Failed to build test app")
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[tokio::test]
    async fn tab_cycles_focus_forward_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        assert_eq!(app.focus, FormFocus::Identifier);

        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus, FormFocus::Password);
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.focus, FormFocus::Remember);

        handle_key(&mut app, key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.focus, FormFocus::Password);
        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.focus, FormFocus::Identifier);
        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.focus, FormFocus::Button);
    }

    #[tokio::test]
    async fn typing_routes_to_focused_field_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        type_str(&mut app, "bob42");
        assert_eq!(app.identifier, "bob42");
        assert!(app.validation.is_valid);

        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.identifier, "bob4");

        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_str(&mut app, "hunter2");
        assert_eq!(app.password, "hunter2");
        assert_eq!(app.identifier, "bob4");
    }

    #[tokio::test]
    async fn enter_advances_focus_while_form_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        type_str(&mut app, "bob42");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.focus, FormFocus::Password);
        assert!(!app.submitting);
    }

    #[tokio::test]
    async fn enter_in_password_field_submits_like_the_button() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        type_str(&mut app, "bob42");
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_str(&mut app, "hunter2");
        assert!(app.can_submit());

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.submitting);
    }

    #[tokio::test]
    async fn disabled_button_ignores_enter() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        app.focus = FormFocus::Button;
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(!app.submitting);
    }

    #[tokio::test]
    async fn space_toggles_remember_when_focused() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        app.focus = FormFocus::Remember;
        assert!(!app.remember);
        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert!(app.remember);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(!app.remember);
    }

    #[tokio::test]
    async fn notice_closes_via_enter_esc_or_click() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        for close in [KeyCode::Enter, KeyCode::Esc] {
            app.notice.open("hello");
            // Modal: other keys are swallowed without effect
            handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
            assert!(app.notice.is_open());
            assert!(app.identifier.is_empty());

            let quit = handle_key(&mut app, key(close)).unwrap();
            assert!(!quit);
            assert!(!app.notice.is_open());
            assert_eq!(app.state, AppState::Form);
        }

        app.notice.open("hello");
        handle_mouse(&mut app, click());
        assert!(!app.notice.is_open());
    }

    #[tokio::test]
    async fn esc_quits_when_no_overlay_is_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        let quit = handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(quit);
        assert_eq!(app.state, AppState::Quitting);
    }
}
