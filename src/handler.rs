use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, FocusPane, InputMode, Section};
use crate::clipboard;
use crate::config::Config;
use crate::notice::Notice;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick();
            app.poll_generation().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global quit, works in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('t') => {
            app.toggle_theme();
            let _ = Config::save_theme(app.theme.as_str());
        }

        KeyCode::Tab => cycle_focus(app),

        KeyCode::Esc => app.focus = FocusPane::Sidebar,

        // Half-page scroll (must come before plain j/k so CONTROL matches first)
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.section == Section::Dashboard && app.focus == FocusPane::Output {
                app.scroll_output_half_page_down();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.section == Section::Dashboard && app.focus == FocusPane::Output {
                app.scroll_output_half_page_up();
            }
        }

        KeyCode::Char('j') | KeyCode::Down => match (app.focus, app.section) {
            (FocusPane::Sidebar, _) => app.sidebar_down(),
            (FocusPane::Output, Section::Dashboard) => app.scroll_output_down(),
            (_, Section::History) => app.history_nav_down(),
            _ => {}
        },
        KeyCode::Char('k') | KeyCode::Up => match (app.focus, app.section) {
            (FocusPane::Sidebar, _) => app.sidebar_up(),
            (FocusPane::Output, Section::Dashboard) => app.scroll_output_up(),
            (_, Section::History) => app.history_nav_up(),
            _ => {}
        },

        KeyCode::Char('g') => {
            if app.focus == FocusPane::Output && app.section == Section::Dashboard {
                app.output_scroll = 0;
            }
        }
        KeyCode::Char('G') => {
            if app.focus == FocusPane::Output && app.section == Section::Dashboard {
                app.output_scroll = app.output_lines.saturating_sub(app.output_height);
            }
        }

        // Enter moves focus into the section content
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if app.focus == FocusPane::Sidebar {
                match app.section {
                    Section::Dashboard => {
                        app.focus = FocusPane::Input;
                        app.input_mode = InputMode::Editing;
                        app.input_cursor = app.description_input.chars().count();
                    }
                    Section::History => app.focus = FocusPane::Output,
                    Section::Settings => {}
                }
            } else if app.focus == FocusPane::Input {
                app.input_mode = InputMode::Editing;
                app.input_cursor = app.description_input.chars().count();
            }
        }

        // Jump straight into the description input
        KeyCode::Char('i') | KeyCode::Char('e') => {
            if app.section == Section::Dashboard {
                app.focus = FocusPane::Input;
                app.input_mode = InputMode::Editing;
                app.input_cursor = app.description_input.chars().count();
            }
        }

        // Copy generated artifacts
        KeyCode::Char('c') => {
            if app.section == Section::Dashboard && !app.busy {
                clipboard::copy(&app.generated.structured_text);
                app.notify(Notice::success(
                    "Code copied",
                    "Structured Text copied to clipboard.",
                ));
            }
        }
        KeyCode::Char('C') => {
            if app.section == Section::Dashboard && !app.busy {
                clipboard::copy(&app.generated.ladder_summary);
                app.notify(Notice::success(
                    "Code copied",
                    "Ladder Logic copied to clipboard.",
                ));
            }
        }

        // Simulation is not implemented; the key only acknowledges the intent
        KeyCode::Char('s') => {
            if app.section == Section::Dashboard && !app.busy {
                app.notify(Notice::info(
                    "Simulation started",
                    "Running simulation with generated code...",
                ));
            }
        }

        // Switch generation backend
        KeyCode::Char('b') => {
            if app.section == Section::Settings {
                let before = app.backend;
                app.cycle_backend();
                if app.backend != before {
                    let _ = Config::save_backend(app.backend.as_str());
                }
            }
        }

        _ => {}
    }
}

fn cycle_focus(app: &mut App) {
    app.focus = match app.section {
        Section::Dashboard => match app.focus {
            FocusPane::Sidebar => FocusPane::Input,
            FocusPane::Input => FocusPane::Output,
            FocusPane::Output => FocusPane::Sidebar,
        },
        Section::History => match app.focus {
            FocusPane::Sidebar => {
                if app.history_state.selected().is_none() && !app.history.is_empty() {
                    app.history_state.select(Some(0));
                }
                FocusPane::Output
            }
            _ => FocusPane::Sidebar,
        },
        Section::Settings => FocusPane::Sidebar,
    };
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    // The input surface is the disabled control while a request is in
    // flight: nothing edits or re-dispatches until settlement
    if app.busy {
        if key.code == KeyCode::Esc {
            app.input_mode = InputMode::Normal;
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit();
            if app.busy {
                // Dispatched; drop back to normal mode while it runs
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.description_input, app.input_cursor);
                app.description_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.description_input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.description_input, app.input_cursor);
                app.description_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.description_input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.description_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.description_input, app.input_cursor);
            app.description_input.insert(byte_pos, c);
            app.input_cursor += 1;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => match app.section {
            Section::Dashboard => {
                app.scroll_output_down();
                app.scroll_output_down();
                app.scroll_output_down();
            }
            Section::History => app.history_nav_down(),
            Section::Settings => {}
        },
        MouseEventKind::ScrollUp => match app.section {
            Section::Dashboard => {
                app.scroll_output_up();
                app.scroll_output_up();
                app.scroll_output_up();
            }
            Section::History => app.history_nav_up(),
            Section::Settings => {}
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;
    use crate::notice::NoticeLevel;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn editing_app() -> App {
        let mut app = App::new(Config::new());
        app.mock = MockGenerator::with_delay(Duration::from_secs(60));
        app.section = Section::Dashboard;
        app.focus = FocusPane::Input;
        app.input_mode = InputMode::Editing;
        app
    }

    #[tokio::test]
    async fn enter_dispatches_and_leaves_editing() {
        let mut app = editing_app();
        app.description_input = "start motor on button press".to_string();

        handle_key(&mut app, key(KeyCode::Enter));

        assert!(app.busy);
        assert!(app.generation_task.is_some());
        assert_eq!(app.input_mode, InputMode::Normal);
        app.generation_task.take().unwrap().abort();
    }

    #[tokio::test]
    async fn enter_while_busy_does_not_redispatch() {
        let mut app = editing_app();
        app.description_input = "start motor".to_string();
        handle_key(&mut app, key(KeyCode::Enter));
        let first = app.generation_task.take();
        assert!(first.is_some());

        // Still busy; a second Enter must not spawn another task
        app.input_mode = InputMode::Editing;
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.generation_task.is_none());

        first.unwrap().abort();
    }

    #[tokio::test]
    async fn empty_submit_stays_in_editing_with_notice() {
        let mut app = editing_app();
        app.description_input = "  ".to_string();

        handle_key(&mut app, key(KeyCode::Enter));

        assert!(!app.busy);
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(
            app.notice.clone().expect("validation notice").level,
            NoticeLevel::Error
        );
    }

    #[test]
    fn editing_handles_utf8_cursor_moves() {
        let mut app = editing_app();
        for c in "héllo".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.description_input, "héllo");
        assert_eq!(app.input_cursor, 5);

        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.description_input, "hélo");
        assert_eq!(app.input_cursor, 2);
    }

    #[test]
    fn sidebar_navigation_switches_sections() {
        let mut app = App::new(Config::new());
        assert_eq!(app.section, Section::Dashboard);

        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.section, Section::History);
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.section, Section::Settings);
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.section, Section::Settings);

        handle_key(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.section, Section::History);
    }
}
