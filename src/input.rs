use anyhow::Result;
use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use crate::app::{App, Overlay};
use crate::forms::{LoginField, ProfileField};
use crate::models::{FocusArea, MembershipKind, Notice, Tab};
use crate::ui::viewer_layout;
use crate::utils::calculate_max_scroll;

/// Applies one key press. Returns `Ok(false)` when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Ok(false);
    }

    if app.store.login_prompt_open() {
        handle_login_key(app, key.code, ctrl);
        return Ok(true);
    }

    match &app.overlay {
        Overlay::Viewer(_) => handle_viewer_key(app, key.code)?,
        Overlay::Menu(_) => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
            KeyCode::Up | KeyCode::Char('k') => app.move_menu(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_menu(true),
            KeyCode::Enter => app.activate_menu(),
            _ => {}
        },
        Overlay::Profile => handle_profile_key(app, key.code, ctrl),
        Overlay::DeleteAccount(_) => handle_delete_key(app, key.code),
        Overlay::None if app.focus == FocusArea::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => app.focus = FocusArea::GistList,
            KeyCode::Backspace => app.pop_query_char(),
            KeyCode::Char(c) if !ctrl => app.push_query_char(c),
            _ => {}
        },
        Overlay::None => return Ok(handle_list_key(app, key.code)),
    }
    Ok(true)
}

fn handle_list_key(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => return false,
        KeyCode::Char('/') => app.focus = FocusArea::Search,
        KeyCode::Esc => {
            app.set_query(String::new());
            app.notice = None;
        }
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(tab) = c.to_digit(10).and_then(|d| Tab::from_index(d as usize - 1)) {
                app.set_tab(tab);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('s') => app.toggle_selected(MembershipKind::Starred),
        KeyCode::Char('f') => app.toggle_selected(MembershipKind::Forked),
        KeyCode::Char('v') => app.toggle_selected(MembershipKind::Favorited),
        KeyCode::Char('m') => app.open_menu(),
        KeyCode::Char('n') => app.new_gist(),
        KeyCode::Char('p') => app.open_profile(),
        KeyCode::Char('L') => app.login_or_logout(),
        _ => {}
    }
    true
}

fn handle_login_key(app: &mut App, key: KeyCode, ctrl: bool) {
    let on_buttons = app.login_form.focus == LoginField::Buttons;
    let pending = app.login_form.pending;
    match key {
        KeyCode::Esc => app.close_login(),
        KeyCode::Char('g') if ctrl || on_buttons => app.provider_login(),
        KeyCode::Tab | KeyCode::Down => app.login_form.focus = app.login_form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.login_form.focus = app.login_form.focus.next().next(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Backspace if !pending => app.login_form.backspace(),
        KeyCode::Char(c) if !ctrl && !pending => app.login_form.push_char(c),
        _ => {}
    }
}

fn handle_viewer_key(app: &mut App, key: KeyCode) -> Result<()> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_file(),
        KeyCode::Right | KeyCode::Char('l') => app.next_file(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(d) = c.to_digit(10) {
                app.select_file(d as usize - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => scroll(app, -1)?,
        KeyCode::Down | KeyCode::Char('j') => scroll(app, 1)?,
        KeyCode::PageUp => scroll(app, -10)?,
        KeyCode::PageDown => scroll(app, 10)?,
        KeyCode::Char('c') => copy_active_file(app),
        _ => {}
    }
    Ok(())
}

fn scroll(app: &mut App, delta: i32) -> Result<()> {
    let max = viewer_max_scroll(app)?;
    app.scroll_viewer(delta, max);
    Ok(())
}

fn viewer_max_scroll(app: &App) -> Result<u16> {
    let Some(file) = app.active_file() else {
        return Ok(0);
    };
    let (cols, rows) = crossterm::terminal::size()?;
    let [_, _, content] = viewer_layout(Rect::new(0, 0, cols, rows), app.viewer_files().len() > 1);
    Ok(calculate_max_scroll(&file.content, content.height))
}

fn copy_active_file(app: &mut App) {
    let Some(content) = app.active_file().map(|file| file.content.clone()) else {
        return;
    };
    let copied = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(content));
    app.notice = Some(match copied {
        Ok(()) => Notice::success("Copied to clipboard!", ""),
        Err(err) => {
            tracing::warn!(%err, "Clipboard unavailable");
            Notice::error("Could not copy to clipboard", err.to_string())
        }
    });
}

fn handle_profile_key(app: &mut App, key: KeyCode, ctrl: bool) {
    let field = app.profile.selected_field();
    match key {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Char('s') if ctrl => app.save_profile(),
        KeyCode::Up => app.profile.select_prev(),
        KeyCode::Down | KeyCode::Tab => app.profile.select_next(),
        KeyCode::Enter if field == ProfileField::DeleteAccount => app.open_delete_account(),
        KeyCode::Enter | KeyCode::Char(' ') if field.is_toggle() => app.profile.toggle_selected(),
        KeyCode::Backspace => app.profile.backspace(),
        KeyCode::Char(c) if !ctrl => app.profile.push_char(c),
        _ => {}
    }
}

fn handle_delete_key(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => app.confirm_delete_account(),
        KeyCode::Backspace | KeyCode::Char(_) => {
            if let Overlay::DeleteAccount(dialog) = &mut app.overlay {
                if dialog.pending {
                    return;
                }
                match key {
                    KeyCode::Char(c) => dialog.confirmation.push(c),
                    _ => {
                        dialog.confirmation.pop();
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::catalog::Catalog;
    use crate::network::Completion;
    use crate::store::GistStore;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> App {
        App::new(GistStore::new(Catalog::builtin().unwrap()))
    }

    fn resolve(app: &mut App) {
        for request in app.take_requests() {
            app.apply_completion(Completion { request, result: Ok(()) });
        }
    }

    #[test]
    fn search_input_filters_live() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "grid");
        assert_eq!(app.store.query(), "grid");
        assert_eq!(app.visible_gists().len(), 1);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.store.query(), "gri");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, FocusArea::GistList);
    }

    #[test]
    fn star_while_logged_out_then_login_then_star() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert!(app.store.login_prompt_open());

        type_text(&mut app, "octo");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "password");
        press(&mut app, KeyCode::Enter);
        resolve(&mut app);
        assert!(!app.store.login_prompt_open());

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('2'));
        let ids: Vec<&str> = app.visible_gists().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn ctrl_g_logs_in_with_provider() {
        let mut app = app();
        press(&mut app, KeyCode::Char('L'));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL)).unwrap();
        resolve(&mut app);
        assert_eq!(app.store.session().unwrap().username, "github-user");

        press(&mut app, KeyCode::Char('L'));
        assert!(!app.store.is_logged_in());
        assert!(!app.store.login_prompt_open());
    }

    #[test]
    fn tab_keys_cycle_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.store.tab(), Tab::Starred);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.store.tab(), Tab::Favorites);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.store.tab(), Tab::Forked);
    }

    #[test]
    fn viewer_keys_switch_files() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.active_file().unwrap().name, "useMediaQuery.ts");
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.active_file().unwrap().name, "useLocalStorage.ts");
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[test]
    fn delete_account_flow_by_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        for _ in 0..ProfileField::ALL.len() {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.overlay, Overlay::DeleteAccount(_)));

        type_text(&mut app, "delete my account!");
        press(&mut app, KeyCode::Enter);
        assert!(app.outbox.is_empty());

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.outbox.len(), 1);
        resolve(&mut app);
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[test]
    fn profile_space_flips_toggle_and_types_in_text() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char(' '));
        type_text(&mut app, "Jr");
        assert_eq!(app.profile.name, "John Doe Jr");

        let index = ProfileField::ALL.iter().position(|f| *f == ProfileField::ShowEmail).unwrap();
        app.profile.selected = index;
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.profile.show_email);
    }

    #[test]
    fn enter_on_gist_without_content_keeps_list_keys_live() {
        let mut record = Catalog::builtin().unwrap().records()[0].clone();
        record.id = "77".into();
        let catalog = Catalog::new(vec![record], HashMap::new());
        let mut app = App::new(GistStore::new(catalog));
        app.provider_login();
        resolve(&mut app);

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.overlay, Overlay::None));
        press(&mut app, KeyCode::Char('s'));
        assert!(app.store.is_member(MembershipKind::Starred, "77"));
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn q_quits_from_list() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
    }
}
