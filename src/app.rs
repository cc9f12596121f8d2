use crate::catalog::{GistFile, GistRecord};
use crate::forms::{DeleteAccountDialog, LoginForm, ProfileForm};
use crate::models::{FocusArea, MembershipKind, Notice, Tab};
use crate::network::{Completion, Request};
use crate::store::GistStore;

/// State of the gist viewer popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    pub gist_id: String,
    pub active_file: usize,
    pub scroll: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    View,
    Star,
    Fork,
    Download,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [MenuAction::View, MenuAction::Star, MenuAction::Fork, MenuAction::Download];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub gist_id: String,
    pub selected: usize,
}

#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    Viewer(ViewerState),
    Menu(MenuState),
    Profile,
    DeleteAccount(DeleteAccountDialog),
}

/// Root view state. Owns the store and the per-view local state; effects
/// that need the runtime are queued in `outbox` for the event loop.
pub struct App {
    pub store: GistStore,
    pub focus: FocusArea,
    pub selected: usize,
    pub overlay: Overlay,
    pub login_form: LoginForm,
    pub profile: ProfileForm,
    pub notice: Option<Notice>,
    pub outbox: Vec<Request>,
}

impl App {
    pub fn new(store: GistStore) -> Self {
        Self {
            store,
            focus: FocusArea::GistList,
            selected: 0,
            overlay: Overlay::None,
            login_form: LoginForm::default(),
            profile: ProfileForm::default(),
            notice: None,
            outbox: Vec::new(),
        }
    }

    pub fn visible_gists(&self) -> Vec<&GistRecord> {
        self.store.visible_gists()
    }

    pub fn selected_gist(&self) -> Option<&GistRecord> {
        self.visible_gists().get(self.selected).copied()
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_gist().map(|g| g.id.clone())
    }

    /// Keeps the selection inside the projected list after it changed.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_gists().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        let len = self.visible_gists().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn set_query(&mut self, query: String) {
        self.store.set_search_query(query);
        self.clamp_selection();
    }

    pub fn push_query_char(&mut self, c: char) {
        let mut query = self.store.query().to_string();
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_query_char(&mut self) {
        let mut query = self.store.query().to_string();
        query.pop();
        self.set_query(query);
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.store.set_active_tab(tab);
        self.selected = 0;
    }

    pub fn next_tab(&mut self) {
        self.store.next_tab();
        self.selected = 0;
    }

    pub fn prev_tab(&mut self) {
        self.store.prev_tab();
        self.selected = 0;
    }

    pub fn toggle(&mut self, kind: MembershipKind, id: &str) {
        let outcome = self.store.toggle_membership(kind, id);
        if let Some(notice) = outcome.notice() {
            self.notice = Some(notice);
        }
        // Unstarring on the starred tab removes the row under the cursor.
        self.clamp_selection();
    }

    pub fn toggle_selected(&mut self, kind: MembershipKind) {
        if let Some(id) = self.selected_id() {
            self.toggle(kind, &id);
        }
    }

    pub fn new_gist(&mut self) {
        if let Some(notice) = self.store.new_gist() {
            self.notice = Some(notice);
        }
    }

    /// Opens the viewer on `id`. A gist without content keeps the list in
    /// front and only posts a notice.
    pub fn open_viewer(&mut self, id: &str) {
        if self.store.catalog().files(id).is_none() {
            tracing::debug!(id, "No content for gist");
            self.notice = Some(Notice::info("No content", "This gist has no files to show."));
            return;
        }
        self.overlay = Overlay::Viewer(ViewerState { gist_id: id.to_string(), active_file: 0, scroll: 0 });
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.open_viewer(&id);
        }
    }

    /// Files of the gist shown in the viewer. Empty when it has no content.
    pub fn viewer_files(&self) -> &[GistFile] {
        match &self.overlay {
            Overlay::Viewer(viewer) => self.store.catalog().files(&viewer.gist_id).unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn active_file(&self) -> Option<&GistFile> {
        match &self.overlay {
            Overlay::Viewer(viewer) => self.viewer_files().get(viewer.active_file),
            _ => None,
        }
    }

    pub fn select_file(&mut self, index: usize) {
        let count = self.viewer_files().len();
        if let Overlay::Viewer(viewer) = &mut self.overlay {
            if index < count && viewer.active_file != index {
                viewer.active_file = index;
                viewer.scroll = 0;
            }
        }
    }

    pub fn next_file(&mut self) {
        if let Overlay::Viewer(viewer) = &self.overlay {
            let next = viewer.active_file + 1;
            self.select_file(next);
        }
    }

    pub fn prev_file(&mut self) {
        if let Overlay::Viewer(viewer) = &self.overlay {
            if let Some(prev) = viewer.active_file.checked_sub(1) {
                self.select_file(prev);
            }
        }
    }

    pub fn scroll_viewer(&mut self, delta: i32, max: u16) {
        if let Overlay::Viewer(viewer) = &mut self.overlay {
            let next = (viewer.scroll as i32 + delta).clamp(0, max as i32);
            viewer.scroll = next as u16;
        }
    }

    pub fn open_menu(&mut self) {
        if let Some(id) = self.selected_id() {
            self.overlay = Overlay::Menu(MenuState { gist_id: id, selected: 0 });
        }
    }

    pub fn move_menu(&mut self, down: bool) {
        if let Overlay::Menu(menu) = &mut self.overlay {
            menu.selected = if down {
                (menu.selected + 1).min(MenuAction::ALL.len() - 1)
            } else {
                menu.selected.saturating_sub(1)
            };
        }
    }

    pub fn activate_menu(&mut self) {
        let Overlay::Menu(menu) = &self.overlay else {
            return;
        };
        let (id, action) = (menu.gist_id.clone(), MenuAction::ALL[menu.selected]);
        self.overlay = Overlay::None;
        match action {
            MenuAction::View => self.open_viewer(&id),
            MenuAction::Star => self.toggle(MembershipKind::Starred, &id),
            MenuAction::Fork => self.toggle(MembershipKind::Forked, &id),
            MenuAction::Download => {
                tracing::debug!(%id, "Download requested");
                self.notice = Some(Notice::info("Download", "Downloads are not available yet."));
            }
        }
    }

    /// Menu label for an action, reflecting the current membership state.
    pub fn menu_label(&self, action: MenuAction, id: &str) -> &'static str {
        match action {
            MenuAction::View => "View Gist",
            MenuAction::Star if self.store.is_member(MembershipKind::Starred, id) => "Unstar Gist",
            MenuAction::Star => "Star Gist",
            MenuAction::Fork if self.store.is_member(MembershipKind::Forked, id) => "Already Forked",
            MenuAction::Fork => "Fork Gist",
            MenuAction::Download => "Download",
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = match std::mem::take(&mut self.overlay) {
            // A pending deletion cannot be dismissed.
            Overlay::DeleteAccount(dialog) if dialog.pending => Overlay::DeleteAccount(dialog),
            Overlay::DeleteAccount(_) => Overlay::Profile,
            _ => Overlay::None,
        };
    }

    pub fn login_or_logout(&mut self) {
        if self.store.is_logged_in() {
            self.notice = Some(self.store.logout());
            self.clamp_selection();
        } else {
            self.store.request_login();
        }
    }

    pub fn close_login(&mut self) {
        self.store.dismiss_login_prompt();
        if !self.login_form.pending {
            self.login_form = LoginForm::default();
        }
    }

    pub fn submit_login(&mut self) {
        if let Some(credentials) = self.login_form.submit() {
            self.outbox.push(Request::Login(credentials));
        }
    }

    pub fn provider_login(&mut self) {
        if self.login_form.pending {
            return;
        }
        self.login_form.pending = true;
        self.outbox.push(Request::ProviderLogin);
    }

    pub fn open_profile(&mut self) {
        self.overlay = Overlay::Profile;
    }

    pub fn save_profile(&mut self) {
        if self.profile.begin_save() {
            self.outbox.push(Request::SaveProfile(self.profile.clone()));
        }
    }

    pub fn open_delete_account(&mut self) {
        self.overlay = Overlay::DeleteAccount(DeleteAccountDialog::default());
    }

    pub fn confirm_delete_account(&mut self) {
        if let Overlay::DeleteAccount(dialog) = &mut self.overlay {
            match dialog.confirm() {
                Ok(()) => self.outbox.push(Request::DeleteAccount),
                Err(err) => self.notice = Some(Notice::error(err.to_string(), "")),
            }
        }
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    /// Applies a resolved backend request.
    pub fn apply_completion(&mut self, completion: Completion) {
        let Completion { request, result } = completion;
        if let Err(err) = result {
            tracing::warn!(request = request.name(), %err, "Request failed");
            match request {
                Request::Login(_) | Request::ProviderLogin => self.login_form.pending = false,
                Request::SaveProfile(_) => self.profile.saving = false,
                Request::DeleteAccount => {
                    if let Overlay::DeleteAccount(dialog) = &mut self.overlay {
                        dialog.pending = false;
                    }
                }
            }
            self.notice = Some(Notice::error("Something went wrong", err.to_string()));
            return;
        }

        match request {
            Request::Login(credentials) => {
                self.notice = Some(self.store.login(&credentials));
                self.login_form = LoginForm::default();
            }
            Request::ProviderLogin => {
                self.notice = Some(self.store.login_with_provider());
                self.login_form = LoginForm::default();
            }
            Request::SaveProfile(_) => {
                self.profile.saving = false;
                self.notice = Some(Notice::success("Profile updated successfully!", ""));
            }
            Request::DeleteAccount => {
                self.store.logout();
                self.store.set_search_query("");
                self.store.set_active_tab(Tab::All);
                self.profile = ProfileForm::default();
                self.overlay = Overlay::None;
                self.focus = FocusArea::GistList;
                self.selected = 0;
                self.notice = Some(Notice::success("Account deleted successfully", ""));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn app() -> App {
        App::new(GistStore::new(Catalog::builtin().unwrap()))
    }

    fn logged_in_app() -> App {
        let mut app = app();
        app.provider_login();
        let request = app.take_requests().pop().unwrap();
        app.apply_completion(Completion { request, result: Ok(()) });
        app
    }

    fn complete_all(app: &mut App) {
        for request in app.take_requests() {
            app.apply_completion(Completion { request, result: Ok(()) });
        }
    }

    #[test]
    fn toggling_while_logged_out_opens_login_prompt() {
        let mut app = app();
        app.toggle_selected(MembershipKind::Starred);
        assert!(app.store.login_prompt_open());
        assert_eq!(app.store.count(MembershipKind::Starred), 0);
        assert!(app.notice.is_none());
    }

    #[test]
    fn login_goes_through_pending_state() {
        let mut app = app();
        app.store.request_login();
        app.login_form.username = "octo".into();
        app.login_form.password = "hunter22".into();
        app.submit_login();
        assert!(app.login_form.pending);
        assert!(!app.store.is_logged_in());

        app.submit_login();
        assert_eq!(app.outbox.len(), 1);

        complete_all(&mut app);
        assert_eq!(app.store.session().unwrap().username, "octo");
        assert!(!app.store.login_prompt_open());
        assert!(!app.login_form.pending);
        assert_eq!(app.notice.as_ref().unwrap().title, "Welcome back, octo!");
    }

    #[test]
    fn invalid_login_stays_inline() {
        let mut app = app();
        app.store.request_login();
        app.login_form.username = "octo".into();
        app.login_form.password = "123".into();
        app.submit_login();
        assert!(app.outbox.is_empty());
        assert!(app.login_form.errors.password.is_some());
        assert!(app.store.login_prompt_open());
    }

    #[test]
    fn failed_login_clears_pending_and_reports() {
        let mut app = app();
        app.provider_login();
        let request = app.take_requests().pop().unwrap();
        app.apply_completion(Completion { request, result: Err(anyhow::anyhow!("offline")) });
        assert!(!app.login_form.pending);
        assert!(!app.store.is_logged_in());
        assert_eq!(app.notice.as_ref().unwrap().detail, "offline");
    }

    #[test]
    fn unstarring_on_starred_tab_keeps_selection_in_range() {
        let mut app = logged_in_app();
        app.toggle(MembershipKind::Starred, "1");
        app.toggle(MembershipKind::Starred, "2");
        app.set_tab(Tab::Starred);
        app.select_next();
        assert_eq!(app.selected_gist().unwrap().id, "2");
        app.toggle_selected(MembershipKind::Starred);
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_gist().unwrap().id, "1");
    }

    #[test]
    fn tab_cycling_wraps_and_resets_selection() {
        let mut app = app();
        app.select_next();
        app.prev_tab();
        assert_eq!(app.store.tab(), Tab::Favorites);
        assert_eq!(app.selected, 0);
        app.next_tab();
        app.next_tab();
        assert_eq!(app.store.tab(), Tab::Starred);
    }

    #[test]
    fn viewer_defaults_to_first_file_and_switches_by_index() {
        let mut app = app();
        app.open_viewer("1");
        assert_eq!(app.active_file().unwrap().name, "useLocalStorage.ts");
        app.next_file();
        assert_eq!(app.active_file().unwrap().name, "useMediaQuery.ts");
        app.next_file();
        assert_eq!(app.active_file().unwrap().name, "useMediaQuery.ts");
        app.select_file(0);
        assert_eq!(app.active_file().unwrap().name, "useLocalStorage.ts");
        app.prev_file();
        assert_eq!(app.active_file().unwrap().name, "useLocalStorage.ts");
    }

    #[test]
    fn viewer_without_content_stays_closed() {
        let mut app = app();
        app.open_viewer("missing");
        assert!(matches!(app.overlay, Overlay::None));
        assert!(app.viewer_files().is_empty());
        assert!(app.active_file().is_none());
        assert_eq!(app.notice.as_ref().unwrap().title, "No content");
    }

    #[test]
    fn menu_actions_follow_membership_state() {
        let mut app = logged_in_app();
        app.open_menu();
        app.move_menu(true);
        assert_eq!(app.menu_label(MenuAction::Star, "1"), "Star Gist");
        app.activate_menu();
        assert!(app.store.is_member(MembershipKind::Starred, "1"));
        assert_eq!(app.menu_label(MenuAction::Star, "1"), "Unstar Gist");
        assert!(matches!(app.overlay, Overlay::None));

        app.toggle(MembershipKind::Forked, "1");
        assert_eq!(app.menu_label(MenuAction::Fork, "1"), "Already Forked");
    }

    #[test]
    fn delete_account_returns_to_root() {
        let mut app = logged_in_app();
        app.set_query("css".into());
        app.set_tab(Tab::Starred);
        app.open_profile();
        app.open_delete_account();

        app.confirm_delete_account();
        assert!(app.outbox.is_empty());
        assert!(app.notice.as_ref().unwrap().level == crate::models::NoticeLevel::Error);

        if let Overlay::DeleteAccount(dialog) = &mut app.overlay {
            dialog.confirmation = "delete my account".into();
        }
        app.confirm_delete_account();
        app.close_overlay();
        assert!(matches!(app.overlay, Overlay::DeleteAccount(_)));

        complete_all(&mut app);
        assert!(matches!(app.overlay, Overlay::None));
        assert!(!app.store.is_logged_in());
        assert_eq!(app.store.tab(), Tab::All);
        assert_eq!(app.store.query(), "");
    }

    #[test]
    fn profile_save_is_pending_until_completion() {
        let mut app = app();
        app.open_profile();
        app.save_profile();
        app.save_profile();
        assert!(app.profile.saving);
        assert_eq!(app.outbox.len(), 1);
        complete_all(&mut app);
        assert!(!app.profile.saving);
        assert_eq!(app.notice.as_ref().unwrap().title, "Profile updated successfully!");
    }
}
