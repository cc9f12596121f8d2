use std::collections::HashSet;
use crate::catalog::{Catalog, GistRecord};
use crate::models::{Credentials, MembershipKind, Notice, SessionIdentity, Tab};
use crate::projection;

pub const DEFAULT_AVATAR: &str = "/placeholder.svg?height=40&width=40";
pub const PROVIDER_USERNAME: &str = "github-user";

/// Starred, forked and favorited gist ids for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSets {
    starred: HashSet<String>,
    forked: HashSet<String>,
    favorited: HashSet<String>,
}

impl MembershipSets {
    fn set(&self, kind: MembershipKind) -> &HashSet<String> {
        match kind {
            MembershipKind::Starred => &self.starred,
            MembershipKind::Forked => &self.forked,
            MembershipKind::Favorited => &self.favorited,
        }
    }

    fn set_mut(&mut self, kind: MembershipKind) -> &mut HashSet<String> {
        match kind {
            MembershipKind::Starred => &mut self.starred,
            MembershipKind::Forked => &mut self.forked,
            MembershipKind::Favorited => &mut self.favorited,
        }
    }

    pub fn contains(&self, kind: MembershipKind, id: &str) -> bool {
        self.set(kind).contains(id)
    }

    pub fn len(&self, kind: MembershipKind) -> usize {
        self.set(kind).len()
    }

    pub fn insert(&mut self, kind: MembershipKind, id: &str) -> bool {
        self.set_mut(kind).insert(id.to_string())
    }

    pub fn remove(&mut self, kind: MembershipKind, id: &str) -> bool {
        self.set_mut(kind).remove(id)
    }

    pub fn clear(&mut self) {
        self.starred.clear();
        self.forked.clear();
        self.favorited.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    LoginRequired,
    UnknownGist,
    Added(MembershipKind),
    Removed(MembershipKind),
    AlreadyForked,
}

impl ToggleOutcome {
    pub fn notice(self) -> Option<Notice> {
        let notice = match self {
            ToggleOutcome::LoginRequired | ToggleOutcome::UnknownGist => return None,
            ToggleOutcome::Added(MembershipKind::Starred) => {
                Notice::success("Starred", "Gist has been added to your starred list.")
            }
            ToggleOutcome::Removed(MembershipKind::Starred) => {
                Notice::info("Unstarred", "Gist has been removed from your starred list.")
            }
            ToggleOutcome::Added(MembershipKind::Forked) => {
                Notice::success("Forked", "Gist has been forked to your account.")
            }
            ToggleOutcome::AlreadyForked | ToggleOutcome::Removed(MembershipKind::Forked) => {
                Notice::info("Already Forked", "You've already forked this gist.")
            }
            ToggleOutcome::Added(MembershipKind::Favorited) => {
                Notice::success("Added to favorites", "Gist has been added to your favorites.")
            }
            ToggleOutcome::Removed(MembershipKind::Favorited) => {
                Notice::info("Removed from favorites", "Gist has been removed from your favorites.")
            }
        };
        Some(notice)
    }
}

/// Gist catalog plus all session state derived from user interaction.
/// Owned by the root view and mutated only through these methods.
#[derive(Debug, Clone)]
pub struct GistStore {
    catalog: Catalog,
    memberships: MembershipSets,
    query: String,
    tab: Tab,
    session: Option<SessionIdentity>,
    login_prompt: bool,
    keep_memberships_on_logout: bool,
}

impl GistStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            memberships: MembershipSets::default(),
            query: String::new(),
            tab: Tab::All,
            session: None,
            login_prompt: false,
            keep_memberships_on_logout: false,
        }
    }

    pub fn with_memberships_kept_on_logout(mut self, keep: bool) -> Self {
        self.keep_memberships_on_logout = keep;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[cfg(test)]
    pub fn memberships(&self) -> &MembershipSets {
        &self.memberships
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn session(&self) -> Option<&SessionIdentity> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn login_prompt_open(&self) -> bool {
        self.login_prompt
    }

    pub fn request_login(&mut self) {
        self.login_prompt = true;
    }

    pub fn dismiss_login_prompt(&mut self) {
        self.login_prompt = false;
    }

    pub fn is_member(&self, kind: MembershipKind, id: &str) -> bool {
        self.memberships.contains(kind, id)
    }

    pub fn count(&self, kind: MembershipKind) -> usize {
        self.memberships.len(kind)
    }

    /// Flips `id` in the named set. Forking is one-directional: a second
    /// fork of the same gist reports `AlreadyForked` and changes nothing.
    pub fn toggle_membership(&mut self, kind: MembershipKind, id: &str) -> ToggleOutcome {
        if self.session.is_none() {
            tracing::debug!(%kind, id, "Toggle rejected, no session");
            self.login_prompt = true;
            return ToggleOutcome::LoginRequired;
        }
        if !self.catalog.contains(id) {
            tracing::warn!(%kind, id, "Toggle for unknown gist ignored");
            return ToggleOutcome::UnknownGist;
        }

        let outcome = if self.memberships.contains(kind, id) {
            if kind == MembershipKind::Forked {
                ToggleOutcome::AlreadyForked
            } else {
                self.memberships.remove(kind, id);
                ToggleOutcome::Removed(kind)
            }
        } else {
            self.memberships.insert(kind, id);
            ToggleOutcome::Added(kind)
        };
        tracing::info!(%kind, id, ?outcome, "Membership toggled");
        outcome
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    pub fn login(&mut self, credentials: &Credentials) -> Notice {
        self.establish(credentials.username.clone());
        Notice::success(
            format!("Welcome back, {}!", credentials.username),
            "You have successfully logged in.",
        )
    }

    pub fn login_with_provider(&mut self) -> Notice {
        self.establish(PROVIDER_USERNAME.to_string());
        Notice::success("Logged in with GitHub", "You have successfully logged in with GitHub.")
    }

    fn establish(&mut self, username: String) {
        let identity = SessionIdentity { username, avatar: DEFAULT_AVATAR.to_string() };
        tracing::info!(username = %identity.username, avatar = %identity.avatar, "Session established");
        self.session = Some(identity);
        self.login_prompt = false;
    }

    /// Clears the identity. Memberships belong to the identity unless the
    /// store was built to keep them for the whole session.
    pub fn logout(&mut self) -> Notice {
        if let Some(identity) = self.session.take() {
            tracing::info!(username = %identity.username, "Session cleared");
        }
        if !self.keep_memberships_on_logout {
            self.memberships.clear();
        }
        Notice::info("Logged out", "You have been logged out successfully.")
    }

    /// Gist creation is gated on a session like the membership toggles.
    pub fn new_gist(&mut self) -> Option<Notice> {
        if self.session.is_none() {
            self.login_prompt = true;
            return None;
        }
        Some(Notice::info("Create Gist", "This feature is coming soon!"))
    }

    pub fn visible_gists(&self) -> Vec<&GistRecord> {
        projection::project(self.catalog.records(), &self.memberships, &self.query, self.tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in_store() -> GistStore {
        let mut store = GistStore::new(Catalog::builtin().unwrap());
        store.login_with_provider();
        store
    }

    fn ids(store: &GistStore) -> Vec<String> {
        store.visible_gists().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn star_and_favorite_toggles_are_involutions() {
        let mut store = logged_in_store();
        for kind in [MembershipKind::Starred, MembershipKind::Favorited] {
            let before = store.memberships().clone();
            assert_eq!(store.toggle_membership(kind, "2"), ToggleOutcome::Added(kind));
            assert!(store.is_member(kind, "2"));
            assert_eq!(store.toggle_membership(kind, "2"), ToggleOutcome::Removed(kind));
            assert_eq!(store.memberships(), &before);
        }
    }

    #[test]
    fn fork_is_idempotent_after_first_insertion() {
        let mut store = logged_in_store();
        assert_eq!(
            store.toggle_membership(MembershipKind::Forked, "3"),
            ToggleOutcome::Added(MembershipKind::Forked)
        );
        let after_first = store.memberships().clone();
        assert_eq!(store.toggle_membership(MembershipKind::Forked, "3"), ToggleOutcome::AlreadyForked);
        assert_eq!(store.memberships(), &after_first);
        assert_eq!(store.count(MembershipKind::Forked), 1);
    }

    #[test]
    fn toggles_while_logged_out_raise_login_prompt_without_mutation() {
        let mut store = GistStore::new(Catalog::builtin().unwrap());
        let kinds = [MembershipKind::Starred, MembershipKind::Forked, MembershipKind::Favorited];
        for kind in kinds {
            store.dismiss_login_prompt();
            assert_eq!(store.toggle_membership(kind, "1"), ToggleOutcome::LoginRequired);
            assert!(store.login_prompt_open());
            assert_eq!(store.memberships(), &MembershipSets::default());
        }
    }

    #[test]
    fn unknown_ids_never_enter_a_set() {
        let mut store = logged_in_store();
        assert_eq!(store.toggle_membership(MembershipKind::Starred, "99"), ToggleOutcome::UnknownGist);
        assert_eq!(store.count(MembershipKind::Starred), 0);
    }

    #[test]
    fn starring_then_switching_to_starred_tab_shows_only_that_gist() {
        let mut store = logged_in_store();
        store.toggle_membership(MembershipKind::Starred, "1");
        store.set_active_tab(Tab::Starred);
        assert_eq!(ids(&store), ["1"]);
    }

    #[test]
    fn hooks_query_finds_react_hooks_collection() {
        let mut store = GistStore::new(Catalog::builtin().unwrap());
        store.set_search_query("Hooks");
        assert_eq!(ids(&store), ["1"]);
        assert_eq!(store.visible_gists()[0].name, "React Hooks Collection");
    }

    #[test]
    fn login_closes_prompt_and_sets_identity() {
        let mut store = GistStore::new(Catalog::builtin().unwrap());
        store.request_login();
        let notice = store.login(&Credentials { username: "octo".into(), password: "secret1".into() });
        assert!(!store.login_prompt_open());
        assert_eq!(store.session().unwrap().username, "octo");
        assert_eq!(notice.title, "Welcome back, octo!");
    }

    #[test]
    fn provider_login_uses_fixed_identity() {
        let store = logged_in_store();
        assert_eq!(store.session().unwrap().username, PROVIDER_USERNAME);
    }

    #[test]
    fn logout_clears_memberships_by_default() {
        let mut store = logged_in_store();
        store.toggle_membership(MembershipKind::Starred, "1");
        store.logout();
        assert!(!store.is_logged_in());
        assert_eq!(store.count(MembershipKind::Starred), 0);
    }

    #[test]
    fn logout_can_keep_memberships_for_the_session() {
        let mut store = GistStore::new(Catalog::builtin().unwrap()).with_memberships_kept_on_logout(true);
        store.login_with_provider();
        store.toggle_membership(MembershipKind::Favorited, "4");
        store.logout();
        assert!(store.is_member(MembershipKind::Favorited, "4"));
    }

    #[test]
    fn new_gist_requires_session() {
        let mut store = GistStore::new(Catalog::builtin().unwrap());
        assert!(store.new_gist().is_none());
        assert!(store.login_prompt_open());
        store.login_with_provider();
        assert_eq!(store.new_gist().unwrap().title, "Create Gist");
    }

    #[test]
    fn outcome_notices_match_actions() {
        assert_eq!(ToggleOutcome::Added(MembershipKind::Starred).notice().unwrap().title, "Starred");
        assert_eq!(ToggleOutcome::AlreadyForked.notice().unwrap().title, "Already Forked");
        assert!(ToggleOutcome::LoginRequired.notice().is_none());
    }
}
