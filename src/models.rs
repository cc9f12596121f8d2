use std::fmt;
use std::str::FromStr;

/// The list tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    All,
    Starred,
    Forked,
    Favorites,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::All, Tab::Starred, Tab::Forked, Tab::Favorites];

    pub fn as_index(self) -> usize {
        match self {
            Tab::All => 0,
            Tab::Starred => 1,
            Tab::Forked => 2,
            Tab::Favorites => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.as_index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.as_index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::All => "All Gists",
            Tab::Starred => "Starred",
            Tab::Forked => "Forked",
            Tab::Favorites => "Favorites",
        }
    }

    /// The membership set this tab filters by, if any.
    pub fn membership(self) -> Option<MembershipKind> {
        match self {
            Tab::All => None,
            Tab::Starred => Some(MembershipKind::Starred),
            Tab::Forked => Some(MembershipKind::Forked),
            Tab::Favorites => Some(MembershipKind::Favorited),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Tab::All),
            "starred" => Ok(Tab::Starred),
            "forked" => Ok(Tab::Forked),
            "favorites" | "favourites" => Ok(Tab::Favorites),
            other => Err(format!("unknown tab '{other}' (expected all, starred, forked or favorites)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipKind {
    Starred,
    Forked,
    Favorited,
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MembershipKind::Starred => "starred",
            MembershipKind::Forked => "forked",
            MembershipKind::Favorited => "favorited",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FocusArea {
    Search,
    GistList,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Short-lived status message shown in the notice bar.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), detail: detail.into() }
    }

    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, title: title.into(), detail: detail.into() }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, title: title.into(), detail: detail.into() }
    }
}
