use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Tabs, Wrap},
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    symbols,
};
use crate::app::{App, MenuAction, MenuState, Overlay, ViewerState};
use crate::catalog::{GistRecord, Owner};
use crate::forms::{DeleteAccountDialog, LoginField, ProfileField, DELETE_CONFIRMATION};
use crate::models::{FocusArea, MembershipKind, Tab};
use crate::theme::Theme;
use crate::utils::{format_date, initials, match_ranges, strip_scheme};

const JOINED_DATE: &str = "January 2020";
const PROFILE_STATS: [(&str, u32); 4] = [("Gists", 42), ("Stars", 128), ("Followers", 56), ("Following", 23)];

/// Renders the whole screen: header, tabs, the gist list and any popup.
pub fn render(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // tabs
            Constraint::Min(3),    // list
            Constraint::Length(1), // notice
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app, theme);
    render_tabs(f, chunks[1], app, theme);
    let gists = app.visible_gists();
    render_gist_list(f, chunks[2], app, theme, &gists);
    render_notice(f, chunks[3], app, theme);
    render_footer(f, chunks[4], app, theme);

    match &app.overlay {
        Overlay::None => {}
        Overlay::Viewer(viewer) => render_viewer(f, app, viewer, theme),
        Overlay::Menu(menu) => render_menu(f, app, menu, theme),
        Overlay::Profile => render_profile(f, app, theme),
        Overlay::DeleteAccount(dialog) => {
            render_profile(f, app, theme);
            render_delete_account(f, dialog, theme);
        }
    }
    // The login prompt can be raised from any view and always sits on top.
    if app.store.login_prompt_open() {
        render_login(f, app, theme);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(10), Constraint::Length(26)])
        .split(area);

    let title = Paragraph::new(Line::from(vec![Span::styled(" Gist Tracker", theme.popup_title)]))
        .block(Block::default().borders(Borders::ALL).border_style(theme.border(false)));
    f.render_widget(title, columns[0]);

    let searching = app.focus == FocusArea::Search;
    let query = app.store.query();
    let search_line = if query.is_empty() && !searching {
        Line::from(Span::styled("Search gists...", theme.disabled))
    } else {
        let cursor = if searching { "_" } else { "" };
        Line::from(vec![Span::styled(query.to_string(), Style::default().fg(theme.text)), Span::raw(cursor)])
    };
    let search = Paragraph::new(search_line)
        .block(Block::default().title("Search [/]").borders(Borders::ALL).border_style(theme.border(searching)));
    f.render_widget(search, columns[1]);

    let session = match app.store.session() {
        Some(identity) => Line::from(vec![
            Span::styled(format!("@{}", identity.username), theme.gist_owner),
            Span::styled("  L: logout", theme.footer),
        ]),
        None => Line::from(Span::styled("Sign In [L]", Style::default().fg(theme.text_highlight))),
    };
    let session = Paragraph::new(session)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(theme.border(false)));
    f.render_widget(session, columns[2]);
}

fn tab_title(app: &App, tab: Tab, theme: &Theme) -> Line<'static> {
    let count = match tab {
        Tab::Starred => app.store.count(MembershipKind::Starred),
        Tab::Favorites => app.store.count(MembershipKind::Favorited),
        Tab::All | Tab::Forked => 0,
    };
    let mut spans = vec![Span::raw(format!("{} [{}]", tab.title(), tab.as_index() + 1))];
    if count > 0 {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {count} "), theme.badge));
    }
    Line::from(spans)
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|tab| tab_title(app, *tab, theme)).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).border_style(theme.border(false)))
        .style(Style::default().fg(theme.text))
        .highlight_style(Style::default().fg(theme.text_highlight).bold().underlined())
        .select(app.store.tab().as_index())
        .divider(symbols::DOT)
        .padding(" ", " ");
    f.render_widget(tabs, area);
}

/// Splits `text` into spans, highlighting every occurrence of `query`.
fn highlighted(text: &str, query: &str, base: Style, highlight: Style) -> Vec<Span<'static>> {
    let mut spans = vec![];
    let mut last = 0;
    for range in match_ranges(text, query) {
        if range.start > last {
            spans.push(Span::styled(text[last..range.start].to_owned(), base));
        }
        spans.push(Span::styled(text[range.clone()].to_owned(), highlight));
        last = range.end;
    }
    if last < text.len() {
        spans.push(Span::styled(text[last..].to_owned(), base));
    }
    spans
}

fn empty_message(tab: Tab, logged_in: bool) -> &'static str {
    match (tab, logged_in) {
        (Tab::All, _) => "No gists found matching your search.",
        (Tab::Starred, true) => "No starred gists yet.",
        (Tab::Starred, false) => "Sign in to star gists",
        (Tab::Forked, true) => "No forked gists yet.",
        (Tab::Forked, false) => "Sign in to fork gists",
        (Tab::Favorites, true) => "No favorite gists yet. Add gists to your favorites for quick access.",
        (Tab::Favorites, false) => "Sign in to add favorites",
    }
}

fn gist_item(app: &App, gist: &GistRecord, selected: bool, theme: &Theme) -> ListItem<'static> {
    let query = app.store.query();
    let marker = |kind: MembershipKind, on: &'static str, style: Style| {
        if app.store.is_member(kind, &gist.id) {
            Span::styled(on, style)
        } else {
            Span::styled(" ", Style::default())
        }
    };

    let mut title = vec![Span::raw(if selected { "→ " } else { "  " })];
    title.extend(highlighted(&gist.name, query, theme.gist_name, theme.match_highlight));
    title.push(Span::raw("  "));
    title.push(marker(MembershipKind::Starred, "★", theme.starred));
    title.push(marker(MembershipKind::Forked, "⑂", theme.forked));
    title.push(marker(MembershipKind::Favorited, "♥", theme.favorite));

    let mut description = vec![Span::raw("  ")];
    description.extend(highlighted(
        &gist.description,
        query,
        Style::default().fg(theme.text_secondary),
        theme.match_highlight,
    ));

    let meta = Line::from(vec![
        Span::raw("  "),
        Span::styled(gist.language.clone(), theme.gist_language),
        Span::raw(format!("  ★ {}  ⑂ {}  ", gist.stars, gist.forks)),
        Span::styled(format!("Updated {}", format_date(&gist.updated_at)), theme.gist_date),
        Span::raw("  "),
        Span::styled(gist.owner.login.clone(), theme.gist_owner),
    ]);

    let item = ListItem::new(vec![Line::from(title), Line::from(description), meta]);
    if selected {
        item.style(Style::default().bg(theme.selection_bg))
    } else {
        item
    }
}

/// One list routine for every tab; only the empty state differs.
fn render_gist_list(f: &mut Frame, area: Rect, app: &App, theme: &Theme, gists: &[&GistRecord]) {
    let tab = app.store.tab();
    let focused = app.focus == FocusArea::GistList && matches!(app.overlay, Overlay::None);
    let block = Block::default()
        .title(format!("{} ({})", tab.title(), gists.len()))
        .borders(Borders::ALL)
        .border_style(theme.border(focused));

    if gists.is_empty() {
        let placeholder = Paragraph::new(empty_message(tab, app.store.is_logged_in()))
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.blurred_border));
        f.render_widget(placeholder, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let items: Vec<ListItem> = gists
        .iter()
        .enumerate()
        .map(|(i, gist)| gist_item(app, gist, i == app.selected, theme))
        .collect();
    let mut state = ListState::default();
    state.select(Some(app.selected.min(gists.len() - 1)));
    f.render_stateful_widget(List::new(items).block(block), layout[0], &mut state);

    let mut scrollbar = ScrollbarState::default().position(app.selected).content_length(gists.len());
    f.render_stateful_widget(
        Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight),
        layout[1],
        &mut scrollbar,
    );
}

fn render_notice(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let Some(notice) = &app.notice else {
        return;
    };
    let mut spans = vec![Span::styled(format!(" {}", notice.title), theme.notice(notice.level))];
    if !notice.detail.is_empty() {
        spans.push(Span::styled(format!("  {}", notice.detail), Style::default().fg(theme.text_secondary)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let help = if app.store.login_prompt_open() {
        "Tab Next field | Enter Sign in | Ctrl+G GitHub login | Esc Close"
    } else {
        match &app.overlay {
            Overlay::Viewer(_) => "←/→ File | ↑/↓ Scroll | c Copy | Esc Close",
            Overlay::Menu(_) => "↑/↓ Select | Enter Run | Esc Close",
            Overlay::Profile => "↑/↓ Field | Type to edit | Space Toggle | Enter on Delete Account | Ctrl+S Save | Esc Close",
            Overlay::DeleteAccount(_) => "Type the phrase | Enter Delete | Esc Cancel",
            Overlay::None if app.focus == FocusArea::Search => "Type to search | Enter/Esc Done",
            Overlay::None => {
                "/ Search | Tab/1-4 Tabs | ↑/↓ j/k Move | Enter View | s Star | f Fork | v Favorite | m Menu | n New | p Profile | L Login | q Quit"
            }
        }
    };
    let footer = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL))
        .style(theme.footer);
    f.render_widget(footer, area);
}

/// Header, file tabs and content areas of the viewer popup.
pub fn viewer_layout(screen: Rect, multiple_files: bool) -> [Rect; 3] {
    let popup = centered_rect(80, 80, screen);
    let inner = Rect {
        x: popup.x + 1,
        y: popup.y + 1,
        width: popup.width.saturating_sub(2),
        height: popup.height.saturating_sub(2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(if multiple_files { 3 } else { 0 }),
            Constraint::Min(1),
        ])
        .split(inner);
    [chunks[0], chunks[1], chunks[2]]
}

fn render_viewer(f: &mut Frame, app: &App, viewer: &ViewerState, theme: &Theme) {
    let Some(gist) = app.store.catalog().get(&viewer.gist_id) else {
        return;
    };
    let files = app.viewer_files();
    let Some(file) = files.get(viewer.active_file) else {
        return;
    };

    let popup_area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled(gist.name.clone(), theme.popup_title))
        .borders(Borders::ALL)
        .style(theme.popup_border);
    f.render_widget(block, popup_area);

    let multiple = files.len() > 1;
    let [header_area, tabs_area, content_area] = viewer_layout(f.area(), multiple);
    let header = Paragraph::new(vec![
        Line::from(Span::styled(gist.description.clone(), theme.popup_text)),
        Line::from(vec![
            Span::styled(format!(" {} ", avatar_label(&gist.owner)), theme.badge),
            Span::raw(" "),
            Span::styled(format!("[{}]", gist.language), theme.gist_language),
            Span::styled(format!(" Created by {}", gist.owner.login), Style::default().fg(theme.text_secondary)),
        ]),
    ]);
    f.render_widget(header, header_area);

    if multiple {
        let titles: Vec<Line> = files.iter().map(|file| Line::from(file.name.clone())).collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).border_style(theme.border(false)))
            .style(theme.popup_text)
            .highlight_style(Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD))
            .select(viewer.active_file)
            .divider(symbols::line::VERTICAL);
        f.render_widget(tabs, tabs_area);
    }

    let code = Paragraph::new(file.content.clone())
        .block(
            Block::default()
                .title(format!("{} ({})", file.name, file.language))
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        )
        .style(theme.popup_text)
        .scroll((viewer.scroll, 0));
    f.render_widget(code, content_area);
}

/// Remote avatars show as their address; local placeholders fall back
/// to the owner's initials.
fn avatar_label(owner: &Owner) -> String {
    let address = strip_scheme(&owner.avatar);
    if address.len() < owner.avatar.len() {
        address.to_string()
    } else {
        initials(&owner.login)
    }
}

fn render_menu(f: &mut Frame, app: &App, menu: &MenuState, theme: &Theme) {
    let popup_area = centered_rect(30, 30, f.area());
    f.render_widget(Clear, popup_area);
    let items: Vec<ListItem> = MenuAction::ALL
        .iter()
        .map(|action| ListItem::new(app.menu_label(*action, &menu.gist_id)))
        .collect();
    let mut state = ListState::default();
    state.select(Some(menu.selected));
    let list = List::new(items)
        .block(Block::default().title("Actions").borders(Borders::ALL).style(theme.popup_border))
        .highlight_style(Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");
    f.render_stateful_widget(list, popup_area, &mut state);
}

fn field_line(label: &str, value: String, focused: bool, theme: &Theme) -> Line<'static> {
    let style = if focused {
        Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.text_secondary)),
        Span::styled(format!("{value}{cursor}"), style),
    ])
}

fn render_login(f: &mut Frame, app: &App, theme: &Theme) {
    let form = &app.login_form;
    let popup_area = centered_rect(50, 50, f.area());
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled("Enter your credentials to access your account", theme.popup_text)),
        Line::from(""),
        field_line("Username", form.username.clone(), form.focus == LoginField::Username, theme),
    ];
    if let Some(err) = form.errors.username {
        lines.push(Line::from(Span::styled(format!("          {err}"), theme.field_error)));
    }
    lines.push(field_line(
        "Password",
        "*".repeat(form.password.chars().count()),
        form.focus == LoginField::Password,
        theme,
    ));
    if let Some(err) = form.errors.password {
        lines.push(Line::from(Span::styled(format!("          {err}"), theme.field_error)));
    }
    lines.push(Line::from(""));
    if form.pending {
        lines.push(Line::from(Span::styled("Signing in...", Style::default().fg(theme.text_highlight))));
    } else {
        let buttons = if form.focus == LoginField::Buttons {
            Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled("[ Sign In (Enter) ]", buttons),
            Span::raw("   "),
            Span::styled("[ Continue with GitHub (Ctrl+G) ]", buttons),
        ]));
    }

    let para = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled("Sign in to Gist Tracker", theme.popup_title))
                .borders(Borders::ALL)
                .style(theme.popup_border),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(para, popup_area);
}

fn render_profile(f: &mut Frame, app: &App, theme: &Theme) {
    let profile = &app.profile;
    let popup_area = centered_rect(80, 85, f.area());
    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled("Profile", theme.popup_title))
        .borders(Borders::ALL)
        .style(theme.popup_border);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(inner);

    let mut summary = vec![
        Line::from(Span::styled(format!("({})", profile.initials()), theme.badge)),
        Line::from(Span::styled(profile.name.clone(), theme.gist_name)),
        Line::from(Span::styled(format!("@{}", profile.username), theme.gist_owner)),
        Line::from(""),
        Line::from(Span::styled(profile.bio.clone(), theme.popup_text)),
        Line::from(""),
    ];
    if !profile.location.is_empty() {
        summary.push(Line::from(format!("Location: {}", profile.location)));
    }
    if !profile.website.is_empty() {
        summary.push(Line::from(format!("Web: {}", strip_scheme(&profile.website))));
    }
    if !profile.github.is_empty() {
        summary.push(Line::from(format!("GitHub: {}", profile.github)));
    }
    if !profile.twitter.is_empty() {
        summary.push(Line::from(format!("Twitter: {}", profile.twitter)));
    }
    summary.push(Line::from(format!("Joined {JOINED_DATE}")));
    summary.push(Line::from(""));
    for pair in PROFILE_STATS.chunks(2) {
        let mut spans = vec![];
        for (label, value) in pair {
            spans.push(Span::styled(format!("{value} "), theme.gist_name));
            spans.push(Span::styled(format!("{label:<11}"), Style::default().fg(theme.text_secondary)));
        }
        summary.push(Line::from(spans));
    }
    let summary = Paragraph::new(summary)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::RIGHT).border_style(theme.border(false)));
    f.render_widget(summary, columns[0]);

    let selected = profile.selected_field();
    let mut items: Vec<ListItem> = ProfileField::ALL
        .iter()
        .map(|field| {
            let focused = *field == selected;
            if let Some(value) = profile.text(*field) {
                let cursor = if focused { "_" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<18}", field.label()), Style::default().fg(theme.text_secondary)),
                    Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text)),
                ]))
            } else if field.is_toggle() {
                let on = profile.flag(*field).unwrap_or(false);
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<18}", field.label()), Style::default().fg(theme.text_secondary)),
                    Span::styled(if on { "[x]" } else { "[ ]" }, Style::default().fg(theme.text_highlight)),
                ]))
            } else {
                ListItem::new(Line::from(Span::styled(format!("[ {} ]", field.label()), theme.danger)))
            }
        })
        .collect();
    items.push(ListItem::new(""));
    let save = if profile.saving {
        ListItem::new(Span::styled("Saving...", theme.disabled))
    } else {
        ListItem::new(Span::styled("Save Changes (Ctrl+S)", theme.notice_success))
    };
    items.push(save);

    let mut state = ListState::default();
    state.select(Some(profile.selected));
    let list = List::new(items)
        .highlight_style(Style::default().bg(theme.selection_bg))
        .highlight_symbol("→ ");
    f.render_stateful_widget(list, columns[1], &mut state);
}

fn render_delete_account(f: &mut Frame, dialog: &DeleteAccountDialog, theme: &Theme) {
    let popup_area = centered_rect(50, 40, f.area());
    f.render_widget(Clear, popup_area);
    let button = if dialog.pending {
        Span::styled("Deleting...", theme.disabled)
    } else if dialog.can_delete() {
        Span::styled("[ Delete Account ]", theme.danger)
    } else {
        Span::styled("[ Delete Account ]", theme.disabled)
    };
    let lines = vec![
        Line::from(Span::styled(
            "This action cannot be undone. This will permanently delete your account and remove all your data from our servers.",
            theme.popup_text,
        )),
        Line::from(""),
        Line::from(format!("Type \"{DELETE_CONFIRMATION}\" to confirm:")),
        Line::from(Span::styled(format!("{}_", dialog.confirmation), Style::default().fg(theme.text_highlight))),
        Line::from(""),
        Line::from(button),
    ];
    let para = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled("Delete Account", theme.notice_error))
                .borders(Borders::ALL)
                .style(theme.popup_border),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(para, popup_area);
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100-percent_y)/2), Constraint::Percentage(percent_y), Constraint::Percentage((100-percent_y)/2)]).split(r)[1];
    Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100-percent_x)/2), Constraint::Percentage(percent_x), Constraint::Percentage((100-percent_x)/2)]).split(vertical)[1]
}
