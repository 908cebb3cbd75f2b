use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::state::{Focus, TuiState};
use super::theme::Theme;
use crate::models::Item;
use crate::navigator::ViewMode;
use crate::store::LoadStatus;

/// Main render function that dispatches to the appropriate screen renderer.
pub fn render(f: &mut Frame, state: &TuiState) {
    let theme = Theme::for_mode(state.app.display_mode());
    f.render_widget(Block::default().style(theme.base()), f.area());

    match state.app.view_state().mode() {
        ViewMode::List => render_item_list(f, state, &theme),
        ViewMode::Detail => render_item_detail(f, state, &theme),
    }
}

/// Render the title bar with the display mode indicator.
fn render_header(f: &mut Frame, area: Rect, state: &TuiState, theme: &Theme) {
    let mode = if state.app.display_mode().is_dark() {
        "Dark"
    } else {
        "Light"
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Product Explorer", theme.title()),
        Span::styled(format!("   [d] {mode}"), theme.hint()),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).style(theme.base()));
    f.render_widget(header, area);
}

/// Render the list screen: search, filters and the filtered table.
fn render_item_list(f: &mut Frame, state: &TuiState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(f.area());

    render_header(f, chunks[0], state, theme);

    // Search input
    let searching = state.focus == Focus::Search;
    let term = state.app.criteria().search_term.as_str();
    let input_block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(if searching {
            theme.base().fg(theme.primary)
        } else {
            theme.base()
        });
    let input = if term.is_empty() && !searching {
        Paragraph::new("Search products...").style(theme.hint())
    } else {
        Paragraph::new(term).style(theme.base())
    };
    f.render_widget(input.block(input_block), chunks[1]);

    if searching {
        let cursor_x = search_cursor_x(chunks[1], term, state.search_cursor_position);
        f.set_cursor_position((cursor_x, chunks[1].y.saturating_add(1)));
    }

    // Category selector and favorites toggle
    let filters = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(chunks[2]);

    let category = Paragraph::new(format!(
        "< {} >",
        capitalize_words(state.app.criteria().category.label())
    ))
    .style(theme.base())
    .block(Block::default().borders(Borders::ALL).title(" Category "));
    f.render_widget(category, filters[0]);

    let favorites_only = state.app.criteria().show_favorites_only;
    let (label, style) = if favorites_only {
        ("♥ Show All", theme.base().fg(theme.secondary).add_modifier(Modifier::BOLD))
    } else {
        ("♡ Favorites", theme.base().fg(theme.primary))
    };
    let favorites = Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(favorites, filters[1]);

    // Body
    match state.app.status() {
        LoadStatus::Idle | LoadStatus::Loading => {
            render_message(f, chunks[3], theme, "Loading products...", theme.primary)
        }
        LoadStatus::Failed => {
            let message = state.app.last_error().unwrap_or("An error occurred");
            let body = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Error Loading Products",
                    theme.base().fg(theme.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message, theme.base().fg(theme.error))),
                Line::from(""),
                Line::from(Span::styled("Press r to retry", theme.hint())),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, chunks[3]);
        }
        LoadStatus::Ready if state.app.visible_len() == 0 => {
            render_message(f, chunks[3], theme, "No products found", theme.muted)
        }
        LoadStatus::Ready => render_item_table(f, chunks[3], state, theme),
    }

    let help = Paragraph::new(
        "/: Search | Tab: Category | f: Favorites | Space: ♥ | Enter: Open | r: Reload | d: Theme | q: Quit",
    )
    .style(theme.hint())
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);

    render_status_bar(f, chunks[5], state, theme);
}

fn render_item_table(f: &mut Frame, area: Rect, state: &TuiState, theme: &Theme) {
    let items = state.app.visible();
    let visible_row_limit = calculate_visible_rows(area.height).max(1);
    let visible_start = state
        .selected_row
        .saturating_sub(visible_row_limit.saturating_sub(1));

    let rows: Vec<Row> = items
        .iter()
        .enumerate()
        .skip(visible_start)
        .take(visible_row_limit)
        .map(|(i, item)| {
            let style = if i == state.selected_row {
                theme.highlight()
            } else {
                theme.base()
            };
            let heart = if state.app.is_favorite(item.id) { "♥" } else { " " };

            Row::new(vec![
                Cell::from(heart),
                Cell::from(truncate(&item.title, 48)),
                Cell::from(capitalize_words(&item.category)),
                Cell::from(item.formatted_price()),
                Cell::from(item.rating_summary()),
            ])
            .style(style)
        })
        .collect();

    let count = items.len();
    let title = format!(
        " Showing {count} product{} ",
        if count == 1 { "" } else { "s" }
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(24),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["", "Title", "Category", "Price", "Rating"])
            .style(theme.base().add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .block(Block::default().borders(Borders::ALL).title(title))
    .style(theme.base());
    f.render_widget(table, area);
}

/// Render the single-item screen.
fn render_item_detail(f: &mut Frame, state: &TuiState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(f.area());

    render_header(f, chunks[0], state, theme);

    match (state.app.selected_item(), state.app.detail_status()) {
        (Some(item), status) => render_item_card(f, chunks[1], state, theme, item, status),
        (None, LoadStatus::Failed) => {
            let message = state.app.detail_error().unwrap_or("Product not found");
            render_message(f, chunks[1], theme, message, theme.error);
        }
        (None, _) => render_message(f, chunks[1], theme, "Loading product...", theme.primary),
    }

    let help = Paragraph::new("Space: ♥ | Esc: Back to products | d: Theme | q: Quit")
        .style(theme.hint())
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);

    render_status_bar(f, chunks[3], state, theme);
}

fn render_item_card(
    f: &mut Frame,
    area: Rect,
    state: &TuiState,
    theme: &Theme,
    item: &Item,
    status: LoadStatus,
) {
    let favorite = state.app.is_favorite(item.id);
    let mut lines = vec![
        Line::from(Span::styled(item.title.clone(), theme.title())),
        Line::from(Span::styled(
            capitalize_words(&item.category),
            theme.base().fg(theme.secondary),
        )),
        Line::from(""),
        Line::from(Span::styled(
            item.formatted_price(),
            theme.base().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} {} / 5 ({} reviews)",
            stars(item.rating.rate),
            item.rating.rate,
            item.rating.count
        )),
        Line::from(if favorite {
            Span::styled("♥ Favorite", theme.base().fg(theme.secondary))
        } else {
            Span::styled("♡ Not a favorite", theme.hint())
        }),
    ];
    // The catalog copy stays on screen while the fresh one loads or fails.
    match status {
        LoadStatus::Loading => lines.push(Line::from(Span::styled("Refreshing...", theme.hint()))),
        LoadStatus::Failed => lines.push(Line::from(Span::styled(
            format!(
                "Could not refresh: {}",
                state.app.detail_error().unwrap_or("An error occurred")
            ),
            theme.base().fg(theme.error).add_modifier(Modifier::BOLD),
        ))),
        LoadStatus::Idle | LoadStatus::Ready => {}
    }
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("Description", theme.base().add_modifier(Modifier::BOLD))),
        Line::from(item.description.clone()),
    ]);

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(theme.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Product #{} ", item.id)),
        );
    f.render_widget(card, area);
}

fn render_message(f: &mut Frame, area: Rect, theme: &Theme, message: &str, color: Color) {
    let body = Paragraph::new(message)
        .style(theme.base().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, area);
}

/// Render the status bar at the bottom.
fn render_status_bar(f: &mut Frame, area: Rect, state: &TuiState, theme: &Theme) {
    let (status_text, color) = match state.app.status() {
        LoadStatus::Failed => (
            format!(" Error: {}", state.app.last_error().unwrap_or("unknown")),
            theme.error,
        ),
        LoadStatus::Loading => (" Loading catalog...".to_string(), theme.primary),
        LoadStatus::Idle => (" Not loaded".to_string(), theme.muted),
        LoadStatus::Ready => (
            format!(
                " {} products | {} categories | {} favorites",
                state.app.catalog_len(),
                state.app.categories().len().saturating_sub(1),
                state.app.favorites().len()
            ),
            theme.success,
        ),
    };

    let status = Paragraph::new(status_text)
        .style(theme.base().fg(color))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}

/// Terminal column of the search cursor: the display width of the text
/// before it, inside the input's left border and clamped to its right one.
fn search_cursor_x(area: Rect, term: &str, position: usize) -> u16 {
    let before: String = term.chars().take(position).collect();
    let offset = u16::try_from(Line::from(before).width()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(offset)
        .min(area.right().saturating_sub(2))
}

fn calculate_visible_rows(table_height: u16) -> usize {
    table_height.saturating_sub(4) as usize
}

/// Shorten `text` to at most `max` chars, ending in `...` when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Upper-case the first letter of every word: `men's clothing` → `Men's Clothing`.
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Five-star bar rounded to the nearest whole star.
fn stars(rate: f64) -> String {
    let filled = rate.clamp(0.0, 5.0).round() as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
