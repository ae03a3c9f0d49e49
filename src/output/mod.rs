//! Output formatting module for dodo
//!
//! Provides table formatting and display utilities for CLI output.

use chrono::{DateTime, Utc};
use dodo_db::{PagedResult, Todo, TodoStats};

/// Maximum width for the title column before truncation
const MAX_TITLE_WIDTH: usize = 40;

/// Maximum width for the description column before truncation
const MAX_DESCRIPTION_WIDTH: usize = 30;

/// Truncate a string to the specified maximum width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    }
}

/// Display width of a cell, counted in characters
fn width(s: &str) -> usize {
    s.chars().count()
}

/// Left-align `s` in a column of `w` characters
fn pad(s: &str, w: usize) -> String {
    format!("{}{}", s, " ".repeat(w.saturating_sub(width(s))))
}

/// Checkbox marker for the completion flag
fn status_marker(is_finished: bool) -> &'static str {
    if is_finished { "[x]" } else { "[ ]" }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Format todos into an aligned table string.
///
/// Produces output in the format:
/// ```text
/// ID      Done  Title     Description  Cover  Created
/// ------  ----  --------  -----------  -----  ----------------
/// a1b2c3  [ ]   Buy milk  Two liters   -      2024-05-01 10:00
/// ```
pub fn format_todo_table(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todos found.".to_string();
    }

    let headers = ["ID", "Done", "Title", "Description", "Cover", "Created"];

    let rows: Vec<[String; 6]> = todos
        .iter()
        .map(|todo| {
            [
                todo.id.clone(),
                status_marker(todo.is_finished).to_string(),
                truncate(&todo.title, MAX_TITLE_WIDTH),
                truncate(
                    todo.description.as_deref().unwrap_or("-"),
                    MAX_DESCRIPTION_WIDTH,
                ),
                if todo.cover.is_some() { "yes" } else { "-" }.to_string(),
                format_timestamp(&todo.created_at),
            ]
        })
        .collect();

    let mut widths = headers.map(width);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(width(cell));
        }
    }

    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &w)| pad(cell, w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(render(widths.iter().map(|&w| "-".repeat(w)).collect()));
    for row in rows {
        lines.push(render(row.to_vec()));
    }

    lines.join("\n")
}

/// Summary line under a listing page.
///
/// ```text
/// Page 2 of 3 (todos 21-40 of 45)
/// ```
pub fn format_page_footer<T>(page: &PagedResult<T>) -> String {
    match (page.from, page.to) {
        (Some(from), Some(to)) => format!(
            "Page {} of {} (todos {}-{} of {})",
            page.current_page, page.last_page, from, to, page.total
        ),
        _ => format!(
            "Page {} of {} ({} todos)",
            page.current_page, page.last_page, page.total
        ),
    }
}

/// Listing output: the table, then the page footer
pub fn format_page(page: &PagedResult<Todo>) -> String {
    format!(
        "{}\n\n{}",
        format_todo_table(&page.data),
        format_page_footer(page)
    )
}

/// Full details of a single todo.
///
/// `cover_location` is where the stored cover can be found on disk, if any.
pub fn format_todo_detail(todo: &Todo, cover_location: Option<&str>) -> String {
    let mut lines = vec![
        format!("ID:          {}", todo.id),
        format!("Title:       {}", todo.title),
        format!(
            "Status:      {}",
            if todo.is_finished { "finished" } else { "unfinished" }
        ),
    ];

    if let Some(description) = &todo.description {
        lines.push(format!("Description: {}", description));
    }
    if let Some(cover) = cover_location.or(todo.cover.as_deref()) {
        lines.push(format!("Cover:       {}", cover));
    }

    lines.push(format!("Created:     {}", format_timestamp(&todo.created_at)));
    lines.push(format!("Updated:     {}", format_timestamp(&todo.updated_at)));

    lines.join("\n")
}

/// Statistics widget as text.
///
/// ```text
/// Total:      5
/// Finished:   2 (40%)
/// Unfinished: 3
/// ```
pub fn format_stats(stats: &TodoStats) -> String {
    format!(
        "Total:      {}\nFinished:   {} ({}%)\nUnfinished: {}",
        stats.total,
        stats.finished,
        stats.percent_finished(),
        stats.unfinished
    )
}
