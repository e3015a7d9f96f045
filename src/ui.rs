use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::config::{CATEGORIES, CategoryConfig};
use crate::page::{Card, CardContainer, Section, TableBody};
use crate::sync::SyncEngine;

const CARD_WIDTH: u16 = 26;
const CONSOLE_LINES: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Palette {
    base: Style,
    accent: Style,
    muted: Style,
    error: Style,
}

fn palette(dark: bool) -> Palette {
    if dark {
        let base = Style::default().fg(Color::Gray).bg(Color::Black);
        Palette {
            base,
            accent: base.fg(Color::LightCyan).add_modifier(Modifier::BOLD),
            muted: base.fg(Color::DarkGray),
            error: base.fg(Color::LightRed),
        }
    } else {
        let base = Style::default();
        Palette {
            base,
            accent: base.fg(Color::Blue).add_modifier(Modifier::BOLD),
            muted: base.fg(Color::DarkGray),
            error: base.fg(Color::Red),
        }
    }
}

fn card_style(card: &Card) -> Style {
    if card.dark {
        Style::default().fg(Color::White).bg(Color::Black)
    } else {
        Style::default().fg(Color::Black).bg(Color::Gray)
    }
}

pub fn draw(frame: &mut Frame, engine: &SyncEngine) {
    let state = engine.state();
    let page = engine.page();
    let colors = palette(state.is_dark_mode);
    frame.render_widget(Block::default().style(colors.base), frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(4),
            Constraint::Length(CONSOLE_LINES as u16 + 2),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let toggle = page
        .theme_toggle
        .as_ref()
        .map(|t| format!("{} {}", t.glyph, t.label))
        .unwrap_or_default();
    let layout = if state.is_mobile { "CARDS" } else { "TABLE" };
    let header = Paragraph::new(format!("TWINS PLAYER STATS | {layout} | {toggle}"))
        .style(colors.accent)
        .block(Block::default().borders(Borders::BOTTOM).style(colors.base));
    frame.render_widget(header, chunks[0]);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    for (cat, area) in CATEGORIES.iter().zip(sections.iter()) {
        render_section(frame, *area, cat, page.section(cat.id), colors);
    }

    let console = Paragraph::new(console_text(&page.logs))
        .style(colors.muted)
        .block(Block::default().title("Console").borders(Borders::ALL).style(colors.base));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new("r Refresh | h Hitters | p Pitchers | t Theme | ? Help | q Quit")
        .style(colors.muted);
    frame.render_widget(footer, chunks[3]);

    if page.help_overlay {
        render_help_overlay(frame, frame.size(), colors);
    }
}

fn render_section(
    frame: &mut Frame,
    area: Rect,
    cat: &CategoryConfig,
    section: &Section,
    colors: Palette,
) {
    let title = match section.updated_at {
        Some(at) => format!("{} (updated {})", cat.title, at.format("%H:%M:%S")),
        None => cat.title.to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(colors.base);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    if let Some(message) = section.error_text() {
        frame.render_widget(Paragraph::new(message).style(colors.error), parts[0]);
    } else if section.is_loading() {
        let text = section
            .loading
            .as_ref()
            .map(|l| l.text.as_str())
            .unwrap_or("Loading...");
        frame.render_widget(Paragraph::new(text).style(colors.muted), parts[0]);
    }

    if let Some(table) = section.table.as_ref() {
        if table.visible {
            let labels: Vec<&str> = cat.columns.iter().map(|c| c.label).collect();
            render_table(frame, parts[1], &labels, table, colors);
        }
    }
    if let Some(container) = section.cards.as_ref() {
        if container.visible {
            render_cards(frame, parts[1], container);
        }
    }
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    labels: &[&str],
    table: &TableBody,
    colors: Palette,
) {
    if area.height == 0 {
        return;
    }
    let widths: Vec<Constraint> = labels
        .iter()
        .enumerate()
        .map(|(idx, _)| {
            if idx == 0 {
                Constraint::Min(20)
            } else {
                Constraint::Length(8)
            }
        })
        .collect();
    let header = Row::new(labels.iter().map(|l| Cell::from(l.to_string())))
        .style(colors.accent);
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))));
    let widget = Table::new(rows, widths)
        .header(header)
        .style(colors.base)
        .column_spacing(2);
    frame.render_widget(widget, area);
}

fn render_cards(frame: &mut Frame, area: Rect, container: &CardContainer) {
    let Some(first) = container.cards.first() else {
        return;
    };
    let card_height = first.lines.len() as u16 + 2;
    let per_row = (area.width / CARD_WIDTH).max(1) as usize;
    let card_width = area.width / per_row as u16;
    let visible_rows = (area.height / card_height.max(1)) as usize;

    for (idx, card) in container.cards.iter().enumerate() {
        let (row, col) = (idx / per_row, idx % per_row);
        if row >= visible_rows {
            break;
        }
        let rect = Rect {
            x: area.x + col as u16 * card_width,
            y: area.y + row as u16 * card_height,
            width: card_width,
            height: card_height,
        };
        let text = card
            .lines
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        let style = card_style(card);
        let widget = Paragraph::new(text).style(style).block(
            Block::default()
                .title(card.heading.as_str())
                .borders(Borders::ALL)
                .style(style),
        );
        frame.render_widget(widget, rect);
    }
}

fn console_text(logs: &std::collections::VecDeque<String>) -> String {
    if logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = logs.len().saturating_sub(CONSOLE_LINES);
    logs.iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect, colors: Palette) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Player Stats - Help",
        "",
        "  r            Refresh hitters and pitchers",
        "  h            Refresh hitters",
        "  p            Refresh pitchers",
        "  t            Toggle dark mode",
        "  ?            Toggle help",
        "  q / Esc      Quit",
        "",
        "Narrow terminals switch from the table to player cards.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(colors.base);
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
