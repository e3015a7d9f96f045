use thiserror::Error;

use crate::config::Column;
use crate::page::{Card, Section};
use crate::record::{PlayerRecord, UNKNOWN_PLAYER};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("required anchor not found: {anchor}")]
    MissingAnchor { anchor: &'static str },
}

/// Replaces the section's rows (and cards, when mobile) with `records` and
/// shows exactly one of the two views. Nothing is touched if an anchor is
/// missing.
pub fn render(
    section: &mut Section,
    records: &[PlayerRecord],
    columns: &[Column],
    is_mobile: bool,
    is_dark: bool,
) -> Result<(), RenderError> {
    check_anchors(section)?;

    let rows = records
        .iter()
        .map(|record| table_row(record, columns))
        .collect();
    let cards = if is_mobile {
        records
            .iter()
            .map(|record| build_card(record, columns, is_dark))
            .collect()
    } else {
        Vec::new()
    };

    if let (Some(table), Some(container)) = (section.table.as_mut(), section.cards.as_mut()) {
        table.rows = rows;
        container.cards = cards;
    }
    set_layout(section, is_mobile);
    Ok(())
}

/// Card half of `render`; leaves the table rows alone.
pub fn render_cards(
    section: &mut Section,
    records: &[PlayerRecord],
    columns: &[Column],
    is_dark: bool,
) -> Result<(), RenderError> {
    let container = section
        .cards
        .as_mut()
        .ok_or(RenderError::MissingAnchor { anchor: "cards" })?;
    container.cards = records
        .iter()
        .map(|record| build_card(record, columns, is_dark))
        .collect();
    Ok(())
}

pub fn set_layout(section: &mut Section, is_mobile: bool) {
    if let Some(table) = section.table.as_mut() {
        table.visible = !is_mobile;
    }
    if let Some(container) = section.cards.as_mut() {
        container.visible = is_mobile;
    }
}

pub fn apply_theme(section: &mut Section, is_dark: bool) {
    if let Some(container) = section.cards.as_mut() {
        for card in &mut container.cards {
            card.dark = is_dark;
        }
    }
}

/// Reads rendered cell text back into records. Only display strings survive;
/// fallback cells come back as a literal `"-"`.
pub fn records_from_table(section: &Section, columns: &[Column]) -> Vec<PlayerRecord> {
    let Some(table) = section.table.as_ref() else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .map(|row| {
            let mut record = PlayerRecord::new();
            for (idx, column) in columns.iter().enumerate() {
                let text = row.get(idx).cloned().unwrap_or_default();
                record.insert(column.key, text);
            }
            record
        })
        .collect()
}

fn check_anchors(section: &Section) -> Result<(), RenderError> {
    if section.table.is_none() {
        return Err(RenderError::MissingAnchor { anchor: "table" });
    }
    if section.cards.is_none() {
        return Err(RenderError::MissingAnchor { anchor: "cards" });
    }
    Ok(())
}

fn table_row(record: &PlayerRecord, columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .map(|column| record.display_or_dash(column.key))
        .collect()
}

fn build_card(record: &PlayerRecord, columns: &[Column], is_dark: bool) -> Card {
    let name_key = columns.first().map_or("name", |c| c.key);
    let heading = record
        .display(name_key)
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string());
    let lines = columns
        .iter()
        .skip(1)
        .map(|column| (column.label.to_string(), record.display_or_dash(column.key)))
        .collect();
    Card {
        heading,
        lines,
        dark: is_dark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HITTERS;

    #[test]
    fn card_heading_falls_back_when_name_missing() {
        let rec = PlayerRecord::new().with("avg", ".250");
        let card = build_card(&rec, HITTERS.columns, false);
        assert_eq!(card.heading, UNKNOWN_PLAYER);
        assert_eq!(
            card.lines,
            vec![
                ("AVG".to_string(), ".250".to_string()),
                ("HR".to_string(), "-".to_string()),
                ("OPS".to_string(), "-".to_string()),
            ]
        );
    }

    #[test]
    fn missing_cards_anchor_leaves_table_untouched() {
        let mut section = Section::standard();
        section.table.as_mut().unwrap().rows = vec![vec!["old".to_string()]];
        section.cards = None;
        let recs = vec![PlayerRecord::new().with("name", "New")];
        let err = render(&mut section, &recs, HITTERS.columns, false, false).unwrap_err();
        assert_eq!(err, RenderError::MissingAnchor { anchor: "cards" });
        assert_eq!(section.table.unwrap().rows, vec![vec!["old".to_string()]]);
    }
}
