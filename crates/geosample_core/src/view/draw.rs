//! Plain-text table drawing for terminal hosts.

use crate::view::table::{CellView, RowActions, TableView, EMPTY_STATE_MESSAGE};

const ID_COLUMN_LABEL: &str = "ID";
const MAP_CONTROL: &str = "[Ver en Mapa]";
const EDIT_DELETE_CONTROLS: &str = "[Editar] [Eliminar]";
const SAVE_CONTROL: &str = "[Guardar]";

/// Draws the whole table, or the empty-state message.
///
/// A leading `ID` column is added so terminal users can address rows.
/// Editing cells are drawn bracketed as `[value]`.
pub fn draw_table(view: &TableView) -> String {
    if !view.show_table {
        return EMPTY_STATE_MESSAGE.to_string();
    }

    let mut lines: Vec<Vec<String>> = Vec::with_capacity(view.rows.len() + 1);
    lines.push(
        std::iter::once(ID_COLUMN_LABEL)
            .chain(view.headers.iter().copied())
            .map(str::to_string)
            .collect(),
    );
    for row in &view.rows {
        let mut line = Vec::with_capacity(view.headers.len() + 1);
        line.push(row.sample_id.to_string());
        line.extend(row.cells.iter().map(draw_cell));
        line.push(MAP_CONTROL.to_string());
        line.push(
            match row.actions {
                RowActions::EditDelete => EDIT_DELETE_CONTROLS,
                RowActions::Save => SAVE_CONTROL,
            }
            .to_string(),
        );
        lines.push(line);
    }

    let widths = column_widths(&lines);
    let separator = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut out = Vec::with_capacity(lines.len() + 1);
    for (index, line) in lines.iter().enumerate() {
        out.push(pad_line(line, &widths));
        if index == 0 {
            out.push(separator.clone());
        }
    }
    out.join("\n")
}

fn draw_cell(cell: &CellView) -> String {
    match cell {
        CellView::Text(value) => value.clone(),
        CellView::Input { value, .. } => format!("[{value}]"),
    }
}

fn column_widths(lines: &[Vec<String>]) -> Vec<usize> {
    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|column| {
            lines
                .iter()
                .filter_map(|line| line.get(column))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn pad_line(line: &[String], widths: &[usize]) -> String {
    line.iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
