//! Sample list to table view-model projection.

use crate::model::sample::{Sample, SampleField, SampleId};
use crate::service::edit_session::{EditSessions, RowMode};

/// Header of the per-row map control column.
pub const MAP_COLUMN_LABEL: &str = "Mapa";
/// Header of the per-row edit/delete control column.
pub const ACTIONS_COLUMN_LABEL: &str = "Acciones";
/// Message shown instead of the table when there are no samples.
pub const EMPTY_STATE_MESSAGE: &str = "No hay muestras registradas.";

/// Full table state for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// Seven field labels followed by the map and actions headers.
    pub headers: Vec<&'static str>,
    /// One row per sample, in store order.
    pub rows: Vec<RowView>,
    pub show_empty_message: bool,
    pub show_table: bool,
    /// Clear-all and export controls.
    pub show_bulk_actions: bool,
}

/// One projected table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub sample_id: SampleId,
    pub mode: RowMode,
    /// Seven cells in `SampleField::ALL` order.
    pub cells: Vec<CellView>,
    pub map_action: MapAction,
    pub actions: RowActions,
}

/// Content of one descriptive cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Text(String),
    Input {
        field: SampleField,
        /// `edit-<fieldKey>-<sampleId>`.
        element_id: String,
        value: String,
    },
}

impl CellView {
    /// Displayed or edited value.
    pub fn value(&self) -> &str {
        match self {
            Self::Text(value) => value,
            Self::Input { value, .. } => value,
        }
    }
}

/// Coordinates bound to the row's "view on map" control.
///
/// Always the stored values, even while the row is editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAction {
    pub latitud: String,
    pub longitud: String,
}

/// Action controls shown in the row's actions cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowActions {
    EditDelete,
    Save,
}

/// Input element id for one edited cell.
pub fn edit_input_id(field: SampleField, id: &SampleId) -> String {
    format!("edit-{}-{}", field.key(), id)
}

/// Column headers in display order.
pub fn table_headers() -> Vec<&'static str> {
    SampleField::ALL
        .into_iter()
        .map(SampleField::label)
        .chain([MAP_COLUMN_LABEL, ACTIONS_COLUMN_LABEL])
        .collect()
}

/// Projects samples and open edit sessions into a table view-model.
pub fn project_table(samples: &[Sample], sessions: &EditSessions) -> TableView {
    let has_rows = !samples.is_empty();
    TableView {
        headers: table_headers(),
        rows: samples
            .iter()
            .map(|sample| project_row(sample, sessions))
            .collect(),
        show_empty_message: !has_rows,
        show_table: has_rows,
        show_bulk_actions: has_rows,
    }
}

fn project_row(sample: &Sample, sessions: &EditSessions) -> RowView {
    let map_action = MapAction {
        latitud: sample.fields.latitud.clone(),
        longitud: sample.fields.longitud.clone(),
    };

    match sessions.session(&sample.id) {
        Some(session) => RowView {
            sample_id: sample.id.clone(),
            mode: RowMode::Editing,
            cells: SampleField::ALL
                .into_iter()
                .map(|field| CellView::Input {
                    field,
                    element_id: edit_input_id(field, &sample.id),
                    value: session.draft.get(field).to_string(),
                })
                .collect(),
            map_action,
            actions: RowActions::Save,
        },
        None => RowView {
            sample_id: sample.id.clone(),
            mode: RowMode::Viewing,
            cells: SampleField::ALL
                .into_iter()
                .map(|field| CellView::Text(sample.field(field).to_string()))
                .collect(),
            map_action,
            actions: RowActions::EditDelete,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{project_table, CellView, RowActions, EMPTY_STATE_MESSAGE};
    use crate::model::sample::{SampleField, SampleFields};
    use crate::repo::local_storage::MemoryLocalStorage;
    use crate::service::edit_session::{EditSessions, RowMode};
    use crate::service::sample_store::SampleStore;

    fn fields(numero: &str) -> SampleFields {
        SampleFields {
            numero_muestra: numero.to_string(),
            localidad: "Springfield".to_string(),
            pais: "USA".to_string(),
            latitud: "39.8".to_string(),
            longitud: "-89.6".to_string(),
            mineralogia: "Calcite".to_string(),
            paleontologia: "Trilobite".to_string(),
        }
    }

    #[test]
    fn empty_collection_hides_table_and_bulk_actions() {
        let view = project_table(&[], &EditSessions::new());
        assert!(view.show_empty_message);
        assert!(!view.show_table);
        assert!(!view.show_bulk_actions);
        assert!(view.rows.is_empty());
        assert!(!EMPTY_STATE_MESSAGE.is_empty());
    }

    #[test]
    fn rows_follow_store_order_with_nine_headers() {
        let store = SampleStore::new(MemoryLocalStorage::new());
        store.add(fields("A")).unwrap();
        store.add(fields("B")).unwrap();
        let samples = store.list().unwrap();

        let view = project_table(&samples, &EditSessions::new());
        assert_eq!(view.headers.len(), 9);
        assert_eq!(view.headers[7], "Mapa");
        assert!(view.show_table && view.show_bulk_actions && !view.show_empty_message);

        let numbers: Vec<&str> = view.rows.iter().map(|row| row.cells[0].value()).collect();
        assert_eq!(numbers, vec!["A", "B"]);
        assert!(view
            .rows
            .iter()
            .all(|row| row.actions == RowActions::EditDelete && row.mode == RowMode::Viewing));
    }

    #[test]
    fn editing_row_shows_inputs_and_save_control() {
        let store = SampleStore::new(MemoryLocalStorage::new());
        let editing = store.add(fields("A")).unwrap();
        store.add(fields("B")).unwrap();
        let mut sessions = EditSessions::new();
        sessions.begin_edit(&store, &editing.id).unwrap();
        sessions
            .set_field(&editing.id, SampleField::Latitud, "40.0")
            .unwrap();

        let view = project_table(&store.list().unwrap(), &sessions);
        let row = &view.rows[0];
        assert_eq!(row.actions, RowActions::Save);
        assert_eq!(
            row.cells[3],
            CellView::Input {
                field: SampleField::Latitud,
                element_id: format!("edit-latitud-{}", editing.id),
                value: "40.0".to_string(),
            }
        );
        assert_eq!(row.map_action.latitud, "39.8");
        assert_eq!(view.rows[1].actions, RowActions::EditDelete);
    }
}
