//! Column layout commands for list tables.
//!
//! Layouts are stored per table in the preferences file and read back by
//! the `stations` and `aps` list handlers.

use tabled::Tabled;
use xpone_core::{ColumnDef, FileBackend, Settings, TableState};

use crate::cli::{ColumnsArgs, ColumnsCommand, GlobalOpts, TableName};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{aps, stations};

impl TableName {
    fn id(self) -> &'static str {
        match self {
            Self::Stations => "stations",
            Self::Aps => "aps",
        }
    }

    fn columns(self) -> &'static [ColumnDef] {
        match self {
            Self::Stations => stations::COLUMNS,
            Self::Aps => aps::COLUMNS,
        }
    }
}

fn settings() -> Settings<FileBackend> {
    Settings::new(FileBackend::new(config::preferences_path()))
}

/// Stored layout for `table`, or its default layout.
pub fn table_state(table: TableName) -> Result<TableState, CliError> {
    Ok(settings().table_state(table.id(), table.columns())?)
}

fn lookup<'a>(columns: &'a [ColumnDef], id: &str) -> Result<&'a ColumnDef, CliError> {
    columns
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| CliError::Validation {
            field: "column".into(),
            reason: format!(
                "unknown column '{id}' (known: {})",
                columns.iter().map(|c| c.id).collect::<Vec<_>>().join(", ")
            ),
        })
}

fn refused(id: &str, why: &str) -> CliError {
    CliError::Validation {
        field: "column".into(),
        reason: format!("'{id}' {why}"),
    }
}

// ── Layout view ─────────────────────────────────────────────────────

#[derive(Tabled)]
struct LayoutRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Column")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Visible")]
    visible: String,
    #[tabled(rename = "Pinned")]
    pinned: String,
}

fn yes_no(flag: bool) -> String {
    String::from(if flag { "yes" } else { "no" })
}

fn layout(state: &TableState, columns: &[ColumnDef]) -> String {
    let rows: Vec<LayoutRow> = state
        .column_order
        .iter()
        .enumerate()
        .map(|(position, id)| LayoutRow {
            position,
            id: id.clone(),
            label: output::cell(columns.iter().find(|c| c.id == id).map(|c| c.label)),
            visible: yes_no(state.is_visible(id)),
            pinned: yes_no(state.is_pinned(id)),
        })
        .collect();
    output::render_table(&rows)
}

// ── Handler ─────────────────────────────────────────────────────────

/// Apply `command` to `state`. Returns whether there is anything to save.
fn apply(
    state: &mut TableState,
    columns: &[ColumnDef],
    command: Option<&ColumnsCommand>,
) -> Result<bool, CliError> {
    match command {
        None | Some(ColumnsCommand::Show) => return Ok(false),
        Some(ColumnsCommand::Toggle { column }) => {
            lookup(columns, column)?;
            if !state.toggle_column(column) {
                return Err(refused(column, "is the last visible column"));
            }
        }
        Some(ColumnsCommand::Move { column, position }) => {
            lookup(columns, column)?;
            state.move_column(column, *position);
        }
        Some(ColumnsCommand::Pin { column }) => {
            if !lookup(columns, column)?.pinnable {
                return Err(refused(column, "cannot be pinned"));
            }
            state.pin(columns, column);
        }
        Some(ColumnsCommand::Unpin { column }) => {
            lookup(columns, column)?;
            state.unpin(column);
        }
        Some(ColumnsCommand::Reset) => state.reset(columns),
    }
    Ok(true)
}

pub fn handle(args: &ColumnsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let columns = args.table.columns();
    let settings = settings();
    let mut state = settings.table_state(args.table.id(), columns)?;

    if apply(&mut state, columns, args.command.as_ref())? {
        settings.save_table_state(args.table.id(), &state)?;
        tracing::debug!(table = args.table.id(), "column layout saved");
    }

    let out = output::render_single(
        &global.output,
        &state,
        |s| layout(s, columns),
        |s| s.visible_in_order().join("\n"),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn toggle(column: &str) -> ColumnsCommand {
        ColumnsCommand::Toggle {
            column: column.into(),
        }
    }

    #[test]
    fn hidden_station_column_can_be_shown() {
        let columns = TableName::Stations.columns();
        let mut state = TableState::defaults(columns);
        assert!(!state.is_visible("bytes"));

        assert!(apply(&mut state, columns, Some(&toggle("bytes"))).unwrap());
        assert!(state.is_visible("bytes"));
    }

    #[test]
    fn unknown_and_unhideable_columns_are_rejected() {
        const ONE: &[ColumnDef] = &[ColumnDef::new("name", "Name").unpinnable()];
        let mut state = TableState::defaults(ONE);

        let err = apply(&mut state, ONE, Some(&toggle("nope"))).unwrap_err();
        assert!(err.to_string().contains("column"), "{err}");
        assert!(apply(&mut state, ONE, Some(&toggle("name"))).is_err());
        let pin = ColumnsCommand::Pin {
            column: "name".into(),
        };
        assert!(apply(&mut state, ONE, Some(&pin)).is_err());
    }

    #[test]
    fn show_saves_nothing() {
        let columns = TableName::Aps.columns();
        let mut state = TableState::defaults(columns);
        assert!(!apply(&mut state, columns, None).unwrap());
        assert!(layout(&state, columns).contains("serial"));
    }
}
