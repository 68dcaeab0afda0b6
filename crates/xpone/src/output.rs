//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::{Table, Tabled, settings::Style};
use xpone_core::{ColumnDef, TableState};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Status text colored by health: green when up, red when down.
pub fn paint_status(status: &str, online: bool, color: bool) -> String {
    if !color {
        return status.to_owned();
    }
    if online {
        status.green().to_string()
    } else {
        status.red().to_string()
    }
}

/// Bold section heading for detail views.
pub fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().cyan().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable items in the chosen format.
///
/// - `table`: maps each item through `to_row` and builds a pretty table
/// - `json` / `json-compact` / `yaml`: serializes the items themselves
/// - `plain`: one `id_fn` result per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, data),
    }
}

/// Like [`render_list`], but the table shows only the columns `state`
/// makes visible, pinned ones first. `columns` lists the row's fields in
/// declaration order.
pub fn render_list_in_view<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
    columns: &[ColumnDef],
    state: &TableState,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_view(&rows, columns, state))
        }
        other => render_list(other, data, to_row, id_fn),
    }
}

/// Render a single item. Table output uses `detail_fn`, since detail views
/// are hand-laid key/value blocks rather than `Tabled` rows.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_view<R: Tabled>(rows: &[R], columns: &[ColumnDef], state: &TableState) -> String {
    let picks: Vec<(usize, &str)> = state
        .visible_in_order()
        .into_iter()
        .filter_map(|id| {
            columns
                .iter()
                .enumerate()
                .find(|(_, c)| c.id == id)
                .map(|(i, c)| (i, c.label))
        })
        .collect();

    let mut builder = Builder::default();
    builder.push_record(picks.iter().map(|(_, label)| (*label).to_owned()));
    for row in rows {
        let fields = row.fields();
        builder.push_record(
            picks
                .iter()
                .map(|(i, _)| fields.get(*i).map_or_else(String::new, ToString::to_string)),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

fn render_structured<T: Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        _ => serde_json::to_string_pretty(data)?,
    };
    Ok(rendered)
}

/// Text for an optional cell.
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

/// Aligned `key: value` lines for detail views.
pub fn detail_lines(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    #[test]
    fn plain_output_is_one_id_per_line() {
        let data = vec![json!({"n": "a"}), json!({"n": "b"})];
        let out = render_list(
            &OutputFormat::Plain,
            &data,
            |v| Row {
                name: v["n"].to_string(),
            },
            |v| v["n"].as_str().unwrap().to_owned(),
        )
        .unwrap();
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_single(
            &OutputFormat::JsonCompact,
            &json!({"a": 1}),
            |_| String::new(),
            |_| String::new(),
        )
        .unwrap();
        assert_eq!(out, r#"{"a":1}"#);
    }

    #[test]
    fn detail_lines_align_keys() {
        let out = detail_lines(&[("Name", "ap1".into()), ("Serial", "X".into())]);
        assert_eq!(out, "Name    ap1\nSerial  X");
    }

    #[derive(Tabled)]
    struct WideRow {
        name: String,
        ip: String,
        band: String,
    }

    #[test]
    fn table_view_hides_and_pins_columns() {
        const COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("name", "Name"),
            ColumnDef::new("ip", "IP"),
            ColumnDef::new("band", "Band").hidden(),
        ];
        let mut state = TableState::defaults(COLUMNS);
        assert!(state.pin(COLUMNS, "ip"));

        let data = vec![json!({ "name": "laptop", "ip": "10.0.0.5", "band": "5GHz" })];
        let out = render_list_in_view(
            &OutputFormat::Table,
            &data,
            |v| WideRow {
                name: v["name"].as_str().unwrap().to_owned(),
                ip: v["ip"].as_str().unwrap().to_owned(),
                band: v["band"].as_str().unwrap().to_owned(),
            },
            |v| v["name"].to_string(),
            COLUMNS,
            &state,
        )
        .unwrap();

        assert!(!out.contains("Band") && !out.contains("5GHz"), "{out}");
        let ip_at = out.find("IP").unwrap();
        let name_at = out.find("Name").unwrap();
        assert!(ip_at < name_at, "pinned column should lead:\n{out}");
        assert!(out.contains("10.0.0.5") && out.contains("laptop"));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        assert_eq!(cell::<i64>(None), "-");
        assert_eq!(cell(Some(36)), "36");
    }
}
