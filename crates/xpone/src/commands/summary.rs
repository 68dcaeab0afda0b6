//! Dashboard summary handler.

use std::fmt::Write;

use serde_json::Value;
use xpone_core::{Dashboard, DashboardSummary, DerivedSummary};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, detail_lines};

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn derived_detail(summary: &DerivedSummary, color: bool) -> String {
    let mut out = detail_lines(&[
        (
            "Access points",
            format!(
                "{} ({} online)",
                summary.access_points, summary.access_points_online
            ),
        ),
        ("Clients", summary.clients.to_string()),
        ("Services", summary.services.to_string()),
        ("Sites", summary.sites.to_string()),
    ]);

    let sections = [
        ("AP status", &summary.access_points_by_status),
        ("Clients by band", &summary.clients_by_band),
    ];
    for (title, counts) in sections {
        if counts.is_empty() {
            continue;
        }
        out.push_str("\n\n");
        out.push_str(&output::heading(title, color));
        for (key, count) in counts {
            let _ = write!(out, "\n  {key}: {count}");
        }
    }
    out
}

fn detail(summary: &DashboardSummary, color: bool) -> String {
    match summary {
        DashboardSummary::Controller { path, report } => {
            // Nested report sections only make sense in structured output.
            let pairs: Vec<(&str, String)> = report
                .iter()
                .filter_map(|(k, v)| scalar(v).map(|s| (k.as_str(), s)))
                .collect();
            let mut out = output::heading(&format!("Controller report ({path})"), color);
            out.push('\n');
            out.push_str(&detail_lines(&pairs));
            out
        }
        DashboardSummary::Derived(derived) => derived_detail(derived, color),
    }
}

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let summary = dashboard.dashboard_summary().await?;
    let out = output::render_single(
        &global.output,
        &summary,
        |s| detail(s, color),
        |s| match s {
            DashboardSummary::Controller { path, .. } => path.clone(),
            DashboardSummary::Derived(d) => d.access_points.to_string(),
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
