//! IEEE 802.11 code lookup. Needs no controller.

use serde::Serialize;
use xpone_core::codes::{self, CodeInfo, Severity};

use crate::cli::{CodesArgs, CodesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, detail_lines};

#[derive(Serialize)]
struct CodeReport {
    kind: &'static str,
    #[serde(flatten)]
    info: CodeInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
}

fn lookup(command: &CodesCommand) -> CodeReport {
    match *command {
        CodesCommand::Reason { code } => CodeReport {
            kind: "reason",
            info: codes::reason(code),
            severity: Some(codes::reason_severity(code)),
        },
        CodesCommand::Status { code } => CodeReport {
            kind: "status",
            info: codes::status(code),
            severity: None,
        },
    }
}

fn detail(report: &CodeReport) -> String {
    let mut pairs = vec![
        ("Code", format!("{} {}", report.kind, report.info.code)),
        ("Meaning", report.info.description.to_owned()),
    ];
    if let Some(severity) = report.severity {
        pairs.push(("Severity", severity.to_string()));
    }
    detail_lines(&pairs)
}

pub fn handle(args: &CodesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let report = lookup(&args.command);
    let out = output::render_single(&global.output, &report, detail, |r| {
        r.info.description.to_owned()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_lookup_includes_severity() {
        let report = lookup(&CodesCommand::Reason { code: 15 });
        let text = detail(&report);
        assert!(text.contains("4-way handshake timeout"));
        assert!(text.contains("error"));
    }

    #[test]
    fn status_lookup_has_no_severity() {
        let report = lookup(&CodesCommand::Status { code: 9999 });
        assert!(!report.info.known);
        assert!(!detail(&report).contains("Severity"));
    }
}
