//! Markdown report of a generation run's warnings.

use std::collections::BTreeMap;

use crate::generate::GenerationReport;
use crate::registry::Warning;
use crate::sink::GeneratedDocument;

pub fn render_report(report: &GenerationReport) -> String {
    let mut content = String::new();
    content.push_str(&format!("# hub-typings report: {}\n\n", report.hub));
    content.push_str(&format!("- document: `{}`\n", report.document));
    content.push_str(&format!("- server methods: {}\n", report.server_methods));
    content.push_str(&format!("- client methods: {}\n", report.client_methods));
    if report.prelude_created {
        content.push_str("- prelude created\n");
    }
    content.push('\n');

    if report.warnings.is_empty() {
        content.push_str("No warnings.\n");
        return content;
    }

    let mut grouped: BTreeMap<_, Vec<&Warning>> = BTreeMap::new();
    for w in &report.warnings {
        grouped.entry(w.kind).or_default().push(w);
    }
    content.push_str("## Warnings\n");
    for (kind, warnings) in grouped {
        content.push_str(&format!("\n### {} ({})\n\n", kind.label(), warnings.len()));
        for w in warnings {
            content.push_str("- ");
            content.push_str(&w.message);
            content.push('\n');
        }
    }
    content
}

/// The report as a document next to the hub document.
pub fn report_document(report: &GenerationReport) -> GeneratedDocument {
    let (folder, file) = report
        .document
        .rsplit_once('/')
        .unwrap_or(("", report.document.as_str()));
    let stem = file.strip_suffix(".d.ts").unwrap_or(file);
    GeneratedDocument::new(format!("{stem}.dts-report.md"), folder, render_report(report))
}
