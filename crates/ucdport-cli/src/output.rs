//! Formatted output helpers for CLI commands.

use ucdport_convert::convert::ApplicationPlan;
use ucdport_convert::emit::EmitReport;

/// One summary line per converted application.
#[must_use]
pub fn application_summary(app: &ApplicationPlan) -> String {
    format!(
        "Converted application: {}  ->  {} services, {} pipeline",
        app.name,
        app.services.len(),
        usize::from(app.pipeline.is_some())
    )
}

/// Application line of the plan listing: name, deployment type, and shell.
#[must_use]
pub fn application_heading(app: &ApplicationPlan) -> String {
    format!(
        "{} [{}, {}]",
        app.name,
        app.deployment_type,
        app.deployment_type.shell()
    )
}

/// Warning line when documents overwrote each other, `None` otherwise.
#[must_use]
pub fn collision_notice(report: &EmitReport) -> Option<String> {
    (report.collisions > 0).then(|| {
        format!(
            "Warning: {} file(s) overwritten by documents with the same identifier.",
            report.collisions
        )
    })
}

/// A horizontal rule of the given width.
#[must_use]
pub fn rule(width: usize) -> String {
    "\u{2550}".repeat(width)
}
