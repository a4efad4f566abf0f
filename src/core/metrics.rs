use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) const IMPORT_ROWS_TOTAL: &str = "student_import_rows_total";
pub(crate) const ATTENDANCE_MARKS_TOTAL: &str = "attendance_marks_total";

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

/// `outcome` is `created` or `failed`.
pub(crate) fn record_import_row(outcome: &'static str) {
    metrics::counter!(IMPORT_ROWS_TOTAL, "outcome" => outcome).increment(1);
}

/// `outcome` is `created` or `updated`.
pub(crate) fn record_attendance_marks(outcome: &'static str, count: u64) {
    metrics::counter!(ATTENDANCE_MARKS_TOTAL, "outcome" => outcome).increment(count);
}
