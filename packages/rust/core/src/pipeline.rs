//! End-to-end strip run: structural operations, then the markup strip.

use std::time::Instant;

use mtextstrip_markup::{CodeSet, FormatCode};
use mtextstrip_shared::Result;
use tracing::{debug, info, instrument, warn};

use crate::batch::Batch;

/// Counts gathered over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripReport {
    /// Containers in the batch.
    pub containers: usize,
    /// Text slots left free of a field link, whether or not they had one.
    pub field_links_clear: usize,
    /// Field links that were locked and kept.
    pub field_links_locked: usize,
    /// Containers whose column layout was dropped.
    pub columns_removed: usize,
    /// Containers whose background mask was turned off.
    pub masks_cleared: usize,
    /// Text slots read, stripped, and written back.
    pub texts_rewritten: usize,
    /// Text slots whose content actually changed.
    pub texts_changed: usize,
    /// Codes from the selection that name no category. Filled in by the caller.
    pub unknown_codes: Vec<char>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str, total: usize);
    /// Called after each container in the current phase.
    fn container_done(&self, handle: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, report: &StripReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str, _total: usize) {}
    fn container_done(&self, _handle: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &StripReport) {}
}

/// Strip the selected categories from every container in `batch`.
///
/// The order is fixed whatever the order of `codes`:
/// 1. Field links (`D`)
/// 2. Column layout (`N`)
/// 3. Background mask (`M`)
/// 4. Text markup, for every remaining code
///
/// Any container failure aborts the run; the caller discards the drawing.
#[instrument(skip_all, fields(containers = batch.len(), codes = %codes))]
pub fn run(
    batch: &mut Batch<'_>,
    codes: &CodeSet,
    progress: &dyn ProgressReporter,
) -> Result<StripReport> {
    let start = Instant::now();
    let total = batch.len();
    let mut report = StripReport {
        containers: total,
        ..StripReport::default()
    };

    // --- Phase 1: Field links ---
    if codes.contains(FormatCode::Fields) {
        progress.phase("Removing field links", total);
        for (i, container) in batch.containers_mut().enumerate() {
            let handle = container.handle().to_string();
            for slot in container.slots()? {
                // The text stays as it is either way.
                if slot.remove_field_link()? {
                    report.field_links_clear += 1;
                } else {
                    warn!(%handle, "field link is locked, keeping it");
                    report.field_links_locked += 1;
                }
            }
            progress.container_done(&handle, i + 1, total);
        }
    }

    // --- Phase 2: Columns ---
    if codes.contains(FormatCode::Columns) {
        progress.phase("Removing columns", total);
        for (i, container) in batch.containers_mut().enumerate() {
            if container.remove_column_layout()? {
                debug!(handle = %container.handle(), "removed column layout");
                report.columns_removed += 1;
            }
            progress.container_done(container.handle(), i + 1, total);
        }
    }

    // --- Phase 3: Background mask ---
    if codes.contains(FormatCode::Mask) {
        progress.phase("Removing background masks", total);
        for (i, container) in batch.containers_mut().enumerate() {
            if container.set_mask(false)? {
                report.masks_cleared += 1;
            }
            progress.container_done(container.handle(), i + 1, total);
        }
    }

    // --- Phase 4: Text markup ---
    let text_codes = codes.text_codes();
    if !text_codes.is_empty() {
        progress.phase("Stripping formatting", total);
        for (i, container) in batch.containers_mut().enumerate() {
            let handle = container.handle().to_string();
            let kind = container.kind();
            for slot in container.slots()? {
                let before = slot.text()?;
                let after = mtextstrip_markup::strip(&before, &text_codes);
                if after != before {
                    debug!(%handle, %kind, "text changed");
                    report.texts_changed += 1;
                }
                slot.set_text(after)?;
                report.texts_rewritten += 1;
            }
            container.reset_properties(&text_codes)?;
            progress.container_done(&handle, i + 1, total);
        }
    }

    report.elapsed = start.elapsed();
    info!(
        containers = report.containers,
        texts_changed = report.texts_changed,
        field_links_clear = report.field_links_clear,
        field_links_locked = report.field_links_locked,
        masks_cleared = report.masks_cleared,
        columns_removed = report.columns_removed,
        "strip run complete"
    );
    progress.done(&report);

    Ok(report)
}
