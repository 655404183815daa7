/*!
 * Library scanning: find media files below a directory and probe each one.
 */

use anyhow::Result;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;

use crate::file_utils::FileManager;
use crate::media_info::TrackMetadataReport;
use crate::name_suggester;
use crate::probe::TrackProbe;

/// A probed file, optionally with its suggested canonical name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    #[serde(flatten)]
    pub report: TrackMetadataReport,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_name: Option<String>,
}

impl ScanResult {
    /// Attach a suggested name; failed probes never get one
    pub fn with_suggestion(report: TrackMetadataReport, undefined_language: &str) -> Self {
        let suggested_name = if report.is_failed() {
            None
        } else {
            Some(name_suggester::suggest_name(&report, undefined_language))
        };
        ScanResult { report, suggested_name }
    }
}

impl From<TrackMetadataReport> for ScanResult {
    fn from(report: TrackMetadataReport) -> Self {
        ScanResult { report, suggested_name: None }
    }
}

/// Walks a library and probes every matching file, one at a time
pub struct LibraryScanner<P: TrackProbe> {
    probe: P,
}

impl<P: TrackProbe> LibraryScanner<P> {
    pub fn new(probe: P) -> Self {
        LibraryScanner { probe }
    }

    /// Scan `library_root` for files with one of `extensions`
    ///
    /// Reports come back sorted by full path. A file whose probe fails
    /// yields a report with its `error` set instead of aborting the scan.
    pub fn scan<R: AsRef<Path>>(&self, library_root: R, extensions: &[String]) -> Result<Vec<TrackMetadataReport>> {
        self.scan_with_progress(library_root, extensions, &ProgressBar::hidden())
    }

    /// Same as [`scan`](Self::scan), advancing `progress` once per file
    pub fn scan_with_progress<R: AsRef<Path>>(
        &self,
        library_root: R,
        extensions: &[String],
        progress: &ProgressBar,
    ) -> Result<Vec<TrackMetadataReport>> {
        let library_root = library_root.as_ref();
        let files = FileManager::find_files_with_extensions(library_root, extensions)?;
        info!("Found {} media file(s) in {:?}", files.len(), library_root);

        progress.set_length(files.len() as u64);
        let mut reports = Vec::with_capacity(files.len());
        for path in &files {
            let name = FileManager::relative_name(library_root, path);
            progress.set_message(name.clone());
            reports.push(self.probe_file(path, name));
            progress.inc(1);
        }
        progress.finish_and_clear();

        let failed = reports.iter().filter(|r| r.is_failed()).count();
        if failed > 0 {
            warn!("{} of {} file(s) could not be probed", failed, reports.len());
        }

        Ok(reports)
    }

    fn probe_file(&self, path: &Path, name: String) -> TrackMetadataReport {
        debug!("Probing {:?}", path);
        match self.probe.probe(path) {
            Ok(mut report) => {
                report.filename = name;
                report
            }
            Err(e) => {
                warn!("{}", e);
                TrackMetadataReport::failed(name, e.to_string())
            }
        }
    }
}
