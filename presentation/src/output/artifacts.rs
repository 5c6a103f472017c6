//! Writing fetched artifacts (diagram, report) to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use council_application::ReportFile;
use council_domain::DecisionDiagram;

/// Decode the diagram's base64 payload and write the image to `path`.
pub fn save_diagram(diagram: &DecisionDiagram, path: &Path) -> io::Result<()> {
    let bytes = STANDARD
        .decode(&diagram.image_base64)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, bytes)
}

/// Write the report document, using its dated default filename when no
/// explicit path is given. Returns the path written.
pub fn save_report(report: &ReportFile, path: Option<&Path>) -> io::Result<PathBuf> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&report.filename));
    fs::write(&target, &report.bytes)?;
    Ok(target)
}
