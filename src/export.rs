use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::metrics::{ClickEvent, SessionSummary};

pub const CSV_HEADER: [&str; 7] = [
    "Timestamp (ms)",
    "Reaction Time (ms)",
    "Click X",
    "Click Y",
    "Ball X",
    "Ball Y",
    "Accuracy (px)",
];

/// Everything a session export carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub summary: Option<SessionSummary>,
    pub detailed_metrics: Vec<ClickEvent>,
}

impl SessionReport {
    pub fn new(summary: Option<SessionSummary>, events: &[ClickEvent]) -> Self {
        Self {
            summary,
            detailed_metrics: events.to_vec(),
        }
    }
}

pub fn to_csv(events: &[ClickEvent]) -> io::Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;

    for e in events {
        writer.write_record([
            e.timestamp_ms.to_string(),
            e.reaction_time_ms.to_string(),
            format!("{:.2}", e.click_position.x),
            format!("{:.2}", e.click_position.y),
            format!("{:.2}", e.target_position.x),
            format!("{:.2}", e.target_position.y),
            format!("{:.2}", e.miss_distance_px),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn to_json(summary: Option<SessionSummary>, events: &[ClickEvent]) -> io::Result<String> {
    Ok(serde_json::to_string_pretty(&SessionReport::new(
        summary, events,
    ))?)
}

pub fn read_report<P: AsRef<Path>>(path: P) -> io::Result<SessionReport> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Paths written by a single `write_session` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Write `session-<stamp>.csv` and `session-<stamp>.json` into `dir`.
pub fn write_session(
    dir: &Path,
    at: DateTime<Local>,
    summary: Option<SessionSummary>,
    events: &[ClickEvent],
) -> io::Result<ExportPaths> {
    fs::create_dir_all(dir)?;

    let stem = format!("session-{}", at.format("%Y%m%d-%H%M%S"));
    let paths = ExportPaths {
        csv: dir.join(format!("{stem}.csv")),
        json: dir.join(format!("{stem}.json")),
    };

    fs::write(&paths.csv, to_csv(events)?)?;
    fs::write(&paths.json, to_json(summary, events)?)?;

    log::info!(
        "exported {} events to {}",
        events.len(),
        paths.csv.display()
    );
    Ok(paths)
}
