//! Write the session log to a file.

use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

use logging::LogLine;
use time::{OffsetDateTime, macros::format_description};
use tokio::fs;
use tracing::debug;

use crate::error::Result;

/// File name for an export of `profile` taken at `now`.
pub fn export_file_name(profile: &str, now: OffsetDateTime) -> Result<String> {
    let stamp = now.format(format_description!(
        "[year]-[month]-[day]_[hour]-[minute]-[second]"
    ))?;
    Ok(format!("logs-{profile}-{stamp}.txt"))
}

/// Render lines as `[<time>] <LEVEL>: <message>`, one per line.
pub fn render_lines(lines: &[LogLine]) -> Result<String> {
    let mut out = String::new();
    for line in lines {
        let at = OffsetDateTime::from(line.at).format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))?;
        let _ignored = writeln!(out, "[{at}] {}: {}", line.level, line.message);
    }
    Ok(out)
}

/// Write `lines` under `dir`, creating it as needed. Returns the file written.
pub async fn export_log(
    dir: &Path,
    profile: &str,
    lines: &[LogLine],
    now: OffsetDateTime,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(profile, now)?);
    let body = render_lines(lines)?;
    fs::create_dir_all(dir).await?;
    fs::write(&path, body).await?;
    debug!(path = %path.display(), count = lines.len(), "log exported");
    Ok(path)
}
