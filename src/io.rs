pub mod param_parser;
pub mod write_to_csv;
pub mod write_to_vtu;

use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use once_cell::sync::Lazy;

use crate::error::AdiError;

/// Run directory `outputs/MMDD_HHMM_SS`, resolved once per process.
static OUTPUT_DIR: Lazy<String> = Lazy::new(|| {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let secs_in_day = 24 * 60 * 60;
    // day of year approximated with 30-day months
    let day_of_year = (timestamp / secs_in_day) % 365;
    let month = day_of_year / 30 + 1;
    let day = day_of_year % 30 + 1;
    let seconds_today = timestamp % secs_in_day;
    format!(
        "outputs/{:02}{:02}_{:02}{:02}_{:02}",
        month,
        day,
        seconds_today / 3600,
        (seconds_today % 3600) / 60,
        seconds_today % 60
    )
});

/// Path of `file_name` inside the run directory, created on first use.
pub(crate) fn output_path(file_name: &str) -> Result<String, AdiError> {
    let dir = &*OUTPUT_DIR;
    if !Path::new(dir).exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(format!("{dir}/{file_name}"))
}
