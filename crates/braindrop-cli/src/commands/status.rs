use braindrop_core::AppPaths;
use serde::Serialize;

use crate::commands::common::{format_timestamp, open_store, print_json, read_token_file};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub data_file: String,
    pub downloaded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub raindrops: usize,
    pub collections: usize,
    pub token_saved: bool,
}

pub async fn run_status(paths: &AppPaths, as_json: bool) -> Result<(), CliError> {
    let report = status_report(paths).await?;

    if as_json {
        return print_json(&report);
    }

    println!("Data file:     {}", report.data_file);
    println!("Downloaded:    {}", format_timestamp(report.downloaded_at));
    println!("Raindrops:     {}", report.raindrops);
    println!("Collections:   {}", report.collections);
    println!(
        "Saved token:   {}",
        if report.token_saved { "yes" } else { "no" }
    );
    Ok(())
}

pub async fn status_report(paths: &AppPaths) -> Result<StatusReport, CliError> {
    let store = open_store(paths.data_file()).await?;
    let snapshot = store.snapshot();
    Ok(StatusReport {
        data_file: paths.data_file().display().to_string(),
        downloaded_at: snapshot.downloaded_at(),
        raindrops: snapshot.raindrops().len(),
        collections: snapshot.collections().len(),
        token_saved: read_token_file(paths.token_file())?.is_some(),
    })
}
