use braindrop_core::{maybe_redownload, AppPaths, SyncOutcome};

use crate::commands::common::open_online_store;
use crate::error::CliError;
use crate::settings::CliSettings;

pub async fn run_sync(
    paths: &AppPaths,
    cli_token: Option<&str>,
    settings: &CliSettings,
    force: bool,
) -> Result<(), CliError> {
    let store = open_online_store(paths, cli_token, settings).await?;
    let report = maybe_redownload(&store, force).await?;

    println!("Signed in as {}", report.user.full_name);
    println!("{}", describe_outcome(&report.outcome));
    Ok(())
}

pub fn describe_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Downloaded {
            reason,
            raindrops,
            collections,
        } => format!(
            "Downloaded {raindrops} raindrops in {collections} collections ({})",
            reason.describe()
        ),
        SyncOutcome::UpToDate => "Local data is up to date".to_string(),
    }
}
