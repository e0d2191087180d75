use braindrop_core::util::normalize_text_option;

use crate::cli::{ConfigCommands, TagOrderArg};
use crate::commands::common::print_json;
use crate::error::CliError;
use crate::settings::CliSettings;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            let settings = CliSettings::load().map_err(CliError::Config)?;
            print_json(&settings)
        }
        ConfigCommands::Set {
            api_base_url,
            timeout_secs,
            tag_order,
            reset,
        } => {
            let current = if reset {
                CliSettings::default()
            } else {
                CliSettings::load().map_err(CliError::Config)?
            };
            let settings = apply_settings(current, api_base_url, timeout_secs, tag_order)?;
            let path = settings.save().map_err(CliError::Config)?;
            println!("Settings saved to {}", path.display());
            Ok(())
        }
    }
}

/// Merge explicit values into `settings`; an empty URL clears the override.
pub fn apply_settings(
    mut settings: CliSettings,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    tag_order: Option<TagOrderArg>,
) -> Result<CliSettings, CliError> {
    if let Some(url) = api_base_url {
        settings.api_base_url = normalize_text_option(Some(url));
    }
    if let Some(seconds) = timeout_secs {
        settings.timeout_secs = Some(seconds);
    }
    if let Some(order) = tag_order {
        settings.tag_order = order.into();
    }
    settings.validate().map_err(CliError::Config)?;
    Ok(settings)
}
