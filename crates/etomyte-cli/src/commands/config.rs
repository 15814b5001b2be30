//! `etomyte config` - inspect the effective configuration.

use crate::{
    cli::{ConfigCommands, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config
                .get(&key)
                .ok_or(CliError::UnknownConfigKey { key })?;
            output.emit(&value)?;
        }

        ConfigCommands::List => {
            if output.wants_json() {
                return output.json(&config);
            }
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.emit(&serialised)?;
        }

        ConfigCommands::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(|| AppConfig::config_path(&global.project_dir()));
            output.emit(&path.display().to_string())?;
            if !path.exists() {
                output.note("(file does not exist; built-in defaults apply)")?;
            }
        }
    }

    Ok(())
}
