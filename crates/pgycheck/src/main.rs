mod cli;
mod error;
mod logging;
mod output;
mod settings;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{debug, info, warn};
use pgycheck_core::{FailoverClient, ReqwestTransport, UpdateChecker, UpdateInfo};
use pgycheck_platform::AppPaths;
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;
use crate::error::AppError;
use crate::settings::AppSettings;

const CANCELLED_EXIT_CODE: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let paths = AppPaths::new().ok();

    let (stored, load_error) = match paths.as_ref().map(AppSettings::load).transpose() {
        Ok(stored) => (stored.unwrap_or_default(), None),
        Err(error) => (AppSettings::default(), Some(error)),
    };
    let settings = cli.effective(&stored);

    logging::init_logging(
        paths.as_ref().map(AppPaths::log_file),
        settings.debug_logging,
        settings.max_log_size_bytes,
    );
    if let Some(error) = load_error {
        warn!("Ignoring invalid settings file: {error}");
    }

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = run(&cli, &stored, &settings, paths.as_ref(), &cancel).await;
    ctrl_c.abort();

    match result {
        Ok(Some(info)) => match print_info(&cli, &info) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => fail(&error),
        },
        Ok(None) => {
            info!("Update check cancelled");
            ExitCode::from(CANCELLED_EXIT_CODE)
        }
        Err(error) => fail(&error),
    }
}

async fn run(
    cli: &Cli,
    stored: &AppSettings,
    settings: &AppSettings,
    paths: Option<&AppPaths>,
    cancel: &CancellationToken,
) -> Result<Option<UpdateInfo>, AppError> {
    let api_key = resolve_api_key(settings, paths)?;

    if cli.save_settings {
        save_settings(&cli.persisted(stored), paths)?;
        debug!("Settings saved");
    }

    let transport = ReqwestTransport::with_timeouts(
        Duration::from_secs(settings.http_timeout_secs),
        Duration::from_secs(settings.connect_timeout_secs),
    )?;
    let checker = UpdateChecker::new(
        api_key,
        FailoverClient::new(settings.host_list(), transport),
    );
    debug!("Checking {} host(s)", checker.client().hosts().len());

    let params = checker.parameters(
        &cli.app_key,
        cli.build_version.as_deref(),
        cli.build_build_version,
        cli.channel_key.as_deref(),
    );
    match checker.client().check_until_cancelled(&params, cancel).await {
        Some(result) => Ok(Some(result?)),
        None => Ok(None),
    }
}

fn save_settings(settings: &AppSettings, paths: Option<&AppPaths>) -> Result<(), AppError> {
    let paths = paths.ok_or_else(|| {
        AppError::SettingsSave(std::io::Error::other(
            "could not determine the settings directory",
        ))
    })?;
    settings.save(paths).map_err(AppError::SettingsSave)
}

fn resolve_api_key<'a>(
    settings: &'a AppSettings,
    paths: Option<&AppPaths>,
) -> Result<&'a str, AppError> {
    settings
        .api_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            let location = paths.map_or_else(
                || "the settings file".to_string(),
                |paths| paths.settings_file().display().to_string(),
            );
            AppError::missing_api_key(location)
        })
}

fn print_info(cli: &Cli, info: &UpdateInfo) -> Result<(), AppError> {
    if cli.json {
        println!("{}", output::render_json(info)?);
    } else {
        print!("{}", output::render_summary(info));
    }
    Ok(())
}

fn fail(error: &AppError) -> ExitCode {
    eprintln!("{error}");
    ExitCode::from(error.exit_code())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pgycheck_platform::AppPaths;

    use super::{resolve_api_key, save_settings};
    use crate::error::AppError;
    use crate::settings::AppSettings;

    #[test]
    fn configured_api_key_is_used() {
        let settings = AppSettings {
            api_key: Some("abc".to_string()),
            ..AppSettings::default()
        };

        assert_eq!(resolve_api_key(&settings, None).ok(), Some("abc"));
    }

    #[test]
    fn missing_or_empty_api_key_names_settings_file() {
        let paths = AppPaths::under(Path::new("/srv/root"));

        for api_key in [None, Some(String::new())] {
            let settings = AppSettings {
                api_key,
                ..AppSettings::default()
            };

            let error = resolve_api_key(&settings, Some(&paths))
                .expect_err("a key is required");

            assert!(matches!(
                error,
                AppError::MissingApiKey { settings: ref location } if location.ends_with("settings.json")
            ));
        }
    }

    #[test]
    fn save_without_settings_directory_is_an_error() {
        let error = save_settings(&AppSettings::default(), None)
            .expect_err("there is nowhere to save");

        assert!(matches!(error, AppError::SettingsSave(_)));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn saved_settings_land_in_settings_file() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let paths = AppPaths::under(temp_dir.path());
        let settings = AppSettings {
            api_key: Some("abc".to_string()),
            ..AppSettings::default()
        };

        save_settings(&settings, Some(&paths)).expect("settings should be saved");

        assert_eq!(
            AppSettings::load(&paths).expect("saved settings should parse"),
            settings
        );
    }
}
