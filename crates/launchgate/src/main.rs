mod cli;
mod error;
mod logging;
mod presenter;
mod settings;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use launchgate_core::{
    CheckOutcome, Collaborators, ConfigParser, Decision, DismissalMemory, GateOptions,
    HttpFetcher, JsonConfigParser, JsonFileStore, LaunchGate, VersionComparison, decide,
};
use launchgate_platform::AppPaths;
use log::{debug, error};

use crate::cli::{Cli, Command};
use crate::error::AppError;
use crate::presenter::TerminalPresenter;
use crate::settings::GateSettings;

/// Exit status when a required update or blocking alert was shown, so a
/// wrapper script can refuse to start the application.
const LAUNCH_BLOCKED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            eprintln!("launchgate: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let paths = AppPaths::new()?;
    let mut settings = GateSettings::load(&paths);
    apply_overrides(&mut settings, &cli);

    logging::init_logging(&paths, &settings);

    let memory = DismissalMemory::new(JsonFileStore::open(settings.memory_path(&paths)));
    let app_version = cli
        .app_version
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    match cli.command.unwrap_or(Command::Check) {
        Command::Check => check(&settings, memory, app_version).await,
        Command::Decide { file } => {
            let decision = decide_file(&settings, &memory, &app_version, &file)?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Forget { slot } => {
            memory.forget_key(slot.key());
            println!("Cleared `{}` dismissal", slot.key());
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_overrides(settings: &mut GateSettings, cli: &Cli) {
    if let Some(url) = &cli.config_url {
        settings.config_url = Some(url.clone());
    }
    if let Some(url) = &cli.store_url {
        settings.store_url = Some(url.clone());
    }
    if let Some(key) = &cli.platform_key {
        settings.platform_key = Some(key.clone());
    }
    if let Some(path) = &cli.memory_file {
        settings.memory_file = Some(path.clone());
    }
    if cli.numeric {
        settings.version_comparison = VersionComparison::Numeric;
    }
    if cli.debug {
        settings.debug_logging = true;
    }
}

fn build_parser(settings: &GateSettings) -> JsonConfigParser {
    settings
        .platform_key
        .as_ref()
        .map_or_else(JsonConfigParser::new, |key| {
            JsonConfigParser::with_platform_key(key.clone())
        })
}

async fn check(
    settings: &GateSettings,
    memory: DismissalMemory,
    app_version: String,
) -> Result<ExitCode, AppError> {
    let config_url = settings
        .config_url
        .as_deref()
        .ok_or(AppError::MissingSetting("config-url"))?;
    let store_url = settings
        .store_url
        .as_deref()
        .ok_or(AppError::MissingSetting("store-url"))?;

    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(settings.http_timeout_secs))?;
    let gate = LaunchGate::new(
        config_url,
        store_url,
        Collaborators {
            fetcher: Arc::new(fetcher),
            parser: Arc::new(build_parser(settings)),
            presenter: Arc::new(TerminalPresenter::stdio()),
            memory,
        },
    )?
    .with_app_version(Some(app_version))
    .with_options(GateOptions {
        comparison: settings.version_comparison,
        skip_superseded_cycles: settings.skip_superseded_cycles,
    });

    let outcome = gate.check().await;
    debug!("Check finished: {outcome:?}");

    Ok(if launch_blocked(&outcome) {
        ExitCode::from(LAUNCH_BLOCKED)
    } else {
        ExitCode::SUCCESS
    })
}

fn launch_blocked(outcome: &CheckOutcome) -> bool {
    matches!(
        outcome,
        CheckOutcome::Presented {
            decision: Decision::ShowRequiredUpdate { .. } | Decision::ShowAlert { blocking: true, .. },
            ..
        }
    )
}

fn decide_file(
    settings: &GateSettings,
    memory: &DismissalMemory,
    app_version: &str,
    file: &Path,
) -> Result<Decision, AppError> {
    let bytes = std::fs::read(file).map_err(|source| AppError::ReadDocument {
        path: file.display().to_string(),
        source,
    })?;
    let config = build_parser(settings).parse(&bytes)?;
    Ok(decide(
        &config,
        Some(app_version),
        memory,
        settings.version_comparison,
    ))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use launchgate_core::{AlertSpec, UpdateSpec, UserAction};

    use super::*;

    #[test]
    fn cli_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "launchgate",
            "--config-url",
            "https://c.example/g.json",
            "--platform-key",
            "desktop",
            "--numeric",
            "--debug",
        ])
        .expect("arguments should parse");
        let mut settings = GateSettings {
            config_url: Some("https://old.example/g.json".to_string()),
            store_url: Some("https://store.example/app".to_string()),
            ..GateSettings::default()
        };

        apply_overrides(&mut settings, &cli);

        assert_eq!(settings.config_url.as_deref(), Some("https://c.example/g.json"));
        assert_eq!(settings.store_url.as_deref(), Some("https://store.example/app"));
        assert_eq!(settings.platform_key.as_deref(), Some("desktop"));
        assert_eq!(settings.version_comparison, VersionComparison::Numeric);
        assert!(settings.debug_logging);
    }

    #[test]
    fn decide_file_reads_nested_document_without_recording() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let document = temp_dir.path().join("gate.json");
        std::fs::write(
            &document,
            r#"{"desktop": {"optionalUpdate": {"message": "Update available", "optionalVersion": "2.0"}}}"#,
        )
        .expect("fixture should be written");
        let settings = GateSettings {
            platform_key: Some("desktop".to_string()),
            ..GateSettings::default()
        };
        let memory = DismissalMemory::in_memory();

        let decision =
            decide_file(&settings, &memory, "1.5", &document).expect("decision should succeed");

        assert_eq!(
            decision,
            Decision::ShowOptionalUpdate {
                spec: UpdateSpec::new("Update available", "2.0")
            }
        );
        assert_eq!(memory.stored("update"), None);
    }

    #[test]
    fn decide_file_reports_missing_document() {
        let settings = GateSettings::default();
        let memory = DismissalMemory::in_memory();

        let result = decide_file(
            &settings,
            &memory,
            "1.0",
            Path::new("/nonexistent/launchgate/gate.json"),
        );

        assert!(matches!(result, Err(AppError::ReadDocument { .. })));
    }

    #[test]
    fn only_required_updates_and_blocking_alerts_block_launch() {
        let presented = |decision| CheckOutcome::Presented {
            decision,
            action: UserAction::Dismissed,
            remembered: false,
        };

        assert!(launch_blocked(&presented(Decision::ShowRequiredUpdate {
            spec: UpdateSpec::new("Update", "2.0"),
        })));
        assert!(launch_blocked(&presented(Decision::ShowAlert {
            spec: AlertSpec::new("Down", true),
            blocking: true,
        })));
        assert!(!launch_blocked(&presented(Decision::ShowAlert {
            spec: AlertSpec::new("Maintenance", false),
            blocking: false,
        })));
        assert!(!launch_blocked(&CheckOutcome::FetchFailed));
        assert!(!launch_blocked(&CheckOutcome::NoAction));
    }
}
