use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use tokio::sync::Mutex;
use url::Url;

use crate::decision::{Decision, decide};
use crate::error::GateError;
use crate::memory::DismissalMemory;
use crate::model::Configuration;
use crate::traits::{ConfigParser, Fetcher, Presenter, Prompt, UserAction};
use crate::version::VersionComparison;

/// External collaborators a gate drives during a check cycle.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn Fetcher>,
    pub parser: Arc<dyn ConfigParser>,
    pub presenter: Arc<dyn Presenter>,
    pub memory: DismissalMemory,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GateOptions {
    pub comparison: VersionComparison,
    /// Drop a cycle before presentation when a newer `check()` has started
    /// since it began fetching.
    pub skip_superseded_cycles: bool,
}

/// Where a check cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    FetchFailed,
    ParseFailed,
    NoAction,
    Superseded,
    PresentationFailed,
    Presented {
        decision: Decision,
        action: UserAction,
        remembered: bool,
    },
}

pub struct LaunchGate {
    config_url: Url,
    update_url: Url,
    app_version: Option<String>,
    collaborators: Collaborators,
    options: GateOptions,
    latest_cycle: AtomicU64,
    presentation: Mutex<()>,
}

impl LaunchGate {
    /// Create a gate for the document at `config_uri`, sending users to
    /// `update_uri` when they accept an update.
    ///
    /// # Errors
    /// Returns an error if either URI is not a valid absolute URL.
    pub fn new(
        config_uri: &str,
        update_uri: &str,
        collaborators: Collaborators,
    ) -> Result<Self, GateError> {
        let config_url = parse_url("configuration", config_uri)?;
        let update_url = parse_url("update", update_uri)?;

        Ok(Self {
            config_url,
            update_url,
            app_version: None,
            collaborators,
            options: GateOptions::default(),
            latest_cycle: AtomicU64::new(0),
            presentation: Mutex::new(()),
        })
    }

    /// Installed version to compare against update sections. Without one,
    /// update sections are skipped.
    #[must_use]
    pub fn with_app_version(mut self, version: Option<String>) -> Self {
        self.app_version = version.filter(|v| !v.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: GateOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn config_url(&self) -> &Url {
        &self.config_url
    }

    #[must_use]
    pub fn memory(&self) -> &DismissalMemory {
        &self.collaborators.memory
    }

    /// Decide what to show for an already parsed document, without presenting
    /// anything or touching dismissal memory.
    #[must_use]
    pub fn evaluate(&self, config: &Configuration) -> Decision {
        decide(
            config,
            self.app_version.as_deref(),
            &self.collaborators.memory,
            self.options.comparison,
        )
    }

    /// Run one fetch, parse, decide, present cycle. Never fails: every error
    /// ends the cycle without showing anything.
    pub async fn check(&self) -> CheckOutcome {
        let cycle = self.latest_cycle.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Gate cycle {cycle}: fetching {}", self.config_url);

        let bytes = match self.collaborators.fetcher.fetch(&self.config_url).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!("Gate cycle {cycle}: {error}");
                return CheckOutcome::FetchFailed;
            }
        };

        let config = match self.collaborators.parser.parse(&bytes) {
            Ok(config) => config,
            Err(error) => {
                debug!("Gate cycle {cycle}: {error}");
                return CheckOutcome::ParseFailed;
            }
        };

        let decision = self.evaluate(&config);
        debug!("Gate cycle {cycle}: decided {decision:?}");
        if decision.is_no_action() {
            return CheckOutcome::NoAction;
        }

        self.present(cycle, decision).await
    }

    async fn present(&self, cycle: u64, decision: Decision) -> CheckOutcome {
        let _visible = self.presentation.lock().await;

        // A newer check may have started while this one waited for the dialog.
        if self.options.skip_superseded_cycles
            && self.latest_cycle.load(Ordering::SeqCst) != cycle
        {
            debug!("Gate cycle {cycle}: superseded by a newer check");
            return CheckOutcome::Superseded;
        }

        let prompt = Prompt {
            decision,
            update_url: self.update_url.clone(),
        };
        let action = match self.collaborators.presenter.present(&prompt).await {
            Ok(action) => action,
            Err(error) => {
                warn!("Failed to present launch gate: {error}");
                return CheckOutcome::PresentationFailed;
            }
        };

        let remembered = self.remember(&prompt.decision);
        info!(
            "Launch gate presented ({action:?}){}",
            if remembered { ", dismissal recorded" } else { "" }
        );

        CheckOutcome::Presented {
            decision: prompt.decision,
            action,
            remembered,
        }
    }

    fn remember(&self, decision: &Decision) -> bool {
        let memory = &self.collaborators.memory;
        match decision {
            Decision::ShowAlert {
                spec,
                blocking: false,
            } => memory.remember(spec),
            Decision::ShowOptionalUpdate { spec } => memory.remember(spec),
            Decision::ShowAlert { blocking: true, .. }
            | Decision::ShowRequiredUpdate { .. }
            | Decision::NoAction => return false,
        }
        true
    }
}

fn parse_url(which: &'static str, value: &str) -> Result<Url, GateError> {
    Url::parse(value).map_err(|source| GateError::InvalidUrl {
        which,
        value: value.to_string(),
        source,
    })
}
