use serde::Serialize;

use crate::memory::DismissalMemory;
use crate::model::{AlertSpec, Configuration, UpdateSpec};
use crate::version::VersionComparison;

/// The single gate surfaced for one check cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    NoAction,
    ShowAlert { spec: AlertSpec, blocking: bool },
    ShowOptionalUpdate { spec: UpdateSpec },
    ShowRequiredUpdate { spec: UpdateSpec },
}

impl Decision {
    #[must_use]
    pub fn is_no_action(&self) -> bool {
        matches!(self, Self::NoAction)
    }

    /// Whether presenting this decision should record a dismissal.
    #[must_use]
    pub fn is_rememberable(&self) -> bool {
        matches!(
            self,
            Self::ShowAlert {
                blocking: false,
                ..
            } | Self::ShowOptionalUpdate { .. }
        )
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NoAction => None,
            Self::ShowAlert { spec, .. } => Some(&spec.message),
            Self::ShowOptionalUpdate { spec } | Self::ShowRequiredUpdate { spec } => {
                Some(&spec.message)
            }
        }
    }
}

/// Pick the gate to show for `config`.
///
/// Sections are tried in order required update, optional update, alert. The
/// first section that is present (and, for updates, evaluable because the app
/// version is known) decides the outcome on its own; a suppressed section
/// yields `NoAction` rather than falling through to the next one.
#[must_use]
pub fn decide(
    config: &Configuration,
    app_version: Option<&str>,
    memory: &DismissalMemory,
    comparison: VersionComparison,
) -> Decision {
    if let (Some(required), Some(version)) = (&config.required_update, app_version) {
        if comparison.is_older(version, &required.minimum_version) {
            return Decision::ShowRequiredUpdate {
                spec: required.clone(),
            };
        }
    } else if let (Some(optional), Some(version)) = (&config.optional_update, app_version) {
        if !memory.contains(optional) && comparison.is_older(version, &optional.minimum_version) {
            return Decision::ShowOptionalUpdate {
                spec: optional.clone(),
            };
        }
    } else if let Some(alert) = &config.alert
        && (alert.blocking || !memory.contains(alert))
    {
        return Decision::ShowAlert {
            spec: alert.clone(),
            blocking: alert.blocking,
        };
    }

    Decision::NoAction
}
