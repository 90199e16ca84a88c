use async_trait::async_trait;
use url::Url;

use crate::decision::Decision;
use crate::error::{FetchError, ParseError, PresentError};
use crate::model::Configuration;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the raw configuration document. An empty body is an error.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

pub trait ConfigParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<Configuration, ParseError>;
}

/// What the user did with a presented gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Dismissed,
    AcceptedUpdate,
}

/// Everything a presenter needs to render one gate.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub decision: Decision,
    /// Store page to open when the user accepts an update.
    pub update_url: Url,
}

impl Prompt {
    /// Whether the dialog offers a dismiss button. Required updates and
    /// blocking alerts do not.
    #[must_use]
    pub fn is_dismissable(&self) -> bool {
        match &self.decision {
            Decision::ShowAlert { blocking, .. } => !blocking,
            Decision::ShowOptionalUpdate { .. } => true,
            Decision::ShowRequiredUpdate { .. } | Decision::NoAction => false,
        }
    }

    /// Whether the dialog offers an update button.
    #[must_use]
    pub fn offers_update(&self) -> bool {
        matches!(
            self.decision,
            Decision::ShowOptionalUpdate { .. } | Decision::ShowRequiredUpdate { .. }
        )
    }
}

#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show `prompt` on whatever surface is current at call time and wait for
    /// the user's choice.
    async fn present(&self, prompt: &Prompt) -> Result<UserAction, PresentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertSpec, UpdateSpec};

    fn prompt(decision: Decision) -> Prompt {
        Prompt {
            decision,
            update_url: Url::parse("https://apps.example.com/app/42").expect("valid test URL"),
        }
    }

    #[test]
    fn buttons_follow_gate_kind() {
        let alert = prompt(Decision::ShowAlert {
            spec: AlertSpec::new("hi", false),
            blocking: false,
        });
        assert!(alert.is_dismissable());
        assert!(!alert.offers_update());

        let blocking = prompt(Decision::ShowAlert {
            spec: AlertSpec::new("hi", true),
            blocking: true,
        });
        assert!(!blocking.is_dismissable());
        assert!(!blocking.offers_update());

        let optional = prompt(Decision::ShowOptionalUpdate {
            spec: UpdateSpec::new("u", "2.0"),
        });
        assert!(optional.is_dismissable());
        assert!(optional.offers_update());

        let required = prompt(Decision::ShowRequiredUpdate {
            spec: UpdateSpec::new("u", "2.0"),
        });
        assert!(!required.is_dismissable());
        assert!(required.offers_update());
    }
}
