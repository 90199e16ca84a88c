use serde::Serialize;

pub const ALERT_REMEMBER_KEY: &str = "alert";
pub const UPDATE_REMEMBER_KEY: &str = "update";

/// A gate message whose dismissal can be remembered across launches.
///
/// Two items sharing a `remember_key` but with different `remember_string`
/// values are distinct messages: dismissing one never suppresses the other.
pub trait RememberableItem {
    /// Slot the dismissal is stored under.
    fn remember_key(&self) -> &str;

    /// Fingerprint of the message content currently occupying the slot.
    fn remember_string(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSpec {
    pub message: String,
    pub blocking: bool,
}

impl AlertSpec {
    pub fn new(message: impl Into<String>, blocking: bool) -> Self {
        Self {
            message: message.into(),
            blocking,
        }
    }
}

impl RememberableItem for AlertSpec {
    fn remember_key(&self) -> &str {
        ALERT_REMEMBER_KEY
    }

    fn remember_string(&self) -> &str {
        &self.message
    }
}

/// An update prompt. Whether it is optional or required depends on the
/// configuration section it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSpec {
    pub message: String,
    pub minimum_version: String,
}

impl UpdateSpec {
    pub fn new(message: impl Into<String>, minimum_version: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            minimum_version: minimum_version.into(),
        }
    }
}

impl RememberableItem for UpdateSpec {
    fn remember_key(&self) -> &str {
        UPDATE_REMEMBER_KEY
    }

    fn remember_string(&self) -> &str {
        &self.minimum_version
    }
}

/// One parsed remote document. Every section is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub alert: Option<AlertSpec>,
    pub optional_update: Option<UpdateSpec>,
    pub required_update: Option<UpdateSpec>,
}

impl Configuration {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alert.is_none() && self.optional_update.is_none() && self.required_update.is_none()
    }
}
