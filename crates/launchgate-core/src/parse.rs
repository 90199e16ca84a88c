use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ParseError, json_kind};
use crate::model::{AlertSpec, Configuration, UpdateSpec};
use crate::traits::ConfigParser;

const ALERT_SECTION: &str = "alert";
const OPTIONAL_UPDATE_SECTION: &str = "optionalUpdate";
const REQUIRED_UPDATE_SECTION: &str = "requiredUpdate";

#[derive(Deserialize)]
struct RawAlert {
    message: String,
    #[serde(default)]
    blocking: bool,
}

#[derive(Deserialize)]
struct RawUpdate {
    message: String,
    #[serde(rename = "minimumVersion")]
    minimum_version: Option<String>,
    #[serde(rename = "optionalVersion")]
    optional_version: Option<String>,
}

impl RawUpdate {
    /// `minimumVersion` takes precedence when a section carries both keys.
    fn into_spec(self, name: &str) -> Option<UpdateSpec> {
        let Some(minimum_version) = self.minimum_version.or(self.optional_version) else {
            debug!("Dropping `{name}` section without a version");
            return None;
        };
        Some(UpdateSpec {
            message: self.message,
            minimum_version,
        })
    }
}

/// Parses the JSON configuration document.
///
/// Sections are read from the root object, or from the object under
/// `platform_key` when one is configured and present. A malformed section is
/// dropped on its own; only an unusable document fails the parse.
#[derive(Debug, Clone, Default)]
pub struct JsonConfigParser {
    platform_key: Option<String>,
}

impl JsonConfigParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_platform_key(key: impl Into<String>) -> Self {
        Self {
            platform_key: Some(key.into()),
        }
    }

    fn sections<'a>(
        &self,
        root: &'a Map<String, Value>,
    ) -> Result<&'a Map<String, Value>, ParseError> {
        let Some(key) = self.platform_key.as_deref() else {
            return Ok(root);
        };
        match root.get(key) {
            None => Ok(root),
            Some(Value::Object(entry)) => Ok(entry),
            Some(_) => Err(ParseError::PlatformEntry {
                key: key.to_string(),
            }),
        }
    }
}

impl ConfigParser for JsonConfigParser {
    fn parse(&self, bytes: &[u8]) -> Result<Configuration, ParseError> {
        let root = match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(root) => root,
            other => {
                return Err(ParseError::UnexpectedRoot {
                    found: json_kind(&other),
                });
            }
        };
        let sections = self.sections(&root)?;

        let alert = section::<RawAlert>(sections, ALERT_SECTION).map(|raw| AlertSpec {
            message: raw.message,
            blocking: raw.blocking,
        });
        let optional_update = section::<RawUpdate>(sections, OPTIONAL_UPDATE_SECTION)
            .and_then(|raw| raw.into_spec(OPTIONAL_UPDATE_SECTION));
        let required_update = section::<RawUpdate>(sections, REQUIRED_UPDATE_SECTION)
            .and_then(|raw| raw.into_spec(REQUIRED_UPDATE_SECTION));

        Ok(Configuration {
            alert,
            optional_update,
            required_update,
        })
    }
}

fn section<T: DeserializeOwned>(sections: &Map<String, Value>, name: &str) -> Option<T> {
    let value = sections.get(name)?;
    if value.is_null() {
        return None;
    }
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            debug!("Dropping malformed `{name}` section: {error}");
            None
        }
    }
}
