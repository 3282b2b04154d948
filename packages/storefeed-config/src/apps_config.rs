use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::ConfigError;
use crate::platform::Platform;

/// Tracked applications
///
/// JSON Schema:
/// ```json
/// {
///   "apps": [
///     {
///       "id": "proton-vpn",
///       "name": "Proton VPN",
///       "playStoreId": "ch.protonvpn.android",
///       "appStoreId": "1437005085"
///     }
///   ]
/// }
/// ```
///
/// `vpnApps` is accepted in place of `apps` for older config files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedApp {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_store_id: Option<String>,
}

impl TrackedApp {
    /// Store identifier for `platform`, ignoring blank values.
    pub fn store_id(&self, platform: Platform) -> Option<&str> {
        let id = match platform {
            Platform::Android => self.play_store_id.as_deref(),
            Platform::Ios => self.app_store_id.as_deref(),
        };
        id.map(str::trim).filter(|id| !id.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AppsConfig {
    #[serde(alias = "vpnApps")]
    pub apps: Vec<TrackedApp>,
}

impl AppsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppsConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: AppsConfig = serde_json::from_str(content)
            .map_err(|source| ConfigError::Parse {
                path: Default::default(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for app in &self.apps {
            if app.id.trim().is_empty() {
                return Err(ConfigError::EmptyAppId {
                    name: app.name.clone(),
                });
            }
            if !seen.insert(app.id.as_str()) {
                return Err(ConfigError::DuplicateAppId { id: app.id.clone() });
            }
        }
        Ok(())
    }
}
