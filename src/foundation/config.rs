use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::error::{MenuGraphError, MenuGraphResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Generator settings.
///
/// The prefixes define what the generator owns: every parameter table entry, graph parameter and
/// layer under them is regenerated (or deleted) on each run.
pub struct GeneratorConfig {
    /// Name of the system; used for the shared blend layer and the remoting address root.
    pub system_name: String,
    /// Namespace prefix of parameter-table entries.
    pub param_prefix: String,
    /// Prefix of every emitted layer name.
    pub layer_prefix: String,
    /// Prefix of graph-only parameters written by proximity receivers.
    pub remote_prefix: String,
    /// Prefix of proximity tags.
    pub tag_prefix: String,
    /// Scene path of the object that carries proximity senders and receivers.
    pub remoting_root: String,
    /// Maximum number of controls in one mirrored menu page.
    pub max_menu_controls: usize,
    /// How long the last run status stays visible.
    pub status_window_secs: u64,
    /// Write-defaults flag applied to generated FSM states.
    pub write_defaults: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            system_name: "MenuGraph".to_string(),
            param_prefix: "MG".to_string(),
            layer_prefix: "MG-".to_string(),
            remote_prefix: "RemoteMG-".to_string(),
            tag_prefix: "MG-Contact-".to_string(),
            remoting_root: "MG-Remoting-Root".to_string(),
            max_menu_controls: 8,
            status_window_secs: 10,
            write_defaults: false,
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from a JSON reader; missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> MenuGraphResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| MenuGraphError::serde(format!("parse generator config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MenuGraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MenuGraphError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> MenuGraphResult<()> {
        for (field, value) in [
            ("system_name", &self.system_name),
            ("param_prefix", &self.param_prefix),
            ("layer_prefix", &self.layer_prefix),
            ("remote_prefix", &self.remote_prefix),
            ("tag_prefix", &self.tag_prefix),
            ("remoting_root", &self.remoting_root),
        ] {
            if value.trim().is_empty() {
                return Err(MenuGraphError::validation(format!(
                    "config {field} must be non-empty"
                )));
            }
        }
        if self.max_menu_controls == 0 {
            return Err(MenuGraphError::validation(
                "config max_menu_controls must be > 0",
            ));
        }
        if self.param_prefix == self.remote_prefix {
            return Err(MenuGraphError::validation(
                "config param_prefix and remote_prefix must differ",
            ));
        }
        Ok(())
    }

    pub fn status_window(&self) -> Duration {
        Duration::from_secs(self.status_window_secs)
    }

    pub fn parameter_name(&self, token: &str) -> String {
        format!("{}{token}", self.param_prefix)
    }

    pub fn item_layer_name(&self, token: &str) -> String {
        format!("{}{token}", self.layer_prefix)
    }

    /// Name of the layer holding the shared blend combinator.
    pub fn shared_layer_name(&self) -> String {
        format!("{}{}", self.layer_prefix, self.system_name)
    }

    pub fn blend_weight_parameter(&self) -> String {
        format!("{}Internal-BlendTree-Weight", self.param_prefix)
    }

    pub fn arbitration_layer_name(&self, key: &str) -> String {
        format!("{}Arbitration-{key}", self.layer_prefix)
    }

    pub fn contact_tag(&self, token: &str) -> String {
        format!("{}{token}", self.tag_prefix)
    }

    pub fn receiver_parameter(&self, token: &str) -> String {
        format!("{}RCV-{token}", self.remote_prefix)
    }

    pub fn receiver_layer_name(&self) -> String {
        format!("{}Remoting-Receiver", self.layer_prefix)
    }

    /// Parameter-table suffix (without `param_prefix`) of the trigger for a remote target.
    pub fn trigger_suffix(&self, target_token: &str) -> String {
        format!("RemoteTrigger-{target_token}")
    }

    pub fn sender_layer_name(&self, target_token: &str) -> String {
        format!("{}Remote-{target_token}", self.layer_prefix)
    }

    pub fn sender_object(&self, tag: &str) -> String {
        format!("{}/Sender-{tag}", self.remoting_root)
    }

    /// `true` if `name` lives in the parameter namespace owned by the generator.
    pub fn owns_parameter(&self, name: &str) -> bool {
        name.starts_with(&self.param_prefix) || name.starts_with(&self.remote_prefix)
    }

    pub fn owns_layer(&self, name: &str) -> bool {
        name.starts_with(&self.layer_prefix)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
