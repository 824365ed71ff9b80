use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GitxError;

const CONFIG_DIR_NAME: &str = "gitx";
const CONFIG_FILE_NAME: &str = "config.json";

/// Config keys that `gitx config set` may write. Checked in order; `*`
/// matches any single dotted segment (workspace ids contain `/`, which is
/// not a segment separator, so `workspaces.acme/widget.lastBranch` matches).
struct AllowedKey {
    pattern: &'static str,
    description: &'static str,
}

const ALLOWED_KEYS: &[AllowedKey] = &[
    AllowedKey {
        pattern: "globals.baseDir",
        description: "directory all workspaces are created under",
    },
    AllowedKey {
        pattern: "globals.defaultProvider",
        description: "provider used to build clone URLs from shorthand",
    },
    AllowedKey {
        pattern: "globals.editor",
        description: "editor launched by 'gitx go'",
    },
    AllowedKey {
        pattern: "workspaces.*.defaultBranch",
        description: "default branch for one workspace",
    },
    AllowedKey {
        pattern: "workspaces.*.lastBranch",
        description: "last branch visited in one workspace",
    },
];

fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pat: Vec<&str> = pattern.split('.').collect();
    let segs: Vec<&str> = key.split('.').collect();
    pat.len() == segs.len()
        && pat
            .iter()
            .zip(&segs)
            .all(|(p, s)| *p == "*" || p == s)
}

/// Global settings, one per config file. Unknown fields in the underlying
/// document are ignored here but preserved on save (the raw document is the
/// source of truth for persistence).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalConfig {
    pub base_dir: String,
    pub default_provider: String,
    pub editor: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            base_dir: "${HOME}/sources/workspaces".to_string(),
            default_provider: "github".to_string(),
            editor: "nano".to_string(),
        }
    }
}

/// Per-repository metadata, keyed by `org/name`. Created on first clone,
/// updated on every branch switch, never auto-deleted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceRecord {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub default_branch: String,
    pub last_branch: String,
}

/// The persisted configuration document. Loaded once per invocation and
/// written back whole (pretty-printed) after each mutating command; two
/// simultaneous invocations race read-modify-write and the last writer wins.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    raw: Value,
}

fn defaults() -> Value {
    json!({
        "globals": serde_json::to_value(GlobalConfig::default()).unwrap(),
        "workspaces": {},
    })
}

/// Shallow merge: top-level object sections from disk override defaults
/// key-by-key; unknown sections and keys are kept so the format can evolve.
fn merge(mut base: Value, disk: Value) -> Value {
    let Value::Object(disk_obj) = disk else {
        return base;
    };
    if let Some(base_obj) = base.as_object_mut() {
        for (key, value) in disk_obj {
            match (base_obj.get_mut(&key), value) {
                (Some(Value::Object(section)), Value::Object(incoming)) => {
                    for (k, v) in incoming {
                        section.insert(k, v);
                    }
                }
                (_, value) => {
                    base_obj.insert(key, value);
                }
            }
        }
    }
    base
}

impl ConfigStore {
    /// `$XDG_CONFIG_HOME/gitx/config.json`, falling back to
    /// `~/.config/gitx/config.json`.
    pub fn config_path() -> Result<PathBuf> {
        let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg)
        } else {
            dirs::home_dir()
                .context("could not determine home directory")?
                .join(".config")
        };
        Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Self> {
        Ok(Self::load_from(Self::config_path()?))
    }

    /// Load from an explicit path. A missing file yields defaults; an
    /// unparsable file logs a warning and yields defaults rather than
    /// failing the whole command.
    pub fn load_from(path: PathBuf) -> Self {
        let raw = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(disk) => merge(defaults(), disk),
                Err(err) => {
                    log::warn!("invalid JSON in {}: {err}; using defaults", path.display());
                    defaults()
                }
            },
            Err(_) => defaults(),
        };
        ConfigStore { path, raw }
    }

    /// The full raw document, for `gitx config show`.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn globals(&self) -> GlobalConfig {
        self.raw
            .get("globals")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// The expanded, materialized base directory. `${VAR}` and `~` are
    /// expanded once here; the directory is created if absent.
    pub fn base_dir(&self) -> Result<PathBuf> {
        let raw = self.globals().base_dir;
        let expanded = shellexpand::full(&raw)
            .with_context(|| format!("could not expand baseDir '{raw}'"))?;
        let path = PathBuf::from(expanded.as_ref());
        fs::create_dir_all(&path)
            .with_context(|| format!("could not create base directory {}", path.display()))?;
        Ok(path)
    }

    pub fn workspace(&self, id: &str) -> Option<WorkspaceRecord> {
        self.raw
            .get("workspaces")
            .and_then(|ws| ws.get(id))
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn upsert_workspace(&mut self, id: &str, record: &WorkspaceRecord) -> Result<()> {
        let workspaces = self
            .raw
            .as_object_mut()
            .context("config root must be an object")?
            .entry("workspaces")
            .or_insert_with(|| json!({}))
            .as_object_mut()
            .context("config 'workspaces' must be an object")?;
        workspaces.insert(id.to_string(), serde_json::to_value(record)?);
        Ok(())
    }

    /// Navigate the raw document along a dotted path.
    pub fn get_value(&self, dotted: &str) -> Option<&Value> {
        let mut current = &self.raw;
        for segment in dotted.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Write one leaf value, validated against the allow-list. Intermediate
    /// objects are created along the path.
    pub fn set_value(&mut self, dotted: &str, value: &str) -> Result<(), GitxError> {
        if !ALLOWED_KEYS.iter().any(|k| pattern_matches(k.pattern, dotted)) {
            let supported = ALLOWED_KEYS
                .iter()
                .map(|k| k.pattern)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(GitxError::UnsupportedConfigKey {
                key: dotted.to_string(),
                supported,
            });
        }

        let segments: Vec<&str> = dotted.split('.').collect();
        let mut current = &mut self.raw;
        for segment in &segments[..segments.len() - 1] {
            if !current.is_object() {
                *current = json!({});
            }
            current = current
                .as_object_mut()
                .unwrap()
                .entry(segment.to_string())
                .or_insert_with(|| json!({}));
        }
        if !current.is_object() {
            *current = json!({});
        }
        current
            .as_object_mut()
            .unwrap()
            .insert(segments[segments.len() - 1].to_string(), json!(value));
        Ok(())
    }

    /// Serialize the whole document back to disk, pretty-printed for
    /// diffability. Creates parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&self.raw)?;
        fs::write(&self.path, content)
            .with_context(|| format!("could not write {}", self.path.display()))?;
        Ok(())
    }

    /// Human-readable description of every settable key, for error output
    /// and help.
    pub fn describe_keys() -> Vec<(&'static str, &'static str)> {
        ALLOWED_KEYS
            .iter()
            .map(|k| (k.pattern, k.description))
            .collect()
    }
}

/// Shorten a path under $HOME to `~/...` for display.
pub fn display_path(path: &Path) -> String {
    if let Ok(home) = std::env::var("HOME")
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}
