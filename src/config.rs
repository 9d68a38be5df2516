use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

use crate::error::SkillError;

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, SkillError> {
        let content = fs::read_to_string(path).map_err(|e| SkillError::Config(e.to_string()))?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(SkillError::Config(format!(
                    "Invalid config line {}: {}",
                    idx + 1,
                    line
                )));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// The calendar name tables. Kept in configuration rather than code because
/// speech-recognition error patterns vary by deployment; each alias list
/// grows whatever misrecognitions that install actually produces.
#[derive(Debug, Clone, Deserialize)]
pub struct NamesConfig {
    pub calendars: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    pub possessive: String,
    pub aliases: Vec<String>,
}

impl NamesConfig {
    pub fn from_file(path: &str) -> Result<Self, SkillError> {
        let content = fs::read_to_string(path).map_err(|e| SkillError::Config(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SkillError::Config(e.to_string()))
    }

    /// Table for the reference deployment, used when no names file is
    /// configured. Includes the phonetic near-misses observed in practice
    /// ("my lowe" for milo's, "9"/"mind" for mine).
    pub fn reference() -> Self {
        let entry = |id: &str, possessive: &str, aliases: &[&str]| CalendarEntry {
            id: id.to_string(),
            possessive: possessive.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        };
        Self {
            calendars: vec![
                entry("madison-1", "madison's", &["madison"]),
                entry("milo", "milo's", &["milo", "my lowe", "my low"]),
                entry(
                    "personal",
                    "your",
                    &["me", "my", "i", "mine", "myself", "my own", "9", "mind"],
                ),
            ],
        }
    }
}
