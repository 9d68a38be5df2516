use std::collections::HashMap;

use crate::config::NamesConfig;
use crate::error::SkillError;
use crate::models::calendar::CalendarId;

/// Bidirectional mapping between spoken owner names and calendar ids.
/// Alias -> id is many-to-one; id -> possessive is one-to-one. Built once
/// from configuration, immutable afterwards.
pub struct NameResolver {
    alias_to_id: HashMap<String, CalendarId>,
    possessives: HashMap<CalendarId, String>,
}

impl NameResolver {
    pub fn from_config(config: &NamesConfig) -> Result<Self, SkillError> {
        let mut alias_to_id = HashMap::new();
        let mut possessives = HashMap::new();
        for entry in &config.calendars {
            if entry.aliases.is_empty() {
                return Err(SkillError::Config(format!(
                    "calendar {} has no aliases",
                    entry.id
                )));
            }
            let id = CalendarId::new(entry.id.clone());
            if possessives
                .insert(id.clone(), entry.possessive.clone())
                .is_some()
            {
                return Err(SkillError::Config(format!(
                    "calendar {} is declared twice",
                    entry.id
                )));
            }
            for alias in &entry.aliases {
                let key = normalize_alias(alias);
                if key.is_empty() {
                    return Err(SkillError::Config(format!(
                        "calendar {} has an empty alias",
                        entry.id
                    )));
                }
                if let Some(previous) = alias_to_id.insert(key.clone(), id.clone()) {
                    return Err(SkillError::Config(format!(
                        "alias {} maps to both {} and {}",
                        key, previous, entry.id
                    )));
                }
            }
        }
        Ok(Self {
            alias_to_id,
            possessives,
        })
    }

    /// Case-insensitive, possessive-suffix-insensitive lookup.
    pub fn resolve_owner(&self, alias: &str) -> Result<CalendarId, SkillError> {
        let key = normalize_alias(alias);
        self.alias_to_id
            .get(&key)
            .cloned()
            .ok_or_else(|| SkillError::UnknownOwner(alias.trim().to_string()))
    }

    /// Spoken possessive for a calendar id. Ids produced by `resolve_owner`
    /// always have one; anything else falls back to a neutral form.
    pub fn possessive_of(&self, id: &CalendarId) -> &str {
        self.possessives
            .get(id)
            .map(String::as_str)
            .unwrap_or("their")
    }
}

fn normalize_alias(alias: &str) -> String {
    let lower = alias.trim().to_lowercase();
    match lower.strip_suffix("'s") {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}
