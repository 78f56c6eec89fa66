//! Light/dark theme preference, persisted as `{"state":{"isDarkMode":..},"version":0}`.

use crate::storage::{keys, Storage};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeRecord {
    #[serde(default)]
    state: ThemeState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeState {
    #[serde(default)]
    is_dark_mode: bool,
}

/// Stored preference; missing or unreadable data means light
pub fn load(storage: &Storage) -> Theme {
    match storage.get_json::<ThemeRecord>(keys::THEME) {
        Ok(Some(record)) if record.state.is_dark_mode => Theme::Dark,
        Ok(_) => Theme::Light,
        Err(e) => {
            eprintln!("Warning: failed to parse theme storage: {:#}", e);
            Theme::Light
        }
    }
}

pub fn set(storage: &Storage, theme: Theme) -> Result<()> {
    let record = ThemeRecord {
        state: ThemeState {
            is_dark_mode: theme == Theme::Dark,
        },
        version: 0,
    };
    storage.set_json(keys::THEME, &record)
}

/// Flip and persist; returns the new theme
pub fn toggle(storage: &Storage) -> Result<Theme> {
    let next = load(storage).toggled();
    set(storage, next)?;
    Ok(next)
}
