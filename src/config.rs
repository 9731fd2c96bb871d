// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::CategoryGroup;

pub const CONFIG_ENV: &str = "FINTRACK_CONFIG";
pub const DB_ENV: &str = "FINTRACK_DB";

pub const FALLBACK_COLOR: &str = "#6B7280";
pub const FALLBACK_ICON: &str = "dollar-sign";

/// Categories every new database starts with.
pub const DEFAULT_CATEGORIES: &[(&str, CategoryGroup, &str, &str)] = &[
    ("Loans", CategoryGroup::Fixed, "#60A5FA", "dollar-sign"),
    ("Rent", CategoryGroup::Fixed, "#34D399", "home"),
    ("Internet", CategoryGroup::Fixed, "#A78BFA", "wifi"),
    ("Phone", CategoryGroup::Fixed, "#F472B6", "smartphone"),
    ("Car", CategoryGroup::Fixed, "#FB923C", "car"),
    ("Subscriptions", CategoryGroup::Fixed, "#FBBF24", "music"),
    ("Credit Cards", CategoryGroup::Variable, "#EF4444", "credit-card"),
    ("Market", CategoryGroup::Variable, "#10B981", "shopping-cart"),
    ("Pharmacy", CategoryGroup::Variable, "#06B6D4", "pill"),
    ("Fuel", CategoryGroup::Variable, "#F97316", "zap"),
    ("Leisure", CategoryGroup::Variable, "#EC4899", "music"),
    ("Shopping", CategoryGroup::Variable, "#8B5CF6", "shopping-cart"),
    ("Salary", CategoryGroup::Income, "#22C55E", "trending-up"),
    ("Freelance", CategoryGroup::Income, "#3B82F6", "dollar-sign"),
    ("Investments", CategoryGroup::Income, "#14B8A6", "trending-up"),
    ("Other", CategoryGroup::Income, "#6B7280", "dollar-sign"),
];

static BUILTIN_STYLES: Lazy<HashMap<String, CategoryStyle>> = Lazy::new(|| {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, _, color, icon)| (name.to_string(), CategoryStyle::new(color, icon)))
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub color: String,
    pub icon: String,
}

impl CategoryStyle {
    pub fn new(color: &str, icon: &str) -> Self {
        Self {
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Presentation lookup from category label to colour and icon.
///
/// Reports receive one of these instead of reaching for a global table;
/// unknown labels resolve to the fallback style.
#[derive(Debug, Clone)]
pub struct CategoryStyles {
    styles: HashMap<String, CategoryStyle>,
    fallback: CategoryStyle,
}

impl Default for CategoryStyles {
    fn default() -> Self {
        Self {
            styles: BUILTIN_STYLES.clone(),
            fallback: CategoryStyle::new(FALLBACK_COLOR, FALLBACK_ICON),
        }
    }
}

impl CategoryStyles {
    pub fn insert(&mut self, name: &str, style: CategoryStyle) {
        self.styles.insert(name.to_string(), style);
    }

    pub fn extend<I>(&mut self, styles: I)
    where
        I: IntoIterator<Item = (String, CategoryStyle)>,
    {
        self.styles.extend(styles);
    }

    pub fn lookup(&self, name: &str) -> &CategoryStyle {
        self.styles.get(name).unwrap_or(&self.fallback)
    }
}

/// Settings read from `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub category_styles: HashMap<String, CategoryStyle>,
}

impl Config {
    /// Reads the config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => default_config_path()?,
        };
        let mut cfg = if path.exists() {
            Self::from_path(&path)?
        } else {
            Self::default()
        };
        if let Some(db) = std::env::var_os(DB_ENV) {
            cfg.db_path = Some(PathBuf::from(db));
        }
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Parse config {}", path.display()))
    }

    /// Built-in styles with the file's overrides on top.
    pub fn styles(&self) -> CategoryStyles {
        let mut styles = CategoryStyles::default();
        styles.extend(self.category_styles.clone());
        styles
    }
}

fn default_config_path() -> Result<PathBuf> {
    let proj = crate::db::project_dirs()?;
    Ok(proj.config_dir().join("config.json"))
}
