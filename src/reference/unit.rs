use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PageUnit;
use crate::engine::Page;

/// Names of a unit: a primary name plus translations keyed by language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNames {
    pub primary: String,
    #[serde(default)]
    pub localized: BTreeMap<String, String>,
}

impl DisplayNames {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            localized: BTreeMap::new(),
        }
    }

    /// Add a translation
    pub fn with(mut self, lang: impl Into<String>, name: impl Into<String>) -> Self {
        self.localized.insert(lang.into(), name.into());
        self
    }

    /// Name for `lang`, falling back to the primary name
    pub fn get(&self, lang: &str) -> &str {
        self.localized
            .get(lang)
            .map(String::as_str)
            .unwrap_or(&self.primary)
    }
}

/// A named division of the document (a surah in the Mushaf)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralUnit {
    pub ordinal: u32,
    pub names: DisplayNames,
    pub start_page: Page,
}

/// An unnamed, independent division of the same document (a juz)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDivisionUnit {
    pub ordinal: u32,
    pub start_page: Page,
}

impl PageUnit for StructuralUnit {
    fn ordinal(&self) -> u32 {
        self.ordinal
    }

    fn start_page(&self) -> Page {
        self.start_page
    }
}

impl PageUnit for SubDivisionUnit {
    fn ordinal(&self) -> u32 {
        self.ordinal
    }

    fn start_page(&self) -> Page {
        self.start_page
    }
}
