//! The operator lexicon.
//!
//! Every logical operator, literal and parenthesis is spelled by whatever the
//! user stored under its [`OptionKey`]. A stored value may hold several
//! aliases separated by commas, e.g. `"¬, not, !, ~"`.

use std::{
    collections::BTreeMap,
    fmt::Display,
    str::FromStr,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::{debug, info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    LitTrue,
    LitFalse,
    Not,
    And,
    Xor,
    Or,
    Implication,
    Equality,
    LeftParen,
    RightParen,
}

impl OptionKey {
    /// All keys. The order also breaks ties between equally long symbols.
    pub const ALL: [OptionKey; 10] = [
        OptionKey::LitTrue,
        OptionKey::LitFalse,
        OptionKey::Not,
        OptionKey::And,
        OptionKey::Xor,
        OptionKey::Or,
        OptionKey::Implication,
        OptionKey::Equality,
        OptionKey::LeftParen,
        OptionKey::RightParen,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::LitTrue => "lit-true",
            Self::LitFalse => "lit-false",
            Self::Not => "not",
            Self::And => "and",
            Self::Xor => "xor",
            Self::Or => "or",
            Self::Implication => "implication",
            Self::Equality => "equality",
            Self::LeftParen => "left-paren",
            Self::RightParen => "right-paren",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            Self::LitTrue => "true",
            Self::LitFalse => "false",
            Self::Not => "¬, not, !, ~",
            Self::And => "∧, and, &&, &, *",
            Self::Xor => "⊕, xor, ^",
            Self::Or => "∨, or, ||, |, +",
            Self::Implication => "→, ->, =>",
            Self::Equality => "≡, <=>, ==, =",
            Self::LeftParen => "(, {, [",
            Self::RightParen => "), }, ]",
        }
    }
}

impl FromStr for OptionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.id() == s)
            .ok_or_else(|| Error::UnknownKey(s.to_string()))
    }
}

impl Display for OptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Splits a stored value into its aliases.
pub fn aliases(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|a| !a.is_empty())
}

/// Aliases the lexer can never produce, since it splits input on whitespace
/// before looking for symbols.
pub fn unmatchable_aliases(value: &str) -> impl Iterator<Item = &str> {
    aliases(value).filter(|a| a.chars().any(char::is_whitespace))
}

/// Somewhere option values outlive the session, e.g. browser local storage.
pub trait Backing {
    fn load(&self, key: OptionKey) -> Result<Option<String>>;
    fn save(&self, key: OptionKey, value: &str) -> Result<()>;
}

/// Session-wide mapping from [`OptionKey`] to its symbol string.
///
/// Every key holds a value from construction onwards. Readers take a
/// [`SymbolTable`] snapshot so an evaluation never sees a half-applied change.
#[derive(Debug)]
pub struct OptionStore {
    values: RwLock<BTreeMap<OptionKey, String>>,
}

impl Default for OptionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(
                OptionKey::ALL
                    .into_iter()
                    .map(|key| (key, key.default_value().to_string()))
                    .collect(),
            ),
        }
    }

    // A poisoned lock still holds a complete map: every write replaces a
    // single entry.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<OptionKey, String>> {
        self.values.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<OptionKey, String>> {
        self.values.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Pulls stored values out of `backing`. Keys the backing does not know
    /// are written back with their current value. Running this twice is a
    /// no-op the second time.
    pub fn init(&self, backing: Option<&dyn Backing>) -> Result<()> {
        let Some(backing) = backing else {
            debug!("option store initialized without backing");
            return Ok(());
        };

        let mut loaded = BTreeMap::new();
        for key in OptionKey::ALL {
            match backing.load(key)? {
                Some(value) => {
                    loaded.insert(key, value);
                }
                None => {
                    debug!("`{key}` missing from backing, storing default");
                    backing.save(key, &self.get(key))?;
                }
            }
        }

        info!("loaded {} option values from backing", loaded.len());
        self.write().extend(loaded);
        Ok(())
    }

    pub fn get(&self, key: OptionKey) -> String {
        self.read()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_value().to_string())
    }

    pub fn set(&self, key: OptionKey, value: impl Into<String>) {
        let value = value.into();
        info!("option `{key}` set to {value:?}");

        for alias in unmatchable_aliases(&value) {
            warn!("symbol {alias:?} for `{key}` contains whitespace and will never match");
        }

        let mut values = self.write();
        for alias in aliases(&value) {
            let collisions = values
                .iter()
                .filter(|(k, v)| **k != key && aliases(v).any(|a| a.eq_ignore_ascii_case(alias)));
            for (other, _) in collisions {
                warn!("symbol {alias:?} for `{key}` is also used by `{other}`");
            }
        }
        values.insert(key, value);
    }

    /// Restores every key to its default value.
    pub fn reset(&self) {
        let mut values = self.write();
        for key in OptionKey::ALL {
            values.insert(key, key.default_value().to_string());
        }
    }

    pub fn symbols(&self) -> SymbolTable {
        let values = self.read();
        let mut entries: Vec<(OptionKey, String)> = OptionKey::ALL
            .into_iter()
            .flat_map(|key| {
                let value = values.get(&key).map(String::as_str).unwrap_or_default();
                aliases(value)
                    .map(|alias| (key, alias.to_string()))
                    .collect::<Vec<_>>()
            })
            .collect();
        // longest first, stable so key order breaks ties
        entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        SymbolTable { entries }
    }
}

/// Read-only snapshot of the lexicon used by one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<(OptionKey, String)>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        OptionStore::new().symbols()
    }
}

impl SymbolTable {
    /// Finds the symbol `text` starts with, preferring the longest.
    /// Comparison ignores ASCII case.
    pub fn match_prefix(&self, text: &str) -> Option<(OptionKey, usize)> {
        self.entries.iter().find_map(|(key, alias)| {
            let head = text.get(..alias.len())?;
            head.eq_ignore_ascii_case(alias)
                .then_some((*key, alias.len()))
        })
    }

    pub fn aliases(&self, key: OptionKey) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, alias)| alias.as_str())
    }
}
