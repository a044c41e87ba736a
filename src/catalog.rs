use crate::config::{parse_error, read_text};
use crate::error::{ConfigError, LookupError};
use crate::library::line_format::{parse_indexed_names, parse_whitespace_pairs, LineFailure};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Class index to dish name, built once from `classes.cfg`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    names: BTreeMap<usize, String>,
}

impl ClassRegistry {
    pub fn parse(text: &str) -> Result<Self, LineFailure> {
        Ok(Self {
            names: parse_indexed_names(text)?.into_iter().collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&read_text(path)?).map_err(|failure| parse_error(path, failure))
    }

    pub fn name_of(&self, index: usize) -> Result<&str, LookupError> {
        self.names
            .get(&index)
            .map(String::as_str)
            .ok_or(LookupError::UnknownClassIndex(index))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }
}

impl FromIterator<(usize, String)> for ClassRegistry {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Dish name to price, kept as the text found in `prices.cfg`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTable {
    prices: HashMap<String, String>,
}

impl PriceTable {
    pub fn parse(text: &str) -> Result<Self, LineFailure> {
        Ok(Self {
            prices: parse_whitespace_pairs(text)?.into_iter().collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&read_text(path)?).map_err(|failure| parse_error(path, failure))
    }

    pub fn price_of(&self, name: &str) -> Result<&str, LookupError> {
        self.prices
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| LookupError::UnknownPrice(name.to_string()))
    }

    /// Registry names with no price. Not enforced at load time.
    pub fn unpriced<'a>(&self, registry: &'a ClassRegistry) -> Vec<&'a str> {
        registry
            .names()
            .filter(|name| !self.prices.contains_key(*name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, String)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}
