//! Named parameter table with collision-free name minting.

use std::collections::HashSet;

use crate::value::Value;

/// Insertion-ordered `name -> value` table.
///
/// Names handed out by [`Parameters::mint`] are never reused within one table,
/// and a bound key is never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, Value)>,
    reserved: HashSet<String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `name` is bound or reserved.
    pub fn contains(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.entries.iter().any(|(k, _)| k == name)
    }

    /// Reserve the first free name of the form `base0`, `base1`, ...
    pub fn mint(&mut self, base: &str) -> String {
        let mut suffix = 0usize;
        loop {
            let name = format!("{base}{suffix}");
            if !self.contains(&name) {
                self.reserved.insert(name.clone());
                return name;
            }
            suffix += 1;
        }
    }

    /// Mint a fresh name for `base` and bind `value` to it.
    pub fn bind(&mut self, base: &str, value: Value) -> String {
        let name = self.mint(base);
        self.insert(name.clone(), value);
        name
    }

    /// Bind `value` under an exact name. Returns `false` (and keeps the old
    /// value) if the name is already bound.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        if self.entries.iter().any(|(k, _)| *k == name) {
            return false;
        }
        self.reserved.insert(name.clone());
        self.entries.push((name, value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound parameters in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.reserved.clear();
    }

    pub fn into_vec(self) -> Vec<(String, Value)> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_takes_first_free_suffix() {
        let mut params = Parameters::new();
        assert_eq!(params.bind("Id", Value::Int(1)), "Id0");
        assert_eq!(params.bind("Id", Value::Int(2)), "Id1");
        assert_eq!(params.bind("Name", Value::Null), "Name0");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn minted_but_unbound_names_are_not_reused() {
        let mut params = Parameters::new();
        let base = params.mint("Id");
        assert_eq!(base, "Id0");
        assert!(params.get("Id0").is_none());
        assert_eq!(params.mint("Id"), "Id1");
    }

    #[test]
    fn insert_never_overwrites() {
        let mut params = Parameters::new();
        assert!(params.insert("a", Value::Int(1)));
        assert!(!params.insert("a", Value::Int(2)));
        assert_eq!(params.get("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn clear_releases_reservations() {
        let mut params = Parameters::new();
        params.bind("x", Value::Bool(true));
        params.clear();
        assert!(params.is_empty());
        assert_eq!(params.mint("x"), "x0");
    }
}
