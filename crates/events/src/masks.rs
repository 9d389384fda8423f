// standard library
use std::collections::BTreeMap;

// internal modules
use crate::error::{Error, Result};

/// Named boolean mask layers of a fixed length
///
/// A `true` entry marks the item at that index as invalid. Any layer being
/// `true` masks the item. Layers are only ever added, never removed, so the
/// reason for masking something stays visible downstream.
///
/// ```rust
/// # use nrefl_events::Masks;
/// let mut masks = Masks::new(3);
/// masks.insert("too_low", vec![true, false, false]).unwrap();
/// masks.insert("too_high", vec![false, false, true]).unwrap();
///
/// assert_eq!(masks.combined(), vec![true, false, true]);
/// assert!(!masks.is_masked(1));
///
/// // layers must match the length
/// assert!(masks.insert("bad", vec![true]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Masks {
    len: usize,
    layers: BTreeMap<String, Vec<bool>>,
}

impl Masks {
    /// Empty set of masks for `len` items
    pub fn new(len: usize) -> Self {
        Self {
            len,
            layers: BTreeMap::new(),
        }
    }

    /// Number of items covered by every layer
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the masks cover no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add or replace a named layer
    pub fn insert(&mut self, name: impl Into<String>, layer: Vec<bool>) -> Result<()> {
        let name = name.into();
        if layer.len() != self.len {
            return Err(Error::LengthMismatch {
                name,
                expected: self.len,
                found: layer.len(),
            });
        }
        self.layers.insert(name, layer);
        Ok(())
    }

    /// Get a layer by name
    pub fn get(&self, name: &str) -> Option<&[bool]> {
        self.layers.get(name).map(|l| l.as_slice())
    }

    /// Iterate over `(name, layer)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[bool])> {
        self.layers.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Names of all layers in order
    pub fn names(&self) -> Vec<&str> {
        self.layers.keys().map(|k| k.as_str()).collect()
    }

    /// Whether any layer masks item `index`
    pub fn is_masked(&self, index: usize) -> bool {
        self.layers.values().any(|layer| layer[index])
    }

    /// Logical OR of all layers
    pub fn combined(&self) -> Vec<bool> {
        (0..self.len).map(|i| self.is_masked(i)).collect()
    }

    /// Subset of every layer at the given item indices
    pub fn select(&self, indices: &[usize]) -> Masks {
        Masks {
            len: indices.len(),
            layers: self
                .layers
                .iter()
                .map(|(name, layer)| (name.clone(), indices.iter().map(|i| layer[*i]).collect()))
                .collect(),
        }
    }

    /// Join mask sets end to end
    ///
    /// A layer missing from one of the parts is filled with `false` over that
    /// part.
    ///
    /// ```rust
    /// # use nrefl_events::Masks;
    /// let mut a = Masks::new(2);
    /// a.insert("x", vec![true, false]).unwrap();
    /// let b = Masks::new(1);
    ///
    /// let joined = Masks::concat(&[&a, &b]);
    /// assert_eq!(joined.get("x"), Some(&[true, false, false][..]));
    /// ```
    pub fn concat(parts: &[&Masks]) -> Masks {
        let len = parts.iter().map(|m| m.len).sum();
        let mut names = parts
            .iter()
            .flat_map(|m| m.layers.keys())
            .collect::<Vec<&String>>();
        names.sort();
        names.dedup();

        let layers = names
            .into_iter()
            .map(|name| {
                let mut layer = Vec::with_capacity(len);
                for part in parts {
                    match part.layers.get(name) {
                        Some(values) => layer.extend_from_slice(values),
                        None => layer.extend(std::iter::repeat(false).take(part.len)),
                    }
                }
                (name.clone(), layer)
            })
            .collect();

        Masks { len, layers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_keeps_every_layer() {
        let mut masks = Masks::new(4);
        masks.insert("a", vec![true, false, true, false]).unwrap();
        masks.insert("b", vec![false, false, false, true]).unwrap();

        let subset = masks.select(&[3, 0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.get("a"), Some(&[false, true][..]));
        assert_eq!(subset.get("b"), Some(&[true, false][..]));
    }

    #[test]
    fn no_layers_means_nothing_masked() {
        let masks = Masks::new(3);
        assert_eq!(masks.combined(), vec![false; 3]);
        assert!(masks.names().is_empty());
    }
}
