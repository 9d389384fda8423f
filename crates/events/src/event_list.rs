// standard library
use std::collections::BTreeMap;

// internal modules
use crate::coord::Coord;
use crate::error::{Error, Result};
use crate::masks::Masks;

/// Table of detected neutron events
///
/// Stored as columns: one weight and one variance per event, any number of
/// [Coord] columns, and named event [Masks]. Weights are in counts and
/// coordinates in the canonical unit of their [Coord].
///
/// All columns always share the same length.
///
/// ```rust
/// # use nrefl_events::{Coord, EventList};
/// let events = EventList::from_counts(vec![1.0, 2.0, 3.0])
///     .with_coord(Coord::Wavelength, vec![4.0, 5.0, 6.0])
///     .unwrap()
///     .with_mask("bad", vec![false, true, false])
///     .unwrap();
///
/// assert_eq!(events.len(), 3);
/// assert_eq!(events.total_weight(), 4.0);
/// assert!(events.coord(Coord::Theta).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventList {
    weights: Vec<f64>,
    variances: Vec<f64>,
    coords: BTreeMap<Coord, Vec<f64>>,
    masks: Masks,
}

impl EventList {
    /// New event list from weights and their variances
    pub fn new(weights: Vec<f64>, variances: Vec<f64>) -> Result<Self> {
        if variances.len() != weights.len() {
            return Err(Error::LengthMismatch {
                name: "variances".to_string(),
                expected: weights.len(),
                found: variances.len(),
            });
        }
        let masks = Masks::new(weights.len());
        Ok(Self {
            weights,
            variances,
            coords: BTreeMap::new(),
            masks,
        })
    }

    /// New event list of raw counts, where the variance equals the weight
    pub fn from_counts(weights: Vec<f64>) -> Self {
        let masks = Masks::new(weights.len());
        Self {
            variances: weights.clone(),
            weights,
            coords: BTreeMap::new(),
            masks,
        }
    }

    /// Add a coordinate column, replacing any existing one
    pub fn with_coord(mut self, coord: Coord, values: Vec<f64>) -> Result<Self> {
        self.insert_coord(coord, values)?;
        Ok(self)
    }

    /// Add an event mask layer, replacing any existing one of the same name
    pub fn with_mask(mut self, name: impl Into<String>, layer: Vec<bool>) -> Result<Self> {
        self.masks.insert(name, layer)?;
        Ok(self)
    }

    /// Insert a coordinate column in place
    pub fn insert_coord(&mut self, coord: Coord, values: Vec<f64>) -> Result<()> {
        if values.len() != self.len() {
            return Err(Error::LengthMismatch {
                name: coord.to_string(),
                expected: self.len(),
                found: values.len(),
            });
        }
        self.coords.insert(coord, values);
        Ok(())
    }

    /// Insert an event mask layer in place
    pub fn insert_mask(&mut self, name: impl Into<String>, layer: Vec<bool>) -> Result<()> {
        self.masks.insert(name, layer)
    }

    /// Number of events, masked or not
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if there are no events at all
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Event weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Variances of the event weights
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Values of a coordinate column
    ///
    /// Fails with [Error::MissingCoordinate] if the column does not exist.
    pub fn coord(&self, coord: Coord) -> Result<&[f64]> {
        self.coords
            .get(&coord)
            .map(|v| v.as_slice())
            .ok_or(Error::MissingCoordinate(coord))
    }

    /// Whether a coordinate column exists
    pub fn has_coord(&self, coord: Coord) -> bool {
        self.coords.contains_key(&coord)
    }

    /// Coordinates present on the events
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords.keys().copied()
    }

    /// Event masks
    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    /// Whether event `index` is masked by any layer
    pub fn is_masked(&self, index: usize) -> bool {
        self.masks.is_masked(index)
    }

    /// Indices of all events not hidden by a mask
    pub fn unmasked_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| !self.is_masked(*i)).collect()
    }

    /// Sum of the weights of unmasked events
    pub fn total_weight(&self) -> f64 {
        self.unmasked_indices()
            .into_iter()
            .map(|i| self.weights[i])
            .sum()
    }

    /// New list with every weight divided by a per-event factor
    ///
    /// Variances are divided by the square of the factor. Coordinates and
    /// masks are carried over untouched.
    ///
    /// ```rust
    /// # use nrefl_events::EventList;
    /// let events = EventList::new(vec![2.0, 3.0], vec![4.0, 9.0]).unwrap();
    /// let scaled = events.divide_weights(&[0.5, 1.0]).unwrap();
    ///
    /// assert_eq!(scaled.weights(), &[4.0, 3.0]);
    /// assert_eq!(scaled.variances(), &[16.0, 9.0]);
    /// ```
    pub fn divide_weights(&self, factors: &[f64]) -> Result<EventList> {
        if factors.len() != self.len() {
            return Err(Error::LengthMismatch {
                name: "weight factors".to_string(),
                expected: self.len(),
                found: factors.len(),
            });
        }
        let weights = self
            .weights
            .iter()
            .zip(factors)
            .map(|(w, f)| w / f)
            .collect();
        let variances = self
            .variances
            .iter()
            .zip(factors)
            .map(|(v, f)| v / (f * f))
            .collect();
        Ok(Self {
            weights,
            variances,
            coords: self.coords.clone(),
            masks: self.masks.clone(),
        })
    }

    /// Subset of the events at the given indices, in that order
    pub fn select(&self, indices: &[usize]) -> EventList {
        let pick = |values: &[f64]| indices.iter().map(|i| values[*i]).collect::<Vec<f64>>();
        Self {
            weights: pick(&self.weights),
            variances: pick(&self.variances),
            coords: self
                .coords
                .iter()
                .map(|(c, values)| (*c, pick(values)))
                .collect(),
            masks: self.masks.select(indices),
        }
    }

    /// Join event lists end to end
    ///
    /// Every non-empty part must carry the same coordinates, otherwise the
    /// missing one is reported. Mask layers missing from a part are treated
    /// as all `false` there.
    ///
    /// ```rust
    /// # use nrefl_events::{Coord, EventList};
    /// let a = EventList::from_counts(vec![1.0]).with_coord(Coord::Q, vec![0.1]).unwrap();
    /// let b = EventList::from_counts(vec![2.0]).with_coord(Coord::Q, vec![0.2]).unwrap();
    ///
    /// let joined = EventList::concat(&[&a, &b]).unwrap();
    /// assert_eq!(joined.coord(Coord::Q).unwrap(), &[0.1, 0.2]);
    ///
    /// // coordinates must agree
    /// let c = EventList::from_counts(vec![3.0]);
    /// assert!(EventList::concat(&[&a, &c]).is_err());
    /// ```
    pub fn concat(parts: &[&EventList]) -> Result<EventList> {
        let filled = parts
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<&EventList>>();

        let mut coords = filled
            .iter()
            .flat_map(|p| p.coords())
            .collect::<Vec<Coord>>();
        coords.sort();
        coords.dedup();

        let mut columns = BTreeMap::new();
        for coord in coords {
            let mut column = Vec::new();
            for part in &filled {
                column.extend_from_slice(part.coord(coord)?);
            }
            columns.insert(coord, column);
        }

        Ok(Self {
            weights: filled.iter().flat_map(|p| p.weights.iter().copied()).collect(),
            variances: filled
                .iter()
                .flat_map(|p| p.variances.iter().copied())
                .collect(),
            coords: columns,
            masks: Masks::concat(&filled.iter().map(|p| &p.masks).collect::<Vec<&Masks>>()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> EventList {
        EventList::new(vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_coord(Coord::Q, vec![0.01, 0.02, 0.03, 0.04])
            .unwrap()
            .with_mask("odd", vec![false, true, false, true])
            .unwrap()
    }

    #[test]
    fn mismatched_variances() {
        assert_eq!(
            EventList::new(vec![1.0, 2.0], vec![1.0]),
            Err(Error::LengthMismatch {
                name: "variances".to_string(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn mismatched_coordinate() {
        let result = EventList::from_counts(vec![1.0]).with_coord(Coord::Theta, vec![]);
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn masked_weight_is_excluded() {
        let events = sample_events();
        assert_eq!(events.total_weight(), 4.0);
        assert_eq!(events.unmasked_indices(), vec![0, 2]);
    }

    #[test]
    fn select_keeps_columns_aligned() {
        let events = sample_events().select(&[3, 2]);
        assert_eq!(events.weights(), &[4.0, 3.0]);
        assert_eq!(events.coord(Coord::Q).unwrap(), &[0.04, 0.03]);
        assert_eq!(events.masks().get("odd"), Some(&[true, false][..]));
    }

    #[test]
    fn concat_skips_empty_parts() {
        let empty = EventList::default();
        let events = sample_events();
        let joined = EventList::concat(&[&empty, &events, &empty]).unwrap();
        assert_eq!(joined, events);
    }

    #[test]
    fn missing_coordinate() {
        let events = EventList::from_counts(vec![1.0]);
        assert_eq!(
            events.coord(Coord::Wavelength),
            Err(Error::MissingCoordinate(Coord::Wavelength))
        );
    }
}
