// external crates
use itertools::Itertools;
use log::{debug, trace};
use rayon::prelude::*;

// nrefl modules
use nrefl_units::BinEdges;

// internal modules
use crate::coord::Coord;
use crate::error::{Error, Result};
use crate::event_list::EventList;
use crate::grid::EventGrid;
use crate::masks::Masks;

/// Events recorded by a single detector pixel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pixel {
    /// Logical vertical index on the detector
    pub z_index: u32,
    /// Logical horizontal index on the detector
    pub y_index: u32,
    /// Events detected in this pixel
    pub events: EventList,
}

impl Pixel {
    /// New pixel from its indices and events
    pub fn new(z_index: u32, y_index: u32, events: EventList) -> Self {
        Self {
            z_index,
            y_index,
            events,
        }
    }
}

/// Events binned by detector pixel, with per-pixel masks
///
/// ```rust
/// # use nrefl_events::{DetectorData, EventList, Pixel};
/// let mut data = DetectorData::new(vec![
///     Pixel::new(0, 0, EventList::from_counts(vec![1.0, 1.0])),
///     Pixel::new(0, 1, EventList::from_counts(vec![5.0])),
/// ]);
/// assert_eq!(data.total_weight(), 7.0);
///
/// // masked pixels no longer contribute
/// data.mask_pixels_where("edge", |p| p.y_index == 1).unwrap();
/// assert_eq!(data.total_weight(), 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorData {
    pixels: Vec<Pixel>,
    masks: Masks,
}

impl DetectorData {
    /// New detector data with no pixel masks
    pub fn new(pixels: Vec<Pixel>) -> Self {
        let masks = Masks::new(pixels.len());
        Self { pixels, masks }
    }

    /// All pixels, masked or not
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel masks
    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True if there are no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Whether pixel `index` is masked by any layer
    pub fn is_masked(&self, index: usize) -> bool {
        self.masks.is_masked(index)
    }

    /// Add or replace a pixel mask layer
    pub fn insert_mask(&mut self, name: impl Into<String>, layer: Vec<bool>) -> Result<()> {
        self.masks.insert(name, layer)
    }

    /// Add a pixel mask layer that is `true` wherever `predicate` holds
    pub fn mask_pixels_where<F>(&mut self, name: impl Into<String>, predicate: F) -> Result<()>
    where
        F: Fn(&Pixel) -> bool,
    {
        let layer = self.pixels.iter().map(predicate).collect();
        self.masks.insert(name, layer)
    }

    /// Sum of unmasked event weights over all unmasked pixels
    pub fn total_weight(&self) -> f64 {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.is_masked(*i))
            .map(|(_, p)| p.events.total_weight())
            .sum()
    }

    /// Replace the events of every pixel, in parallel
    ///
    /// The closure receives the pixel and whether it is masked. Pixel masks
    /// and indices are kept as they are.
    pub fn try_map_events<F, E>(&self, f: F) -> core::result::Result<DetectorData, E>
    where
        F: Fn(&Pixel, bool) -> core::result::Result<EventList, E> + Sync + Send,
        E: Send,
    {
        let pixels = self
            .pixels
            .par_iter()
            .enumerate()
            .map(|(i, pixel)| {
                Ok(Pixel {
                    z_index: pixel.z_index,
                    y_index: pixel.y_index,
                    events: f(pixel, self.is_masked(i))?,
                })
            })
            .collect::<core::result::Result<Vec<Pixel>, E>>()?;

        Ok(Self {
            pixels,
            masks: self.masks.clone(),
        })
    }

    /// Collapse all pixels sharing a `z_index` into one event list each
    ///
    /// Rows are sorted by `z_index`. Pixel mask layers named in `row_masks`
    /// are kept per row:
    ///
    /// - if the layer has one value over the row, that value becomes the row mask
    /// - otherwise the masked pixels of the row are dropped and the row is not masked
    ///
    /// Pixels masked by any other layer are always dropped, and those layers
    /// are not carried over. A row whose pixels are all dropped is kept empty.
    ///
    /// ```rust
    /// # use nrefl_events::{DetectorData, EventList, Pixel};
    /// let mut data = DetectorData::new(vec![
    ///     Pixel::new(2, 0, EventList::from_counts(vec![1.0])),
    ///     Pixel::new(1, 0, EventList::from_counts(vec![2.0])),
    ///     Pixel::new(1, 1, EventList::from_counts(vec![3.0])),
    /// ]);
    /// data.mask_pixels_where("top", |p| p.z_index == 2).unwrap();
    /// data.mask_pixels_where("hot", |p| p.y_index == 1).unwrap();
    ///
    /// let groups = data.concat_by_z_index(&["top"]).unwrap();
    /// assert_eq!(groups.z_index(), &[1, 2]);
    /// assert_eq!(groups.events()[0].total_weight(), 2.0);
    /// assert_eq!(groups.masks().get("top"), Some(&[false, true][..]));
    /// assert_eq!(groups.masks().get("hot"), None);
    /// ```
    pub fn concat_by_z_index(&self, row_masks: &[&str]) -> Result<ZGroups> {
        let (layers, pixel_layers): (Vec<(&str, &[bool])>, Vec<(&str, &[bool])>) = self
            .masks
            .iter()
            .partition(|(name, _)| row_masks.contains(name));

        let mut z_index = Vec::new();
        let mut events = Vec::new();
        let mut row_layers = vec![Vec::new(); layers.len()];

        let grouped = (0..self.pixels.len())
            .sorted_by_key(|i| self.pixels[*i].z_index)
            .chunk_by(|i| self.pixels[*i].z_index);

        for (z, group) in &grouped {
            let members = group.collect::<Vec<usize>>();
            let mut dropped = members
                .iter()
                .map(|i| pixel_layers.iter().any(|(_, layer)| layer[*i]))
                .collect::<Vec<bool>>();

            for ((name, layer), row_layer) in layers.iter().zip(row_layers.iter_mut()) {
                let values = members.iter().map(|i| layer[*i]).collect::<Vec<bool>>();
                if values.iter().all_equal() {
                    row_layer.push(values.first().copied().unwrap_or(false));
                } else {
                    trace!("Pixel mask \"{name}\" varies within z_index {z}, applying it");
                    dropped.iter_mut().zip(&values).for_each(|(d, v)| *d |= *v);
                    row_layer.push(false);
                }
            }

            let kept = members
                .iter()
                .zip(&dropped)
                .filter(|(_, d)| !**d)
                .map(|(i, _)| &self.pixels[*i].events)
                .collect::<Vec<&EventList>>();

            z_index.push(z);
            events.push(EventList::concat(&kept)?);
        }

        let mut masks = Masks::new(z_index.len());
        for ((name, _), layer) in layers.into_iter().zip(row_layers) {
            masks.insert(name, layer)?;
        }

        debug!(
            "Concatenated {} pixels into {} z_index rows",
            self.pixels.len(),
            z_index.len()
        );

        Ok(ZGroups {
            z_index,
            events,
            masks,
        })
    }
}

/// One event list per detector `z_index`, with row masks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZGroups {
    z_index: Vec<u32>,
    events: Vec<EventList>,
    masks: Masks,
}

impl ZGroups {
    /// New set of rows, one event list per `z_index`
    pub fn new(z_index: Vec<u32>, events: Vec<EventList>) -> Result<Self> {
        if events.len() != z_index.len() {
            return Err(Error::LengthMismatch {
                name: "z_index rows".to_string(),
                expected: z_index.len(),
                found: events.len(),
            });
        }
        let masks = Masks::new(z_index.len());
        Ok(Self {
            z_index,
            events,
            masks,
        })
    }

    /// The `z_index` of every row
    pub fn z_index(&self) -> &[u32] {
        &self.z_index
    }

    /// Events of every row
    pub fn events(&self) -> &[EventList] {
        &self.events
    }

    /// Row masks
    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    /// Split every row into wavelength cells
    ///
    /// The edges may be in any length unit. Events outside the edges are
    /// dropped, everything else keeps its masks.
    ///
    /// ```rust
    /// # use nrefl_events::{Coord, EventList, ZGroups};
    /// # use nrefl_units::{BinEdges, Unit};
    /// let row = EventList::from_counts(vec![1.0, 2.0, 4.0])
    ///     .with_coord(Coord::Wavelength, vec![3.0, 5.0, 50.0])
    ///     .unwrap();
    /// let groups = ZGroups::new(vec![7], vec![row]).unwrap();
    ///
    /// let edges = BinEdges::new(vec![2.0, 4.0, 6.0], Unit::Angstrom).unwrap();
    /// let grid = groups.bin_wavelength(&edges).unwrap();
    ///
    /// assert_eq!(grid.shape(), (1, 2));
    /// assert_eq!(grid.cells()[[0, 1]].weights(), &[2.0]);
    /// ```
    pub fn bin_wavelength(&self, edges: &BinEdges) -> Result<EventGrid> {
        let edges = edges.to(Coord::Wavelength.unit())?;
        let n_bins = edges.n_bins();

        let rows = self
            .events
            .par_iter()
            .map(|row| split_row(row, &edges))
            .collect::<Result<Vec<Vec<EventList>>>>()?;

        let cells = rows.into_iter().flatten().collect::<Vec<EventList>>();
        let grid = EventGrid::new(self.z_index.clone(), edges, cells, self.masks.clone())?;

        debug!(
            "Binned {} z_index rows into {} wavelength bins",
            self.z_index.len(),
            n_bins
        );
        Ok(grid)
    }
}

/// Partition one row of events into wavelength cells
fn split_row(row: &EventList, edges: &BinEdges) -> Result<Vec<EventList>> {
    let mut indices = vec![Vec::new(); edges.n_bins()];
    if row.is_empty() {
        return Ok(indices.iter().map(|i| row.select(i)).collect());
    }

    let wavelength = row.coord(Coord::Wavelength)?;
    let mut outside = 0;
    for (i, value) in wavelength.iter().enumerate() {
        match edges.find(*value) {
            Some(bin) => indices[bin].push(i),
            None => outside += 1,
        }
    }
    if outside > 0 {
        trace!("Dropped {outside} events outside the wavelength range");
    }

    Ok(indices.iter().map(|i| row.select(i)).collect())
}
