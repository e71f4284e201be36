//! Item geometry
//!
//! The layout system reports full allocations ([`Bounds`]); the rail only
//! cares about one axis of them ([`BoundingBox`]). Which axis is decided once
//! per indicator by [`Axis`].

use crate::error::{RailError, Result};
use crate::state::ItemId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// The axis the rail travels along
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Items laid out in a row; motion drives (x, width)
    #[default]
    Horizontal,
    /// Items laid out in a column; motion drives (y, height)
    Vertical,
}

impl Axis {
    /// Project full bounds onto this axis
    pub fn project(self, bounds: &Bounds) -> BoundingBox {
        match self {
            Axis::Horizontal => BoundingBox::new(bounds.x, bounds.width),
            Axis::Vertical => BoundingBox::new(bounds.y, bounds.height),
        }
    }

    /// Style property carrying the rail offset along the axis
    pub fn position_property(self) -> &'static str {
        match self {
            Axis::Horizontal => "margin-left",
            Axis::Vertical => "margin-top",
        }
    }

    /// Style property carrying the rail length along the axis
    pub fn size_property(self) -> &'static str {
        match self {
            Axis::Horizontal => "min-width",
            Axis::Vertical => "min-height",
        }
    }

    /// Style property carrying the rail thickness across the axis
    pub fn cross_size_property(self) -> &'static str {
        match self {
            Axis::Horizontal => "min-height",
            Axis::Vertical => "min-width",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

impl std::str::FromStr for Axis {
    type Err = RailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Ok(Axis::Horizontal),
            "vertical" | "v" => Ok(Axis::Vertical),
            other => Err(RailError::Config(format!("unknown axis '{}'", other))),
        }
    }
}

/// Allocation of an item as computed by layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// X position (absolute, after layout)
    pub x: f64,
    /// Y position (absolute, after layout)
    pub y: f64,
    /// Computed width
    pub width: f64,
    /// Computed height
    pub height: f64,
}

impl Bounds {
    /// Bounds of an item layout has not reached yet
    pub const ZERO: Bounds = Bounds {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// False while either dimension is still zero
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Bounds projected onto the active axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub origin: f64,
    pub length: f64,
}

impl BoundingBox {
    pub fn new(origin: f64, length: f64) -> Self {
        Self { origin, length }
    }

    pub fn center(&self) -> f64 {
        self.origin + self.length / 2.0
    }

    /// A zero-length box has not been laid out and is never a valid target
    pub fn is_laid_out(&self) -> bool {
        self.length > 0.0
    }
}

/// Source of on-screen item geometry
///
/// `Ok(None)` means layout has not been computed for the item yet and the
/// caller should ask again later. `Err(RailError::UnknownItem)` means the
/// item does not exist at all.
pub trait GeometryProvider {
    fn bounds_of(&self, item: ItemId) -> Result<Option<Bounds>>;
}

impl<F> GeometryProvider for F
where
    F: Fn(ItemId) -> Result<Option<Bounds>>,
{
    fn bounds_of(&self, item: ItemId) -> Result<Option<Bounds>> {
        self(item)
    }
}

#[derive(Debug)]
struct Slot {
    bounds: Bounds,
    /// Queries left that report "not laid out yet"
    unready: Cell<u32>,
    polls: Cell<u32>,
}

impl Slot {
    fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            unready: Cell::new(0),
            polls: Cell::new(0),
        }
    }
}

/// In-memory geometry provider
///
/// Stands in for a layout system: items can be placed, moved, removed, and
/// made to report "not laid out" for a number of queries.
#[derive(Debug, Default)]
pub struct GeometryMap {
    slots: FxHashMap<ItemId, Slot>,
}

impl GeometryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out items `1..=count` as a bar along `axis`
    ///
    /// Every item is an `extent` square, separated by `spacing`.
    pub fn row(axis: Axis, count: u32, extent: f64, spacing: f64) -> Self {
        let mut map = Self::new();
        for index in 0..count {
            let offset = f64::from(index) * (extent + spacing);
            let bounds = match axis {
                Axis::Horizontal => Bounds::new(offset, 0.0, extent, extent),
                Axis::Vertical => Bounds::new(0.0, offset, extent, extent),
            };
            map.insert(ItemId(index + 1), bounds);
        }
        map
    }

    /// Place or replace an item
    pub fn insert(&mut self, item: ItemId, bounds: Bounds) {
        self.slots.insert(item, Slot::new(bounds));
    }

    /// Move an existing item, keeping its poll bookkeeping
    ///
    /// Returns false if the item is unknown.
    pub fn move_to(&mut self, item: ItemId, bounds: Bounds) -> bool {
        match self.slots.get_mut(&item) {
            Some(slot) => {
                slot.bounds = bounds;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, item: ItemId) -> Option<Bounds> {
        self.slots.remove(&item).map(|slot| slot.bounds)
    }

    /// Report the item as not laid out for the next `polls` queries
    ///
    /// Returns false if the item is unknown.
    pub fn defer(&mut self, item: ItemId, polls: u32) -> bool {
        match self.slots.get(&item) {
            Some(slot) => {
                slot.unready.set(polls);
                true
            }
            None => false,
        }
    }

    /// Number of times the item has been queried
    pub fn polls(&self, item: ItemId) -> u32 {
        self.slots.get(&item).map_or(0, |slot| slot.polls.get())
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.slots.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl GeometryProvider for GeometryMap {
    fn bounds_of(&self, item: ItemId) -> Result<Option<Bounds>> {
        let slot = self.slots.get(&item).ok_or(RailError::UnknownItem(item))?;
        slot.polls.set(slot.polls.get() + 1);

        let unready = slot.unready.get();
        if unready > 0 {
            slot.unready.set(unready - 1);
            return Ok(None);
        }

        Ok(Some(slot.bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_projection() {
        let bounds = Bounds::new(100.0, 4.0, 40.0, 30.0);

        assert_eq!(
            Axis::Horizontal.project(&bounds),
            BoundingBox::new(100.0, 40.0)
        );
        assert_eq!(Axis::Vertical.project(&bounds), BoundingBox::new(4.0, 30.0));
    }

    #[test]
    fn test_axis_properties() {
        assert_eq!(Axis::Horizontal.position_property(), "margin-left");
        assert_eq!(Axis::Horizontal.size_property(), "min-width");
        assert_eq!(Axis::Horizontal.cross_size_property(), "min-height");
        assert_eq!(Axis::Vertical.position_property(), "margin-top");
        assert_eq!(Axis::Vertical.size_property(), "min-height");
        assert_eq!(Axis::Vertical.cross_size_property(), "min-width");
    }

    #[test]
    fn test_axis_from_str() {
        assert_eq!("Vertical".parse::<Axis>().unwrap(), Axis::Vertical);
        assert_eq!("h".parse::<Axis>().unwrap(), Axis::Horizontal);
        assert!("diagonal".parse::<Axis>().is_err());
    }

    #[test]
    fn test_bounds_layout_check() {
        assert!(!Bounds::ZERO.is_laid_out());
        assert!(!Bounds::new(10.0, 0.0, 40.0, 0.0).is_laid_out());
        assert!(Bounds::new(10.0, 0.0, 40.0, 30.0).is_laid_out());
        assert!(!BoundingBox::new(10.0, 0.0).is_laid_out());
        assert_eq!(BoundingBox::new(100.0, 40.0).center(), 120.0);
    }

    #[test]
    fn test_row_layout() {
        let map = GeometryMap::row(Axis::Vertical, 3, 24.0, 4.0);

        assert_eq!(map.len(), 3);
        assert_eq!(
            map.bounds_of(ItemId(3)).unwrap(),
            Some(Bounds::new(0.0, 56.0, 24.0, 24.0))
        );
    }

    #[test]
    fn test_unknown_item() {
        let map = GeometryMap::new();
        assert!(matches!(
            map.bounds_of(ItemId(9)),
            Err(RailError::UnknownItem(ItemId(9)))
        ));
    }

    #[test]
    fn test_deferred_geometry() {
        let mut map = GeometryMap::new();
        map.insert(ItemId(1), Bounds::new(100.0, 0.0, 40.0, 40.0));
        assert!(map.defer(ItemId(1), 2));
        assert!(!map.defer(ItemId(2), 2));

        assert_eq!(map.bounds_of(ItemId(1)).unwrap(), None);
        assert_eq!(map.bounds_of(ItemId(1)).unwrap(), None);
        assert!(map.bounds_of(ItemId(1)).unwrap().is_some());
        assert_eq!(map.polls(ItemId(1)), 3);
    }

    #[test]
    fn test_move_keeps_item() {
        let mut map = GeometryMap::row(Axis::Horizontal, 2, 24.0, 0.0);
        let moved = Bounds::new(50.0, 0.0, 24.0, 24.0);
        assert!(map.move_to(ItemId(2), moved));
        assert!(!map.move_to(ItemId(5), Bounds::ZERO));
        assert_eq!(map.remove(ItemId(2)), Some(moved));
        assert!(!map.contains(ItemId(2)));
    }

    #[test]
    fn test_closure_provider() {
        let provider = |item: ItemId| -> Result<Option<Bounds>> {
            match item.get() {
                1 => Ok(Some(Bounds::new(0.0, 0.0, 10.0, 10.0))),
                _ => Ok(None),
            }
        };

        assert!(provider.bounds_of(ItemId(1)).unwrap().is_some());
        assert!(provider.bounds_of(ItemId(2)).unwrap().is_none());
    }
}
