//! Rail Core
//!
//! Foundational types for the workspace rail, a single indicator that tracks
//! the selected item in a row or column of markers:
//!
//! - **Axis Model**: which dimension of an item's bounds drives the rail
//! - **Geometry**: item bounds, their projection onto the axis, and the
//!   [`GeometryProvider`] seam to the layout system
//! - **Rail State**: the last committed rail position and size
//!
//! # Example
//!
//! ```rust
//! use rail_core::{Axis, Bounds, GeometryMap, GeometryProvider, ItemId};
//!
//! let geometry = GeometryMap::row(Axis::Horizontal, 10, 24.0, 4.0);
//! let bounds = geometry.bounds_of(ItemId(2)).unwrap().unwrap();
//!
//! assert_eq!(Axis::Horizontal.project(&bounds).origin, 28.0);
//! assert_eq!(bounds, Bounds::new(28.0, 0.0, 24.0, 24.0));
//! ```

pub mod error;
pub mod geometry;
pub mod state;

pub use error::{RailError, Result};
pub use geometry::{Axis, BoundingBox, Bounds, GeometryMap, GeometryProvider};
pub use state::{ItemId, RailState};
