//! Item identity and committed rail state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a trackable item (a workspace marker)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The position and size the rail rests at once in-flight animation completes
///
/// Both values are measured along the active axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RailState {
    pub position: f64,
    pub size: f64,
}

impl RailState {
    pub fn new(position: f64, size: f64) -> Self {
        Self { position, size }
    }

    /// Far edge of the rail along the axis
    pub fn end(&self) -> f64 {
        self.position + self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId::new(7).to_string(), "7");
        assert_eq!(ItemId::from(3).get(), 3);
    }

    #[test]
    fn test_rail_state_end() {
        let state = RailState::new(108.0, 24.0);
        assert_eq!(state.end(), 132.0);
    }
}
