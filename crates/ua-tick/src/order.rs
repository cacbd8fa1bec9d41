//! `Order<O>`: one command a module wants a unit to carry out.

use ua_core::UnitId;

/// A command for `unit`, produced by a decision module.
///
/// `O` is the game's action type; the driver never looks inside it.  An
/// order only reaches the game if the issuing module holds `unit`'s lease
/// when orders are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<O> {
    pub unit:   UnitId,
    pub action: O,
}

impl<O> Order<O> {
    pub fn new(unit: UnitId, action: O) -> Self {
        Self { unit, action }
    }
}
