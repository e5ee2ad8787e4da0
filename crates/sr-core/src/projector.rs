//! Route to slot projection

use crate::route::{ConfigError, ViewsConfig};
use crate::types::{RouteId, SlotPosition};

/// Locate a route in the slot table.
///
/// Slots are scanned in order. An id that no slot holds means the flat route
/// list and the slot table disagree; callers must treat the error as fatal.
pub fn project<V>(config: &ViewsConfig<V>, route: RouteId) -> Result<SlotPosition, ConfigError> {
    config
        .slots()
        .iter()
        .enumerate()
        .find_map(|(slot, ids)| {
            ids.iter()
                .position(|id| *id == route)
                .map(|index| SlotPosition::new(slot, index))
        })
        .ok_or(ConfigError::UnknownRoute(route))
}
