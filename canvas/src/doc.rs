//! Document model: maps, locations, and the store that owns them.
//!
//! `DocStore` is the single source of truth for editor data. The interaction
//! controller never touches its fields; it emits [`Intent`]s which the engine
//! hands to [`DocStore::apply`]. Every write path enforces the same rules:
//!
//! - coordinates are rounded to integers at commit, and non-finite payloads
//!   are dropped without touching state;
//! - removing a location clears every child's `parent_id` and every map's
//!   `active_location` / `selected_locations` entry for it;
//! - re-parenting is rejected when it would close a cycle.
//!
//! The serialized field names (`parentId`, `activeLocation`, ...) match the
//! save snapshot format.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::geometry::round_half_up;

/// Unique identifier for a location marker.
pub type LocationId = Uuid;

/// Unique identifier for a map.
pub type MapId = Uuid;

/// A placed annotation on one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    /// The map whose coordinate space `x`/`y` are in.
    pub map: MapId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<LocationId>,
    /// World x in image pixels.
    pub x: i64,
    /// World y in image pixels.
    pub y: i64,
}

impl Location {
    /// World position as a point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// A background image plus per-map editor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub id: MapId,
    pub name: String,
    /// Image payload as a data URL. Empty when the snapshot was saved without images.
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_location: Option<LocationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_locations: Option<Vec<LocationId>>,
}

impl MapData {
    #[must_use]
    pub fn new(id: MapId, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image: image.into(),
            bg_color: None,
            active_location: None,
            selected_locations: None,
        }
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }

    #[must_use]
    pub fn is_selected(&self, id: &LocationId) -> bool {
        self.selected_locations.as_ref().is_some_and(|s| s.contains(id))
    }
}

/// A discrete store mutation requested by the interaction controller.
///
/// Coordinates are raw world positions; the store rounds them.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Place a new location on the current map.
    Create { id: LocationId, x: f64, y: f64 },
    /// Move the current map's active location.
    MoveActive { x: f64, y: f64 },
    /// Focus one location (or none) on the current map.
    SetActive(Option<LocationId>),
    /// Attach `id` under `parent`, or detach it.
    SetParent { id: LocationId, parent: Option<LocationId> },
    /// Replace the current map's selection.
    SetSelected(Option<Vec<LocationId>>),
    /// Delete a location and heal references to it.
    Remove(LocationId),
}

/// Why the store refused a mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    #[error("no map is current")]
    NoCurrentMap,
    #[error("unknown map {0}")]
    UnknownMap(MapId),
    #[error("unknown location {0}")]
    UnknownLocation(LocationId),
    #[error("location {0} already exists")]
    DuplicateLocation(LocationId),
    #[error("parenting {id} under {parent} would create a cycle")]
    ParentCycle { id: LocationId, parent: LocationId },
}

/// In-memory store of maps and their locations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocStore {
    maps: Vec<MapData>,
    /// All locations across maps, in insertion order (later = drawn on top).
    locations: Vec<Location>,
    current_map: Option<MapId>,
}

#[allow(clippy::cast_possible_truncation)]
fn to_coord(v: f64) -> i64 {
    round_half_up(v) as i64
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded data, repairing broken references.
    ///
    /// Duplicate location ids keep their first occurrence, parents and
    /// active/selected ids that point at missing locations are cleared, and
    /// the first map becomes current.
    #[must_use]
    pub fn from_parts(mut maps: Vec<MapData>, locations: Vec<Location>) -> Self {
        let mut seen = HashSet::new();
        let mut kept: Vec<Location> = locations.into_iter().filter(|l| seen.insert(l.id)).collect();

        for loc in &mut kept {
            if loc.parent_id.is_some_and(|p| p == loc.id || !seen.contains(&p)) {
                log::debug!("clearing dangling parent on location {}", loc.id);
                loc.parent_id = None;
            }
        }
        for map in &mut maps {
            if map.active_location.is_some_and(|a| !seen.contains(&a)) {
                map.active_location = None;
            }
            if let Some(sel) = map.selected_locations.as_mut() {
                sel.retain(|id| seen.contains(id));
            }
        }

        let current_map = maps.first().map(|m| m.id);
        Self { maps, locations: kept, current_map }
    }

    // --- Queries ---

    #[must_use]
    pub fn maps(&self) -> &[MapData] {
        &self.maps
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn location(&self, id: &LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == *id)
    }

    #[must_use]
    pub fn map(&self, id: &MapId) -> Option<&MapData> {
        self.maps.iter().find(|m| m.id == *id)
    }

    #[must_use]
    pub fn current_map_id(&self) -> Option<MapId> {
        self.current_map
    }

    #[must_use]
    pub fn current_map(&self) -> Option<&MapData> {
        self.current_map.and_then(|id| self.map(&id))
    }

    /// Locations on the current map, in insertion order.
    #[must_use]
    pub fn visible_locations(&self) -> Vec<&Location> {
        let Some(current) = self.current_map else {
            return Vec::new();
        };
        self.locations.iter().filter(|l| l.map == current).collect()
    }

    /// The current map's active location id.
    #[must_use]
    pub fn active_location_id(&self) -> Option<LocationId> {
        self.current_map().and_then(|m| m.active_location)
    }

    /// The current map's selection (empty when unset).
    #[must_use]
    pub fn selected_ids(&self) -> &[LocationId] {
        self.current_map()
            .and_then(|m| m.selected_locations.as_deref())
            .unwrap_or(&[])
    }

    /// Number of locations across all maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    // --- Intents ---

    /// Apply one controller intent. Returns whether state changed.
    ///
    /// # Errors
    ///
    /// Returns [`DocError`] when the intent references missing data, would
    /// create a parent cycle, or needs a current map that does not exist.
    pub fn apply(&mut self, intent: &Intent) -> Result<bool, DocError> {
        match intent {
            Intent::Create { id, x, y } => self.create(*id, *x, *y),
            Intent::MoveActive { x, y } => Ok(self.move_active(*x, *y)),
            Intent::SetActive(id) => self.set_active(*id),
            Intent::SetParent { id, parent } => self.set_parent(*id, *parent),
            Intent::SetSelected(ids) => Ok(self.set_selected(ids.clone())),
            Intent::Remove(id) => Ok(self.remove(id)),
        }
    }

    /// Add a location to the current map at the rounded position.
    ///
    /// Non-finite coordinates are dropped (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// [`DocError::NoCurrentMap`] or [`DocError::DuplicateLocation`].
    pub fn create(&mut self, id: LocationId, x: f64, y: f64) -> Result<bool, DocError> {
        let Some(map) = self.current_map else {
            return Err(DocError::NoCurrentMap);
        };
        if !(x.is_finite() && y.is_finite()) {
            log::debug!("dropping create with non-finite position ({x}, {y})");
            return Ok(false);
        }
        if self.location(&id).is_some() {
            return Err(DocError::DuplicateLocation(id));
        }
        self.locations.push(Location {
            id,
            map,
            name: None,
            parent_id: None,
            x: to_coord(x),
            y: to_coord(y),
        });
        Ok(true)
    }

    /// Move the active location to the rounded position.
    ///
    /// Returns `false` when nothing is active or either axis is non-finite.
    pub fn move_active(&mut self, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            log::debug!("dropping move with non-finite position ({x}, {y})");
            return false;
        }
        let Some(active) = self.active_location_id() else {
            return false;
        };
        let Some(loc) = self.locations.iter_mut().find(|l| l.id == active) else {
            return false;
        };
        loc.x = to_coord(x);
        loc.y = to_coord(y);
        true
    }

    /// Focus a location, switching to its map and selecting only it.
    /// `None` clears both the active location and the selection.
    ///
    /// # Errors
    ///
    /// [`DocError::UnknownLocation`] for an id that does not exist.
    pub fn set_active(&mut self, id: Option<LocationId>) -> Result<bool, DocError> {
        if let Some(id) = id {
            let Some(loc) = self.location(&id) else {
                return Err(DocError::UnknownLocation(id));
            };
            self.current_map = Some(loc.map);
        }
        let Some(map) = self.current_map_mut() else {
            return Ok(false);
        };
        map.active_location = id;
        map.selected_locations = id.map(|id| vec![id]);
        Ok(true)
    }

    /// Set or clear a location's parent.
    ///
    /// # Errors
    ///
    /// [`DocError::UnknownLocation`] when either id is missing, or
    /// [`DocError::ParentCycle`] when `parent` is `id` or one of its descendants.
    pub fn set_parent(&mut self, id: LocationId, parent: Option<LocationId>) -> Result<bool, DocError> {
        if self.location(&id).is_none() {
            return Err(DocError::UnknownLocation(id));
        }
        if let Some(parent) = parent {
            if self.location(&parent).is_none() {
                return Err(DocError::UnknownLocation(parent));
            }
            if self.is_ancestor_or_self(id, parent) {
                return Err(DocError::ParentCycle { id, parent });
            }
        }
        let Some(loc) = self.locations.iter_mut().find(|l| l.id == id) else {
            return Err(DocError::UnknownLocation(id));
        };
        if loc.parent_id == parent {
            return Ok(false);
        }
        loc.parent_id = parent;
        Ok(true)
    }

    /// Replace the current map's selection. Unknown ids are dropped.
    pub fn set_selected(&mut self, ids: Option<Vec<LocationId>>) -> bool {
        let ids = ids.map(|ids| {
            ids.into_iter()
                .filter(|id| self.location(id).is_some())
                .collect::<Vec<_>>()
        });
        let Some(map) = self.current_map_mut() else {
            return false;
        };
        map.selected_locations = ids;
        true
    }

    /// Delete a location, clearing every reference to it.
    ///
    /// Returns `false` if it did not exist.
    pub fn remove(&mut self, id: &LocationId) -> bool {
        let before = self.locations.len();
        self.locations.retain(|l| l.id != *id);
        if self.locations.len() == before {
            return false;
        }
        for loc in &mut self.locations {
            if loc.parent_id == Some(*id) {
                loc.parent_id = None;
            }
        }
        for map in &mut self.maps {
            if map.active_location == Some(*id) {
                map.active_location = None;
            }
            if let Some(sel) = map.selected_locations.as_mut() {
                sel.retain(|s| s != id);
            }
        }
        true
    }

    /// Name the active location. Returns `false` when nothing is active.
    pub fn rename_active(&mut self, name: impl Into<String>) -> bool {
        let Some(active) = self.active_location_id() else {
            return false;
        };
        let Some(loc) = self.locations.iter_mut().find(|l| l.id == active) else {
            return false;
        };
        loc.name = Some(name.into());
        true
    }

    // --- Maps ---

    /// Append a map and make it current. It inherits the background color
    /// of the previously last map.
    pub fn new_map(&mut self, mut map: MapData) {
        if map.bg_color.is_none() {
            map.bg_color = self.maps.last().and_then(|m| m.bg_color.clone());
        }
        self.current_map = Some(map.id);
        self.maps.push(map);
    }

    /// Replace a map's name and image.
    ///
    /// # Errors
    ///
    /// [`DocError::UnknownMap`] when no such map exists.
    pub fn update_map(&mut self, id: MapId, name: impl Into<String>, image: impl Into<String>) -> Result<(), DocError> {
        let Some(map) = self.maps.iter_mut().find(|m| m.id == id) else {
            return Err(DocError::UnknownMap(id));
        };
        map.name = name.into();
        map.image = image.into();
        Ok(())
    }

    /// Delete a map and all of its locations. If it was current, the first
    /// remaining map becomes current.
    pub fn delete_map(&mut self, id: &MapId) -> bool {
        let before = self.maps.len();
        self.maps.retain(|m| m.id != *id);
        if self.maps.len() == before {
            return false;
        }
        let doomed: Vec<LocationId> = self
            .locations
            .iter()
            .filter(|l| l.map == *id)
            .map(|l| l.id)
            .collect();
        for loc in doomed {
            self.remove(&loc);
        }
        if self.current_map == Some(*id) {
            self.current_map = self.maps.first().map(|m| m.id);
        }
        true
    }

    /// Switch the current map. Unknown ids are ignored.
    pub fn select_map(&mut self, id: &MapId) -> bool {
        if self.map(id).is_none() {
            return false;
        }
        self.current_map = Some(*id);
        true
    }

    /// Set the current map's background color.
    pub fn set_bg_color(&mut self, color: impl Into<String>) -> bool {
        let Some(map) = self.current_map_mut() else {
            return false;
        };
        map.bg_color = Some(color.into());
        true
    }

    // --- Internals ---

    fn current_map_mut(&mut self) -> Option<&mut MapData> {
        let current = self.current_map?;
        self.maps.iter_mut().find(|m| m.id == current)
    }

    /// Whether `candidate` is `id` itself or sits below it in the hierarchy.
    fn is_ancestor_or_self(&self, id: LocationId, candidate: LocationId) -> bool {
        let mut cursor = Some(candidate);
        // Bounded walk: loaded data may already contain a cycle.
        for _ in 0..=self.locations.len() {
            let Some(current) = cursor else {
                return false;
            };
            if current == id {
                return true;
            }
            cursor = self.location(&current).and_then(|l| l.parent_id);
        }
        true
    }
}
