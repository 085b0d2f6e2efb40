//! Drift-tube chambers, their super-layers and layers.
//!
//! A chamber holds two or three super-layers, each of which holds four
//! layers. All elements live in a single [`DtGeometry`] arena and refer to
//! each other through typed keys; lookups by detector id go through hash maps
//! into the arena.

mod id;

pub use id::{DetId, DtChamberId, DtLayerId, DtSuperLayerId};

use std::collections::HashMap;

use slotmap::SlotMap;

use super::{GeomDet, SubDetector};
use crate::error::HierarchyError;
use crate::geometry::BoundPlane;

slotmap::new_key_type! {
    /// Arena handle of a chamber.
    pub struct ChamberKey;
}

slotmap::new_key_type! {
    /// Arena handle of a super-layer.
    pub struct SuperLayerKey;
}

slotmap::new_key_type! {
    /// Arena handle of a layer.
    pub struct LayerKey;
}

/// A drift-tube chamber.
#[derive(Debug, Clone)]
pub struct DtChamber {
    id: DtChamberId,
    surface: BoundPlane,
    superlayers: Vec<SuperLayerKey>,
}

impl DtChamber {
    #[must_use]
    pub fn id(&self) -> DtChamberId {
        self.id
    }
}

// Chambers are identified by id alone.
impl PartialEq for DtChamber {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DtChamber {}

impl GeomDet for DtChamber {
    fn surface(&self) -> &BoundPlane {
        &self.surface
    }

    fn sub_detector(&self) -> SubDetector {
        SubDetector::Dt
    }
}

/// A super-layer: four layers of drift cells sharing a wire orientation.
#[derive(Debug, Clone)]
pub struct DtSuperLayer {
    id: DtSuperLayerId,
    surface: BoundPlane,
    chamber: ChamberKey,
    layers: Vec<LayerKey>,
}

impl DtSuperLayer {
    #[must_use]
    pub fn id(&self) -> DtSuperLayerId {
        self.id
    }

    /// Handle of the owning chamber.
    #[must_use]
    pub fn chamber(&self) -> ChamberKey {
        self.chamber
    }
}

impl GeomDet for DtSuperLayer {
    fn surface(&self) -> &BoundPlane {
        &self.surface
    }

    fn sub_detector(&self) -> SubDetector {
        SubDetector::Dt
    }
}

/// A single layer of drift cells.
#[derive(Debug, Clone)]
pub struct DtLayer {
    id: DtLayerId,
    surface: BoundPlane,
    superlayer: SuperLayerKey,
}

impl DtLayer {
    #[must_use]
    pub fn id(&self) -> DtLayerId {
        self.id
    }

    /// Handle of the owning super-layer.
    #[must_use]
    pub fn superlayer(&self) -> SuperLayerKey {
        self.superlayer
    }
}

impl GeomDet for DtLayer {
    fn surface(&self) -> &BoundPlane {
        &self.surface
    }

    fn sub_detector(&self) -> SubDetector {
        SubDetector::Dt
    }
}

/// Arena owning every drift-tube element.
#[derive(Debug, Default)]
pub struct DtGeometry {
    chambers: SlotMap<ChamberKey, DtChamber>,
    superlayers: SlotMap<SuperLayerKey, DtSuperLayer>,
    layers: SlotMap<LayerKey, DtLayer>,
    chamber_index: HashMap<DtChamberId, ChamberKey>,
    superlayer_index: HashMap<DtSuperLayerId, SuperLayerKey>,
    layer_index: HashMap<DtLayerId, LayerKey>,
}

impl DtGeometry {
    /// Creates an empty geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chambers.
    #[must_use]
    pub fn chamber_count(&self) -> usize {
        self.chambers.len()
    }

    /// Iterates over all chambers in arbitrary order.
    pub fn chambers(&self) -> impl Iterator<Item = &DtChamber> {
        self.chambers.values()
    }

    // --- Construction ---

    /// Adds a chamber.
    ///
    /// # Errors
    ///
    /// Returns an error if a chamber with the same id already exists.
    pub fn add_chamber(
        &mut self,
        id: DtChamberId,
        surface: BoundPlane,
    ) -> Result<ChamberKey, HierarchyError> {
        if self.chamber_index.contains_key(&id) {
            return Err(HierarchyError::DuplicateId(id.to_string()));
        }
        let key = self.chambers.insert(DtChamber {
            id,
            surface,
            superlayers: Vec::new(),
        });
        self.chamber_index.insert(id, key);
        Ok(key)
    }

    /// Adds a super-layer to a chamber, which takes ownership of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the chamber does not exist, the id belongs to a
    /// different chamber, or the id is already present.
    pub fn add_superlayer(
        &mut self,
        chamber: ChamberKey,
        id: DtSuperLayerId,
        surface: BoundPlane,
    ) -> Result<SuperLayerKey, HierarchyError> {
        let parent = self.chamber_by_key(chamber)?.id;
        if id.chamber() != parent {
            return Err(HierarchyError::IdMismatch {
                child: id.to_string(),
                parent: parent.to_string(),
            });
        }
        if self.superlayer_index.contains_key(&id) {
            return Err(HierarchyError::DuplicateId(id.to_string()));
        }
        let key = self.superlayers.insert(DtSuperLayer {
            id,
            surface,
            chamber,
            layers: Vec::new(),
        });
        self.superlayer_index.insert(id, key);
        if let Some(ch) = self.chambers.get_mut(chamber) {
            ch.superlayers.push(key);
        }
        Ok(key)
    }

    /// Adds a layer to a super-layer, which takes ownership of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the super-layer does not exist, the id belongs to
    /// a different super-layer, or the id is already present.
    pub fn add_layer(
        &mut self,
        superlayer: SuperLayerKey,
        id: DtLayerId,
        surface: BoundPlane,
    ) -> Result<LayerKey, HierarchyError> {
        let parent = self.superlayer_by_key(superlayer)?.id;
        if id.superlayer() != parent {
            return Err(HierarchyError::IdMismatch {
                child: id.to_string(),
                parent: parent.to_string(),
            });
        }
        if self.layer_index.contains_key(&id) {
            return Err(HierarchyError::DuplicateId(id.to_string()));
        }
        let key = self.layers.insert(DtLayer {
            id,
            surface,
            superlayer,
        });
        self.layer_index.insert(id, key);
        if let Some(sl) = self.superlayers.get_mut(superlayer) {
            sl.layers.push(key);
        }
        Ok(key)
    }

    // --- Lookup by handle ---

    /// Returns the chamber behind a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not in the arena.
    pub fn chamber_by_key(&self, key: ChamberKey) -> Result<&DtChamber, HierarchyError> {
        self.chambers
            .get(key)
            .ok_or_else(|| HierarchyError::EntityNotFound("chamber".into()))
    }

    /// Returns the super-layer behind a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not in the arena.
    pub fn superlayer_by_key(&self, key: SuperLayerKey) -> Result<&DtSuperLayer, HierarchyError> {
        self.superlayers
            .get(key)
            .ok_or_else(|| HierarchyError::EntityNotFound("superlayer".into()))
    }

    /// Returns the layer behind a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not in the arena.
    pub fn layer_by_key(&self, key: LayerKey) -> Result<&DtLayer, HierarchyError> {
        self.layers
            .get(key)
            .ok_or_else(|| HierarchyError::EntityNotFound("layer".into()))
    }

    // --- Lookup by id ---

    /// Returns the chamber with the given id.
    #[must_use]
    pub fn chamber(&self, id: DtChamberId) -> Option<&DtChamber> {
        self.chamber_index
            .get(&id)
            .and_then(|k| self.chambers.get(*k))
    }

    /// Returns the super-layer with the given id.
    #[must_use]
    pub fn superlayer(&self, id: DtSuperLayerId) -> Option<&DtSuperLayer> {
        self.superlayer_index
            .get(&id)
            .and_then(|k| self.superlayers.get(*k))
    }

    /// Returns the layer with the given id.
    #[must_use]
    pub fn layer(&self, id: DtLayerId) -> Option<&DtLayer> {
        self.layer_index.get(&id).and_then(|k| self.layers.get(*k))
    }

    // --- Navigation ---

    /// Super-layers of a chamber, in insertion order.
    pub fn superlayers<'a>(
        &'a self,
        chamber: &'a DtChamber,
    ) -> impl Iterator<Item = &'a DtSuperLayer> + 'a {
        chamber
            .superlayers
            .iter()
            .filter_map(|k| self.superlayers.get(*k))
    }

    /// Super-layer number `n` of a chamber (1 and 3 phi, 2 z).
    #[must_use]
    pub fn superlayer_by_number<'a>(
        &'a self,
        chamber: &'a DtChamber,
        n: u8,
    ) -> Option<&'a DtSuperLayer> {
        self.superlayers(chamber)
            .find(|sl| sl.id.superlayer() == n)
    }

    /// Layers of a super-layer, in insertion order.
    pub fn layers<'a>(
        &'a self,
        superlayer: &'a DtSuperLayer,
    ) -> impl Iterator<Item = &'a DtLayer> + 'a {
        superlayer
            .layers
            .iter()
            .filter_map(|k| self.layers.get(*k))
    }

    /// Direct components of a chamber: its super-layers.
    #[must_use]
    pub fn components<'a>(&'a self, chamber: &'a DtChamber) -> Vec<&'a dyn GeomDet> {
        self.superlayers(chamber)
            .map(|sl| sl as &dyn GeomDet)
            .collect()
    }

    /// The super-layer or layer with the given id, if it belongs to `chamber`.
    #[must_use]
    pub fn component(&self, chamber: &DtChamber, id: DetId) -> Option<&dyn GeomDet> {
        if id.chamber() != chamber.id {
            return None;
        }
        match id {
            DetId::Chamber(_) => None,
            DetId::SuperLayer(sl) => self.superlayer(sl).map(|s| s as &dyn GeomDet),
            DetId::Layer(l) => self.layer(l).map(|l| l as &dyn GeomDet),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Frame, RectangularBounds};
    use crate::math::Point3;

    fn plane(z: f64) -> BoundPlane {
        BoundPlane::new(
            Frame::identity_at(Point3::new(0.0, 400.0, z)),
            RectangularBounds::new(200.0, 250.0, 5.0).unwrap(),
        )
    }

    fn chamber_id() -> DtChamberId {
        DtChamberId::new(0, 1, 4).unwrap()
    }

    /// One chamber with three super-layers of four layers each.
    fn full_chamber() -> (DtGeometry, ChamberKey) {
        let mut geo = DtGeometry::new();
        let ch = geo.add_chamber(chamber_id(), plane(0.0)).unwrap();
        for n in 1..=3 {
            let sl_id = DtSuperLayerId::new(chamber_id(), n).unwrap();
            let sl = geo.add_superlayer(ch, sl_id, plane(f64::from(n))).unwrap();
            for l in 1..=4 {
                let l_id = DtLayerId::new(sl_id, l).unwrap();
                geo.add_layer(sl, l_id, plane(f64::from(n) + 0.1 * f64::from(l)))
                    .unwrap();
            }
        }
        (geo, ch)
    }

    #[test]
    fn lookup_by_id() {
        let (geo, _) = full_chamber();
        let sl_id = DtSuperLayerId::new(chamber_id(), 2).unwrap();
        let l_id = DtLayerId::new(sl_id, 3).unwrap();
        assert_eq!(geo.chamber(chamber_id()).unwrap().id(), chamber_id());
        assert_eq!(geo.superlayer(sl_id).unwrap().id(), sl_id);
        let layer = geo.layer(l_id).unwrap();
        assert!((layer.position().z - 2.3).abs() < 1e-12);
        assert_eq!(geo.superlayer_by_key(layer.superlayer()).unwrap().id(), sl_id);
    }

    #[test]
    fn components_are_superlayers_in_order() {
        let (geo, ch) = full_chamber();
        let chamber = geo.chamber_by_key(ch).unwrap();
        let comps = geo.components(chamber);
        assert_eq!(comps.len(), 3);
        let zs: Vec<f64> = comps.iter().map(|c| c.position().z).collect();
        assert_eq!(zs, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            geo.superlayer_by_number(chamber, 3).unwrap().id().superlayer(),
            3
        );
        let sl = geo.superlayer_by_number(chamber, 1).unwrap();
        assert_eq!(geo.layers(sl).count(), 4);
    }

    #[test]
    fn component_lookup_respects_ownership() {
        let (mut geo, ch) = full_chamber();
        let other_id = DtChamberId::new(1, 1, 4).unwrap();
        let other = geo.add_chamber(other_id, plane(10.0)).unwrap();
        let other_sl = DtSuperLayerId::new(other_id, 1).unwrap();
        geo.add_superlayer(other, other_sl, plane(11.0)).unwrap();

        let chamber = geo.chamber_by_key(ch).unwrap();
        let sl_id = DtSuperLayerId::new(chamber_id(), 1).unwrap();
        let l_id = DtLayerId::new(sl_id, 2).unwrap();
        assert!(geo.component(chamber, sl_id.into()).is_some());
        assert!(geo.component(chamber, l_id.into()).is_some());
        assert!(geo.component(chamber, other_sl.into()).is_none());
        assert!(geo.component(chamber, chamber_id().into()).is_none());
    }

    #[test]
    fn mismatched_parent_rejected() {
        let mut geo = DtGeometry::new();
        let ch = geo.add_chamber(chamber_id(), plane(0.0)).unwrap();
        let foreign = DtSuperLayerId::new(DtChamberId::new(2, 1, 4).unwrap(), 1).unwrap();
        let err = geo.add_superlayer(ch, foreign, plane(1.0)).unwrap_err();
        assert!(matches!(err, HierarchyError::IdMismatch { .. }));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let (mut geo, ch) = full_chamber();
        assert!(matches!(
            geo.add_chamber(chamber_id(), plane(0.0)),
            Err(HierarchyError::DuplicateId(_))
        ));
        let sl_id = DtSuperLayerId::new(chamber_id(), 1).unwrap();
        assert!(matches!(
            geo.add_superlayer(ch, sl_id, plane(0.0)),
            Err(HierarchyError::DuplicateId(_))
        ));
        assert_eq!(geo.chamber_count(), 1);
    }

    #[test]
    fn chamber_equality_is_by_id() {
        let mut a = DtGeometry::new();
        let mut b = DtGeometry::new();
        a.add_chamber(chamber_id(), plane(0.0)).unwrap();
        b.add_chamber(chamber_id(), plane(99.0)).unwrap();
        assert_eq!(a.chamber(chamber_id()), b.chamber(chamber_id()));
        assert_eq!(a.chambers().count(), 1);
    }
}
