//! Secondary indexes over the document arena.
//!
//! Indexes hold entity ids plus key-to-id maps -- never entity data. Each
//! index carries a dirty flag set by any add/remove or by a setter that
//! touches one of its keyed fields; the accessor rebuilds lazily in one
//! O(n) pass before servicing a lookup, so a batch of mutations pays the
//! rebuild once. Duplicate keys are surfaced, not collapsed: every lookup
//! returns all matches and ambiguity policy stays with the caller.

use crate::document::{Document, EntityId};
use crate::elements::Element;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// All per-type indexes owned by a document.
#[derive(Debug, Default)]
pub(crate) struct Indexes {
    pub(crate) footprints: FootprintIndex,
    pub(crate) tracks: TrackIndex,
    pub(crate) vias: ViaIndex,
    pub(crate) zones: ZoneIndex,
    pub(crate) nets: NetIndex,
}

impl Indexes {
    pub(crate) fn mark_all_dirty(&mut self) {
        self.footprints.mark_dirty();
        self.tracks.mark_dirty();
        self.vias.mark_dirty();
        self.zones.mark_dirty();
        self.nets.mark_dirty();
    }
}

fn push(map: &mut HashMap<String, Vec<EntityId>>, key: &str, id: &EntityId) {
    map.entry(key.to_owned()).or_default().push(id.clone());
}

// ──────────────────────────────────────────────
// Footprints
// ──────────────────────────────────────────────

/// Footprint lookups by reference designator, layer and library.
#[derive(Debug)]
pub struct FootprintIndex {
    dirty: bool,
    ids: Vec<EntityId>,
    by_reference: HashMap<String, Vec<EntityId>>,
    by_layer: HashMap<String, Vec<EntityId>>,
    by_library: HashMap<String, Vec<EntityId>>,
}

impl Default for FootprintIndex {
    fn default() -> Self {
        FootprintIndex {
            dirty: true,
            ids: Vec::new(),
            by_reference: HashMap::new(),
            by_layer: HashMap::new(),
            by_library: HashMap::new(),
        }
    }
}

impl FootprintIndex {
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// All footprint ids in document order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// All footprints holding this reference. More than one entry means
    /// the document carries duplicate references; resolution policy is
    /// the caller's.
    pub fn by_reference(&self, reference: &str) -> &[EntityId] {
        self.by_reference
            .get(reference)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_layer(&self, layer: &str) -> &[EntityId] {
        self.by_layer.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_library(&self, library: &str) -> &[EntityId] {
        self.by_library
            .get(library)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ──────────────────────────────────────────────
// Tracks
// ──────────────────────────────────────────────

/// Track lookups by net ordinal and layer.
#[derive(Debug)]
pub struct TrackIndex {
    dirty: bool,
    ids: Vec<EntityId>,
    by_net: HashMap<i64, Vec<EntityId>>,
    by_layer: HashMap<String, Vec<EntityId>>,
}

impl Default for TrackIndex {
    fn default() -> Self {
        TrackIndex {
            dirty: true,
            ids: Vec::new(),
            by_net: HashMap::new(),
            by_layer: HashMap::new(),
        }
    }
}

impl TrackIndex {
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn by_net(&self, net: i64) -> &[EntityId] {
        self.by_net.get(&net).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_layer(&self, layer: &str) -> &[EntityId] {
        self.by_layer.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ──────────────────────────────────────────────
// Vias
// ──────────────────────────────────────────────

/// Via lookups by net ordinal.
#[derive(Debug)]
pub struct ViaIndex {
    dirty: bool,
    ids: Vec<EntityId>,
    by_net: HashMap<i64, Vec<EntityId>>,
}

impl Default for ViaIndex {
    fn default() -> Self {
        ViaIndex {
            dirty: true,
            ids: Vec::new(),
            by_net: HashMap::new(),
        }
    }
}

impl ViaIndex {
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn by_net(&self, net: i64) -> &[EntityId] {
        self.by_net.get(&net).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ──────────────────────────────────────────────
// Zones
// ──────────────────────────────────────────────

/// Zone lookups by net ordinal and layer. A zone spanning several layers
/// is indexed under each of them.
#[derive(Debug)]
pub struct ZoneIndex {
    dirty: bool,
    ids: Vec<EntityId>,
    by_net: HashMap<i64, Vec<EntityId>>,
    by_layer: HashMap<String, Vec<EntityId>>,
}

impl Default for ZoneIndex {
    fn default() -> Self {
        ZoneIndex {
            dirty: true,
            ids: Vec::new(),
            by_net: HashMap::new(),
            by_layer: HashMap::new(),
        }
    }
}

impl ZoneIndex {
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn by_net(&self, net: i64) -> &[EntityId] {
        self.by_net.get(&net).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_layer(&self, layer: &str) -> &[EntityId] {
        self.by_layer.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ──────────────────────────────────────────────
// Nets
// ──────────────────────────────────────────────

/// Net declaration lookups by ordinal and name.
#[derive(Debug)]
pub struct NetIndex {
    dirty: bool,
    ids: Vec<EntityId>,
    by_ordinal: HashMap<i64, Vec<EntityId>>,
    by_name: HashMap<String, Vec<EntityId>>,
}

impl Default for NetIndex {
    fn default() -> Self {
        NetIndex {
            dirty: true,
            ids: Vec::new(),
            by_ordinal: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl NetIndex {
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn by_ordinal(&self, ordinal: i64) -> &[EntityId] {
        self.by_ordinal
            .get(&ordinal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_name(&self, name: &str) -> &[EntityId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_ordinal(&self, ordinal: i64) -> bool {
        self.by_ordinal.contains_key(&ordinal)
    }
}

// ──────────────────────────────────────────────
// Document accessors
// ──────────────────────────────────────────────

/// Summary counts for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    pub footprints: usize,
    pub tracks: usize,
    pub vias: usize,
    pub zones: usize,
    pub nets: usize,
    pub graphics: usize,
    pub unknown_elements: usize,
    pub total_track_length_mm: f64,
}

impl Document {
    /// The footprint index, rebuilt first if stale.
    pub fn footprints(&mut self) -> &FootprintIndex {
        if self.indexes.footprints.is_dirty() {
            let rows: Vec<_> = self
                .entities()
                .filter_map(|e| {
                    e.as_footprint().map(|f| {
                        (
                            e.id().clone(),
                            f.reference().to_owned(),
                            f.layer.clone(),
                            f.library.clone(),
                        )
                    })
                })
                .collect();
            let index = &mut self.indexes.footprints;
            index.ids.clear();
            index.by_reference.clear();
            index.by_layer.clear();
            index.by_library.clear();
            for (id, reference, layer, library) in rows {
                if !reference.is_empty() {
                    push(&mut index.by_reference, &reference, &id);
                }
                push(&mut index.by_layer, &layer, &id);
                if !library.is_empty() {
                    push(&mut index.by_library, &library, &id);
                }
                index.ids.push(id);
            }
            index.dirty = false;
            debug!(footprints = index.ids.len(), "rebuilt footprint index");
        }
        &self.indexes.footprints
    }

    /// The track index, rebuilt first if stale.
    pub fn tracks(&mut self) -> &TrackIndex {
        if self.indexes.tracks.is_dirty() {
            let rows: Vec<_> = self
                .entities()
                .filter_map(|e| {
                    e.as_track()
                        .map(|t| (e.id().clone(), t.net, t.layer.clone()))
                })
                .collect();
            let index = &mut self.indexes.tracks;
            index.ids.clear();
            index.by_net.clear();
            index.by_layer.clear();
            for (id, net, layer) in rows {
                index.by_net.entry(net).or_default().push(id.clone());
                push(&mut index.by_layer, &layer, &id);
                index.ids.push(id);
            }
            index.dirty = false;
            debug!(tracks = index.ids.len(), "rebuilt track index");
        }
        &self.indexes.tracks
    }

    /// The via index, rebuilt first if stale.
    pub fn vias(&mut self) -> &ViaIndex {
        if self.indexes.vias.is_dirty() {
            let rows: Vec<_> = self
                .entities()
                .filter_map(|e| e.as_via().map(|v| (e.id().clone(), v.net)))
                .collect();
            let index = &mut self.indexes.vias;
            index.ids.clear();
            index.by_net.clear();
            for (id, net) in rows {
                index.by_net.entry(net).or_default().push(id.clone());
                index.ids.push(id);
            }
            index.dirty = false;
            debug!(vias = index.ids.len(), "rebuilt via index");
        }
        &self.indexes.vias
    }

    /// The zone index, rebuilt first if stale.
    pub fn zones(&mut self) -> &ZoneIndex {
        if self.indexes.zones.is_dirty() {
            let rows: Vec<_> = self
                .entities()
                .filter_map(|e| {
                    e.as_zone()
                        .map(|z| (e.id().clone(), z.net, z.layers.clone()))
                })
                .collect();
            let index = &mut self.indexes.zones;
            index.ids.clear();
            index.by_net.clear();
            index.by_layer.clear();
            for (id, net, layers) in rows {
                index.by_net.entry(net).or_default().push(id.clone());
                for layer in &layers {
                    push(&mut index.by_layer, layer, &id);
                }
                index.ids.push(id);
            }
            index.dirty = false;
            debug!(zones = index.ids.len(), "rebuilt zone index");
        }
        &self.indexes.zones
    }

    /// The net index, rebuilt first if stale.
    pub fn nets(&mut self) -> &NetIndex {
        if self.indexes.nets.is_dirty() {
            let rows: Vec<_> = self
                .entities()
                .filter_map(|e| {
                    e.as_net()
                        .map(|n| (e.id().clone(), n.ordinal, n.name.clone()))
                })
                .collect();
            let index = &mut self.indexes.nets;
            index.ids.clear();
            index.by_ordinal.clear();
            index.by_name.clear();
            for (id, ordinal, name) in rows {
                index.by_ordinal.entry(ordinal).or_default().push(id.clone());
                push(&mut index.by_name, &name, &id);
                index.ids.push(id);
            }
            index.dirty = false;
            debug!(nets = index.ids.len(), "rebuilt net index");
        }
        &self.indexes.nets
    }

    /// Force every index current. After this, and in the absence of
    /// further mutation, the document can be shared read-only across
    /// threads -- the engine itself provides no locking.
    pub fn refresh_indexes(&mut self) {
        self.footprints();
        self.tracks();
        self.vias();
        self.zones();
        self.nets();
    }

    /// The declared name of a net ordinal, when one exists.
    pub fn net_name(&mut self, ordinal: i64) -> Option<String> {
        let id = self.nets().by_ordinal(ordinal).first()?.clone();
        self.entity(&id).and_then(|e| e.as_net()).map(|n| n.name.clone())
    }

    /// Total routed length on one net, in millimeters.
    pub fn track_length_by_net(&mut self, net: i64) -> f64 {
        let ids = self.tracks().by_net(net).to_vec();
        ids.iter()
            .filter_map(|id| self.entity(id).and_then(|e| e.as_track()))
            .map(|t| t.length_mm())
            .sum()
    }

    /// Summary counts across the document.
    pub fn stats(&mut self) -> DocumentStats {
        let total_track_length_mm = {
            let ids = self.tracks().ids().to_vec();
            ids.iter()
                .filter_map(|id| self.entity(id).and_then(|e| e.as_track()))
                .map(|t| t.length_mm())
                .sum()
        };
        let mut graphics = 0;
        let mut unknown_elements = 0;
        for entity in self.entities() {
            match entity.element() {
                Element::Graphic(_) => graphics += 1,
                Element::Opaque(_) => unknown_elements += 1,
                _ => {}
            }
        }
        DocumentStats {
            footprints: self.footprints().len(),
            tracks: self.tracks().len(),
            vias: self.vias().len(),
            zones: self.zones().len(),
            nets: self.nets().len(),
            graphics,
            unknown_elements,
            total_track_length_mm,
        }
    }
}
