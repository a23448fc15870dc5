//! The document model: an arena of entities keyed by stable identity plus
//! the ordered list of top-level entries.
//!
//! The document is the single owner of entity storage. Secondary indexes
//! (see [`crate::collections`]) hold ids only, never a second copy, and
//! mutation goes through per-field setter methods that keep the dirty
//! flags and index invalidation honest -- there is no `&mut Entity`
//! escape hatch.

use crate::collections::Indexes;
use crate::elements::{Element, Footprint};
use crate::error::{Diagnostic, DocumentError, EditError};
use crate::node::{Node, Span};
use crate::registry::{self, Dispatch, ParseCtx, SectionKind};
use crate::tokenizer::tokenize;
use crate::units::{Angle, At, Coord, Point};
use crate::validate;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Stable entity identity: the element's own uuid/tstamp token where the
/// format carries one, a synthesized v4 uuid otherwise. Unique within a
/// document and never reused after removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub(crate) fn new(id: impl Into<String>) -> EntityId {
        EntityId(id.into())
    }

    pub(crate) fn synthesize() -> EntityId {
        EntityId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One top-level entity: a typed element plus its replay bookkeeping.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    section: SectionKind,
    element: Element,
    /// Original byte span, present while the entity is byte-replayable.
    /// Any mutation clears it and forces canonical re-rendering.
    span: Option<Span>,
    /// Whitespace between the previous top-level entry and this one.
    lead: Option<Span>,
    dirty: bool,
}

impl Entity {
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn span(&self) -> Option<Span> {
        self.span
    }

    pub(crate) fn lead(&self) -> Option<Span> {
        self.lead
    }

    pub fn as_footprint(&self) -> Option<&Footprint> {
        match &self.element {
            Element::Footprint(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_track(&self) -> Option<&crate::elements::Track> {
        match &self.element {
            Element::Track(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_via(&self) -> Option<&crate::elements::Via> {
        match &self.element {
            Element::Via(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_zone(&self) -> Option<&crate::elements::Zone> {
        match &self.element {
            Element::Zone(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_net(&self) -> Option<&crate::elements::Net> {
        match &self.element {
            Element::Net(n) => Some(n),
            _ => None,
        }
    }
}

/// A parsed board document.
#[derive(Debug)]
pub struct Document {
    /// Retained source text; `None` for documents built from scratch.
    source: Option<String>,
    /// `(kicad_pcb` and anything before the first top-level entry.
    prefix: Option<Span>,
    /// The closing parenthesis and trailing whitespace.
    suffix: Option<Span>,
    epoch: i64,
    arena: IndexMap<EntityId, Entity>,
    order: Vec<EntityId>,
    retired: HashSet<EntityId>,
    diagnostics: Vec<Diagnostic>,
    pub(crate) indexes: Indexes,
    structurally_modified: bool,
}

impl Document {
    /// Parse a complete board text into a document. Either a complete,
    /// internally consistent document comes back or an error -- never a
    /// partial one. Non-fatal findings are collected into
    /// [`Document::diagnostics`].
    pub fn parse(text: &str) -> Result<Document, DocumentError> {
        let root = match tokenize(text)? {
            Node::List(l) => l,
            _ => unreachable!("tokenizer only returns lists at top level"),
        };
        if root.tag() != Some("kicad_pcb") {
            return Err(DocumentError::NotABoard {
                found: root
                    .tag()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "<empty list>".to_owned()),
            });
        }

        // The epoch is read ahead of element dispatch so that every
        // element parser sees the right schema revision.
        let epoch = root
            .children_tagged("version")
            .find_map(|l| l.arg(0).and_then(Node::as_int))
            .unwrap_or_else(|| {
                let default = ParseCtx::default().epoch;
                warn!(default, "board has no version token, assuming current epoch");
                default
            });
        let ctx = ParseCtx::new(epoch);

        let mut doc = Document {
            source: None,
            prefix: None,
            suffix: None,
            epoch,
            arena: IndexMap::new(),
            order: Vec::new(),
            retired: HashSet::new(),
            diagnostics: Vec::new(),
            indexes: Indexes::default(),
            structurally_modified: false,
        };

        // children[0] is the `kicad_pcb` tag symbol.
        let mut cursor = root.children[0].span().end;
        doc.prefix = Some(Span::new(0, cursor));

        for child in &root.children[1..] {
            let lead = Span::new(cursor, child.span().start);
            cursor = child.span().end;

            let (section, element) = match child {
                Node::List(list) => match registry::dispatch(list, &ctx)? {
                    Dispatch::Recognized(section, element) => (section, element),
                    Dispatch::OpaqueInSection(section) => (section, Element::Opaque(child.clone())),
                    Dispatch::UnknownTag => {
                        let tag = list.tag().unwrap_or("<untagged>").to_owned();
                        debug!(%tag, "preserving unknown top-level element opaquely");
                        doc.diagnostics.push(Diagnostic::UnknownElement {
                            tag,
                            offset: child.span().start,
                        });
                        (SectionKind::Unknown, Element::Opaque(child.clone()))
                    }
                },
                atom => (SectionKind::Unknown, Element::Opaque(atom.clone())),
            };

            let mut id = element
                .identity()
                .map(EntityId::new)
                .unwrap_or_else(EntityId::synthesize);
            if doc.arena.contains_key(&id) {
                warn!(%id, "duplicate identity token in source, synthesizing a fresh id");
                id = EntityId::synthesize();
            }
            doc.order.push(id.clone());
            doc.arena.insert(
                id.clone(),
                Entity {
                    id,
                    section,
                    element,
                    span: Some(child.span()),
                    lead: Some(lead),
                    dirty: false,
                },
            );
        }
        doc.suffix = Some(Span::new(cursor, text.len()));
        doc.source = Some(text.to_owned());

        let referential = validate::referential_diagnostics(&doc);
        doc.diagnostics.extend(referential);
        debug!(
            entities = doc.arena.len(),
            diagnostics = doc.diagnostics.len(),
            epoch,
            "parsed board document"
        );
        Ok(doc)
    }

    /// An empty board with the standard header: current epoch, two copper
    /// layers, the unnamed net 0.
    pub fn new() -> Document {
        use crate::elements::{
            General, Generator, GeneratorVersion, Layer, LayerTable, Net, Paper, Version,
        };
        let mut doc = Document {
            source: None,
            prefix: None,
            suffix: None,
            epoch: ParseCtx::default().epoch,
            arena: IndexMap::new(),
            order: Vec::new(),
            retired: HashSet::new(),
            diagnostics: Vec::new(),
            indexes: Indexes::default(),
            structurally_modified: false,
        };
        let epoch = doc.epoch;
        doc.add_unchecked(Element::Version(Version { epoch }));
        doc.add_unchecked(Element::Generator(Generator {
            name: "pcbnew".into(),
        }));
        doc.add_unchecked(Element::GeneratorVersion(GeneratorVersion {
            version: "9.0".into(),
        }));
        doc.add_unchecked(Element::General(General::default()));
        doc.add_unchecked(Element::Paper(Paper {
            size: "A4".into(),
            extra: Vec::new(),
        }));
        doc.add_unchecked(Element::LayerTable(LayerTable {
            layers: vec![
                Layer {
                    ordinal: 0,
                    name: "F.Cu".into(),
                    kind: "signal".into(),
                    user_name: None,
                },
                Layer {
                    ordinal: 31,
                    name: "B.Cu".into(),
                    kind: "signal".into(),
                    user_name: None,
                },
            ],
        }));
        doc.add_unchecked(Element::Net(Net {
            ordinal: 0,
            name: String::new(),
        }));
        doc.structurally_modified = false;
        doc
    }

    fn add_unchecked(&mut self, element: Element) {
        let section = registry::natural_section(&element);
        self.add(section, element)
            .expect("fresh ids cannot collide");
    }

    // ── Read access ──────────────────────────────

    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    pub(crate) fn parse_ctx(&self) -> ParseCtx {
        ParseCtx::new(self.epoch)
    }

    pub(crate) fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn prefix(&self) -> Option<Span> {
        self.prefix
    }

    pub(crate) fn suffix(&self) -> Option<Span> {
        self.suffix
    }

    /// O(1) lookup by id.
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.arena.get(id)
    }

    /// All entities in top-level document order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().map(|id| &self.arena[id])
    }

    /// Ids of one section, in stored order.
    pub fn section(&self, kind: SectionKind) -> Vec<EntityId> {
        self.order
            .iter()
            .filter(|id| self.arena[*id].section == kind)
            .cloned()
            .collect()
    }

    /// Findings collected at load time.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Re-run referential validation against the current state.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate::referential_diagnostics(self)
    }

    /// True once any entity was mutated, added or removed since load.
    pub fn is_modified(&self) -> bool {
        self.structurally_modified || self.arena.values().any(|e| e.dirty)
    }

    // ── Structural mutation ──────────────────────

    /// Add an element to a section. The entity id is the element's own
    /// identity token when it has one, a fresh uuid otherwise; an id that
    /// is already present -- or was retired by an earlier removal -- is
    /// rejected rather than reused.
    ///
    /// The new entry goes after the last existing member of the section,
    /// or at the section's canonical anchor point when it has no members,
    /// so pre-existing output bytes stay untouched.
    pub fn add(&mut self, section: SectionKind, element: Element) -> Result<EntityId, EditError> {
        let id = element
            .identity()
            .map(EntityId::new)
            .unwrap_or_else(EntityId::synthesize);
        if self.arena.contains_key(&id) || self.retired.contains(&id) {
            return Err(EditError::DuplicateId { id: id.to_string() });
        }

        let rank = |s: SectionKind| {
            SectionKind::ORDER
                .iter()
                .position(|k| *k == s)
                .expect("every section has a rank")
        };
        let pos = self
            .order
            .iter()
            .rposition(|other| self.arena[other].section == section)
            .map(|i| i + 1)
            .or_else(|| {
                self.order
                    .iter()
                    .rposition(|other| rank(self.arena[other].section) <= rank(section))
                    .map(|i| i + 1)
            })
            .unwrap_or(0);

        self.order.insert(pos, id.clone());
        self.arena.insert(
            id.clone(),
            Entity {
                id: id.clone(),
                section,
                element,
                span: None,
                lead: None,
                dirty: true,
            },
        );
        self.indexes.mark_all_dirty();
        self.structurally_modified = true;
        Ok(id)
    }

    /// Remove an entity from its section and the arena. The id is retired
    /// and will never be reused within this document.
    pub fn remove(&mut self, id: &EntityId) -> Result<(), EditError> {
        if self.arena.shift_remove(id).is_none() {
            return Err(EditError::NoSuchEntity { id: id.to_string() });
        }
        self.order.retain(|other| other != id);
        self.retired.insert(id.clone());
        self.indexes.mark_all_dirty();
        self.structurally_modified = true;
        Ok(())
    }

    // ── Entity mutation ──────────────────────────
    //
    // Every setter: mutate the field, clear the captured span (forcing a
    // canonical re-render), flip the dirty flag, and invalidate the
    // secondary indexes keyed on that field.

    fn touch<T>(
        &mut self,
        id: &EntityId,
        f: impl FnOnce(&mut Element) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let entity = self
            .arena
            .get_mut(id)
            .ok_or_else(|| EditError::NoSuchEntity { id: id.to_string() })?;
        let out = f(&mut entity.element)?;
        entity.span = None;
        entity.dirty = true;
        Ok(out)
    }

    fn wrong_kind(id: &EntityId, expected: &'static str, actual: &Element) -> EditError {
        EditError::WrongKind {
            id: id.to_string(),
            expected,
            actual: actual.kind_name(),
        }
    }

    /// Change a footprint's reference designator. The value must be a
    /// letters-then-digits designator and must not be held by a different
    /// footprint.
    pub fn set_footprint_reference(
        &mut self,
        id: &EntityId,
        reference: &str,
    ) -> Result<(), EditError> {
        validate::validate_reference(reference)?;
        let holders = self.footprints().by_reference(reference).to_vec();
        if let Some(holder) = holders.iter().find(|h| *h != id) {
            return Err(EditError::DuplicateReference {
                reference: reference.to_owned(),
                holder: holder.to_string(),
            });
        }
        self.touch(id, |element| match element {
            Element::Footprint(f) => {
                f.set_property("Reference", reference);
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "footprint", other)),
        })?;
        self.indexes.footprints.mark_dirty();
        Ok(())
    }

    pub fn set_footprint_value(&mut self, id: &EntityId, value: &str) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Footprint(f) => {
                f.set_property("Value", value);
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "footprint", other)),
        })
    }

    /// Move a footprint, keeping its rotation.
    pub fn set_footprint_position(&mut self, id: &EntityId, position: Point) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Footprint(f) => {
                f.at.x = position.x;
                f.at.y = position.y;
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "footprint", other)),
        })
    }

    pub fn set_footprint_rotation(&mut self, id: &EntityId, rotation: Angle) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Footprint(f) => {
                f.at.rotation = Some(rotation);
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "footprint", other)),
        })
    }

    pub fn set_footprint_layer(&mut self, id: &EntityId, layer: &str) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Footprint(f) => {
                f.layer = layer.to_owned();
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "footprint", other)),
        })?;
        self.indexes.footprints.mark_dirty();
        Ok(())
    }

    /// Re-point a track at another net ordinal. The ordinal does not have
    /// to resolve to a declared net; [`Document::validate`] reports
    /// dangling references as warnings.
    pub fn set_track_net(&mut self, id: &EntityId, net: i64) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Track(t) => {
                t.net = net;
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "segment", other)),
        })?;
        self.indexes.tracks.mark_dirty();
        Ok(())
    }

    pub fn set_track_width(&mut self, id: &EntityId, width: Coord) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Track(t) => {
                t.width = width;
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "segment", other)),
        })
    }

    pub fn set_track_layer(&mut self, id: &EntityId, layer: &str) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Track(t) => {
                t.layer = layer.to_owned();
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "segment", other)),
        })?;
        self.indexes.tracks.mark_dirty();
        Ok(())
    }

    pub fn set_track_endpoints(
        &mut self,
        id: &EntityId,
        start: Point,
        end: Point,
    ) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Track(t) => {
                t.start = start;
                t.end = end;
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "segment", other)),
        })
    }

    pub fn set_via_net(&mut self, id: &EntityId, net: i64) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Via(v) => {
                v.net = net;
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "via", other)),
        })?;
        self.indexes.vias.mark_dirty();
        Ok(())
    }

    pub fn set_via_position(&mut self, id: &EntityId, position: Point) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Via(v) => {
                v.at = At::new(position.x, position.y);
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "via", other)),
        })
    }

    pub fn set_via_size(&mut self, id: &EntityId, size: Coord, drill: Coord) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Via(v) => {
                v.size = size;
                v.drill = drill;
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "via", other)),
        })
    }

    pub fn set_zone_net(&mut self, id: &EntityId, net: i64, net_name: &str) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Zone(z) => {
                z.net = net;
                z.net_name = net_name.to_owned();
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "zone", other)),
        })?;
        self.indexes.zones.mark_dirty();
        Ok(())
    }

    pub fn set_net_name(&mut self, id: &EntityId, name: &str) -> Result<(), EditError> {
        self.touch(id, |element| match element {
            Element::Net(n) => {
                n.name = name.to_owned();
                Ok(())
            }
            other => Err(Self::wrong_kind(id, "net", other)),
        })?;
        self.indexes.nets.mark_dirty();
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}
