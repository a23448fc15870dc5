//! Element registry: a fixed dispatch table from leading tag symbol to the
//! section a top-level element belongs to and the parse function for its
//! typed record.
//!
//! The table is compile-time `match` dispatch -- resolved once, no
//! reflection. Tags with a known section but no typed record (`setup`,
//! track arcs, dimension drawings) stay opaque in their section; tags the
//! table has never heard of are legal too and land opaquely in the
//! catch-all unknown section at their original position.

use crate::elements::{
    Element, Footprint, General, Generator, GeneratorVersion, Graphic, Group, LayerTable, Net,
    Paper, Track, Version, Via, Zone,
};
use crate::error::SchemaError;
use crate::node::ListNode;

/// The named top-level groupings of a board document, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Version,
    Generator,
    GeneratorVersion,
    General,
    Paper,
    Layers,
    Setup,
    Nets,
    Footprints,
    Graphics,
    Tracks,
    Zones,
    Groups,
    /// Catch-all for tags with no section mapping; members are re-emitted
    /// at their original position.
    Unknown,
}

impl SectionKind {
    /// Canonical section order, used to pick an insertion anchor when
    /// adding into a section that has no members yet.
    pub const ORDER: [SectionKind; 14] = [
        SectionKind::Version,
        SectionKind::Generator,
        SectionKind::GeneratorVersion,
        SectionKind::General,
        SectionKind::Paper,
        SectionKind::Layers,
        SectionKind::Setup,
        SectionKind::Nets,
        SectionKind::Footprints,
        SectionKind::Graphics,
        SectionKind::Tracks,
        SectionKind::Zones,
        SectionKind::Groups,
        SectionKind::Unknown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Version => "version",
            SectionKind::Generator => "generator",
            SectionKind::GeneratorVersion => "generator_version",
            SectionKind::General => "general",
            SectionKind::Paper => "paper",
            SectionKind::Layers => "layers",
            SectionKind::Setup => "setup",
            SectionKind::Nets => "nets",
            SectionKind::Footprints => "footprints",
            SectionKind::Graphics => "graphics",
            SectionKind::Tracks => "tracks",
            SectionKind::Zones => "zones",
            SectionKind::Groups => "groups",
            SectionKind::Unknown => "unknown",
        }
    }

    /// Header sections render inline on the document's opening line.
    pub(crate) fn is_inline_header(self) -> bool {
        matches!(
            self,
            SectionKind::Version | SectionKind::Generator | SectionKind::GeneratorVersion
        )
    }
}

/// Per-parse context: the schema epoch from the leading `version` token.
/// It selects field defaults and the identity-token tag for entity kinds
/// whose serialized form changed across format revisions.
#[derive(Debug, Clone, Copy)]
pub struct ParseCtx {
    pub epoch: i64,
}

/// First epoch that writes `(uuid ...)` identity tokens; earlier formats
/// used `(tstamp ...)`.
const UUID_EPOCH: i64 = 20240101;

impl ParseCtx {
    pub fn new(epoch: i64) -> ParseCtx {
        ParseCtx { epoch }
    }

    pub fn identity_tag(&self) -> &'static str {
        if self.epoch >= UUID_EPOCH {
            "uuid"
        } else {
            "tstamp"
        }
    }
}

impl Default for ParseCtx {
    fn default() -> Self {
        // Current stable format revision.
        ParseCtx { epoch: 20241229 }
    }
}

/// Result of dispatching one top-level node through the registry.
pub(crate) enum Dispatch {
    /// A typed record was produced.
    Recognized(SectionKind, Element),
    /// The tag has a section mapping but no typed record.
    OpaqueInSection(SectionKind),
    /// The tag has no registry entry at all; the caller records an
    /// `UnknownElement` diagnostic and preserves the node verbatim.
    UnknownTag,
}

/// The section a recognized tag belongs to, or `None` for unregistered
/// tags.
pub(crate) fn section_of(tag: &str) -> Option<SectionKind> {
    let section = match tag {
        "version" => SectionKind::Version,
        "generator" => SectionKind::Generator,
        "generator_version" => SectionKind::GeneratorVersion,
        "general" => SectionKind::General,
        "paper" | "page" => SectionKind::Paper,
        "layers" => SectionKind::Layers,
        "setup" => SectionKind::Setup,
        "net" => SectionKind::Nets,
        "footprint" | "module" => SectionKind::Footprints,
        "gr_line" | "gr_rect" | "gr_arc" | "gr_circle" | "gr_text" | "gr_poly" | "gr_curve"
        | "dimension" | "gr_textbox" => SectionKind::Graphics,
        "segment" | "via" | "arc" => SectionKind::Tracks,
        "zone" => SectionKind::Zones,
        "group" => SectionKind::Groups,
        _ => return None,
    };
    Some(section)
}

/// Dispatch one top-level list node. Typed parse failures for required
/// fields propagate as fatal [`SchemaError`]s; everything else succeeds.
pub(crate) fn dispatch(list: &ListNode, _ctx: &ParseCtx) -> Result<Dispatch, SchemaError> {
    let Some(tag) = list.tag() else {
        return Ok(Dispatch::UnknownTag);
    };
    let Some(section) = section_of(tag) else {
        return Ok(Dispatch::UnknownTag);
    };
    let element = match tag {
        "version" => Element::Version(Version::parse(list)?),
        "generator" => Element::Generator(Generator::parse(list)?),
        "generator_version" => Element::GeneratorVersion(GeneratorVersion::parse(list)?),
        "general" => Element::General(General::parse(list)?),
        "paper" | "page" => Element::Paper(Paper::parse(list)?),
        "layers" => Element::LayerTable(LayerTable::parse(list)?),
        "net" => Element::Net(Net::parse(list)?),
        "footprint" | "module" => Element::Footprint(Footprint::parse(list)?),
        "segment" => Element::Track(Track::parse(list)?),
        "via" => Element::Via(Via::parse(list)?),
        "zone" => Element::Zone(Zone::parse(list)?),
        "gr_line" => Element::Graphic(Graphic::parse(list, "gr_line")?),
        "gr_rect" => Element::Graphic(Graphic::parse(list, "gr_rect")?),
        "gr_arc" => Element::Graphic(Graphic::parse(list, "gr_arc")?),
        "gr_circle" => Element::Graphic(Graphic::parse(list, "gr_circle")?),
        "gr_text" => Element::Graphic(Graphic::parse(list, "gr_text")?),
        "group" => Element::Group(Group::parse(list)?),
        // Section mapping exists but the grammar stays opaque.
        _ => return Ok(Dispatch::OpaqueInSection(section)),
    };
    Ok(Dispatch::Recognized(section, element))
}

/// The section an element kind naturally belongs to, used by the factory
/// path when callers add new entities.
pub fn natural_section(element: &Element) -> SectionKind {
    match element {
        Element::Version(_) => SectionKind::Version,
        Element::Generator(_) => SectionKind::Generator,
        Element::GeneratorVersion(_) => SectionKind::GeneratorVersion,
        Element::General(_) => SectionKind::General,
        Element::Paper(_) => SectionKind::Paper,
        Element::LayerTable(_) => SectionKind::Layers,
        Element::Net(_) => SectionKind::Nets,
        Element::Footprint(_) => SectionKind::Footprints,
        Element::Track(_) | Element::Via(_) => SectionKind::Tracks,
        Element::Zone(_) => SectionKind::Zones,
        Element::Graphic(_) => SectionKind::Graphics,
        Element::Group(_) => SectionKind::Groups,
        Element::Opaque(node) => node
            .tag()
            .and_then(section_of)
            .unwrap_or(SectionKind::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_tag_follows_epoch() {
        assert_eq!(ParseCtx::new(20241229).identity_tag(), "uuid");
        assert_eq!(ParseCtx::new(20221018).identity_tag(), "tstamp");
    }

    #[test]
    fn unknown_tags_have_no_section() {
        assert_eq!(section_of("teardrop_parameters"), None);
        assert_eq!(section_of("embedded_fonts"), None);
    }

    #[test]
    fn setup_is_sectioned_but_opaque() {
        assert_eq!(section_of("setup"), Some(SectionKind::Setup));
    }
}
