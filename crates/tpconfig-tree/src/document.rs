//! The parsed configuration document.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::AttributeSet;

/// The sections a document keeps. Any other section is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Section {
    Domain,
    Node,
    SvrGroup,
    Server,
    Service,
    Gateway,
}

impl Section {
    /// Every known section, in file order of a typical tp_config.
    pub const ALL: [Section; 6] = [
        Section::Domain,
        Section::Node,
        Section::SvrGroup,
        Section::Server,
        Section::Service,
        Section::Gateway,
    ];

    /// Resolve a header name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(name))
    }

    /// Canonical header name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Domain => "DOMAIN",
            Section::Node => "NODE",
            Section::SvrGroup => "SVRGROUP",
            Section::Server => "SERVER",
            Section::Service => "SERVICE",
            Section::Gateway => "GATEWAY",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed tp_config document.
///
/// Built once by [`DocumentBuilder`](crate::DocumentBuilder) and read-only
/// afterwards. Every collection keeps names in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigDocument {
    pub(crate) domain: Option<AttributeSet>,
    pub(crate) nodes: IndexMap<String, AttributeSet>,
    pub(crate) server_groups: IndexMap<String, AttributeSet>,
    pub(crate) servers: IndexMap<String, Vec<AttributeSet>>,
    pub(crate) services: IndexMap<String, AttributeSet>,
    pub(crate) gateways: IndexMap<String, AttributeSet>,
}

impl ConfigDocument {
    /// The first DOMAIN entry, if any.
    pub fn domain(&self) -> Option<&AttributeSet> {
        self.domain.as_ref()
    }

    /// NODE entries by name.
    pub fn nodes(&self) -> &IndexMap<String, AttributeSet> {
        &self.nodes
    }

    /// SVRGROUP entries by name.
    pub fn server_groups(&self) -> &IndexMap<String, AttributeSet> {
        &self.server_groups
    }

    /// SERVER placements by server name, in file order.
    pub fn servers(&self) -> &IndexMap<String, Vec<AttributeSet>> {
        &self.servers
    }

    /// SERVICE entries by name.
    pub fn services(&self) -> &IndexMap<String, AttributeSet> {
        &self.services
    }

    /// GATEWAY entries by name.
    pub fn gateways(&self) -> &IndexMap<String, AttributeSet> {
        &self.gateways
    }

    /// Look up a node.
    pub fn node(&self, name: &str) -> Option<&AttributeSet> {
        self.nodes.get(name)
    }

    /// Look up a server group.
    pub fn server_group(&self, name: &str) -> Option<&AttributeSet> {
        self.server_groups.get(name)
    }

    /// All placements of a server; empty if the name is unknown.
    pub fn server(&self, name: &str) -> &[AttributeSet] {
        self.servers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a service.
    pub fn service(&self, name: &str) -> Option<&AttributeSet> {
        self.services.get(name)
    }

    /// Look up a gateway.
    pub fn gateway(&self, name: &str) -> Option<&AttributeSet> {
        self.gateways.get(name)
    }

    /// Number of SERVER entries, counting every placement.
    pub fn server_placement_count(&self) -> usize {
        self.servers.values().map(Vec::len).sum()
    }

    /// Whether the document holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.domain.is_none()
            && self.nodes.is_empty()
            && self.server_groups.is_empty()
            && self.servers.is_empty()
            && self.services.is_empty()
            && self.gateways.is_empty()
    }
}
