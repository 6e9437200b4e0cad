//! Read-only views over a [`ConfigDocument`].
//!
//! Views borrow from the document and are computed on demand. Missing
//! attributes are `None`; choosing a placeholder for display is up to the
//! caller.

use serde::Serialize;

use crate::{AttributeSet, ConfigDocument};

/// How many server-group names [`ConfigDocument::summary`] lists.
pub const SUMMARY_GROUP_LIMIT: usize = 20;

/// Counts and names across the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary<'a> {
    pub domain_id: Option<&'a str>,
    pub domain_name: Option<&'a str>,
    pub total_nodes: usize,
    pub total_server_groups: usize,
    /// Every SERVER placement counts.
    pub total_servers: usize,
    pub total_services: usize,
    pub total_gateways: usize,
    /// All node names.
    pub nodes: Vec<&'a str>,
    /// The first server-group names, up to the summary limit.
    pub server_groups: Vec<&'a str>,
}

/// A node and the server groups placed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo<'a> {
    pub name: &'a str,
    pub hostname: Option<&'a str>,
    /// `TmaxPort`.
    pub port: Option<&'a str>,
    /// `MAXSVR`.
    pub max_servers: Option<&'a str>,
    /// `MAXUSER`.
    pub max_users: Option<&'a str>,
    /// `TMAXHOME`.
    pub tmax_home: Option<&'a str>,
    /// Server groups whose `NODENAME` is this node.
    pub server_groups: Vec<&'a str>,
    pub attributes: &'a AttributeSet,
}

/// A server group and the server placements that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerGroupInfo<'a> {
    pub name: &'a str,
    /// `NODENAME`.
    pub node: Option<&'a str>,
    pub backup: Option<&'a str>,
    pub cousin: Option<&'a str>,
    pub restart: Option<&'a str>,
    pub autobackup: Option<&'a str>,
    /// Placements whose `SVGNAME` is this group, in file order.
    pub servers: Vec<ServerPlacement<'a>>,
    pub attributes: &'a AttributeSet,
}

/// One occurrence of a SERVER entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerPlacement<'a> {
    pub name: &'a str,
    /// `SVGNAME`.
    pub server_group: Option<&'a str>,
    /// `NODENAME`.
    pub node: Option<&'a str>,
    pub min: Option<&'a str>,
    pub max: Option<&'a str>,
    pub restart: Option<&'a str>,
    pub attributes: &'a AttributeSet,
}

/// A SERVICE entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRow<'a> {
    pub name: &'a str,
    /// `SVRNAME`.
    pub server: Option<&'a str>,
    /// `SVCTIME`.
    pub timeout: Option<&'a str>,
    pub autotran: Option<&'a str>,
    pub export: Option<&'a str>,
    pub attributes: &'a AttributeSet,
}

/// A GATEWAY entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayRow<'a> {
    pub name: &'a str,
    /// `NODENAME`.
    pub node: Option<&'a str>,
    /// `PORTNO`.
    pub port: Option<&'a str>,
    /// `RGWADDR`.
    pub remote_addr: Option<&'a str>,
    /// `RGWPORTNO`.
    pub remote_port: Option<&'a str>,
    pub direction: Option<&'a str>,
    /// `GWTYPE`.
    pub gateway_type: Option<&'a str>,
    pub attributes: &'a AttributeSet,
}

impl<'a> ServerPlacement<'a> {
    fn new(name: &'a str, attributes: &'a AttributeSet) -> Self {
        Self {
            name,
            server_group: attributes.get_unquoted("SVGNAME"),
            node: attributes.get_unquoted("NODENAME"),
            min: attributes.get("MIN"),
            max: attributes.get("MAX"),
            restart: attributes.get("RESTART"),
            attributes,
        }
    }
}

impl ConfigDocument {
    /// Summarize the document, listing up to [`SUMMARY_GROUP_LIMIT`] server
    /// groups.
    pub fn summary(&self) -> Summary<'_> {
        self.summary_with_limit(SUMMARY_GROUP_LIMIT)
    }

    /// Summarize the document, listing up to `group_limit` server groups.
    pub fn summary_with_limit(&self, group_limit: usize) -> Summary<'_> {
        let domain = self.domain();
        Summary {
            domain_id: domain.and_then(|d| d.get("DOMAINID")),
            domain_name: domain.map(AttributeSet::name),
            total_nodes: self.nodes.len(),
            total_server_groups: self.server_groups.len(),
            total_servers: self.server_placement_count(),
            total_services: self.services.len(),
            total_gateways: self.gateways.len(),
            nodes: self.nodes.keys().map(String::as_str).collect(),
            server_groups: self
                .server_groups
                .keys()
                .take(group_limit)
                .map(String::as_str)
                .collect(),
        }
    }

    /// Describe a node, or `None` if there is no node called `name`.
    pub fn node_info(&self, name: &str) -> Option<NodeInfo<'_>> {
        let (name, attributes) = self.nodes.get_key_value(name)?;
        Some(self.describe_node(name, attributes))
    }

    /// Describe every node, in document order.
    pub fn node_infos(&self) -> Vec<NodeInfo<'_>> {
        self.nodes
            .iter()
            .map(|(name, attributes)| self.describe_node(name, attributes))
            .collect()
    }

    fn describe_node<'a>(&'a self, name: &'a str, attributes: &'a AttributeSet) -> NodeInfo<'a> {
        let server_groups = self
            .server_groups
            .iter()
            .filter(|(_, group)| group.get_unquoted("NODENAME") == Some(name))
            .map(|(group_name, _)| group_name.as_str())
            .collect();

        NodeInfo {
            name,
            hostname: attributes.get("HOSTNAME"),
            port: attributes.get("TmaxPort"),
            max_servers: attributes.get("MAXSVR"),
            max_users: attributes.get("MAXUSER"),
            tmax_home: attributes.get("TMAXHOME"),
            server_groups,
            attributes,
        }
    }

    /// Describe a server group, or `None` if there is no group called `name`.
    pub fn server_group_info(&self, name: &str) -> Option<ServerGroupInfo<'_>> {
        let (name, attributes) = self.server_groups.get_key_value(name)?;
        Some(self.describe_server_group(name, attributes))
    }

    /// Describe every server group, in document order.
    pub fn server_group_infos(&self) -> Vec<ServerGroupInfo<'_>> {
        self.server_groups
            .iter()
            .map(|(name, attributes)| self.describe_server_group(name, attributes))
            .collect()
    }

    fn describe_server_group<'a>(
        &'a self,
        name: &'a str,
        attributes: &'a AttributeSet,
    ) -> ServerGroupInfo<'a> {
        let servers = self
            .server_placements()
            .into_iter()
            .filter(|placement| placement.server_group == Some(name))
            .collect();

        ServerGroupInfo {
            name,
            node: attributes.get_unquoted("NODENAME"),
            backup: attributes.get_unquoted("BACKUP"),
            cousin: attributes.get_unquoted("COUSIN"),
            restart: attributes.get("RESTART"),
            autobackup: attributes.get("AUTOBACKUP"),
            servers,
            attributes,
        }
    }

    /// One row per SERVER placement, grouped by server name in document order.
    pub fn server_placements(&self) -> Vec<ServerPlacement<'_>> {
        self.servers
            .iter()
            .flat_map(|(name, placements)| {
                placements
                    .iter()
                    .map(move |attributes| ServerPlacement::new(name, attributes))
            })
            .collect()
    }

    /// One row per SERVICE entry.
    pub fn service_rows(&self) -> Vec<ServiceRow<'_>> {
        self.services
            .iter()
            .map(|(name, attributes)| ServiceRow {
                name,
                server: attributes.get_unquoted("SVRNAME"),
                timeout: attributes.get("SVCTIME"),
                autotran: attributes.get("AUTOTRAN"),
                export: attributes.get("EXPORT"),
                attributes,
            })
            .collect()
    }

    /// One row per GATEWAY entry.
    pub fn gateway_rows(&self) -> Vec<GatewayRow<'_>> {
        self.gateways
            .iter()
            .map(|(name, attributes)| GatewayRow {
                name,
                node: attributes.get_unquoted("NODENAME"),
                port: attributes.get("PORTNO"),
                remote_addr: attributes.get_unquoted("RGWADDR"),
                remote_port: attributes.get("RGWPORTNO"),
                direction: attributes.get("DIRECTION"),
                gateway_type: attributes.get("GWTYPE"),
                attributes,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    const SOURCE: &str = r#"
*DOMAIN
DOM     DOMAINID = 7

*NODE
N1      HOSTNAME = "alpha", TmaxPort = 8001, TMAXHOME = "/home/tmax"
N2      HOSTNAME = "beta"

*SVRGROUP
G1      NODENAME = "N1", BACKUP = "N2", RESTART = Y
G2      NODENAME = "N2"
G3      NODENAME = "N1"

*SERVER
S1      SVGNAME = G1, MIN = 1, MAX = 4
S1      SVGNAME = G2, MIN = 2
S2      SVGNAME = G1, RESTART = N

*SERVICE
SVC1    SVRNAME = "S1", SVCTIME = 30
"#;

    #[test]
    fn node_info_lists_groups_placed_on_it() {
        let document = parse(SOURCE);
        let info = document.node_info("N1").unwrap();

        assert_eq!(info.hostname, Some("alpha"));
        assert_eq!(info.port, Some("8001"));
        assert_eq!(info.tmax_home, Some("/home/tmax"));
        assert_eq!(info.max_users, None);
        assert_eq!(info.server_groups, vec!["G1", "G3"]);
        assert_eq!(info.attributes.name(), "N1");
    }

    #[test]
    fn unknown_names_are_not_found() {
        let document = parse(SOURCE);
        assert!(document.node_info("N9").is_none());
        assert!(document.server_group_info("G9").is_none());
    }

    #[test]
    fn server_group_info_collects_every_placement() {
        let document = parse(SOURCE);
        let info = document.server_group_info("G1").unwrap();

        assert_eq!(info.node, Some("N1"));
        assert_eq!(info.backup, Some("N2"));
        assert_eq!(info.restart, Some("Y"));
        let servers: Vec<_> = info.servers.iter().map(|s| (s.name, s.max)).collect();
        assert_eq!(servers, vec![("S1", Some("4")), ("S2", None)]);

        let g2 = document.server_group_info("G2").unwrap();
        assert_eq!(g2.servers.len(), 1);
        assert_eq!(g2.servers[0].min, Some("2"));
    }

    #[test]
    fn placement_cut_at_quoted_comma_still_references_its_group() {
        let document = parse("*SVRGROUP\nG1 NODENAME=N\n*SERVER\nS1 SVGNAME=\"G1,x\"\n");
        let info = document.server_group_info("G1").unwrap();

        assert_eq!(document.server("S1")[0].get("SVGNAME"), Some("\"G1"));
        assert_eq!(info.servers.len(), 1);
        assert_eq!(info.servers[0].name, "S1");
        assert_eq!(info.servers[0].server_group, Some("G1"));
    }

    #[test]
    fn summary_counts_placements() {
        let document = parse(SOURCE);
        let summary = document.summary();

        assert_eq!(summary.domain_id, Some("7"));
        assert_eq!(summary.domain_name, Some("DOM"));
        assert_eq!(summary.total_nodes, 2);
        assert_eq!(summary.total_server_groups, 3);
        assert_eq!(summary.total_servers, 3);
        assert_eq!(summary.total_services, 1);
        assert_eq!(summary.total_gateways, 0);
        assert_eq!(summary.nodes, vec!["N1", "N2"]);
        assert_eq!(summary.server_groups, vec!["G1", "G2", "G3"]);
    }

    #[test]
    fn summary_limits_server_groups() {
        let mut source = String::from("*SVRGROUP\n");
        for i in 0..25 {
            source.push_str(&format!("G{i:02} NODENAME=N\n"));
        }
        let document = parse(&source);

        let summary = document.summary();
        assert_eq!(summary.total_server_groups, 25);
        assert_eq!(summary.server_groups.len(), 20);
        assert_eq!(summary.server_groups.last(), Some(&"G19"));

        assert_eq!(document.summary_with_limit(3).server_groups, vec!["G00", "G01", "G02"]);
    }

    #[test]
    fn empty_document_summary() {
        let config = parse("");
        let summary = config.summary();
        assert_eq!(summary.domain_id, None);
        assert_eq!(summary.domain_name, None);
        assert!(summary.nodes.is_empty());
    }

    #[test]
    fn listings() {
        let document = parse(SOURCE);

        let placements = document.server_placements();
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[1].server_group, Some("G2"));

        let services = document.service_rows();
        assert_eq!(services[0].server, Some("S1"));
        assert_eq!(services[0].timeout, Some("30"));

        assert_eq!(document.node_infos().len(), 2);
        assert_eq!(document.server_group_infos()[2].name, "G3");
        assert!(document.gateway_rows().is_empty());
    }
}
