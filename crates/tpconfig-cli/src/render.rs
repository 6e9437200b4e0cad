//! Plain-text rendering of documents and listings.

use std::fmt::Write as _;

use tpconfig_parse::{Event, Parser, Tokenizer};
use tpconfig_tree::{
    GatewayRow, NAME_KEY, NodeInfo, ServerGroupInfo, ServerPlacement, ServiceRow, Summary,
};

/// A left-aligned text table with a header row.
struct Table {
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &'static [&'static str]) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let header = self.headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
        for row in std::iter::once(&header).chain(&self.rows) {
            let mut line = String::new();
            for (cell, &width) in row.iter().zip(&widths) {
                let _ = write!(line, "{cell:<width$}  ");
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Renders views as text, using `missing` for absent attributes.
pub struct Renderer<'a> {
    missing: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(missing: &'a str) -> Self {
        Self { missing }
    }

    fn value(&self, value: Option<&str>) -> String {
        value.unwrap_or(self.missing).to_string()
    }

    fn list(&self, names: &[&str]) -> String {
        if names.is_empty() {
            self.missing.to_string()
        } else {
            names.join(", ")
        }
    }

    pub fn summary(&self, summary: &Summary<'_>) -> String {
        let mut groups = self.list(&summary.server_groups);
        if summary.server_groups.len() < summary.total_server_groups {
            let _ = write!(
                groups,
                " ({} of {})",
                summary.server_groups.len(),
                summary.total_server_groups
            );
        }

        let mut out = String::new();
        let _ = writeln!(out, "Domain: {}", self.value(summary.domain_name));
        let _ = writeln!(out, "Domain ID: {}", self.value(summary.domain_id));
        let _ = writeln!(out, "Nodes: {}", summary.total_nodes);
        let _ = writeln!(out, "Server groups: {}", summary.total_server_groups);
        let _ = writeln!(out, "Servers: {}", summary.total_servers);
        let _ = writeln!(out, "Services: {}", summary.total_services);
        let _ = writeln!(out, "Gateways: {}", summary.total_gateways);
        let _ = writeln!(out, "Node names: {}", self.list(&summary.nodes));
        let _ = writeln!(out, "Server group names: {groups}");
        out
    }

    pub fn node(&self, node: &NodeInfo<'_>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Node: {}", node.name);
        let _ = writeln!(out, "Hostname: {}", self.value(node.hostname));
        let _ = writeln!(out, "Port: {}", self.value(node.port));
        let _ = writeln!(out, "Max servers: {}", self.value(node.max_servers));
        let _ = writeln!(out, "Max users: {}", self.value(node.max_users));
        let _ = writeln!(out, "TMAXHOME: {}", self.value(node.tmax_home));
        let _ = writeln!(out, "Server groups: {}", self.list(&node.server_groups));
        attribute_block(&mut out, node.attributes.iter());
        out
    }

    pub fn server_group(&self, group: &ServerGroupInfo<'_>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Server group: {}", group.name);
        let _ = writeln!(out, "Node: {}", self.value(group.node));
        let _ = writeln!(out, "Backup: {}", self.value(group.backup));
        let _ = writeln!(out, "Cousin: {}", self.value(group.cousin));
        let _ = writeln!(out, "Restart: {}", self.value(group.restart));
        let _ = writeln!(out, "Autobackup: {}", self.value(group.autobackup));
        out.push_str("Servers:\n");
        out.push_str(&self.servers(&group.servers));
        out
    }

    pub fn nodes(&self, nodes: &[NodeInfo<'_>]) -> String {
        let mut table = Table::new(&["NAME", "HOSTNAME", "PORT", "MAXSVR", "MAXUSER", "SVRGROUPS"]);
        for node in nodes {
            table.push(vec![
                node.name.to_string(),
                self.value(node.hostname),
                self.value(node.port),
                self.value(node.max_servers),
                self.value(node.max_users),
                self.list(&node.server_groups),
            ]);
        }
        table.render()
    }

    pub fn server_groups(&self, groups: &[ServerGroupInfo<'_>]) -> String {
        let mut table = Table::new(&["NAME", "NODENAME", "BACKUP", "COUSIN", "SERVERS"]);
        for group in groups {
            table.push(vec![
                group.name.to_string(),
                self.value(group.node),
                self.value(group.backup),
                self.value(group.cousin),
                group.servers.len().to_string(),
            ]);
        }
        table.render()
    }

    pub fn servers(&self, servers: &[ServerPlacement<'_>]) -> String {
        let mut table = Table::new(&["NAME", "SVGNAME", "NODENAME", "MIN", "MAX", "RESTART"]);
        for server in servers {
            table.push(vec![
                server.name.to_string(),
                self.value(server.server_group),
                self.value(server.node),
                self.value(server.min),
                self.value(server.max),
                self.value(server.restart),
            ]);
        }
        table.render()
    }

    pub fn services(&self, services: &[ServiceRow<'_>]) -> String {
        let mut table = Table::new(&["NAME", "SVRNAME", "SVCTIME", "AUTOTRAN", "EXPORT"]);
        for service in services {
            table.push(vec![
                service.name.to_string(),
                self.value(service.server),
                self.value(service.timeout),
                self.value(service.autotran),
                self.value(service.export),
            ]);
        }
        table.render()
    }

    pub fn gateways(&self, gateways: &[GatewayRow<'_>]) -> String {
        let mut table = Table::new(&[
            "NAME",
            "NODENAME",
            "PORTNO",
            "RGWADDR",
            "RGWPORTNO",
            "DIRECTION",
            "GWTYPE",
        ]);
        for gateway in gateways {
            table.push(vec![
                gateway.name.to_string(),
                self.value(gateway.node),
                self.value(gateway.port),
                self.value(gateway.remote_addr),
                self.value(gateway.remote_port),
                self.value(gateway.direction),
                self.value(gateway.gateway_type),
            ]);
        }
        table.render()
    }
}

fn attribute_block<'s>(out: &mut String, attributes: impl Iterator<Item = (&'s str, &'s str)>) {
    out.push_str("Attributes:\n");
    for (key, value) in attributes.filter(|(key, _)| *key != NAME_KEY) {
        let _ = writeln!(out, "  {key} = {value}");
    }
}

/// Debug listing of how each line was classified and which entries came out.
pub fn lines(source: &str) -> String {
    let mut out = String::new();
    for line in Tokenizer::new(source) {
        let row = format!("{:<4} {:<12} {}", line.number, line.kind.label(), line.text);
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out.push('\n');
    for event in Parser::new(source) {
        match event {
            Event::SectionStart { name, .. } => {
                let _ = writeln!(out, "section {name}");
            }
            Event::Entry(entry) => {
                let _ = writeln!(out, "  entry {}: {}", entry.name, entry.raw_text);
            }
            Event::OrphanContinuation { span } => {
                let _ = writeln!(out, "  orphan continuation at offset {}", span.start);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = r#"*DOMAIN
MYDOM DOMAINID=1, MAXUSER=100
*NODE
NODE1 HOSTNAME="host1", TmaxPort=3300, MAXSVR=50
*SVRGROUP
SVG1 NODENAME="NODE1", BACKUP="NODE2"
*SERVER
SRV1 SVGNAME="SVG1", MIN=1, MAX=5
SRV1 SVGNAME="SVG1", MIN=1, MAX=5, NODENAME="NODE2"
"#;

    fn renderer() -> Renderer<'static> {
        Renderer::new("N/A")
    }

    #[test]
    fn summary_text() {
        let document = tpconfig_tree::parse(REFERENCE);
        insta::assert_snapshot!(renderer().summary(&document.summary()), @r"
        Domain: MYDOM
        Domain ID: 1
        Nodes: 1
        Server groups: 1
        Servers: 2
        Services: 0
        Gateways: 0
        Node names: NODE1
        Server group names: SVG1
        ");
    }

    #[test]
    fn summary_notes_truncated_group_list() {
        let document = tpconfig_tree::parse("*SVRGROUP\nA\nB\nC\n");
        let text = renderer().summary(&document.summary_with_limit(2));
        assert!(text.contains("Server group names: A, B (2 of 3)\n"));
        assert!(text.contains("Domain: N/A\n"));
        assert!(text.contains("Node names: N/A\n"));
    }

    #[test]
    fn node_text() {
        let document = tpconfig_tree::parse(REFERENCE);
        let node = document.node_info("NODE1").unwrap();
        insta::assert_snapshot!(renderer().node(&node), @r"
        Node: NODE1
        Hostname: host1
        Port: 3300
        Max servers: 50
        Max users: N/A
        TMAXHOME: N/A
        Server groups: SVG1
        Attributes:
          HOSTNAME = host1
          TmaxPort = 3300
          MAXSVR = 50
        ");
    }

    #[test]
    fn server_group_text() {
        let document = tpconfig_tree::parse(REFERENCE);
        let group = document.server_group_info("SVG1").unwrap();
        insta::assert_snapshot!(renderer().server_group(&group), @r"
        Server group: SVG1
        Node: NODE1
        Backup: NODE2
        Cousin: N/A
        Restart: N/A
        Autobackup: N/A
        Servers:
        NAME  SVGNAME  NODENAME  MIN  MAX  RESTART
        SRV1  SVG1     N/A       1    5    N/A
        SRV1  SVG1     NODE2     1    5    N/A
        ");
    }

    #[test]
    fn custom_placeholder() {
        let document = tpconfig_tree::parse("*SERVICE\nSVC1 SVRNAME=svr1\n");
        let text = Renderer::new("-").services(&document.service_rows());
        assert_eq!(
            text,
            "NAME  SVRNAME  SVCTIME  AUTOTRAN  EXPORT\nSVC1  svr1     -        -         -\n"
        );
    }

    #[test]
    fn empty_listing_is_just_the_header() {
        let document = tpconfig_tree::parse("");
        assert_eq!(
            renderer().gateways(&document.gateway_rows()),
            "NAME  NODENAME  PORTNO  RGWADDR  RGWPORTNO  DIRECTION  GWTYPE\n"
        );
    }

    #[test]
    fn wide_cells_stretch_their_column() {
        let document = tpconfig_tree::parse("*NODE\nN HOSTNAME=averylonghostname\n");
        let text = renderer().nodes(&document.node_infos());
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("NAME  HOSTNAME           PORT  MAXSVR  MAXUSER  SVRGROUPS")
        );
        assert_eq!(
            lines.next(),
            Some("N     averylonghostname  N/A   N/A     N/A      N/A")
        );
    }

    #[test]
    fn line_listing() {
        let source = "*NODE\n# comment\nN1 HOSTNAME=h,\n   PORT=1\n";
        insta::assert_snapshot!(lines(source), @r"
        1    section      *NODE
        2    ignorable    # comment
        3    entry        N1 HOSTNAME=h,
        4    continuation PORT=1

        section NODE
          entry N1: N1 HOSTNAME=h, PORT=1
        ");
    }
}
