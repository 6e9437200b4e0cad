//! Typed document model for Tmax tp_config files.
//!
//! This crate turns tp_config text into a [`ConfigDocument`]: the DOMAIN entry
//! plus NODE, SVRGROUP, SERVER, SERVICE and GATEWAY entries keyed by name,
//! each holding an [`AttributeSet`] of `KEY = VALUE` pairs.
//!
//! Parsing never fails on malformed text. Input that cannot be used is
//! skipped and reported through [`Diagnostic`]s; only an unreadable input
//! stream is an error.
//!
//! ```text
//! *NODE
//! NODE1   HOSTNAME = "host1", TmaxPort = 3300,
//!         MAXSVR = 50
//! ```

use std::io::Read;
use std::path::Path;

use tpconfig_parse::{Parser, decode};
use tracing::info;

mod attributes;
mod builder;
mod diagnostic;
mod document;
mod error;
mod query;

pub use attributes::{AttributeSet, NAME_KEY};
pub use builder::{DocumentBuilder, Parsed};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use document::{ConfigDocument, Section};
pub use error::LoadError;
pub use query::{
    GatewayRow, NodeInfo, SUMMARY_GROUP_LIMIT, ServerGroupInfo, ServerPlacement, ServiceRow,
    Summary,
};
pub use tpconfig_parse::Span;

/// Parse tp_config text into a document.
pub fn parse(source: &str) -> ConfigDocument {
    parse_with_diagnostics(source).document
}

/// Parse tp_config text, keeping the diagnostics.
pub fn parse_with_diagnostics(source: &str) -> Parsed {
    let mut parser = Parser::new(source);
    let mut builder = DocumentBuilder::new();
    while let Some(event) = parser.next_event() {
        builder.event(event);
    }
    builder.finish()
}

/// Parse raw bytes, skipping any that are not valid UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Parsed {
    parse_with_diagnostics(&decode(bytes))
}

/// Read a whole stream and parse it.
pub fn from_reader<R: Read>(mut reader: R) -> Result<Parsed, LoadError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|error| LoadError::Io { path: None, error })?;
    Ok(parse_bytes(&bytes))
}

/// Read and parse a tp_config file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Parsed, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|error| LoadError::Io {
        path: Some(path.to_path_buf()),
        error,
    })?;
    let parsed = parse_bytes(&bytes);
    info!(
        ?path,
        nodes = parsed.document.nodes().len(),
        servers = parsed.document.server_placement_count(),
        diagnostics = parsed.diagnostics.len(),
        "parsed configuration"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple() {
        let document = parse("*NODE\nN1 HOSTNAME=h\n");
        assert_eq!(document.node("N1").and_then(|n| n.get("HOSTNAME")), Some("h"));
    }

    #[test]
    fn parse_empty() {
        assert!(parse("").is_empty());
        assert!(parse("*NODE\n*SERVER\n").is_empty());
    }

    #[test]
    fn from_reader_decodes_permissively() {
        let bytes: &[u8] = b"*NODE\nN1 HOSTNAME=\xffh\n";
        let parsed = from_reader(bytes).unwrap();
        assert_eq!(
            parsed.document.node("N1").and_then(|n| n.get("HOSTNAME")),
            Some("h")
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = parse_file("/definitely/not/here/tp_config").unwrap_err();
        assert!(matches!(error, LoadError::Io { path: Some(_), .. }));
        assert!(error.to_string().starts_with("failed to read /definitely/not/here/tp_config"));
    }
}
