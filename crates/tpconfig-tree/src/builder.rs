//! Document builder from parse events.
//!
//! The builder is the section router: each completed entry is turned into an
//! [`AttributeSet`] and merged into the collection for its section.
//!
//! | section                              | on a repeated name      |
//! |--------------------------------------|-------------------------|
//! | DOMAIN                               | first one wins          |
//! | NODE, SVRGROUP, SERVICE, GATEWAY     | last one wins           |
//! | SERVER                               | all kept, in file order |
//! | anything else                        | dropped                 |

use std::collections::HashMap;

use tpconfig_parse::{Entry, Event, Span};
use tracing::{debug, trace};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::{AttributeSet, ConfigDocument, Section};

/// The outcome of a parse: the document plus non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// The parsed document.
    pub document: ConfigDocument,
    /// Findings about dropped or overwritten input, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Builder that routes parse events into a [`ConfigDocument`].
#[derive(Default)]
pub struct DocumentBuilder {
    document: ConfigDocument,
    diagnostics: Vec<Diagnostic>,
    /// Span of the DOMAIN entry that was kept.
    domain_span: Option<Span>,
    /// Span of the entry currently stored under each name.
    origins: HashMap<(Section, String), Span>,
    /// Header of the current unknown section, until its first entry is dropped.
    unreported_section: Option<(String, Span)>,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one parse event.
    pub fn event(&mut self, event: Event<'_>) {
        match event {
            Event::SectionStart { name, span } => {
                self.unreported_section = match Section::from_name(name) {
                    Some(_) => None,
                    None => Some((name.to_string(), span)),
                };
            }
            Event::Entry(entry) => self.route(&entry),
            Event::OrphanContinuation { span } => {
                self.diagnostics
                    .push(Diagnostic::new(DiagnosticKind::OrphanContinuation, span));
            }
        }
    }

    /// Merge one entry into the document according to its section.
    pub fn route(&mut self, entry: &Entry<'_>) {
        let Some(section) = Section::from_name(entry.section) else {
            self.discard(entry);
            return;
        };

        let attributes = AttributeSet::from_entry(entry);
        trace!(%section, name = entry.name, attributes = attributes.len(), "routing entry");

        let collection = match section {
            Section::Domain => {
                self.merge_domain(attributes, entry.span);
                return;
            }
            Section::Server => {
                self.document
                    .servers
                    .entry(entry.name.to_string())
                    .or_default()
                    .push(attributes);
                return;
            }
            Section::Node => &mut self.document.nodes,
            Section::SvrGroup => &mut self.document.server_groups,
            Section::Service => &mut self.document.services,
            Section::Gateway => &mut self.document.gateways,
        };

        // An existing key keeps its position; only the value is replaced.
        if collection
            .insert(entry.name.to_string(), attributes)
            .is_some()
        {
            debug!(%section, name = entry.name, "replacing earlier entry with the same name");
        }
        self.track_origin(section, entry.name, entry.span);
    }

    fn merge_domain(&mut self, attributes: AttributeSet, span: Span) {
        match self.domain_span {
            Some(original) => {
                debug!(name = attributes.name(), "dropping additional DOMAIN entry");
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateDomain { original },
                    span,
                ));
            }
            None => {
                self.document.domain = Some(attributes);
                self.domain_span = Some(span);
            }
        }
    }

    /// Remember where `name` was defined, reporting the definition it replaces.
    fn track_origin(&mut self, section: Section, name: &str, span: Span) {
        if let Some(original) = self.origins.insert((section, name.to_string()), span) {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateName {
                    section,
                    name: name.to_string(),
                    original,
                },
                span,
            ));
        }
    }

    fn discard(&mut self, entry: &Entry<'_>) {
        debug!(
            section = entry.section,
            name = entry.name,
            "dropping entry outside of a known section"
        );

        if entry.section.is_empty() {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::OutsideSection {
                    name: entry.name.to_string(),
                },
                entry.span,
            ));
        } else if let Some((name, span)) = self.unreported_section.take() {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnknownSection { name },
                span,
            ));
        }
    }

    /// Finish building and return the document with its diagnostics.
    pub fn finish(self) -> Parsed {
        Parsed {
            document: self.document,
            diagnostics: self.diagnostics,
        }
    }
}
