//! Non-fatal findings collected while building a document.
//!
//! None of these change the document; they point at input that was dropped
//! or overwritten so a human can check the file.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use tpconfig_parse::Span;

use crate::Section;

/// Spans are byte offsets into the decoded source.
fn ariadne_config() -> Config {
    let config = Config::default().with_index_type(IndexType::Byte);
    if std::env::var("NO_COLOR").is_ok() {
        config.with_color(false)
    } else {
        config
    }
}

/// A warning about the input, with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What was found.
    pub kind: DiagnosticKind,
    /// Where it was found.
    pub span: Span,
}

/// Kinds of findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A later entry replaced an earlier one with the same name.
    DuplicateName {
        section: Section,
        name: String,
        /// Span of the replaced entry.
        original: Span,
    },
    /// A second DOMAIN entry was dropped.
    DuplicateDomain {
        /// Span of the DOMAIN entry that was kept.
        original: Span,
    },
    /// Entries under this header were dropped; the span is the header line.
    UnknownSection { name: String },
    /// An entry appeared before any section header and was dropped.
    OutsideSection { name: String },
    /// An indented line had no entry to continue and was dropped.
    OrphanContinuation,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(kind: DiagnosticKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Render this diagnostic with ariadne.
    ///
    /// Returns a string containing the formatted warning with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span.into();
        let warning = Report::build(ReportKind::Warning, (filename, range.clone()))
            .with_config(ariadne_config());

        match &self.kind {
            DiagnosticKind::DuplicateName {
                section,
                name,
                original,
            } => warning
                .with_message(format!("duplicate {section} entry `{name}`"))
                .with_label(
                    Label::new((filename, std::ops::Range::<usize>::from(*original)))
                        .with_message("first defined here")
                        .with_color(Color::Blue),
                )
                .with_label(
                    Label::new((filename, range))
                        .with_message("this definition replaces it")
                        .with_color(Color::Yellow),
                )
                .with_help("only the last entry with a given name is kept"),

            DiagnosticKind::DuplicateDomain { original } => warning
                .with_message("duplicate DOMAIN entry")
                .with_label(
                    Label::new((filename, std::ops::Range::<usize>::from(*original)))
                        .with_message("this DOMAIN entry is used")
                        .with_color(Color::Blue),
                )
                .with_label(
                    Label::new((filename, range))
                        .with_message("ignored")
                        .with_color(Color::Yellow),
                )
                .with_help("a configuration has a single DOMAIN; the first one wins"),

            DiagnosticKind::UnknownSection { name } => warning
                .with_message(format!("unknown section `{name}`"))
                .with_label(
                    Label::new((filename, range))
                        .with_message("entries under this header are ignored")
                        .with_color(Color::Yellow),
                )
                .with_help("known sections are DOMAIN, NODE, SVRGROUP, SERVER, SERVICE and GATEWAY"),

            DiagnosticKind::OutsideSection { name } => warning
                .with_message(format!("entry `{name}` outside of any section"))
                .with_label(
                    Label::new((filename, range))
                        .with_message("ignored")
                        .with_color(Color::Yellow),
                )
                .with_help("add a section header such as `*NODE` before the first entry"),

            DiagnosticKind::OrphanContinuation => warning
                .with_message("continuation line without an entry")
                .with_label(
                    Label::new((filename, range))
                        .with_message("ignored")
                        .with_color(Color::Yellow),
                )
                .with_help("indented lines continue the entry above them"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiagnosticKind::DuplicateName { section, name, .. } => {
                write!(f, "duplicate {section} entry `{name}`")
            }
            DiagnosticKind::DuplicateDomain { .. } => write!(f, "duplicate DOMAIN entry"),
            DiagnosticKind::UnknownSection { name } => write!(f, "unknown section `{name}`"),
            DiagnosticKind::OutsideSection { name } => {
                write!(f, "entry `{name}` outside of any section")
            }
            DiagnosticKind::OrphanContinuation => write!(f, "continuation line without an entry"),
        }?;
        write!(f, " at offset {}", self.span.start)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_with_diagnostics;

    fn render_stripped(source: &str) -> Vec<String> {
        parse_with_diagnostics(source)
            .diagnostics
            .iter()
            .map(|d| {
                let rendered = d.render("tp_config", source);
                String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap()
            })
            .collect()
    }

    #[test]
    fn duplicate_name_points_at_both_definitions() {
        let source = "*NODE\nN1 HOSTNAME=a\nN1 HOSTNAME=b\n";
        let reports = render_stripped(source);

        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("duplicate NODE entry `N1`"));
        assert!(reports[0].contains("first defined here"));
        assert!(reports[0].contains("this definition replaces it"));
    }

    #[test]
    fn unknown_section_points_at_header() {
        let source = "*FOOBAR\nX A=1\nY B=2\n";
        let reports = render_stripped(source);

        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("unknown section `FOOBAR`"));
        assert!(reports[0].contains("*FOOBAR"));
    }

    #[test]
    fn labels_land_on_the_right_line_after_multibyte_text() {
        let source = "# 노드 설정\n*NODE\nN1 HOSTNAME=a\nN1 HOSTNAME=b\n";
        let reports = render_stripped(source);

        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("tp_config:4:1"), "{}", reports[0]);
    }

    #[test]
    fn display_includes_offset() {
        let parsed = parse_with_diagnostics("*NODE\n  A=1\n");
        assert_eq!(
            parsed.diagnostics[0].to_string(),
            "continuation line without an entry at offset 6"
        );
    }
}
