//! Export processing commands.

use std::path::Path;

use tracing::debug;

use supl_export::{Document, DocumentKind, ExportError, Report};

use crate::cli::ProcessArgs;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Process an export and print the report as JSON on stdout.
pub fn process(args: &ProcessArgs, config: &CliConfig) -> CliResult<()> {
    let settings = args.apply(config.settings.clone());
    let catalogue = config.catalogue()?;
    debug!(?settings, file = %args.file.display(), "processing export");

    let doc = Document::from_path(&args.file)?;
    let report = supl_export::process(&doc, &settings, &catalogue)?;

    println!("{}", render(&report, args.pretty)?);
    Ok(())
}

/// Serializes a report as compact or pretty JSON.
pub fn render(report: &Report, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Print the kind of an export.
pub fn detect(file: &Path) -> CliResult<()> {
    let doc = Document::from_path(file)?;
    let kind = DocumentKind::detect(&doc).ok_or_else(|| {
        ExportError::unsupported_document(format!(
            "{} is neither a students nor a teachers export",
            file.display()
        ))
    })?;
    println!("{kind}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::CliError;
    use supl_export::ExportErrorCode;

    fn export_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn render_compact_and_pretty() {
        let doc = Document::parse_str("<r><VypisSuplovani/></r>").unwrap();
        let report = supl_export::process(
            &doc,
            &Default::default(),
            &supl_core::PeriodCatalogue::standard(),
        )
        .unwrap();

        let compact = render(&report, false).unwrap();
        assert!(compact.starts_with(r#"{"kind":"teachers","substitutions":[{"Class":"#));
        assert!(!compact.contains('\n'));

        let pretty = render(&report, true).unwrap();
        assert!(pretty.contains("\n  \"kind\": \"teachers\""));
    }

    #[test]
    fn process_reads_file() {
        let file = export_file(
            "<r><VypisSuplovaniZaka><ZpusobReseni>odpadá</ZpusobReseni></VypisSuplovaniZaka></r>",
        );
        let args = ProcessArgs {
            file: file.path().to_path_buf(),
            ..ProcessArgs::default()
        };
        assert!(process(&args, &CliConfig::default()).is_ok());
    }

    #[test]
    fn detect_rejects_unknown_export() {
        let file = export_file("<r><Predmet/></r>");
        let err = detect(file.path()).unwrap_err();
        let CliError::Export(err) = err else {
            panic!("expected export error, got {err:?}");
        };
        assert_eq!(err.code(), ExportErrorCode::UnsupportedDocument);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = ProcessArgs {
            file: "/nonexistent/supl.xml".into(),
            ..ProcessArgs::default()
        };
        assert!(process(&args, &CliConfig::default()).is_err());
    }
}
