//! The `periods` command: resolve an interval against the catalogue.

use supl_core::period::{DEFAULT_TIME_FORMAT, PeriodCatalogue, PeriodSpan};

use crate::error::CliResult;

/// Resolves `from`/`to` to teaching periods.
///
/// With an explicit `format` both values are bare times in that format.
/// Otherwise `HH:MM` is tried first and ISO-8601 date-times second.
pub fn resolve(
    catalogue: &PeriodCatalogue,
    from: &str,
    to: &str,
    format: Option<&str>,
) -> CliResult<PeriodSpan> {
    let span = match format {
        Some(format) => catalogue.resolve_strings(from, to, format)?,
        None => catalogue
            .resolve_strings(from, to, DEFAULT_TIME_FORMAT)
            .or_else(|_| catalogue.resolve_stamps(from, to))?,
    };
    Ok(span)
}

/// Prints the resolved span as JSON.
pub fn run(catalogue: &PeriodCatalogue, from: &str, to: &str, format: Option<&str>) -> CliResult<()> {
    let span = resolve(catalogue, from, to, format)?;
    println!("{}", serde_json::to_string(&span)?);
    Ok(())
}
