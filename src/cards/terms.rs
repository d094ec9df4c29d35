//! Term list loading.

use std::path::Path;

use tracing::{info, warn};

use super::model::TERMS_PER_CARD;
use crate::config::TermSource;
use crate::error::ConfigError;

/// Separator between terms in the inline form.
pub const INLINE_SEPARATOR: &str = ";;;";

/// Load the term list from its configured source.
///
/// Short lists are accepted here and rejected when a card is generated.
pub fn load(source: &TermSource) -> Result<Vec<String>, ConfigError> {
    let terms = match source {
        TermSource::Inline(raw) => parse_inline(raw),
        TermSource::File(path) => read_file(path)?,
    };

    if terms.len() < TERMS_PER_CARD {
        warn!(
            count = terms.len(),
            needed = TERMS_PER_CARD,
            "Term list is too short for a full card"
        );
    } else {
        info!(count = terms.len(), "Loaded bingo terms");
    }

    Ok(terms)
}

/// Split the inline form on `;;;`.
pub fn parse_inline(raw: &str) -> Vec<String> {
    clean(raw.split(INLINE_SEPARATOR))
}

/// One term per line.
pub fn parse_lines(raw: &str) -> Vec<String> {
    clean(raw.lines())
}

/// Read a term file with one term per line.
pub fn read_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::TermFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_lines(&raw))
}

fn clean<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
