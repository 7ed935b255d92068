/// Share of expected headers a row must match to be taken as the header row.
const MATCH_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub row_index: usize,
    pub headers: Vec<String>,
}

impl HeaderMatch {
    /// Column index of the first header that matches one of `aliases`.
    ///
    /// Exact (case-insensitive) matches win over fuzzy ones so that
    /// "Section Name" does not get claimed by "Section Code".
    #[must_use]
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| {
                self.headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(alias))
            })
            .or_else(|| {
                aliases.iter().find_map(|alias| {
                    self.headers
                        .iter()
                        .position(|h| fuzzy_match(h, alias))
                })
            })
    }
}

/// Case-insensitive containment in either direction. Empty text never matches.
#[must_use]
pub fn fuzzy_match(cell: &str, expected: &str) -> bool {
    let cell = cell.trim().to_lowercase();
    let expected = expected.trim().to_lowercase();
    if cell.is_empty() || expected.is_empty() {
        return false;
    }
    cell.contains(&expected) || expected.contains(&cell)
}

fn non_empty_cells(row: &[String]) -> usize {
    row.iter().filter(|c| !c.trim().is_empty()).count()
}

/// Find the real header row beneath any letterhead or title rows.
///
/// A single-column sheet has one-cell header rows, so those are matched too;
/// otherwise a row needs at least two filled cells to be considered.
#[must_use]
pub fn locate_header(rows: &[Vec<String>], expected: &[&str]) -> HeaderMatch {
    let min_filled = if expected.len() == 1 { 1 } else { 2 };
    let mut first_candidate = None;

    for (index, row) in rows.iter().enumerate() {
        let filled = non_empty_cells(row);
        if filled >= 2 {
            first_candidate.get_or_insert(index);
        }
        if filled < min_filled || expected.is_empty() {
            continue;
        }
        let matched = expected
            .iter()
            .filter(|exp| row.iter().any(|cell| fuzzy_match(cell, exp)))
            .count();
        let ratio = matched as f64 / expected.len() as f64;

        if ratio >= MATCH_THRESHOLD && filled * 2 >= expected.len() {
            return header_at(rows, index);
        }
    }

    header_at(rows, first_candidate.unwrap_or(0))
}

fn header_at(rows: &[Vec<String>], index: usize) -> HeaderMatch {
    let headers = rows
        .get(index)
        .map(|row| row.iter().map(|c| c.trim().to_string()).collect())
        .unwrap_or_default();
    HeaderMatch {
        row_index: index,
        headers,
    }
}
