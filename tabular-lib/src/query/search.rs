//! Free-text search over rows

use crate::model::Column;
use crate::model::Row;

/// Returns the rows matching a free-text search term.
///
/// A row matches when any column marked searchable yields a value whose
/// text, lowercased, contains the lowercased term as a substring. Null
/// and missing values never match. An empty term is the identity: every
/// row passes through in input order.
///
/// Case-insensitive, locale-naive substring matching only; no fuzzy
/// matching, no tokenization, and no whitespace trimming — a term with
/// surrounding spaces matches those spaces literally.
pub fn search_rows<'a>(rows: &'a [Row], term: &str, columns: &[Column]) -> Vec<&'a Row> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|row| {
            columns.iter().any(|column| {
                if !column.is_searchable() {
                    return false;
                }
                row.value_at(column.key())
                    .and_then(|value| value.search_text())
                    .is_some_and(|text| text.to_lowercase().contains(&term))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("sku", "SKU"),
            Column::new("internal_note", "Note").searchable(false),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new(1)
                .set("name", "Espresso Machine")
                .set("sku", "EM-100")
                .set("internal_note", "clearance"),
            Row::new(2).set("name", "Coffee Mug").set("sku", "CM-200"),
            Row::new(3).set("name", "Kettle").set("sku", Value::Null),
        ]
    }

    #[test]
    fn test_empty_term_is_identity() {
        let rows = rows();
        let matched = search_rows(&rows, "", &columns());
        assert_eq!(matched.len(), 3);
    }

    #[test]
    fn test_surrounding_whitespace_matches_literally() {
        let rows = rows();
        // "Espresso Machine" contains " machine"; nothing contains " machine ".
        let matched = search_rows(&rows, " machine", &columns());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id(), &1.into());
        let matched = search_rows(&rows, " machine ", &columns());
        assert!(matched.is_empty());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let rows = rows();
        let matched = search_rows(&rows, "ESPRESSO", &columns());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id(), &1.into());
    }

    #[test]
    fn test_any_searchable_column_matches() {
        let rows = rows();
        let matched = search_rows(&rows, "cm-200", &columns());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id(), &2.into());
    }

    #[test]
    fn test_unsearchable_columns_are_skipped() {
        let rows = rows();
        let matched = search_rows(&rows, "clearance", &columns());
        assert!(matched.is_empty());
    }

    #[test]
    fn test_null_values_never_match() {
        let rows = rows();
        let matched = search_rows(&rows, "null", &columns());
        assert!(matched.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let rows = rows();
        let once: Vec<Row> = search_rows(&rows, "e", &columns())
            .into_iter()
            .cloned()
            .collect();
        let twice = search_rows(&once, "e", &columns());
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice) {
            assert_eq!(a.id(), b.id());
        }
    }
}
