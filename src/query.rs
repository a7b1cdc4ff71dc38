//! Boolean search string assembly.
//!
//! Topics describe their search as keyword *groups*: terms inside a group are
//! alternatives (`OR`), groups must all match (`AND`), and a shared list of
//! negative terms is appended to keep consumer-vehicle and unrelated industry
//! stories out of the results.
//!
//! ```text
//! ("Class 8" OR "heavy duty") AND ("fleet" OR "carrier") -car -"Michelin Guide"
//! ```

use itertools::Itertools;

/// Build the provider search string for a set of keyword groups.
///
/// Positive terms are wrapped in double quotes unless the caller already quoted
/// them. Negative terms are only quoted when they contain whitespace, so a
/// single-word exclusion stays bare (`-car`). Empty groups are skipped. No
/// other validation is performed.
pub fn build_query<G, T>(groups: &[G], negatives: &[T]) -> String
where
    G: AsRef<[String]>,
    T: AsRef<str>,
{
    let positive = groups
        .iter()
        .map(|g| g.as_ref())
        .filter(|g| !g.is_empty())
        .map(|g| format!("({})", g.iter().map(|t| quote(t)).join(" OR ")))
        .join(" AND ");

    let negative = negatives
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .map(|n| {
            if n.contains(char::is_whitespace) {
                format!("-{}", quote(n))
            } else {
                format!("-{n}")
            }
        })
        .join(" ");

    match (positive.is_empty(), negative.is_empty()) {
        (_, true) => positive,
        (true, false) => negative,
        (false, false) => format!("{positive} {negative}"),
    }
}

fn quote(term: &str) -> String {
    let term = term.trim();
    if term.starts_with('"') && term.ends_with('"') && term.len() >= 2 {
        term.to_string()
    } else {
        format!("\"{term}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_groups_are_and_joined() {
        let groups = vec![group(&["Class 8", "Class 7"]), group(&["fleet", "fleets"])];
        let negatives: Vec<String> = vec![];
        assert_eq!(
            build_query(&groups, &negatives),
            r#"("Class 8" OR "Class 7") AND ("fleet" OR "fleets")"#
        );
    }

    #[test]
    fn test_negatives_are_appended() {
        let groups = vec![group(&["tire"])];
        let negatives = vec!["car", "Michelin Guide", "food"];
        assert_eq!(
            build_query(&groups, &negatives),
            r#"("tire") -car -"Michelin Guide" -food"#
        );
    }

    #[test]
    fn test_prequoted_terms_are_left_alone() {
        let groups = vec![group(&["\"semi-truck\"", "LTL"])];
        let negatives = vec!["\"Michelin Guide\""];
        assert_eq!(
            build_query(&groups, &negatives),
            r#"("semi-truck" OR "LTL") -"Michelin Guide""#
        );
    }

    #[test]
    fn test_empty_groups_are_skipped() {
        let groups = vec![group(&[]), group(&["fleet"])];
        let negatives: Vec<&str> = vec![];
        assert_eq!(build_query(&groups, &negatives), r#"("fleet")"#);
    }

    #[test]
    fn test_only_negatives() {
        let groups: Vec<Vec<String>> = vec![];
        assert_eq!(build_query(&groups, &["suv"]), "-suv");
    }
}
