use std::collections::HashSet;

use veil_core::Domain;

pub struct DedupeStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
}

/// Remove repeated domains in place, keeping first occurrences in order.
pub fn dedupe_domains(domains: &mut Vec<Domain>) -> DedupeStats {
    let before = domains.len();

    let mut seen: HashSet<Domain> = HashSet::with_capacity(before);
    domains.retain(|domain| seen.insert(domain.clone()));

    let after = domains.len();

    DedupeStats {
        before,
        after,
        deduped: before - after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_order() {
        let mut domains: Vec<Domain> = ["b.com", "a.com", "B.com", ".a.com", "c.com"]
            .iter()
            .filter_map(|d| Domain::parse(d))
            .collect();
        let stats = dedupe_domains(&mut domains);
        assert_eq!(stats.before, 5);
        assert_eq!(stats.after, 3);
        assert_eq!(stats.deduped, 2);
        let names: Vec<&str> = domains.iter().map(Domain::as_str).collect();
        assert_eq!(names, vec!["b.com", "a.com", "c.com"]);
    }
}
