use crate::catalog::GistRecord;
use crate::models::Tab;
use crate::store::MembershipSets;

/// Case-insensitive substring match on name or description.
pub fn matches_query(record: &GistRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record.name.to_lowercase().contains(&needle)
        || record.description.to_lowercase().contains(&needle)
}

pub fn matches_tab(record: &GistRecord, tab: Tab, memberships: &MembershipSets) -> bool {
    match tab.membership() {
        None => true,
        Some(kind) => memberships.contains(kind, &record.id),
    }
}

/// The gists to display, in catalog order.
pub fn project<'a>(
    records: &'a [GistRecord],
    memberships: &MembershipSets,
    query: &str,
    tab: Tab,
) -> Vec<&'a GistRecord> {
    records
        .iter()
        .filter(|r| matches_query(r, query))
        .filter(|r| matches_tab(r, tab, memberships))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::MembershipKind;

    fn ids<'a>(records: &[&'a GistRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_query_on_all_returns_whole_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let sets = MembershipSets::default();
        let shown = project(catalog.records(), &sets, "", Tab::All);
        assert_eq!(ids(&shown), ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        let sets = MembershipSets::default();
        for query in ["hooks", "HOOKS", "HoOkS"] {
            let shown = project(catalog.records(), &sets, query, Tab::All);
            assert_eq!(ids(&shown), ["1"], "query {query:?}");
        }
    }

    #[test]
    fn query_matches_description_too() {
        let catalog = Catalog::builtin().unwrap();
        let sets = MembershipSets::default();
        let shown = project(catalog.records(), &sets, "development stacks", Tab::All);
        assert_eq!(ids(&shown), ["6"]);
        let shown = project(catalog.records(), &sets, "typescript", Tab::All);
        assert_eq!(ids(&shown), ["2"]);
    }

    #[test]
    fn membership_tabs_keep_catalog_order() {
        let catalog = Catalog::builtin().unwrap();
        let mut sets = MembershipSets::default();
        sets.insert(MembershipKind::Starred, "5");
        sets.insert(MembershipKind::Starred, "2");
        sets.insert(MembershipKind::Favorited, "3");

        let shown = project(catalog.records(), &sets, "", Tab::Starred);
        assert_eq!(ids(&shown), ["2", "5"]);
        let shown = project(catalog.records(), &sets, "", Tab::Favorites);
        assert_eq!(ids(&shown), ["3"]);
        assert!(project(catalog.records(), &sets, "", Tab::Forked).is_empty());
    }

    #[test]
    fn result_is_exactly_the_records_matching_both_predicates() {
        let catalog = Catalog::builtin().unwrap();
        let mut sets = MembershipSets::default();
        for id in ["1", "3", "4", "6"] {
            sets.insert(MembershipKind::Forked, id);
        }
        for query in ["", "a", "collection", "zzz", "s"] {
            for tab in Tab::ALL {
                let shown = project(catalog.records(), &sets, query, tab);
                let expected: Vec<&GistRecord> = catalog
                    .records()
                    .iter()
                    .filter(|r| matches_query(r, query) && matches_tab(r, tab, &sets))
                    .collect();
                assert_eq!(shown, expected, "query {query:?} tab {tab:?}");

                let positions: Vec<usize> = shown
                    .iter()
                    .map(|r| catalog.records().iter().position(|c| c.id == r.id).unwrap())
                    .collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
