use crate::models::RiskSiteRow;
use std::collections::HashSet;

/// Composite partner key. Partner numbering repeats across sites, so the
/// partner-level set is keyed by site and partner together.
pub fn partner_key(site_id: &str, partner_id: &str) -> String {
    format!("{site_id}:{partner_id}")
}

/// Expand/collapse flags for the nested aggregation tables, one set per
/// nesting level. Membership means expanded. The state is local to a view
/// instance and is rebuilt on every data load; ids from a previous query
/// that linger in a set match no row and have no effect.
#[derive(Debug, Default, Clone)]
pub struct ExpansionState {
    sites: HashSet<String>,
    partners: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_site(&mut self, site_id: &str) {
        if !self.sites.remove(site_id) {
            self.sites.insert(site_id.to_string());
        }
    }

    pub fn is_site_expanded(&self, site_id: &str) -> bool {
        self.sites.contains(site_id)
    }

    pub fn toggle_partner(&mut self, site_id: &str, partner_id: &str) {
        let key = partner_key(site_id, partner_id);
        if !self.partners.remove(&key) {
            self.partners.insert(key);
        }
    }

    pub fn is_partner_expanded(&self, site_id: &str, partner_id: &str) -> bool {
        self.partners.contains(&partner_key(site_id, partner_id))
    }

    /// Wholesale replacement of both sets. Called with every row id of a
    /// freshly loaded data set, so tables open fully expanded.
    pub fn reset_all_expanded<'a>(
        &mut self,
        site_ids: impl IntoIterator<Item = &'a str>,
        partner_ids: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        self.sites = site_ids.into_iter().map(str::to_string).collect();
        self.partners = partner_ids
            .into_iter()
            .map(|(site, partner)| partner_key(site, partner))
            .collect();
    }

    /// Reset from a loaded all-sites risk response, the deepest table we
    /// render.
    pub fn reset_from_site_rows(&mut self, rows: &[RiskSiteRow]) {
        self.reset_all_expanded(
            rows.iter().map(|row| row.id.as_str()),
            rows.iter().flat_map(|row| {
                row.companies
                    .iter()
                    .map(|company| (row.id.as_str(), company.id.as_str()))
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_membership() {
        let mut state = ExpansionState::new();
        state.reset_all_expanded(["1"], [("1", "10")]);
        assert!(state.is_site_expanded("1"));

        state.toggle_site("1");
        assert!(!state.is_site_expanded("1"));
        state.toggle_site("1");
        assert!(state.is_site_expanded("1"));

        state.toggle_partner("1", "10");
        assert!(!state.is_partner_expanded("1", "10"));
        state.toggle_partner("1", "10");
        assert!(state.is_partner_expanded("1", "10"));
    }

    #[test]
    fn same_partner_number_in_two_sites_is_independent() {
        let mut state = ExpansionState::new();
        state.reset_all_expanded(["1", "2"], [("1", "10"), ("2", "10")]);
        state.toggle_partner("1", "10");
        assert!(!state.is_partner_expanded("1", "10"));
        assert!(state.is_partner_expanded("2", "10"));
    }

    #[test]
    fn reset_replaces_rather_than_merges() {
        let mut state = ExpansionState::new();
        state.reset_all_expanded(["1", "2"], [("1", "10")]);
        state.reset_all_expanded(["3"], [("3", "30")]);

        assert!(state.is_site_expanded("3"));
        assert!(!state.is_site_expanded("1"));
        assert!(!state.is_site_expanded("2"));
        assert!(state.is_partner_expanded("3", "30"));
        assert!(!state.is_partner_expanded("1", "10"));
    }

    #[test]
    fn toggling_an_unknown_row_is_harmless() {
        let mut state = ExpansionState::new();
        state.reset_all_expanded(["1"], []);
        // Stale id from a previous query: membership flips but no rendered
        // row matches it.
        state.toggle_site("99");
        assert!(state.is_site_expanded("99"));
        assert!(state.is_site_expanded("1"));
    }
}
