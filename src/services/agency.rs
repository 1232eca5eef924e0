//! Agency membership and request routing

use indexmap::IndexMap;

use crate::config::CatalogConfig;

/// Resolves which remote agency an operation addresses and keeps the
/// consortium membership table.
///
/// Resolution never fails: an explicit agency wins (first element when a
/// collection is given), otherwise the first configured agency is used.
/// Picking the first configured agency is a known simplification that does
/// not generalize to routing across a true multi-agency consortium.
#[derive(Debug, Clone)]
pub struct AgencyRouter {
    consortium: bool,
    members: IndexMap<String, bool>,
}

impl AgencyRouter {
    pub fn from_config(catalog: &CatalogConfig) -> Self {
        let mut members = IndexMap::new();
        if catalog.consortium {
            for agency in &catalog.agency {
                members.insert(agency.clone(), true);
            }
        } else if let Some(first) = catalog.agency.first() {
            members.insert(first.clone(), true);
        }
        Self {
            consortium: catalog.consortium,
            members,
        }
    }

    pub fn consortium(&self) -> bool {
        self.consortium
    }

    pub fn is_member(&self, agency: &str) -> bool {
        self.members.get(agency).copied().unwrap_or(false)
    }

    /// First configured agency, if any
    pub fn default_agency(&self) -> Option<&str> {
        self.members.keys().next().map(String::as_str)
    }

    /// Target agency for one operation. Degrades to `None` when nothing is
    /// configured, which in turn suppresses the initiation header.
    pub fn resolve<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .filter(|a| !a.is_empty())
            .or_else(|| self.default_agency())
    }

    /// Like [`resolve`](Self::resolve) for an explicit agency collection:
    /// the first element wins.
    pub fn resolve_first<'a>(&'a self, explicit: &'a [String]) -> Option<&'a str> {
        self.resolve(explicit.first().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn catalog(consortium: bool, agencies: &[&str]) -> CatalogConfig {
        CatalogConfig {
            consortium,
            agency: agencies.iter().map(|a| a.to_string()).collect(),
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn single_agency_mode_keeps_only_the_first() {
        let router = AgencyRouter::from_config(&catalog(false, &["MZK", "NKP"]));
        assert!(router.is_member("MZK"));
        assert!(!router.is_member("NKP"));
        assert_eq!(router.default_agency(), Some("MZK"));
    }

    #[test]
    fn consortium_mode_keeps_all_members() {
        let router = AgencyRouter::from_config(&catalog(true, &["MZK", "NKP"]));
        assert!(router.is_member("MZK"));
        assert!(router.is_member("NKP"));
    }

    #[test]
    fn explicit_agency_wins() {
        let router = AgencyRouter::from_config(&catalog(true, &["MZK", "NKP"]));
        assert_eq!(router.resolve(Some("NKP")), Some("NKP"));
        assert_eq!(router.resolve(None), Some("MZK"));
        assert_eq!(
            router.resolve_first(&["NKP".to_string(), "MZK".to_string()]),
            Some("NKP")
        );
    }

    #[test]
    fn degrades_to_none_when_nothing_configured() {
        let router = AgencyRouter::from_config(&catalog(false, &[]));
        assert_eq!(router.resolve(None), None);
        assert_eq!(router.resolve(Some("")), None);
    }
}
