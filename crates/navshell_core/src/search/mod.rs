//! Orchestrator search suggestions.
//!
//! # Responsibility
//! - Produce additive suggestion matches over mode and unit labels for the
//!   orchestrator search field.
//!
//! # Invariants
//! - Matching is pure: no state, and queries are never persisted (the
//!   search field is a temporary keyword assistant, not stored user state).
//! - Queries are short keyword probes; matching is case-insensitive after
//!   whitespace normalization.

use crate::model::nav::ModeId;
use crate::model::unit::UnitId;
use crate::registry::units::UnitRegistry;
use crate::state::mode::ModeCatalog;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Normalizes one keyword probe: trim, lowercase, collapse whitespace runs.
fn normalize_query(query: &str) -> String {
    WHITESPACE_RE
        .replace_all(query.trim(), " ")
        .to_lowercase()
}

/// Returns the mode ids whose label contains the probe.
///
/// Disabled modes still match: the panel shows them (visually blocked), so
/// suggestions must not hide them. An empty probe matches nothing; the full
/// list is always rendered separately.
pub fn filter_modes(catalog: &ModeCatalog, query: &str) -> Vec<ModeId> {
    let probe = normalize_query(query);
    if probe.is_empty() {
        return vec![];
    }
    catalog
        .modes()
        .iter()
        .filter(|mode| mode.label.to_lowercase().contains(&probe))
        .map(|mode| mode.id.clone())
        .collect()
}

/// Returns the unit ids whose label or id contains the probe, in
/// registration order.
pub fn filter_units(registry: &UnitRegistry, query: &str) -> Vec<UnitId> {
    let probe = normalize_query(query);
    if probe.is_empty() {
        return vec![];
    }
    registry
        .unit_ids()
        .iter()
        .filter(|id| {
            registry
                .unit(id)
                .is_some_and(|unit| {
                    unit.label.to_lowercase().contains(&probe) || unit.id.contains(&probe)
                })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_modes, filter_units, normalize_query};
    use crate::model::unit::Group;
    use crate::registry::manifest::{GroupCatalog, UnitManifest};
    use crate::registry::units::UnitRegistry;
    use crate::state::mode::ModeCatalog;

    fn registry() -> UnitRegistry {
        let catalog = GroupCatalog {
            workpackages: vec![Group {
                id: "wp4".to_string(),
                label: "WP4".to_string(),
            }],
            categories: vec![],
        };
        let manifests = vec![
            UnitManifest {
                id: "svc-hvdc-data-timeline".to_string(),
                label: "Data Timeline Viewer".to_string(),
                workpackages: vec!["wp4".to_string()],
                categories: vec![],
                order: None,
                version: None,
                owner: None,
                status: None,
            },
            UnitManifest {
                id: "svc-diagnostics".to_string(),
                label: "Diagnostics".to_string(),
                workpackages: vec!["wp4".to_string()],
                categories: vec![],
                order: None,
                version: None,
                owner: None,
                status: None,
            },
        ];
        UnitRegistry::load(catalog, manifests).expect("registry load")
    }

    #[test]
    fn normalize_collapses_whitespace_and_lowercases() {
        assert_eq!(normalize_query("  Work\t  Package "), "work package");
    }

    #[test]
    fn empty_probe_matches_nothing() {
        let catalog = ModeCatalog::baseline();
        assert!(filter_modes(&catalog, "   ").is_empty());
        assert!(filter_units(&registry(), "").is_empty());
    }

    #[test]
    fn mode_probe_matches_case_insensitively() {
        let catalog = ModeCatalog::baseline();
        assert_eq!(filter_modes(&catalog, "CATEG"), ["by_category"]);
        // Short probes match broadly; disabled modes stay visible.
        let per = filter_modes(&catalog, "per");
        assert_eq!(per, ["by_work_package", "by_category", "by_function"]);
    }

    #[test]
    fn unit_probe_matches_label_or_id() {
        let registry = registry();
        assert_eq!(filter_units(&registry, "timeline"), ["svc-hvdc-data-timeline"]);
        assert_eq!(filter_units(&registry, "svc-diag"), ["svc-diagnostics"]);
    }
}
