//! Layered display-order resolution.
//!
//! # Responsibility
//! - Compute the effective display order of units for one navigation
//!   context from layered override rules.
//!
//! # Invariants
//! - Resolution is pure and idempotent: identical inputs yield identical
//!   ordered lists, across calls and across reloads.
//! - Override layers are additive; a unit's `default_order` is never
//!   mutated.
//! - Ties are broken by registration sequence, then lexical id, never
//!   arbitrarily.

use crate::model::unit::{GroupDimension, GroupId, Unit, UnitId};
use crate::registry::units::UnitRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Override layer of one order rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderScope {
    /// Baseline layer; carried on the unit itself.
    Default,
    /// Deployment/context layer, group-scoped or global.
    Contextual,
    /// Operator preference layer; strongest.
    User,
}

/// One layered order override.
///
/// `dimension`/`group_id` scope the rule to one group context; a
/// contextual rule with neither applies to the unit globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRule {
    pub scope: OrderScope,
    #[serde(default)]
    pub dimension: Option<GroupDimension>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    pub unit_id: UnitId,
    pub order: i64,
}

/// Indexed override set consulted by the resolver.
///
/// Absent layers are no-ops; every lookup falls through to the next layer.
#[derive(Debug, Clone, Default)]
pub struct OrderOverrides {
    user: BTreeMap<(GroupDimension, GroupId, UnitId), i64>,
    contextual_group: BTreeMap<(GroupDimension, GroupId, UnitId), i64>,
    contextual_global: BTreeMap<UnitId, i64>,
}

impl OrderOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an indexed override set from declarative rules.
    ///
    /// Later rules of the same scope and key replace earlier ones;
    /// `Default`-scoped rules are ignored (the baseline lives on the unit).
    pub fn from_rules(rules: &[OrderRule]) -> Self {
        let mut overrides = Self::new();
        for rule in rules {
            overrides.insert(rule);
        }
        overrides
    }

    /// Indexes one rule.
    pub fn insert(&mut self, rule: &OrderRule) {
        match (rule.scope, rule.dimension, rule.group_id.as_ref()) {
            (OrderScope::User, Some(dimension), Some(group_id)) => {
                self.user.insert(
                    (dimension, group_id.clone(), rule.unit_id.clone()),
                    rule.order,
                );
            }
            (OrderScope::Contextual, Some(dimension), Some(group_id)) => {
                self.contextual_group.insert(
                    (dimension, group_id.clone(), rule.unit_id.clone()),
                    rule.order,
                );
            }
            (OrderScope::Contextual, _, _) => {
                self.contextual_global
                    .insert(rule.unit_id.clone(), rule.order);
            }
            // User rules without a full group context and default-scope
            // rules have no slot to land in.
            (OrderScope::User, _, _) | (OrderScope::Default, _, _) => {}
        }
    }

    /// Resolves the effective order of one unit under one context.
    ///
    /// Layer priority: user > contextual group > contextual global >
    /// `default_order`.
    pub fn effective_order(
        &self,
        dimension: GroupDimension,
        group_id: Option<&GroupId>,
        unit: &Unit,
    ) -> i64 {
        if let Some(group_id) = group_id {
            let key = (dimension, group_id.clone(), unit.id.clone());
            if let Some(order) = self.user.get(&key) {
                return *order;
            }
            if let Some(order) = self.contextual_group.get(&key) {
                return *order;
            }
        }
        if let Some(order) = self.contextual_global.get(&unit.id) {
            return *order;
        }
        unit.default_order
    }
}

/// Resolves the ordered unit list for one navigation context.
///
/// Candidates are the members of `(dimension, group_id)`, or every loaded
/// unit when `group_id` is `None`. Sorting is ascending by effective order
/// with the stable fallback chain as tie-break.
pub fn resolve(
    registry: &UnitRegistry,
    overrides: &OrderOverrides,
    dimension: GroupDimension,
    group_id: Option<&GroupId>,
) -> Vec<UnitId> {
    let candidates: Vec<&Unit> = match group_id {
        Some(group_id) => registry
            .units_in_group(dimension, group_id)
            .iter()
            .filter_map(|id| registry.unit(id))
            .collect(),
        None => registry
            .unit_ids()
            .iter()
            .filter_map(|id| registry.unit(id))
            .collect(),
    };

    let mut ranked: Vec<(i64, u64, &UnitId)> = candidates
        .into_iter()
        .map(|unit| {
            (
                overrides.effective_order(dimension, group_id, unit),
                unit.registration_seq,
                &unit.id,
            )
        })
        .collect();
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(b.2)));
    ranked.into_iter().map(|(_, _, id)| id.clone()).collect()
}

/// Returns the first resolved unit of one group context, if any.
///
/// This is the unit a fresh group selection lands on.
pub fn default_unit(
    registry: &UnitRegistry,
    overrides: &OrderOverrides,
    dimension: GroupDimension,
    group_id: &GroupId,
) -> Option<UnitId> {
    resolve(registry, overrides, dimension, Some(group_id))
        .into_iter()
        .next()
}
