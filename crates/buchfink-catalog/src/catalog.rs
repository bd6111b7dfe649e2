//! The immutable `SignatureCatalog` and its builder.
//!
//! Rules are collected in a `SignatureCatalogBuilder` and frozen with
//! `build()`. The built catalog has no interior mutability, so a single
//! `Arc<SignatureCatalog>` can serve every classification call and every
//! Rayon worker without locking.

use alloy_primitives::B256;
use buchfink_core::{CatalogError, EventRule, RuleCatalog};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::rules::RuleFile;

/// Collects rules before they are frozen into a [`SignatureCatalog`].
#[derive(Debug, Default)]
pub struct SignatureCatalogBuilder {
    rules: Vec<EventRule>,
    names: HashSet<String>,
}

impl SignatureCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Names must be unique and the rule must pass validation.
    pub fn add(&mut self, rule: EventRule) -> Result<(), CatalogError> {
        rule.validate()?;
        if !self.names.insert(rule.name.clone()) {
            return Err(CatalogError::AlreadyExists { name: rule.name });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Add every rule from `rules`, stopping at the first error.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = EventRule>) -> Result<(), CatalogError> {
        for rule in rules {
            self.add(rule)?;
        }
        Ok(())
    }

    /// Load all rules from a YAML rule file. Returns the number of rules added.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let rules = RuleFile::load(path)?;
        if rules.is_empty() {
            return Err(CatalogError::Parse(format!("{}: no rules", path.display())));
        }
        let count = rules.len();
        self.extend(rules)?;
        debug!(path = %path.display(), count, "rule file loaded");
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Freeze the rules. Overlapping address predicates under one signature
    /// are allowed and logged at `warn`.
    pub fn build(self) -> SignatureCatalog {
        let mut by_signature: IndexMap<B256, Vec<EventRule>> = IndexMap::new();
        let mut order = Vec::with_capacity(self.rules.len());
        for rule in self.rules {
            let group = by_signature.entry(rule.signature).or_default();
            order.push((rule.signature, group.len()));
            group.push(rule);
        }
        let catalog = SignatureCatalog {
            by_signature,
            order,
        };
        for (a, b) in catalog.overlaps() {
            warn!(first = %a, second = %b, "rules share a signature and may match the same contract");
        }
        debug!(
            rules = catalog.len(),
            signatures = catalog.signature_count(),
            "signature catalog built"
        );
        catalog
    }
}

/// Rules indexed by topic0, registration order preserved.
#[derive(Debug, Clone, Default)]
pub struct SignatureCatalog {
    by_signature: IndexMap<B256, Vec<EventRule>>,
    /// (signature, position in its group) per rule, in registration order
    order: Vec<(B256, usize)>,
}

impl SignatureCatalog {
    pub fn builder() -> SignatureCatalogBuilder {
        SignatureCatalogBuilder::new()
    }

    /// Number of distinct signatures.
    pub fn signature_count(&self) -> usize {
        self.by_signature.len()
    }

    /// Find a rule by name.
    pub fn get(&self, name: &str) -> Option<&EventRule> {
        self.by_signature
            .values()
            .flat_map(|group| group.iter())
            .find(|rule| rule.name == name)
    }

    /// Names of rule pairs that share a signature and whose contract
    /// predicates could both accept the same emitting address.
    pub fn overlaps(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for group in self.by_signature.values() {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    if a.contracts.overlaps(&b.contracts) {
                        pairs.push((a.name.clone(), b.name.clone()));
                    }
                }
            }
        }
        pairs
    }
}

impl RuleCatalog for SignatureCatalog {
    fn lookup(&self, signature: &B256) -> &[EventRule] {
        self.by_signature
            .get(signature)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn rules(&self) -> Vec<&EventRule> {
        self.order
            .iter()
            .filter_map(|(sig, i)| self.by_signature.get(sig).and_then(|g| g.get(*i)))
            .collect()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use buchfink_core::fingerprint::{CLAIMED, TRANSFER};

    fn rule(name: &str, sig: B256, contract: u8) -> EventRule {
        EventRule::new(name, sig).contracts([Address::repeat_byte(contract)])
    }

    #[test]
    fn lookup_preserves_registration_order() {
        let mut b = SignatureCatalog::builder();
        b.add(rule("A", CLAIMED, 1)).unwrap();
        b.add(rule("B", TRANSFER, 2)).unwrap();
        b.add(rule("C", CLAIMED, 3)).unwrap();
        let catalog = b.build();

        let names: Vec<_> = catalog.lookup(&CLAIMED).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        let all: Vec<_> = catalog.rules().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(all, ["A", "B", "C"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.signature_count(), 2);
        assert!(catalog.overlaps().is_empty());
    }

    #[test]
    fn unknown_signature_is_empty() {
        let catalog = SignatureCatalog::builder().build();
        assert!(catalog.lookup(&CLAIMED).is_empty());
        assert!(!catalog.contains(&CLAIMED));
        assert!(catalog.is_empty());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut b = SignatureCatalog::builder();
        b.add(rule("A", CLAIMED, 1)).unwrap();
        let err = b.add(rule("A", TRANSFER, 2)).unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyExists { name } if name == "A"));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn invalid_rule_rejected() {
        let mut b = SignatureCatalog::builder();
        assert!(matches!(
            b.add(EventRule::new("", CLAIMED)),
            Err(CatalogError::InvalidRule { .. })
        ));
    }

    #[test]
    fn overlapping_predicates_reported() {
        let mut b = SignatureCatalog::builder();
        b.add(rule("A", CLAIMED, 1)).unwrap();
        b.add(EventRule::new("AnyClaim", CLAIMED)).unwrap();
        b.add(rule("B", CLAIMED, 2)).unwrap();
        let catalog = b.build();
        assert_eq!(
            catalog.overlaps(),
            vec![
                ("A".to_string(), "AnyClaim".to_string()),
                ("AnyClaim".to_string(), "B".to_string()),
            ]
        );
        assert_eq!(catalog.get("B").map(|r| r.name.as_str()), Some("B"));
    }
}
