use std::collections::BTreeMap;

/// Label key carrying the hypervisor hostname on every record
pub const HYPERVISOR_LABEL: &str = "hypervisor";

/// Label mapping, kept sorted so serialized output is stable
pub type LabelSet = BTreeMap<String, String>;

/// Merge labels for one record.
///
/// Precedence, lowest to highest: hypervisor identity, group labels, rule
/// labels. Later layers overwrite colliding keys and never remove any.
pub fn merge_labels(hypervisor: &str, group: &LabelSet, rule: &LabelSet) -> LabelSet {
    let mut merged = LabelSet::new();
    merged.insert(HYPERVISOR_LABEL.to_string(), hypervisor.to_string());

    for (key, value) in group.iter().chain(rule.iter()) {
        merged.insert(key.clone(), value.clone());
    }

    merged
}
