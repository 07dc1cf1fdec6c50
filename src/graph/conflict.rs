//! Deduplicates same-direction candidates by merging, then resolves
//! opposing A->B vs B->A pairs by kind priority. The kind priority table
//! itself lives only on [`DependencyKind::priority`]; this module never
//! keeps its own copy.

use std::collections::BTreeMap;

use crate::model::Dependency;

/// Runs conflict resolution Step A (merge same-direction duplicates)
/// followed by Step B (resolve opposing directions), returning the
/// conflict-free set sorted priority-ascending, confidence-descending.
pub fn resolve(candidates: Vec<Dependency>) -> Vec<Dependency> {
    let merged = merge_same_direction(candidates);
    let mut resolved = resolve_opposing(merged);
    resolved.sort_by(|a, b| {
        a.kind
            .priority()
            .cmp(&b.kind.priority())
            .then(b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
    });
    resolved
}

fn merge_same_direction(candidates: Vec<Dependency>) -> Vec<Dependency> {
    let mut groups: BTreeMap<(String, String), Vec<Dependency>> = BTreeMap::new();
    for dep in candidates {
        groups
            .entry((dep.source.clone(), dep.target.clone()))
            .or_default()
            .push(dep);
    }

    groups.into_values().map(merge_group).collect()
}

fn merge_group(mut group: Vec<Dependency>) -> Dependency {
    if group.len() == 1 {
        return group.pop().unwrap();
    }

    // Base: minimum kind priority, ties broken by maximum confidence.
    let base_index = (0..group.len())
        .min_by(|&a, &b| {
            group[a]
                .kind
                .priority()
                .cmp(&group[b].kind.priority())
                .then(
                    group[b]
                        .confidence
                        .partial_cmp(&group[a].confidence)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        })
        .expect("group is non-empty");

    let max_confidence = group
        .iter()
        .map(|d| d.confidence)
        .fold(0.0_f64, f64::max);

    // Union parameter mappings, lower-priority members applied last so
    // they win key collisions.
    let mut by_priority: Vec<usize> = (0..group.len()).collect();
    by_priority.sort_by_key(|&i| std::cmp::Reverse(group[i].kind.priority()));
    let mut mapping = indexmap::IndexMap::new();
    for &i in &by_priority {
        for (k, v) in &group[i].parameter_mapping {
            mapping.insert(k.clone(), v.clone());
        }
    }

    let mut reasons: Vec<String> = group.iter().filter_map(|d| d.reason.clone()).collect();
    reasons.sort();
    reasons.dedup();

    let mut base = group.swap_remove(base_index);
    base.confidence = max_confidence;
    base.parameter_mapping = mapping;
    base.reason = (!reasons.is_empty()).then(|| reasons.join("; "));
    base
}

fn resolve_opposing(deps: Vec<Dependency>) -> Vec<Dependency> {
    let mut by_pair: BTreeMap<(String, String), Dependency> = deps
        .into_iter()
        .map(|d| ((d.source.clone(), d.target.clone()), d))
        .collect();

    let pairs: Vec<(String, String)> = by_pair.keys().cloned().collect();
    let mut dropped: Vec<(String, String)> = Vec::new();
    for (source, target) in &pairs {
        if dropped.contains(&(source.clone(), target.clone())) {
            continue;
        }
        let reverse = (target.clone(), source.clone());
        let Some(reverse_dep) = by_pair.get(&reverse) else {
            continue;
        };
        let forward_dep = &by_pair[&(source.clone(), target.clone())];

        let keep_forward = match forward_dep.kind.priority().cmp(&reverse_dep.kind.priority()) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => match forward_dep
                .confidence
                .partial_cmp(&reverse_dep.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
            {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => source < target,
            },
        };

        if keep_forward {
            dropped.push(reverse);
        } else {
            dropped.push((source.clone(), target.clone()));
        }
    }

    for key in dropped {
        by_pair.remove(&key);
    }
    by_pair.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyKind;

    #[test]
    fn crud_beats_parameter_data_in_opposite_direction() {
        let crud = Dependency::new("u", "v", DependencyKind::Crud, 0.9);
        let param = Dependency::new("v", "u", DependencyKind::ParameterData, 1.0);
        let resolved = resolve(vec![crud, param]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].source, "u");
        assert_eq!(resolved[0].target, "v");
        assert_eq!(resolved[0].kind, DependencyKind::Crud);
    }

    #[test]
    fn same_direction_duplicates_merge_to_max_confidence() {
        let a = Dependency::new("u", "v", DependencyKind::ParameterData, 0.6);
        let b = Dependency::new("u", "v", DependencyKind::ParameterData, 0.9);
        let resolved = resolve(vec![a, b]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].confidence, 0.9);
    }
}
