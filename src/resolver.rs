//! # Dependency Resolver
//!
//! Orders [`TypeDef`]s for emission and marks the properties that must be
//! rendered as indirections to break a value cycle (spec §4.4).
//!
//! The approach: build a directed graph over schema names (an edge `A -> B`
//! means "A's Go struct embeds a B value directly"), find strongly
//! connected components with Tarjan's algorithm, condense the graph to a
//! DAG of components, and topologically sort the condensation with Kahn's
//! algorithm, breaking ties lexicographically by name so the emitted order
//! is a pure function of the schema text.

use crate::error::{GenError, GenResult};
use crate::oas::model::{Property, TypeDef, TypeShape};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap};

/// The outcome of resolution: the type defs in emission order, with
/// cycle-breaking pointer flags already applied to their properties.
pub struct Resolution {
    /// Type defs topologically ordered (dependencies before dependents),
    /// ties broken lexicographically by name.
    pub ordered: Vec<TypeDef>,
}

/// Orders `defs` and marks cycle-breaking indirections.
///
/// `defs` must already be sorted by name (spec §4.3's modeller guarantees
/// this); the input order only affects tie-breaking when two components
/// have no dependency relationship between them.
pub fn resolve(defs: Vec<TypeDef>) -> GenResult<Resolution> {
    let mut defs_by_name: BTreeMap<String, TypeDef> =
        defs.into_iter().map(|d| (d.name.clone(), d)).collect();

    let names: Vec<String> = defs_by_name.keys().cloned().collect();
    let mut index_of: HashMap<String, NodeIndex> = HashMap::new();
    let mut graph: DiGraph<String, ()> = DiGraph::new();

    for name in &names {
        let idx = graph.add_node(name.clone());
        index_of.insert(name.clone(), idx);
    }

    for name in &names {
        let def = defs_by_name.get(name).expect("name from defs_by_name");
        for dep in value_dependencies(def) {
            let Some(&dep_idx) = index_of.get(&dep) else {
                return Err(GenError::UnresolvedReference { name: dep });
            };
            let from = index_of[name];
            graph.add_edge(from, dep_idx, ());
        }
    }

    let sccs = tarjan_scc(&graph);

    // Mark pointer-breaking properties for every multi-member SCC (mutual
    // recursion) and for any self-loop (direct self-reference).
    for component in &sccs {
        let component_names: Vec<&String> = component.iter().map(|&idx| &graph[idx]).collect();
        if component.len() > 1 {
            for &idx in component {
                let name = graph[idx].clone();
                let def = defs_by_name.get_mut(&name).expect("name in defs_by_name");
                mark_pointers_for(def, &component_names);
            }
        } else {
            let idx = component[0];
            let name = graph[idx].clone();
            if graph.find_edge(idx, idx).is_some() {
                let def = defs_by_name.get_mut(&name).expect("name in defs_by_name");
                let self_name = vec![&name];
                mark_pointers_for(def, &self_name);
            }
        }
    }

    let ordered_names = toposort_condensation(&graph, &sccs);

    let ordered = ordered_names
        .into_iter()
        .map(|name| defs_by_name.remove(&name).expect("name from ordered_names"))
        .collect();

    Ok(Resolution { ordered })
}

/// Property names referencing `target` are forced to an indirection (direct
/// `$ref` properties via `use_pointer`, array-of-`$ref` items via
/// `array_item_use_pointer`) when `target` is one of `cycle_members`.
fn mark_pointers_for(def: &mut TypeDef, cycle_members: &[&String]) {
    let TypeShape::Object { properties } = &mut def.shape else {
        return;
    };
    for prop in properties.iter_mut() {
        mark_property(prop, cycle_members);
    }
}

fn mark_property(prop: &mut Property, cycle_members: &[&String]) {
    if prop.is_ref {
        if let Some(target) = &prop.ref_type {
            if cycle_members.iter().any(|m| *m == target) {
                prop.use_pointer = true;
            }
        }
    }
    if prop.is_array_of_ref {
        if let Some(target) = &prop.array_item_type {
            if cycle_members.iter().any(|m| *m == target) {
                prop.array_item_use_pointer = true;
            }
        }
    }
}

/// The set of schema names a type def depends on: every Reference
/// property's referent and every Array-of-Reference property's item
/// referent. Unions are leaf aggregates from the typing perspective — a
/// union's variant values are not embedded, so its variants are
/// deliberately excluded here (spec §4.4).
fn value_dependencies(def: &TypeDef) -> Vec<String> {
    let mut deps = Vec::new();
    match &def.shape {
        TypeShape::Object { properties } => {
            for prop in properties {
                if prop.is_ref {
                    if let Some(target) = &prop.ref_type {
                        deps.push(target.clone());
                    }
                }
                if prop.is_array_of_ref {
                    if let Some(target) = &prop.array_item_type {
                        deps.push(target.clone());
                    }
                }
            }
        }
        TypeShape::Union { .. } | TypeShape::Enum { .. } => {}
    }
    deps.sort();
    deps.dedup();
    deps
}

/// Kahn's algorithm over the SCC condensation, breaking ties
/// lexicographically by the smallest member name in each ready component.
fn toposort_condensation(graph: &DiGraph<String, ()>, sccs: &[Vec<NodeIndex>]) -> Vec<String> {
    let component_of: HashMap<NodeIndex, usize> = sccs
        .iter()
        .enumerate()
        .flat_map(|(i, members)| members.iter().map(move |&idx| (idx, i)))
        .collect();

    let mut condensed_edges: Vec<(usize, usize)> = Vec::new();
    for edge in graph.edge_indices() {
        let (from, to) = graph.edge_endpoints(edge).expect("valid edge index");
        let (cfrom, cto) = (component_of[&from], component_of[&to]);
        if cfrom != cto {
            condensed_edges.push((cfrom, cto));
        }
    }
    condensed_edges.sort();
    condensed_edges.dedup();

    // in_degree[c] = number of distinct components c depends on (edges
    // point dependent -> dependency, so emission order wants dependencies
    // first: a component is "ready" once everything IT depends on has
    // already been emitted).
    let mut remaining_deps: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..sccs.len() {
        remaining_deps.entry(i).or_default();
        dependents.entry(i).or_default();
    }
    for &(from, to) in &condensed_edges {
        remaining_deps.entry(from).or_default().push(to);
        dependents.entry(to).or_default().push(from);
    }

    let min_name = |component: &[NodeIndex]| -> String {
        component
            .iter()
            .map(|&idx| graph[idx].clone())
            .min()
            .expect("non-empty component")
    };

    let mut ready: Vec<usize> = (0..sccs.len())
        .filter(|i| remaining_deps[i].is_empty())
        .collect();
    ready.sort_by_key(|&i| min_name(&sccs[i]));

    let mut emitted = vec![false; sccs.len()];
    let mut order = Vec::new();

    while !ready.is_empty() {
        let current = ready.remove(0);
        if emitted[current] {
            continue;
        }
        emitted[current] = true;

        let mut names: Vec<&String> = sccs[current].iter().map(|&idx| &graph[idx]).collect();
        names.sort();
        order.extend(names.into_iter().cloned());

        for &dependent in dependents.get(&current).cloned().unwrap_or_default().iter() {
            if let Some(deps) = remaining_deps.get_mut(&dependent) {
                deps.retain(|&d| d != current);
                if deps.is_empty() && !emitted[dependent] {
                    ready.push(dependent);
                }
            }
        }
        ready.sort_by_key(|&i| min_name(&sccs[i]));
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::load_document;
    use crate::oas::model::model_components;

    fn resolve_yaml(schemas_yaml: &str) -> Resolution {
        let yaml = format!(
            "openapi: 3.1.0\ninfo:\n  title: t\n  version: '1'\npaths: {{}}\ncomponents:\n  schemas:\n{schemas_yaml}"
        );
        let doc = load_document(&yaml).unwrap();
        let defs = model_components(&doc.components, &doc.raw).unwrap();
        resolve(defs).unwrap()
    }

    #[test]
    fn dependencies_are_emitted_before_dependents() {
        let res = resolve_yaml(
            "    Leaf:\n      type: object\n      properties:\n        v: { type: string }\n    Spec:\n      type: object\n      properties:\n        leaf: { $ref: '#/components/schemas/Leaf' }\n",
        );
        let positions: Vec<&str> = res.ordered.iter().map(|d| d.name.as_str()).collect();
        let leaf_pos = positions.iter().position(|&n| n == "Leaf").unwrap();
        let spec_pos = positions.iter().position(|&n| n == "Spec").unwrap();
        assert!(leaf_pos < spec_pos);
    }

    #[test]
    fn self_referential_property_is_pointer_marked() {
        let res = resolve_yaml(
            "    Spec:\n      type: object\n      properties:\n        parent: { $ref: '#/components/schemas/Spec' }\n",
        );
        let spec = res.ordered.iter().find(|d| d.name == "Spec").unwrap();
        let parent = spec.properties().iter().find(|p| p.name == "parent").unwrap();
        assert!(parent.use_pointer);
    }

    #[test]
    fn array_of_self_marks_the_array_item_not_the_property() {
        let res = resolve_yaml(
            "    Spec:\n      type: object\n      properties:\n        children:\n          type: array\n          items: { $ref: '#/components/schemas/Spec' }\n",
        );
        let spec = res.ordered.iter().find(|d| d.name == "Spec").unwrap();
        let children = spec.properties().iter().find(|p| p.name == "children").unwrap();
        assert!(children.array_item_use_pointer);
        assert_eq!(children.rendered_type(), "[]*Spec");
    }

    #[test]
    fn mutual_recursion_marks_both_sides() {
        let res = resolve_yaml(
            "    A:\n      type: object\n      properties:\n        b: { $ref: '#/components/schemas/B' }\n    B:\n      type: object\n      properties:\n        a: { $ref: '#/components/schemas/A' }\n    Spec:\n      type: object\n      properties:\n        a: { $ref: '#/components/schemas/A' }\n",
        );
        let a = res.ordered.iter().find(|d| d.name == "A").unwrap();
        let b = res.ordered.iter().find(|d| d.name == "B").unwrap();
        assert!(a.properties().iter().find(|p| p.name == "b").unwrap().use_pointer);
        assert!(b.properties().iter().find(|p| p.name == "a").unwrap().use_pointer);
    }

    #[test]
    fn order_is_deterministic_across_runs() {
        let schemas = "    Alpha:\n      type: object\n      properties:\n        v: { type: string }\n    Beta:\n      type: object\n      properties:\n        v: { type: string }\n    Spec:\n      type: object\n      properties:\n        a: { $ref: '#/components/schemas/Alpha' }\n        b: { $ref: '#/components/schemas/Beta' }\n";
        let r1 = resolve_yaml(schemas);
        let r2 = resolve_yaml(schemas);
        let n1: Vec<&str> = r1.ordered.iter().map(|d| d.name.as_str()).collect();
        let n2: Vec<&str> = r2.ordered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(n1, n2);
        // Alpha/Beta have no dependency relation: ties break lexicographically.
        let alpha_pos = n1.iter().position(|&n| n == "Alpha").unwrap();
        let beta_pos = n1.iter().position(|&n| n == "Beta").unwrap();
        assert!(alpha_pos < beta_pos);
    }

    #[test]
    fn dangling_dependency_is_reported() {
        // The modeller already rejects dangling $ref targets before a
        // TypeDef reaches the resolver; this exercises resolve()'s own
        // defensive check against a hand-built TypeDef referencing a name
        // absent from the input list.
        let bogus_prop = Property {
            name: "ghost".to_string(),
            ident_name: "Ghost".to_string(),
            go_type: "Ghost".to_string(),
            description: None,
            required: false,
            nullable: false,
            use_pointer: false,
            is_ref: true,
            ref_type: Some("Ghost".to_string()),
            is_array: false,
            array_item_type: None,
            is_array_of_ref: false,
            array_item_use_pointer: false,
            is_map: false,
            map_value_type: None,
            is_enum: false,
            enum_values: Vec::new(),
            default: None,
        };
        let bogus = TypeDef {
            name: "Spec".to_string(),
            description: None,
            shape: TypeShape::Object {
                properties: vec![bogus_prop],
            },
        };
        let err = resolve(vec![bogus]).unwrap_err();
        assert!(matches!(err, GenError::UnresolvedReference { .. }));
    }
}
