//! Kext dependency graph and load ordering.
//!
//! Nodes are bundle directory names; an edge `dep -> dependent` exists when
//! `dependent` lists, in `OSBundleLibraries`, the bundle identifier of `dep`.
//! OpenCore loads `Kernel.Add` top to bottom, so every dependency must come
//! before the kexts that link against it.
//!
//! Notes:
//! - Roots are visited in lexicographic order of directory name and
//!   dependencies in declared order, so the result is stable for a given tree.
//! - Library identifiers no discovered bundle provides (`com.apple.kpi.*`)
//!   are ignored.
//! - When several bundles share an identifier, the lexicographically first
//!   directory provides it.
//! - Cycles do not abort ordering. The closing edge is skipped, the node is
//!   still emitted, and the members are reported in [`KextOrder`].

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::descriptor::KextDescriptor;

/// Result of ordering a set of kexts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KextOrder {
    /// Every node exactly once, dependencies first.
    pub order: Vec<String>,
    pub has_cycle: bool,
    /// Sorted directory names of every node seen on a cycle.
    pub cycle_members: Vec<String>,
}

/// Deterministic dependency graph over discovered kexts.
#[derive(Debug, Clone, Default)]
pub struct KextGraph {
    /// dir name -> dependency dir names, in declared order.
    deps: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl KextGraph {
    /// Build the graph from descriptors keyed by bundle directory name.
    pub fn build(kexts: &BTreeMap<String, KextDescriptor>) -> Self {
        let mut providers: BTreeMap<&str, &str> = BTreeMap::new();
        for (dir, desc) in kexts {
            if !desc.bundle_id.is_empty() {
                providers.entry(desc.bundle_id.as_str()).or_insert(dir.as_str());
            }
        }

        let mut deps = BTreeMap::new();
        for (dir, desc) in kexts {
            let mut list: Vec<String> = Vec::new();
            for (lib, _) in &desc.libraries {
                if let Some(provider) = providers.get(lib.as_str()) {
                    if !list.iter().any(|d| d == provider) {
                        list.push(provider.to_string());
                    }
                }
            }
            deps.insert(dir.clone(), list);
        }

        Self { deps }
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Direct dependencies of `dir`, in declared order.
    pub fn dependencies(&self, dir: &str) -> &[String] {
        self.deps.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges as `(dependency, dependent)` pairs, sorted.
    pub fn edges(&self) -> BTreeSet<(String, String)> {
        let mut out = BTreeSet::new();
        for (dir, deps) in &self.deps {
            for dep in deps {
                out.insert((dep.clone(), dir.clone()));
            }
        }
        out
    }

    /// Depth-first topological order.
    pub fn order(&self) -> KextOrder {
        let mut marks: BTreeMap<&str, Mark> =
            self.deps.keys().map(|k| (k.as_str(), Mark::Unvisited)).collect();
        let mut stack: Vec<&str> = Vec::new();
        let mut out = KextOrder::default();
        let mut members = BTreeSet::new();

        for root in self.deps.keys() {
            if marks.get(root.as_str()) == Some(&Mark::Unvisited) {
                self.visit(root, &mut marks, &mut stack, &mut out.order, &mut members);
            }
        }

        out.has_cycle = !members.is_empty();
        out.cycle_members = members.into_iter().collect();
        out
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        marks: &mut BTreeMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
        order: &mut Vec<String>,
        members: &mut BTreeSet<String>,
    ) {
        marks.insert(node, Mark::InProgress);
        stack.push(node);

        for dep in self.dependencies(node) {
            match marks.get(dep.as_str()).copied() {
                Some(Mark::Unvisited) => self.visit(dep, marks, stack, order, members),
                Some(Mark::InProgress) => {
                    if let Some(pos) = stack.iter().position(|n| *n == dep.as_str()) {
                        members.extend(stack[pos..].iter().map(|n| n.to_string()));
                    }
                }
                Some(Mark::Done) | None => {}
            }
        }

        stack.pop();
        marks.insert(node, Mark::Done);
        order.push(node.to_string());
    }

    /// Whether `order` lists every node once with all dependencies first.
    pub fn is_topological(&self, order: &[String]) -> bool {
        if order.len() != self.deps.len() {
            return false;
        }
        let mut pos: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, name) in order.iter().enumerate() {
            if !self.deps.contains_key(name) || pos.insert(name.as_str(), i).is_some() {
                return false;
            }
        }
        self.edges()
            .iter()
            .all(|(dep, dependent)| pos[dep.as_str()] < pos[dependent.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(kexts: Vec<KextDescriptor>) -> KextGraph {
        let map = kexts
            .into_iter()
            .map(|k| (k.dir_name.clone(), k))
            .collect::<BTreeMap<_, _>>();
        KextGraph::build(&map)
    }

    #[test]
    fn chain_orders_dependencies_first() {
        let g = graph(vec![
            KextDescriptor::new("c", "A.kext").with_library("b", "1"),
            KextDescriptor::new("b", "B.kext").with_library("a", "1"),
            KextDescriptor::new("a", "C.kext"),
        ]);
        let o = g.order();
        assert_eq!(o.order, vec!["C.kext", "B.kext", "A.kext"]);
        assert!(!o.has_cycle);
        assert!(g.is_topological(&o.order));
    }

    #[test]
    fn unknown_libraries_ignored() {
        let g = graph(vec![
            KextDescriptor::new("x", "X.kext").with_library("com.apple.kpi.bsd", "12"),
        ]);
        assert!(g.edges().is_empty());
        assert_eq!(g.order().order, vec!["X.kext"]);
    }

    #[test]
    fn cycle_is_reported_and_everything_emitted() {
        let g = graph(vec![
            KextDescriptor::new("a", "A.kext").with_library("b", "1"),
            KextDescriptor::new("b", "B.kext").with_library("a", "1"),
            KextDescriptor::new("z", "Z.kext"),
        ]);
        let o = g.order();
        assert!(o.has_cycle);
        assert_eq!(o.cycle_members, vec!["A.kext", "B.kext"]);
        assert_eq!(o.order, vec!["B.kext", "A.kext", "Z.kext"]);
        assert!(!g.is_topological(&o.order));
    }

    #[test]
    fn duplicate_identifier_first_dir_provides() {
        let g = graph(vec![
            KextDescriptor::new("lilu", "Lilu-b.kext"),
            KextDescriptor::new("lilu", "Lilu-a.kext"),
            KextDescriptor::new("plugin", "Plugin.kext").with_library("lilu", "1"),
        ]);
        assert_eq!(g.dependencies("Plugin.kext"), ["Lilu-a.kext".to_string()]);
    }

    #[test]
    fn is_topological_rejects_missing_nodes() {
        let g = graph(vec![KextDescriptor::new("a", "A.kext"), KextDescriptor::new("b", "B.kext")]);
        assert!(!g.is_topological(&["A.kext".to_string()]));
        assert!(!g.is_topological(&["A.kext".to_string(), "A.kext".to_string()]));
    }
}
