//! # Dependency Graph
//!
//! Static inspection of an asset graph: walks `dependencies()` from a set of
//! roots without loading or generating anything.
//!
//! Useful for showing what a pass would touch, and for rendering the graph
//! in Graphviz DOT format. Cycle and duplicate detection follow the same
//! rules as the resolver.

use crate::asset::Asset;
use crate::primitives::MAX_RESOLUTION_DEPTH;
use crate::{AssetId, TesseraError};
use std::collections::BTreeMap;
use std::fmt::Write;

/// A node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: AssetId,
    pub name: String,
    pub writable: bool,
}

/// The static dependency graph reachable from a set of roots.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Nodes in dependency-first order.
    nodes: Vec<GraphNode>,
    /// (dependent, dependency) pairs as node indices, in declaration order.
    edges: Vec<(usize, usize)>,
    index: BTreeMap<AssetId, usize>,
    roots: Vec<usize>,
}

impl DependencyGraph {
    /// Walk the graph reachable from `roots`.
    pub fn build(roots: Vec<Box<dyn Asset>>) -> Result<Self, TesseraError> {
        let mut graph = Self::default();
        let mut stack = Vec::new();
        for root in roots {
            let idx = graph.visit(root.as_ref(), &mut stack)?;
            if !graph.roots.contains(&idx) {
                graph.roots.push(idx);
            }
        }
        Ok(graph)
    }

    fn visit(
        &mut self,
        asset: &dyn Asset,
        stack: &mut Vec<(AssetId, String)>,
    ) -> Result<usize, TesseraError> {
        let id = AssetId::of_asset(asset);
        if let Some(&idx) = self.index.get(&id) {
            return Ok(idx);
        }

        if let Some(pos) = stack.iter().position(|(seen, _)| *seen == id) {
            let mut chain: Vec<String> = stack[pos..].iter().map(|(_, n)| n.clone()).collect();
            chain.push(asset.name().to_string());
            return Err(TesseraError::Cycle { chain });
        }

        if stack.len() >= MAX_RESOLUTION_DEPTH {
            return Err(TesseraError::DepthExceeded {
                asset: asset.name().to_string(),
                limit: MAX_RESOLUTION_DEPTH,
            });
        }

        stack.push((id, asset.name().to_string()));

        let mut children = Vec::new();
        for dependency in asset.dependencies() {
            let child = self.visit(dependency.as_ref(), stack)?;
            if children.contains(&child) {
                return Err(TesseraError::DuplicateDependency {
                    asset: asset.name().to_string(),
                    dependency: dependency.name().to_string(),
                });
            }
            children.push(child);
        }

        stack.pop();

        let idx = self.nodes.len();
        self.nodes.push(GraphNode {
            id,
            name: asset.name().to_string(),
            writable: asset.as_writable().is_some(),
        });
        self.index.insert(id, idx);
        self.edges.extend(children.into_iter().map(|child| (idx, child)));
        Ok(idx)
    }

    /// Nodes in dependency-first order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges as (dependent, dependency) node pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&GraphNode, &GraphNode)> {
        self.edges
            .iter()
            .filter_map(|&(from, to)| Some((self.nodes.get(from)?, self.nodes.get(to)?)))
    }

    /// Root nodes in request order.
    pub fn roots(&self) -> impl Iterator<Item = &GraphNode> {
        self.roots.iter().filter_map(|&idx| self.nodes.get(idx))
    }

    /// Direct dependencies of `id`, in declaration order.
    #[must_use]
    pub fn dependencies_of(&self, id: AssetId) -> Vec<&GraphNode> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter(|(from, _)| *from == idx)
            .filter_map(|&(_, to)| self.nodes.get(to))
            .collect()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Render in Graphviz DOT format.
    ///
    /// Edges point from an asset to the assets it depends on. Writable
    /// assets are drawn as notes.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph assets {\n    rankdir=LR;\n");
        for node in &self.nodes {
            let shape = if node.writable { "note" } else { "box" };
            let _ = writeln!(
                out,
                "    \"{}\" [shape={}];",
                escape_dot(&node.name),
                shape
            );
        }
        for (from, to) in self.edges() {
            let _ = writeln!(
                out,
                "    \"{}\" -> \"{}\";",
                escape_dot(&from.name),
                escape_dot(&to.name)
            );
        }
        out.push_str("}\n");
        out
    }
}

fn escape_dot(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::fetch::FileFetcher;
    use crate::parents::Parents;
    use crate::AssetError;

    macro_rules! node {
        ($ty:ident, $name:expr, [$($dep:ident),*]) => {
            #[derive(Default)]
            struct $ty;

            impl Asset for $ty {
                fn name(&self) -> &str {
                    $name
                }

                fn dependencies(&self) -> Vec<Box<dyn Asset>> {
                    vec![$(Box::new($dep::default())),*]
                }

                fn generate(&mut self, _parents: &Parents<'_>) -> Result<(), AssetError> {
                    Ok(())
                }

                fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
                    Ok(false)
                }
            }
        };
    }

    node!(Config, "Install \"Config\"", []);
    node!(Left, "Left", [Config]);
    node!(Right, "Right", [Config]);
    node!(Top, "Top", [Left, Right]);
    node!(Ping, "Ping", [Pong]);
    node!(Pong, "Pong", [Ping]);

    #[test]
    fn diamond_is_deduplicated() {
        let graph = DependencyGraph::build(vec![Box::new(Top)]).expect("build");
        let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();

        assert_eq!(names, vec!["Install \"Config\"", "Left", "Right", "Top"]);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.roots().count(), 1);
    }

    #[test]
    fn dependencies_in_declaration_order() {
        let graph = DependencyGraph::build(vec![Box::new(Top)]).expect("build");
        let deps: Vec<_> = graph
            .dependencies_of(AssetId::of::<Top>())
            .iter()
            .map(|n| n.name.clone())
            .collect();
        assert_eq!(deps, vec!["Left", "Right"]);
    }

    #[test]
    fn cycle_detected_without_materializing() {
        let err = DependencyGraph::build(vec![Box::new(Ping)]).expect_err("cycle");
        match err {
            TesseraError::Cycle { chain } => assert_eq!(chain, vec!["Ping", "Pong", "Ping"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dot_output_escapes_names() {
        let graph = DependencyGraph::build(vec![Box::new(Left)]).expect("build");
        let dot = graph.to_dot();

        assert!(dot.starts_with("digraph assets {"));
        assert!(dot.contains("\"Left\" -> \"Install \\\"Config\\\"\";"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
