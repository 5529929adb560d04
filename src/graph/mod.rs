//! Reference graph
//!
//! An immutable, queryable view of a resource set and the reference edges
//! between its members. The graph is rebuilt whenever the inputs change.

use crate::handlers::HandlerRegistry;
use crate::models::{ReferenceEdge, Resource};
use crate::resolver;
use std::collections::HashMap;

/// Resources plus the edges between them, indexed both ways
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    resources: Vec<Resource>,
    edges: Vec<ReferenceEdge>,
    /// Resource id to index in `resources`
    resource_index: HashMap<String, usize>,
    /// Resource id to indices in `edges`
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
}

impl ReferenceGraph {
    /// Build a graph, dropping edges whose endpoints are not in `resources`
    ///
    /// When two resources share an id, the first one wins.
    pub fn build(resources: Vec<Resource>, edges: Vec<ReferenceEdge>) -> Self {
        let mut graph = Self::default();

        for resource in resources {
            if graph.resource_index.contains_key(resource.id()) {
                tracing::warn!("Ignoring duplicate resource id '{}'", resource.id());
                continue;
            }
            graph
                .resource_index
                .insert(resource.id().to_string(), graph.resources.len());
            graph.resources.push(resource);
        }

        for edge in edges {
            if !graph.resource_index.contains_key(&edge.source_id)
                || !graph.resource_index.contains_key(&edge.target_id)
            {
                tracing::warn!(
                    "Dropping edge {} -> {} at '{}': endpoint not in graph",
                    edge.source_id,
                    edge.target_id,
                    edge.path
                );
                continue;
            }

            let index = graph.edges.len();
            graph
                .outgoing
                .entry(edge.source_id.clone())
                .or_default()
                .push(index);
            graph
                .incoming
                .entry(edge.target_id.clone())
                .or_default()
                .push(index);
            graph.edges.push(edge);
        }

        tracing::debug!(
            "Built reference graph with {} resources and {} edges",
            graph.resources.len(),
            graph.edges.len()
        );
        graph
    }

    /// Resolve `resources` against `registry` and build the graph
    pub fn from_resources(registry: &HandlerRegistry, resources: Vec<Resource>) -> Self {
        let edges = resolver::resolve(registry, &resources);
        Self::build(resources, edges)
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resource_index.get(id).map(|&i| &self.resources[i])
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn edges(&self) -> &[ReferenceEdge] {
        &self.edges
    }

    /// Edges leaving `id`, in insertion order
    pub fn outgoing_edges(&self, id: &str) -> Vec<&ReferenceEdge> {
        self.collect_edges(self.outgoing.get(id))
    }

    /// Edges arriving at `id`, in insertion order
    pub fn incoming_edges(&self, id: &str) -> Vec<&ReferenceEdge> {
        self.collect_edges(self.incoming.get(id))
    }

    /// Resources with at least one edge pointing at `target_id`
    pub fn resources_referencing(&self, target_id: &str) -> Vec<&Resource> {
        self.unique_resources(
            self.incoming_edges(target_id)
                .into_iter()
                .map(|e| e.source_id.as_str()),
        )
    }

    /// Resources that `source_id` points at
    pub fn resources_referenced_by(&self, source_id: &str) -> Vec<&Resource> {
        self.unique_resources(
            self.outgoing_edges(source_id)
                .into_iter()
                .map(|e| e.target_id.as_str()),
        )
    }

    fn collect_edges(&self, indices: Option<&Vec<usize>>) -> Vec<&ReferenceEdge> {
        indices
            .map(|indices| indices.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// First-occurrence order, no repeats
    fn unique_resources<'a>(&'a self, ids: impl Iterator<Item = &'a str>) -> Vec<&'a Resource> {
        let mut seen = Vec::new();
        let mut result = Vec::new();
        for id in ids {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(resource) = self.resource(id) {
                result.push(resource);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RefType;
    use serde_json::json;

    fn resource(id: &str, kind: &str) -> Resource {
        Resource::new(
            id,
            "test.yaml",
            json!({"apiVersion": "v1", "kind": kind, "metadata": {"name": id}}),
        )
    }

    fn edge(source: &str, target: &str, path: &str) -> ReferenceEdge {
        ReferenceEdge {
            source_id: source.to_string(),
            target_id: target.to_string(),
            ref_type: RefType::Name,
            path: path.to_string(),
            rule_index: 0,
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = ReferenceGraph::default();
        assert!(graph.resources().is_empty());
        assert!(graph.outgoing_edges("anything").is_empty());
        assert!(graph.resource("anything").is_none());
    }

    #[test]
    fn test_dangling_edges_dropped() {
        let graph = ReferenceGraph::build(
            vec![resource("a", "Pod"), resource("b", "Secret")],
            vec![edge("a", "b", "x"), edge("a", "missing", "y"), edge("ghost", "b", "z")],
        );
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.incoming_edges("b").len(), 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let graph = ReferenceGraph::build(
            vec![resource("a", "Pod"), resource("a", "Secret")],
            Vec::new(),
        );
        assert_eq!(graph.resources().len(), 1);
        assert_eq!(graph.resource("a").map(|r| r.kind()), Some("Pod"));
    }

    #[test]
    fn test_referenced_by_deduplicates() {
        let graph = ReferenceGraph::build(
            vec![resource("pod", "Pod"), resource("cm", "ConfigMap"), resource("s", "Secret")],
            vec![
                edge("pod", "cm", "spec.volumes[0].configMap.name"),
                edge("pod", "s", "spec.volumes[1].secret.secretName"),
                edge("pod", "cm", "spec.containers[0].envFrom[0].configMapRef.name"),
            ],
        );

        let ids: Vec<&str> = graph
            .resources_referenced_by("pod")
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(ids, vec!["cm", "s"]);
        assert_eq!(graph.outgoing_edges("pod").len(), 3);
        assert_eq!(graph.resources_referencing("cm").len(), 1);
    }
}
