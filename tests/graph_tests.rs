//! Graph functionality tests
//!
//! Tests for building the reference graph and querying it in both directions

use kuberef::graph::ReferenceGraph;
use kuberef::models::{RefType, ReferenceEdge, Resource};
use kuberef::{default_registry, resolve};
use serde_json::json;

fn service_account(id: &str, name: &str, namespace: &str) -> Resource {
    Resource::new(
        id,
        "sa.yaml",
        json!({"apiVersion": "v1", "kind": "ServiceAccount", "metadata": {"name": name, "namespace": namespace}}),
    )
}

fn binding(id: &str, subject: &str) -> Resource {
    Resource::new(
        id,
        "rbac.yaml",
        json!({
            "apiVersion": "rbac.authorization.k8s.io/v1",
            "kind": "RoleBinding",
            "metadata": {"name": id, "namespace": "ns1"},
            "subjects": [{"kind": "ServiceAccount", "name": subject, "namespace": "ns1"}],
            "roleRef": {"apiGroup": "rbac.authorization.k8s.io", "kind": "Role", "name": "reader"}
        }),
    )
}

fn sample() -> Vec<Resource> {
    vec![
        binding("rb-a", "sa1"),
        binding("rb-b", "sa1"),
        binding("rb-c", "sa2"),
        service_account("sa1", "sa1", "ns1"),
        service_account("sa2", "sa2", "ns1"),
    ]
}

#[test]
fn test_graph_creation() {
    let graph = ReferenceGraph::build(Vec::new(), Vec::new());
    assert!(graph.resources().is_empty());
    assert!(graph.edges().is_empty());
}

#[test]
fn test_from_resources_equals_resolve_then_build() {
    let edges = resolve(default_registry().unwrap(), &sample());
    let graph = ReferenceGraph::from_resources(default_registry().unwrap(), sample());

    assert_eq!(graph.edges(), edges.as_slice());
    assert_eq!(graph.resources().len(), 5);
}

#[test]
fn test_incoming_and_outgoing_are_inverse_views() {
    let graph = ReferenceGraph::from_resources(default_registry().unwrap(), sample());

    let mut from_outgoing: Vec<&ReferenceEdge> = graph
        .resources()
        .iter()
        .flat_map(|r| graph.outgoing_edges(r.id()))
        .collect();
    let mut from_incoming: Vec<&ReferenceEdge> = graph
        .resources()
        .iter()
        .flat_map(|r| graph.incoming_edges(r.id()))
        .collect();

    let key = |e: &&ReferenceEdge| (e.source_id.clone(), e.target_id.clone(), e.path.clone());
    from_outgoing.sort_by_key(key);
    from_incoming.sort_by_key(key);
    assert_eq!(from_outgoing, from_incoming);
    assert_eq!(from_outgoing.len(), graph.edges().len());

    for edge in graph.edges() {
        assert!(graph.outgoing_edges(&edge.source_id).contains(&edge));
        assert!(graph.incoming_edges(&edge.target_id).contains(&edge));
    }
}

#[test]
fn test_resources_referencing_in_first_occurrence_order() {
    let graph = ReferenceGraph::from_resources(default_registry().unwrap(), sample());

    let referencing: Vec<&str> = graph
        .resources_referencing("sa1")
        .iter()
        .map(|r| r.id())
        .collect();
    assert_eq!(referencing, vec!["rb-a", "rb-b"]);

    let referenced: Vec<&str> = graph
        .resources_referenced_by("rb-c")
        .iter()
        .map(|r| r.id())
        .collect();
    assert_eq!(referenced, vec!["sa2"]);
}

#[test]
fn test_unknown_ids_have_no_edges() {
    let graph = ReferenceGraph::from_resources(default_registry().unwrap(), sample());
    assert!(graph.outgoing_edges("nope").is_empty());
    assert!(graph.incoming_edges("nope").is_empty());
    assert!(graph.resources_referencing("nope").is_empty());
}

#[test]
fn test_edges_to_missing_resources_are_dropped() {
    let edge = ReferenceEdge {
        source_id: "rb-a".to_string(),
        target_id: "gone".to_string(),
        ref_type: RefType::Name,
        path: "subjects[0].name".to_string(),
        rule_index: 1,
    };
    let graph = ReferenceGraph::build(sample(), vec![edge]);

    assert!(graph.edges().is_empty());
    assert!(graph.outgoing_edges("rb-a").is_empty());
}

#[test]
fn test_resource_lookup() {
    let graph = ReferenceGraph::from_resources(default_registry().unwrap(), sample());
    let sa = graph.resource("sa2").unwrap();
    assert_eq!(sa.display_name(), "ServiceAccount/ns1/sa2");
}

#[test]
fn test_kustomization_parent_found_through_incoming_edges() {
    let kustomization = Resource::new(
        "apps/kustomization.yaml#0",
        "apps/kustomization.yaml",
        json!({
            "apiVersion": "kustomize.config.k8s.io/v1beta1",
            "kind": "Kustomization",
            "resources": ["sa.yaml"]
        }),
    );
    let account = Resource::new(
        "apps/sa.yaml#0",
        "apps/sa.yaml",
        json!({"apiVersion": "v1", "kind": "ServiceAccount", "metadata": {"name": "sa1"}}),
    );

    let graph =
        ReferenceGraph::from_resources(default_registry().unwrap(), vec![kustomization, account]);

    let children: Vec<&str> = graph
        .resources_referenced_by("apps/kustomization.yaml#0")
        .iter()
        .map(|r| r.id())
        .collect();
    assert_eq!(children, vec!["apps/sa.yaml#0"]);

    let parents = graph.incoming_edges("apps/sa.yaml#0");
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].ref_type, RefType::File);
    assert_eq!(parents[0].source_id, "apps/kustomization.yaml#0");
    assert_eq!(graph.resources_referencing("apps/sa.yaml#0")[0].name(), "apps");
}
