//! Text and JSON rendering of a resolved graph

use crate::graph::ReferenceGraph;
use crate::models::{ReferenceEdge, Resource, UnresolvedRef};
use serde::Serialize;

/// Output format of `kuberef scan`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Machine-readable scan result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport<'a> {
    pub resources: &'a [Resource],
    pub edges: &'a [ReferenceEdge],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<&'a [UnresolvedRef]>,
}

/// Render every resource with its outgoing and incoming references
///
/// `unresolved` is listed after the resources when given.
pub fn render_text(graph: &ReferenceGraph, unresolved: Option<&[UnresolvedRef]>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} resources, {} references\n",
        graph.resources().len(),
        graph.edges().len()
    ));

    for resource in graph.resources() {
        out.push('\n');
        out.push_str(&format!("{} ({})\n", resource.display_name(), resource.id()));

        for edge in graph.outgoing_edges(resource.id()) {
            out.push_str(&format!(
                "  -> {} [{}] {}\n",
                label(graph, &edge.target_id),
                edge.ref_type,
                edge.path
            ));
        }
        for edge in graph.incoming_edges(resource.id()) {
            out.push_str(&format!(
                "  <- {} [{}] {}\n",
                label(graph, &edge.source_id),
                edge.ref_type.inverse_label(),
                edge.path
            ));
        }
    }

    if let Some(unresolved) = unresolved.filter(|u| !u.is_empty()) {
        out.push('\n');
        out.push_str(&format!("Unresolved references ({}):\n", unresolved.len()));
        for item in unresolved {
            out.push_str(&format!(
                "  {} {} = {} (expected {})\n",
                label(graph, &item.source_id),
                item.path,
                item.value,
                item.target_kind
            ));
        }
    }

    out
}

/// Render the graph as pretty-printed JSON
pub fn render_json(
    graph: &ReferenceGraph,
    unresolved: Option<&[UnresolvedRef]>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ScanReport {
        resources: graph.resources(),
        edges: graph.edges(),
        unresolved,
    })
}

fn label(graph: &ReferenceGraph, id: &str) -> String {
    graph
        .resource(id)
        .map(Resource::display_name)
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RefType;
    use serde_json::json;

    fn graph() -> ReferenceGraph {
        let pod = Resource::new(
            "pod.yaml#0",
            "pod.yaml",
            json!({"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "web", "namespace": "apps"}}),
        );
        let secret = Resource::new(
            "secret.yaml#0",
            "secret.yaml",
            json!({"apiVersion": "v1", "kind": "Secret", "metadata": {"name": "creds", "namespace": "apps"}}),
        );
        let edge = ReferenceEdge {
            source_id: "pod.yaml#0".to_string(),
            target_id: "secret.yaml#0".to_string(),
            ref_type: RefType::Name,
            path: "spec.imagePullSecrets[0].name".to_string(),
            rule_index: 7,
        };
        ReferenceGraph::build(vec![pod, secret], vec![edge])
    }

    #[test]
    fn test_text_lists_both_directions() {
        let text = render_text(&graph(), None);
        assert!(text.starts_with("2 resources, 1 references\n"));
        assert!(text.contains("  -> Secret/apps/creds [name] spec.imagePullSecrets[0].name\n"));
        assert!(text.contains("  <- Pod/apps/web [referenced by] spec.imagePullSecrets[0].name\n"));
        assert!(!text.contains("Unresolved"));
    }

    #[test]
    fn test_text_lists_unresolved_after_resources() {
        let missing = UnresolvedRef {
            source_id: "pod.yaml#0".to_string(),
            ref_type: RefType::Name,
            path: "spec.serviceAccountName".to_string(),
            value: json!("runner"),
            rule_index: 8,
            target_kind: "ServiceAccount".to_string(),
        };
        let text = render_text(&graph(), Some(std::slice::from_ref(&missing)));
        assert!(text.ends_with(
            "\nUnresolved references (1):\n  Pod/apps/web spec.serviceAccountName = \"runner\" (expected ServiceAccount)\n"
        ));
    }

    #[test]
    fn test_json_omits_unresolved_when_disabled() {
        let json = render_json(&graph(), None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["edges"][0]["refType"], "name");
        assert_eq!(parsed["resources"][1]["kind"], "Secret");
        assert!(parsed.get("unresolved").is_none());
    }
}
