//! Snapshot tests for the scan report
//!
//! Run `cargo insta review` to review and accept snapshot changes.

use insta::assert_snapshot;
use kuberef::graph::ReferenceGraph;
use kuberef::models::Resource;
use kuberef::report::render_text;
use kuberef::{default_registry, resolve_with_report};
use serde_json::json;

fn resources() -> Vec<Resource> {
    vec![
        Resource::new(
            "rbac.yaml#0",
            "rbac.yaml",
            json!({
                "apiVersion": "rbac.authorization.k8s.io/v1",
                "kind": "RoleBinding",
                "metadata": {"name": "read-pods", "namespace": "ns1"},
                "subjects": [
                    {"kind": "ServiceAccount", "name": "sa1", "namespace": "ns1"},
                    {"kind": "ServiceAccount", "name": "ghost", "namespace": "ns1"}
                ],
                "roleRef": {"apiGroup": "rbac.authorization.k8s.io", "kind": "Role", "name": "pod-reader"}
            }),
        ),
        Resource::new(
            "rbac.yaml#1",
            "rbac.yaml",
            json!({
                "apiVersion": "rbac.authorization.k8s.io/v1",
                "kind": "Role",
                "metadata": {"name": "pod-reader", "namespace": "ns1"}
            }),
        ),
        Resource::new(
            "sa.yaml#0",
            "sa.yaml",
            json!({
                "apiVersion": "v1",
                "kind": "ServiceAccount",
                "metadata": {"name": "sa1", "namespace": "ns1"}
            }),
        ),
    ]
}

#[test]
fn test_text_report_snapshot() {
    let resources = resources();
    let resolution = resolve_with_report(default_registry().unwrap(), &resources);
    let graph = ReferenceGraph::build(resources, resolution.edges);

    assert_snapshot!(render_text(&graph, Some(resolution.unresolved.as_slice())), @r#"
    3 resources, 2 references

    RoleBinding/ns1/read-pods (rbac.yaml#0)
      -> Role/ns1/pod-reader [name] roleRef.name
      -> ServiceAccount/ns1/sa1 [name] subjects[0].name

    Role/ns1/pod-reader (rbac.yaml#1)
      <- RoleBinding/ns1/read-pods [referenced by] roleRef.name

    ServiceAccount/ns1/sa1 (sa.yaml#0)
      <- RoleBinding/ns1/read-pods [referenced by] subjects[0].name

    Unresolved references (1):
      RoleBinding/ns1/read-pods subjects[1].name = "ghost" (expected $(User|Group|ServiceAccount))
    "#);
}

#[test]
fn test_text_report_without_unresolved_section() {
    let resources = resources();
    let resolution = resolve_with_report(default_registry().unwrap(), &resources);
    let graph = ReferenceGraph::build(resources, resolution.edges);

    let text = render_text(&graph, None);
    assert!(!text.contains("Unresolved"));
    assert!(text.ends_with("[referenced by] subjects[0].name\n"));
}
