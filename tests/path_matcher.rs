//! Path matcher tests over realistic manifest trees

use kuberef::handlers::PathPart;
use kuberef::resolver::match_path;
use serde_json::{Value, json};

fn parts(path: &str) -> Vec<PathPart> {
    PathPart::parse_all(&path.split('.').collect::<Vec<_>>())
}

#[test]
fn test_wildcard_over_sequence_with_siblings() {
    let content = json!({"a": {"b": [{"c": "x"}, {"c": "y"}]}});
    let matches = match_path(&content, &parts("a.b.*.c"));

    let values: Vec<&Value> = matches.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![&json!("x"), &json!("y")]);

    let siblings: Vec<Value> = matches
        .iter()
        .map(|m| Value::Object(m.siblings.cloned().unwrap_or_default()))
        .collect();
    assert_eq!(siblings, vec![json!({"c": "x"}), json!({"c": "y"})]);

    assert_eq!(matches[0].location, "a.b[0].c");
    assert_eq!(matches[1].location, "a.b[1].c");
}

#[test]
fn test_missing_intermediate_key() {
    let content = json!({"spec": {"template": {}}});
    assert!(match_path(&content, &parts("spec.template.spec.volumes.*.name")).is_empty());
}

#[test]
fn test_role_binding_subjects() {
    let content = json!({
        "kind": "RoleBinding",
        "subjects": [
            {"kind": "ServiceAccount", "name": "sa1", "namespace": "ns1"},
            {"kind": "User", "name": "alice"}
        ]
    });
    let matches = match_path(&content, &parts("subjects.*.name"));

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].sibling("namespace"), Some(&json!("ns1")));
    assert_eq!(matches[1].sibling("kind"), Some(&json!("User")));
    assert_eq!(matches[1].sibling("namespace"), None);
}

#[test]
fn test_subjects_as_string_yields_nothing() {
    let content = json!({"subjects": "sa1"});
    assert!(match_path(&content, &parts("subjects.*.name")).is_empty());
}

#[test]
fn test_nested_wildcards() {
    let content = json!({
        "spec": {
            "containers": [
                {"envFrom": [{"configMapRef": {"name": "a"}}, {"secretRef": {"name": "s"}}]},
                {"envFrom": [{"configMapRef": {"name": "b"}}]}
            ]
        }
    });
    let matches = match_path(&content, &parts("spec.containers.*.envFrom.*.configMapRef.name"));

    let locations: Vec<&str> = matches.iter().map(|m| m.location.as_str()).collect();
    assert_eq!(
        locations,
        vec![
            "spec.containers[0].envFrom[0].configMapRef.name",
            "spec.containers[1].envFrom[0].configMapRef.name",
        ]
    );
}

#[test]
fn test_matching_a_mapping_value() {
    let content = json!({"spec": {"selector": {"app": "web"}, "type": "ClusterIP"}});
    let matches = match_path(&content, &parts("spec.selector"));

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].value, &json!({"app": "web"}));
    assert_eq!(matches[0].sibling("type"), Some(&json!("ClusterIP")));
}
