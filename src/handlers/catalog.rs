//! Built-in kind handler catalog
//!
//! To add a new kind, write a function returning its [`KindHandler`] and add
//! it to [`builtin_handlers`].

use super::matchers::{
    SameNamespace, SubjectGroup, SubjectKind, SubjectNamespace, TargetGroup, TargetKind,
};
use super::{ApiVersionMatcher, KindHandler, KindPattern, PathPart, RefMapper};
use crate::models::{KUSTOMIZATION_KIND, RefType};

const RBAC_HELP: &str =
    "https://kubernetes.io/docs/reference/access-authn-authz/rbac/#rolebinding-and-clusterrolebinding";

/// All built-in handlers, in registration order
pub fn builtin_handlers() -> Vec<KindHandler> {
    vec![
        role_binding("RoleBinding"),
        role_binding("ClusterRoleBinding"),
        pod(),
        workload("Deployment"),
        workload("StatefulSet"),
        workload("DaemonSet"),
        owned("ReplicaSet"),
        owned("Job"),
        service(),
        kustomization(),
    ]
}

/// RBAC bindings: `roleRef` plus every entry of `subjects`
fn role_binding(kind: &str) -> KindHandler {
    KindHandler::new(kind, ApiVersionMatcher::Any)
        .with_help_link(RBAC_HELP)
        .with_rule(
            RefMapper::new(&["roleRef", "name"], KindPattern::Any, RefType::Name)
                .with_sibling("kind", TargetKind)
                .with_sibling("apiGroup", TargetGroup),
        )
        .with_rule(
            RefMapper::new(
                &["subjects", "*", "name"],
                KindPattern::one_of(&["User", "Group", "ServiceAccount"]),
                RefType::Name,
            )
            .with_sibling("kind", SubjectKind)
            .with_sibling("apiGroup", SubjectGroup)
            .with_sibling("namespace", SubjectNamespace),
        )
}

fn pod() -> KindHandler {
    let handler = KindHandler::new("Pod", ApiVersionMatcher::exact("v1"))
        .with_rule(owner_rule())
        .with_help_link("https://kubernetes.io/docs/concepts/workloads/pods/");
    pod_spec_rules(&["spec"])
        .into_iter()
        .fold(handler, KindHandler::with_rule)
}

/// Workloads reference the same objects as a Pod, from their pod template
fn workload(kind: &str) -> KindHandler {
    pod_spec_rules(&["spec", "template", "spec"])
        .into_iter()
        .fold(KindHandler::new(kind, ApiVersionMatcher::Any), KindHandler::with_rule)
}

/// Kinds whose only outgoing reference is their owner
fn owned(kind: &str) -> KindHandler {
    KindHandler::new(kind, ApiVersionMatcher::Any).with_rule(owner_rule())
}

fn service() -> KindHandler {
    KindHandler::new("Service", ApiVersionMatcher::exact("v1"))
        .with_rule(
            RefMapper::new(
                &["spec", "selector"],
                KindPattern::exact("Pod"),
                RefType::Selector,
            )
            .with_sibling("namespace", SameNamespace),
        )
        .with_help_link("https://kubernetes.io/docs/concepts/services-networking/service/")
}

/// Every `resources`, `bases` and `components` entry names a file or a
/// folder relative to the kustomization
fn kustomization() -> KindHandler {
    KindHandler::new(
        KUSTOMIZATION_KIND,
        ApiVersionMatcher::group("kustomize.config.k8s.io"),
    )
    .with_rule(RefMapper::new(
        &["$(resources|bases|components)", "*"],
        KindPattern::Any,
        RefType::File,
    ))
    .with_help_link("https://kubectl.docs.kubernetes.io/references/kustomize/kustomization/resource/")
}

fn owner_rule() -> RefMapper {
    RefMapper::new(
        &["metadata", "ownerReferences", "*", "uid"],
        KindPattern::Any,
        RefType::Owner,
    )
    .with_sibling("kind", TargetKind)
}

/// ConfigMap, Secret and ServiceAccount references of a pod spec rooted at `prefix`
fn pod_spec_rules(prefix: &[&str]) -> Vec<RefMapper> {
    const CONTAINERS: &str = "$(containers|initContainers)";

    let rules: [(&[&str], &str); 8] = [
        (&["volumes", "*", "configMap", "name"], "ConfigMap"),
        (&["volumes", "*", "secret", "secretName"], "Secret"),
        (&[CONTAINERS, "*", "envFrom", "*", "configMapRef", "name"], "ConfigMap"),
        (&[CONTAINERS, "*", "envFrom", "*", "secretRef", "name"], "Secret"),
        (
            &[CONTAINERS, "*", "env", "*", "valueFrom", "configMapKeyRef", "name"],
            "ConfigMap",
        ),
        (
            &[CONTAINERS, "*", "env", "*", "valueFrom", "secretKeyRef", "name"],
            "Secret",
        ),
        (&["imagePullSecrets", "*", "name"], "Secret"),
        (&["serviceAccountName"], "ServiceAccount"),
    ];

    rules
        .iter()
        .map(|(path, kind)| {
            let mut parts = PathPart::parse_all(prefix);
            parts.extend(PathPart::parse_all(*path));
            RefMapper::from_parts(parts, KindPattern::exact(*kind), RefType::Name)
                .with_sibling("namespace", SameNamespace)
        })
        .collect()
}
