//! `kuberef handlers`

use anyhow::{Context, Result};
use kuberef::config::ConfigLoader;
use kuberef::handlers::HandlerRegistry;

use super::scan::build_registry;

/// Print every registered kind handler with its rules
pub fn handle_handlers_command(verbose: bool) -> Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;
    let registry = build_registry(&config)?;
    print!("{}", render_handlers(&registry, verbose));
    Ok(())
}

fn render_handlers(registry: &HandlerRegistry, verbose: bool) -> String {
    let mut out = format!("{:<24} {:<12} RULES\n", "KIND", "APIVERSION");
    for handler in registry.handlers() {
        out.push_str(&format!(
            "{:<24} {:<12} {}\n",
            handler.kind,
            handler.api_version.to_string(),
            handler.outgoing_ref_mappers.len()
        ));
        if verbose {
            for rule in &handler.outgoing_ref_mappers {
                out.push_str(&format!(
                    "    {} -> {} [{}]\n",
                    rule.path_display(),
                    rule.target.kind,
                    rule.ref_type
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuberef::handlers::{ApiVersionMatcher, KindHandler, KindPattern, RefMapper};
    use kuberef::models::RefType;

    #[test]
    fn test_render_handlers_verbose() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(
                KindHandler::new("Ingress", ApiVersionMatcher::exact("networking.k8s.io/v1"))
                    .with_rule(RefMapper::new(
                        &["spec", "ingressClassName"],
                        KindPattern::exact("IngressClass"),
                        RefType::Name,
                    )),
            )
            .unwrap();

        let text = render_handlers(&registry, true);
        assert!(text.contains("Ingress"));
        assert!(text.contains("    spec.ingressClassName -> IngressClass [name]\n"));
    }
}
