//! Reverse-proxy route table, rendered through the embedded nginx template.

use crate::error::ProvisionError;
use crate::stack::profile::StackPlan;
use crate::templates::TemplateRenderer;
use serde::Serialize;
use tera::Context;

/// External path prefix mapped to an internal upstream service and port.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyRoute {
    pub prefix: String,
    pub upstream: String,
    pub port: u16,
}

impl ProxyRoute {
    pub fn new(prefix: &str, upstream: &str, port: u16) -> Self {
        Self {
            prefix: prefix.to_string(),
            upstream: upstream.to_string(),
            port,
        }
    }
}

pub fn render_proxy(plan: &StackPlan) -> Result<String, ProvisionError> {
    let renderer = TemplateRenderer::from_embedded()?;
    let mut context = Context::new();
    context.insert("address", &plan.address);
    context.insert("routes", &plan.routes);
    renderer.render("nginx.conf.j2", &context)
}
