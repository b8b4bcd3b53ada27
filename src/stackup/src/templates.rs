//! Embedded templates, compiled into the binary via include_str! so the
//! provisioner is self-contained on a bare host.

use crate::error::ProvisionError;
use tera::{Context, Tera};

pub static NGINX_CONF: &str = include_str!("templates/nginx.conf.j2");

/// All embedded templates as (name, content) pairs for registration.
pub const ALL_TEMPLATES: &[(&str, &str)] = &[("nginx.conf.j2", NGINX_CONF)];

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn from_embedded() -> Result<Self, ProvisionError> {
        let mut tera = Tera::default();
        for (name, content) in ALL_TEMPLATES {
            tera.add_raw_template(name, content).map_err(|e| {
                ProvisionError::Template(format!("failed to register template {}: {}", name, e))
            })?;
        }
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, ProvisionError> {
        self.tera.render(name, context).map_err(|e| {
            ProvisionError::Template(format!("failed to render {}: {}", name, e))
        })
    }
}
