//! Service descriptor set per profile.
//!
//! The stack is fixed: the resolved address (and, for the full profile, a
//! random secret) are the only variable inputs. Building a plan has no side
//! effects; rendering and writing happen in the materializer.

use crate::config::StackConfig;
use crate::stack::proxy::ProxyRoute;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const NETWORK_NAME: &str = "stacknet";

/// Which service set to materialize. `core` mirrors the minimal stack,
/// `full` adds the project-management suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StackProfile {
    #[default]
    Core,
    Full,
}

/// One service in the orchestration descriptor.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub image: String,
    pub environment: Vec<(String, String)>,
    pub volumes: Vec<String>,
    pub ports: Vec<String>,
    pub depends_on: Vec<String>,
}

/// Everything needed to render both generated files.
#[derive(Debug, Clone)]
pub struct StackPlan {
    pub address: String,
    pub http_port: u16,
    pub network: String,
    pub services: Vec<ServiceSpec>,
    pub volumes: Vec<String>,
    pub routes: Vec<ProxyRoute>,
}

impl StackPlan {
    /// Build the descriptor set for the configured profile, substituting the
    /// resolved address into root URLs and trusted domains. `secret` is only
    /// consumed by the full profile.
    pub fn build(config: &StackConfig, address: &str, secret: &str) -> Self {
        let images = &config.images;
        let mut services = Vec::new();
        let mut volumes = Vec::new();
        let mut routes = Vec::new();

        services.push(ServiceSpec {
            name: "gitea".to_string(),
            image: image_or(&images.gitea, "gitea/gitea:1.22"),
            environment: vec![
                ("USER_UID".to_string(), "1000".to_string()),
                ("USER_GID".to_string(), "1000".to_string()),
                ("GITEA__server__DOMAIN".to_string(), address.to_string()),
                (
                    "GITEA__server__ROOT_URL".to_string(),
                    format!("http://{}/gitea", address),
                ),
            ],
            volumes: vec!["gitea-data:/data".to_string()],
            ports: Vec::new(),
            depends_on: Vec::new(),
        });
        volumes.push("gitea-data".to_string());
        routes.push(ProxyRoute::new("/gitea/", "gitea", 3000));

        services.push(ServiceSpec {
            name: "kanboard".to_string(),
            image: image_or(&images.kanboard, "kanboard/kanboard:latest"),
            environment: vec![(
                "KANBOARD_URL".to_string(),
                format!("http://{}/kanboard", address),
            )],
            volumes: vec![
                "kanboard-data:/var/www/app/data".to_string(),
                "kanboard-plugins:/var/www/app/plugins".to_string(),
            ],
            ports: Vec::new(),
            depends_on: Vec::new(),
        });
        volumes.push("kanboard-data".to_string());
        volumes.push("kanboard-plugins".to_string());
        routes.push(ProxyRoute::new("/kanboard/", "kanboard", 80));

        services.push(ServiceSpec {
            name: "syncthing".to_string(),
            image: image_or(&images.syncthing, "syncthing/syncthing:latest"),
            environment: Vec::new(),
            volumes: vec!["syncthing-data:/var/syncthing".to_string()],
            ports: Vec::new(),
            depends_on: Vec::new(),
        });
        volumes.push("syncthing-data".to_string());
        routes.push(ProxyRoute::new("/syncthing/", "syncthing", 8384));

        if config.profile == StackProfile::Full {
            services.push(ServiceSpec {
                name: "openproject".to_string(),
                image: image_or(&images.openproject, "openproject/openproject:14"),
                environment: vec![
                    ("OPENPROJECT_HOST__NAME".to_string(), address.to_string()),
                    ("OPENPROJECT_HTTPS".to_string(), "false".to_string()),
                    (
                        "OPENPROJECT_RAILS__RELATIVE__URL__ROOT".to_string(),
                        "/openproject".to_string(),
                    ),
                    (
                        "OPENPROJECT_SECRET_KEY_BASE".to_string(),
                        secret.to_string(),
                    ),
                ],
                volumes: vec![
                    "openproject-pgdata:/var/openproject/pgdata".to_string(),
                    "openproject-assets:/var/openproject/assets".to_string(),
                ],
                ports: Vec::new(),
                depends_on: Vec::new(),
            });
            volumes.push("openproject-pgdata".to_string());
            volumes.push("openproject-assets".to_string());
            routes.push(ProxyRoute::new("/openproject/", "openproject", 80));
        }

        // The proxy starts after every upstream it routes to.
        let upstreams: Vec<String> = services.iter().map(|s| s.name.clone()).collect();
        services.push(ServiceSpec {
            name: "nginx".to_string(),
            image: image_or(&images.nginx, "nginx:1.27-alpine"),
            environment: Vec::new(),
            volumes: vec!["./nginx.conf:/etc/nginx/nginx.conf:ro".to_string()],
            ports: vec![format!("{}:80", config.http_port)],
            depends_on: upstreams,
        });

        Self {
            address: address.to_string(),
            http_port: config.http_port,
            network: NETWORK_NAME.to_string(),
            services,
            volumes,
            routes,
        }
    }

    pub fn service_names(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name.clone()).collect()
    }
}

fn image_or(override_image: &Option<String>, default: &str) -> String {
    override_image
        .clone()
        .unwrap_or_else(|| default.to_string())
}
