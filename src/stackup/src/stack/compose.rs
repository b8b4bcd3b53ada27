//! Typed orchestration descriptor, serialized with serde_yaml.
//!
//! All maps are BTreeMaps so re-rendering the same plan yields identical
//! bytes.

use crate::error::ProvisionError;
use crate::stack::profile::StackPlan;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct ComposeFile {
    pub services: BTreeMap<String, ComposeService>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, ComposeVolume>,
    pub networks: BTreeMap<String, ComposeNetwork>,
}

#[derive(Debug, Serialize)]
pub struct ComposeService {
    pub image: String,
    pub restart: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    pub networks: Vec<String>,
}

/// Named volume with default driver settings; serializes as `{}`.
#[derive(Debug, Serialize)]
pub struct ComposeVolume {}

#[derive(Debug, Serialize)]
pub struct ComposeNetwork {
    pub driver: String,
}

pub fn render_compose(plan: &StackPlan) -> Result<String, ProvisionError> {
    let mut services = BTreeMap::new();
    for spec in &plan.services {
        let mut depends_on = spec.depends_on.clone();
        depends_on.sort();
        services.insert(
            spec.name.clone(),
            ComposeService {
                image: spec.image.clone(),
                restart: "unless-stopped".to_string(),
                environment: spec.environment.iter().cloned().collect(),
                volumes: spec.volumes.clone(),
                ports: spec.ports.clone(),
                depends_on,
                networks: vec![plan.network.clone()],
            },
        );
    }

    let volumes = plan
        .volumes
        .iter()
        .map(|name| (name.clone(), ComposeVolume {}))
        .collect();

    let mut networks = BTreeMap::new();
    networks.insert(
        plan.network.clone(),
        ComposeNetwork {
            driver: "bridge".to_string(),
        },
    );

    let file = ComposeFile {
        services,
        volumes,
        networks,
    };
    Ok(serde_yaml::to_string(&file)?)
}
