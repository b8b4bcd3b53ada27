//! Tests for the generated orchestration descriptor.

use stackup::stack::profile::{StackPlan, StackProfile};
use stackup::stack::render_compose;
use stackup::StackConfig;

const ADDRESS: &str = "192.0.2.10";
const SECRET: &str = "0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f";

fn core_plan() -> StackPlan {
    StackPlan::build(&StackConfig::default(), ADDRESS, SECRET)
}

fn full_plan() -> StackPlan {
    let config = StackConfig {
        profile: StackProfile::Full,
        ..StackConfig::default()
    };
    StackPlan::build(&config, ADDRESS, SECRET)
}

fn parse(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).expect("generated descriptor must be valid YAML")
}

#[test]
fn gitea_root_url_carries_the_resolved_address() {
    let yaml = render_compose(&core_plan()).unwrap();
    let doc = parse(&yaml);
    let env = &doc["services"]["gitea"]["environment"];
    assert_eq!(
        env["GITEA__server__ROOT_URL"].as_str(),
        Some("http://192.0.2.10/gitea")
    );
    assert_eq!(env["GITEA__server__DOMAIN"].as_str(), Some(ADDRESS));
}

#[test]
fn core_profile_has_the_fixed_service_set() {
    let yaml = render_compose(&core_plan()).unwrap();
    let doc = parse(&yaml);
    let services = doc["services"].as_mapping().unwrap();
    let names: Vec<&str> = services
        .keys()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["gitea", "kanboard", "nginx", "syncthing"]);
}

#[test]
fn full_profile_adds_openproject_with_the_secret() {
    let yaml = render_compose(&full_plan()).unwrap();
    let doc = parse(&yaml);
    let env = &doc["services"]["openproject"]["environment"];
    assert_eq!(env["OPENPROJECT_SECRET_KEY_BASE"].as_str(), Some(SECRET));
    assert_eq!(env["OPENPROJECT_HOST__NAME"].as_str(), Some(ADDRESS));
}

#[test]
fn proxy_depends_on_every_upstream_and_publishes_the_http_port() {
    let yaml = render_compose(&core_plan()).unwrap();
    let doc = parse(&yaml);
    let nginx = &doc["services"]["nginx"];
    let depends: Vec<&str> = nginx["depends_on"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(depends, vec!["gitea", "kanboard", "syncthing"]);
    assert_eq!(nginx["ports"][0].as_str(), Some("80:80"));
}

#[test]
fn every_service_joins_the_stack_network_with_restart_policy() {
    let yaml = render_compose(&full_plan()).unwrap();
    let doc = parse(&yaml);
    for (_, service) in doc["services"].as_mapping().unwrap() {
        assert_eq!(service["restart"].as_str(), Some("unless-stopped"));
        assert_eq!(service["networks"][0].as_str(), Some("stacknet"));
    }
    assert_eq!(doc["networks"]["stacknet"]["driver"].as_str(), Some("bridge"));
}

#[test]
fn named_volumes_are_declared_for_every_mount() {
    let yaml = render_compose(&full_plan()).unwrap();
    let doc = parse(&yaml);
    let volumes = doc["volumes"].as_mapping().unwrap();
    for name in [
        "gitea-data",
        "kanboard-data",
        "kanboard-plugins",
        "syncthing-data",
        "openproject-pgdata",
        "openproject-assets",
    ] {
        let key = serde_yaml::Value::String(name.to_string());
        assert!(volumes.contains_key(&key), "missing volume {}", name);
    }
}

#[test]
fn address_is_substituted_into_every_service_that_takes_one() {
    let yaml = render_compose(&full_plan()).unwrap();
    let doc = parse(&yaml);

    let env = &doc["services"]["gitea"]["environment"];
    assert_eq!(env["GITEA__server__DOMAIN"].as_str(), Some(ADDRESS));
    let env = &doc["services"]["kanboard"]["environment"];
    assert_eq!(
        env["KANBOARD_URL"].as_str(),
        Some("http://192.0.2.10/kanboard")
    );
    let env = &doc["services"]["openproject"]["environment"];
    assert_eq!(env["OPENPROJECT_HOST__NAME"].as_str(), Some(ADDRESS));
}

#[test]
fn syncthing_is_reached_only_through_the_proxy_route() {
    // Syncthing has no external-URL setting; its GUI is proxied by path
    // prefix, so its service block must not carry the resolved address.
    let yaml = render_compose(&core_plan()).unwrap();
    let doc = parse(&yaml);
    let syncthing = &doc["services"]["syncthing"];
    assert!(syncthing["environment"].is_null());
    let block = serde_yaml::to_string(syncthing).unwrap();
    assert!(!block.contains(ADDRESS));
}

#[test]
fn rendering_is_deterministic_for_a_fixed_address_and_secret() {
    let first = render_compose(&full_plan()).unwrap();
    let second = render_compose(&full_plan()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn image_overrides_replace_the_defaults() {
    let mut config = StackConfig::default();
    config.images.gitea = Some("registry.example.com/gitea:custom".to_string());
    let yaml = render_compose(&StackPlan::build(&config, ADDRESS, SECRET)).unwrap();
    let doc = parse(&yaml);
    assert_eq!(
        doc["services"]["gitea"]["image"].as_str(),
        Some("registry.example.com/gitea:custom")
    );
}
