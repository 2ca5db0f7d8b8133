//! End-to-end checks: wire document in, assembled managers out.

use datadog_operator::api::agent_spec::AgentSpec;
use datadog_operator::api::common::{
    ContainerRole, WorkloadKind, DD_LOG_LEVEL, DD_PROMETHEUS_SCRAPE_ENABLED,
    DD_PROMETHEUS_SCRAPE_SERVICE_ENDPOINTS, SECCOMP_ROOT_VOLUME_NAME,
};
use datadog_operator::api::{v1alpha1, v2alpha1};
use datadog_operator::feature::registry::FeatureRegistry;
use datadog_operator::pipeline::BuildPipeline;

const SCRAPE_WITH_OVERRIDES: &str = r#"
metadata:
  name: datadog
spec:
  features:
    prometheusScrape:
      enabled: true
      enableServiceEndpoints: true
  override:
    nodeAgent:
      containers:
        core-agent:
          name: my-container-name
          logLevel: debug
          appArmorProfileName: my-profile
        system-probe:
          seccompConfig:
            customRootPath: seccomp/path
"#;

fn run(doc: &str) -> datadog_operator::pipeline::ReconcileResult {
    let agent: v2alpha1::DatadogAgent = serde_yaml::from_str(doc).unwrap();
    let spec = AgentSpec::from_v2alpha1(&agent);
    let registry = FeatureRegistry::with_default_features();
    BuildPipeline::new(&registry).run(&spec).unwrap()
}

#[test]
fn scrape_feature_env_vars_reach_both_agents() {
    let result = run(SCRAPE_WITH_OVERRIDES);

    for (kind, role) in [
        (WorkloadKind::NodeAgent, ContainerRole::CoreAgent),
        (WorkloadKind::ClusterAgent, ContainerRole::ClusterAgent),
    ] {
        let managers = &result.workloads[&kind];
        let vars = managers.env_vars(role);
        assert_eq!(DD_PROMETHEUS_SCRAPE_ENABLED, vars[0].name);
        assert_eq!(Some("true".to_string()), vars[0].value);
        assert_eq!(DD_PROMETHEUS_SCRAPE_SERVICE_ENDPOINTS, vars[1].name);
        assert_eq!(Some("true".to_string()), vars[1].value);
    }
}

#[test]
fn overrides_apply_on_top_of_features() {
    let result = run(SCRAPE_WITH_OVERRIDES);
    let node_agent = &result.workloads[&WorkloadKind::NodeAgent];

    // Renamed container, other containers untouched.
    let names: Vec<&str> = node_agent
        .containers()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert!(names.contains(&"my-container-name"));
    assert!(!names.contains(&"core-agent"));

    // Log level arrives after the feature-provided entries.
    let env_names: Vec<&str> = node_agent
        .env_vars(ContainerRole::CoreAgent)
        .iter()
        .map(|env| env.name.as_str())
        .collect();
    assert_eq!(
        vec![
            DD_PROMETHEUS_SCRAPE_ENABLED,
            DD_PROMETHEUS_SCRAPE_SERVICE_ENDPOINTS,
            DD_LOG_LEVEL
        ],
        env_names
    );

    // Seccomp root path for the system probe became the well-known volume.
    // The system-probe container itself was never required, so the mount
    // target stays absent while the pod-level volume is present.
    let volumes = node_agent.volumes();
    assert_eq!(1, volumes.len());
    assert_eq!(SECCOMP_ROOT_VOLUME_NAME, volumes[0].name);
    assert_eq!(
        "seccomp/path",
        volumes[0].host_path.as_ref().unwrap().path
    );

    // AppArmor annotation keyed by the role string.
    assert_eq!(
        "my-profile",
        node_agent.annotations()["container.apparmor.security.beta.kubernetes.io/core-agent"]
    );
}

#[test]
fn legacy_and_current_documents_converge() {
    let current: v2alpha1::DatadogAgent = serde_yaml::from_str(
        r#"
spec:
  features:
    prometheusScrape:
      enabled: true
      enableServiceEndpoints: true
"#,
    )
    .unwrap();
    let legacy: v1alpha1::DatadogAgent = serde_yaml::from_str(
        r#"
spec:
  features:
    prometheusScrape:
      enabled: true
      serviceEndpoints: true
"#,
    )
    .unwrap();

    let registry = FeatureRegistry::with_default_features();
    let pipeline = BuildPipeline::new(&registry);

    let from_current = pipeline.run(&AgentSpec::from_v2alpha1(&current)).unwrap();
    let from_legacy = pipeline.run(&AgentSpec::from_v1alpha1(&legacy)).unwrap();
    assert_eq!(from_current, from_legacy);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let first = run(SCRAPE_WITH_OVERRIDES);
    let second = run(SCRAPE_WITH_OVERRIDES);
    assert_eq!(first, second);

    let first_json = serde_json::to_string(
        first.workloads[&WorkloadKind::NodeAgent].pod_template(),
    )
    .unwrap();
    let second_json = serde_json::to_string(
        second.workloads[&WorkloadKind::NodeAgent].pod_template(),
    )
    .unwrap();
    assert_eq!(first_json, second_json);
}
