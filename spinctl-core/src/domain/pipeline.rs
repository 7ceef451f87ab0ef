//! Pipeline config domain types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use super::null_as_default;

/// Schema version written on every templated pipeline spinctl creates
pub const TEMPLATED_PIPELINE_SCHEMA: &str = "v2";

/// Pipeline type tag for templated pipelines
pub const TEMPLATED_PIPELINE_TYPE: &str = "templatedPipeline";

/// Pipeline definition stored in Front50
///
/// Read from `GET /applications/{app}/pipelineConfigs` and sent to
/// `POST /pipelines`. Within one application `name` is unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Server-assigned id, absent on configs that have not been saved yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub application: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateReference>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: HashMap<String, JsonValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub pipeline_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limit_concurrent: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keep_waiting_pipelines: bool,
}

impl PipelineConfig {
    /// Build a new templated pipeline config for `application`
    ///
    /// Schema, type and the concurrency flags are always the templated
    /// pipeline defaults; only the template and its variables are taken
    /// from the caller.
    pub fn templated(
        application: impl Into<String>,
        name: impl Into<String>,
        template: Option<TemplateReference>,
        variables: HashMap<String, JsonValue>,
    ) -> Self {
        Self {
            id: None,
            application: application.into(),
            name: name.into(),
            template,
            variables,
            schema: TEMPLATED_PIPELINE_SCHEMA.to_string(),
            pipeline_type: TEMPLATED_PIPELINE_TYPE.to_string(),
            limit_concurrent: true,
            keep_waiting_pipelines: false,
        }
    }
}

/// Reference to a shared pipeline template artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateReference {
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifact_account: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reference: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub template_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> TemplateReference {
        TemplateReference {
            artifact_account: "front50ArtifactCredentials".to_string(),
            reference: "spinnaker://deploy-template".to_string(),
            template_type: "front50/pipelineTemplate".to_string(),
        }
    }

    #[test]
    fn test_templated_forces_defaults() {
        let variables = HashMap::from([("region".to_string(), json!("us-east-1"))]);
        let config =
            PipelineConfig::templated("app2", "deploy", Some(template()), variables.clone());

        assert_eq!(config.id, None);
        assert_eq!(config.application, "app2");
        assert_eq!(config.name, "deploy");
        assert_eq!(config.template, Some(template()));
        assert_eq!(config.variables, variables);
        assert_eq!(config.schema, "v2");
        assert_eq!(config.pipeline_type, "templatedPipeline");
        assert!(config.limit_concurrent);
        assert!(!config.keep_waiting_pipelines);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let config = PipelineConfig::templated("app2", "deploy", Some(template()), HashMap::new());

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "application": "app2",
                "name": "deploy",
                "template": {
                    "artifactAccount": "front50ArtifactCredentials",
                    "reference": "spinnaker://deploy-template",
                    "type": "front50/pipelineTemplate",
                },
                "variables": {},
                "schema": "v2",
                "type": "templatedPipeline",
                "limitConcurrent": true,
                "keepWaitingPipelines": false,
            })
        );
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let config: PipelineConfig = serde_json::from_value(json!({
            "id": "8f1c",
            "application": "app1",
            "name": "build",
            "stages": [{"type": "wait"}],
            "triggers": [],
            "index": 0,
        }))
        .unwrap();

        assert_eq!(config.id.as_deref(), Some("8f1c"));
        assert_eq!(config.name, "build");
        assert_eq!(config.template, None);
        assert!(config.variables.is_empty());
        assert!(!config.limit_concurrent);
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let configs: Vec<PipelineConfig> = serde_json::from_value(json!([
            {
                "id": null,
                "application": "app1",
                "name": "deploy",
                "template": null,
                "variables": null,
                "schema": null,
                "type": null,
                "limitConcurrent": null,
                "keepWaitingPipelines": null,
            },
            {"application": "app1", "name": "build", "schema": "1"},
        ]))
        .unwrap();

        assert_eq!(configs[0].id, None);
        assert_eq!(configs[0].template, None);
        assert!(configs[0].variables.is_empty());
        assert_eq!(configs[0].schema, "");
        assert_eq!(configs[0].pipeline_type, "");
        assert!(!configs[0].limit_concurrent);
        assert!(!configs[0].keep_waiting_pipelines);
        assert_eq!(configs[1].name, "build");
    }
}
