use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Function to deploy on the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub image: String,
    /// Falls back to the resolved request network when unset.
    pub network: Option<String>,
}

impl FunctionDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            network: None,
        }
    }

    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }
}

/// Function metadata as reported by the gateway listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionRecord {
    pub name: String,
    pub image: String,
    pub invocation_count: u64,
    pub replicas: u64,
    pub env_process: String,
    pub labels: HashMap<String, String>,
}

/// Wire body of a deploy request; field order is the gateway's.
#[derive(Debug, Serialize)]
pub(crate) struct DeployRequest<'a> {
    pub service: &'a str,
    pub network: &'a str,
    pub image: &'a str,
}

/// Wire body of a remove request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveRequest<'a> {
    pub function_name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_from_gateway_listing() {
        let record: FunctionRecord = serde_json::from_value(json!({
            "name": "func_echoit",
            "image": "functions/alpine:latest",
            "invocationCount": 3,
            "replicas": 1,
            "envProcess": "cat",
            "labels": {"com.docker.stack.namespace": "func"}
        }))
        .unwrap();
        assert_eq!(record.name, "func_echoit");
        assert_eq!(record.invocation_count, 3);
        assert_eq!(record.env_process, "cat");
        assert_eq!(record.labels["com.docker.stack.namespace"], "func");
    }

    #[test]
    fn record_missing_fields_default() {
        let record: FunctionRecord = serde_json::from_value(json!({"name": "a"})).unwrap();
        assert_eq!(record.name, "a");
        assert_eq!(record.replicas, 0);
        assert!(record.labels.is_empty());
    }

    #[test]
    fn deploy_body_field_order() {
        let body = serde_json::to_string(&DeployRequest {
            service: "test-func",
            network: "func_functions",
            image: "hello-serverless",
        })
        .unwrap();
        assert_eq!(
            body,
            r#"{"service":"test-func","network":"func_functions","image":"hello-serverless"}"#
        );
    }

    #[test]
    fn remove_body_is_camel_case() {
        let body = serde_json::to_value(RemoveRequest {
            function_name: "test-func",
        })
        .unwrap();
        assert_eq!(body, json!({"functionName": "test-func"}));
    }
}
