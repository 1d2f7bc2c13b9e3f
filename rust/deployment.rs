use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::debug;

use crate::schemas::ToolDeployment;

/// Reads a deployment description. The file may hold a single deployment or a
/// list of them, in which case the first entry is used. `node_url`, when
/// given, replaces the node URL from the file.
pub fn load_deployment(path: &Path, node_url: Option<&str>) -> Result<ToolDeployment> {
    let payload = fs::read_to_string(path)
        .with_context(|| format!("Failed to read deployment file at {}", path.display()))?;
    let value: Value = serde_json::from_str(&payload)
        .with_context(|| format!("Failed to parse deployment file at {}", path.display()))?;

    let value = match value {
        Value::Array(mut entries) => {
            if entries.is_empty() {
                bail!("deployment file {} contains no deployments", path.display());
            }
            entries.swap_remove(0)
        }
        other => other,
    };

    let mut deployment: ToolDeployment =
        serde_json::from_value(value).context("Deployment entry has an unexpected shape")?;
    if let Some(url) = node_url {
        deployment.node.url = Some(url.to_string());
    }

    debug!(
        name = ?deployment.name,
        node_url = ?deployment.node.url,
        "loaded tool deployment"
    );
    Ok(deployment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_entry_of_a_list_wins_and_node_url_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployment.json");
        fs::write(
            &path,
            r#"[
                {"name": "tool_deployment_1", "module": {"name": "files_to_markdown_tool"}, "node": {"ip": "localhost"}, "config": {"config_name": "tool_config"}},
                {"name": "tool_deployment_2"}
            ]"#,
        )
        .unwrap();

        let deployment = load_deployment(&path, Some("http://localhost:7001")).unwrap();
        assert_eq!(deployment.name.as_deref(), Some("tool_deployment_1"));
        assert_eq!(deployment.node.ip.as_deref(), Some("localhost"));
        assert_eq!(deployment.node.url.as_deref(), Some("http://localhost:7001"));
    }

    #[test]
    fn single_object_is_accepted_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployment.json");
        fs::write(&path, r#"{"name": "solo", "node": {"url": "http://node:7001"}}"#).unwrap();

        let deployment = load_deployment(&path, None).unwrap();
        assert_eq!(deployment.node.url.as_deref(), Some("http://node:7001"));
    }

    #[test]
    fn empty_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployment.json");
        fs::write(&path, "[]").unwrap();

        let err = load_deployment(&path, None).unwrap_err();
        assert!(err.to_string().contains("contains no deployments"));
    }
}
