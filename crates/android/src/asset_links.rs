//! Digital Asset Links statements
//!
//! The app declares which web origin it may open as a Trusted Web Activity.
//! The statement list is embedded as the `assetStatements` string resource
//! and referenced from `AndroidManifest.xml`.

use serde::{Deserialize, Serialize};

/// Relation granting the app the right to handle every URL of the site
pub const HANDLE_ALL_URLS: &str = "delegate_permission/common.handle_all_urls";

/// One asset statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStatement {
    /// Granted relations
    pub relation: Vec<String>,
    /// The web target
    pub target: WebTarget,
}

/// A web origin target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebTarget {
    /// Always `web`
    pub namespace: String,
    /// Origin, `https://host`
    pub site: String,
}

impl AssetStatement {
    /// Statement delegating all URLs of `host_name` to the app
    pub fn handle_all_urls(host_name: &str) -> Self {
        Self {
            relation: vec![HANDLE_ALL_URLS.to_string()],
            target: WebTarget {
                namespace: "web".to_string(),
                site: format!("https://{}", host_name),
            },
        }
    }
}

/// Serialized statement list for the `assetStatements` resource
pub fn asset_statements(host_name: &str) -> serde_json::Result<String> {
    serde_json::to_string(&[AssetStatement::handle_all_urls(host_name)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_statements_json() {
        let json = asset_statements("staging.ryss.app").unwrap();
        assert_eq!(
            json,
            r#"[{"relation":["delegate_permission/common.handle_all_urls"],"target":{"namespace":"web","site":"https://staging.ryss.app"}}]"#
        );
    }

    #[test]
    fn test_asset_statements_parse_back() {
        let json = asset_statements("example.com").unwrap();
        let parsed: Vec<AssetStatement> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![AssetStatement::handle_all_urls("example.com")]);
    }
}
