//! DigitalOcean App Platform spec for the deployed function.
//!
//! See <https://docs.digitalocean.com/products/app-platform/reference/app-spec/>.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::AdapterOptions;
use crate::error::AdapterError;

/// Alert rules every generated app carries.
pub const BASE_ALERTS: [AlertRule; 2] = [AlertRule::DeploymentFailed, AlertRule::DomainFailed];

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AppSpec {
    pub name: String,
    pub region: String,
    pub domains: Vec<DomainSpec>,
    pub functions: Vec<FunctionComponent>,
    pub alerts: Vec<AlertSpec>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DomainSpec {
    pub domain: String,
    #[serde(rename = "type")]
    pub kind: DomainKind,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainKind {
    Primary,
    Alias,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FunctionComponent {
    pub name: String,
    pub source_dir: String,
    pub routes: Vec<RouteSpec>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: String,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct AlertSpec {
    pub rule: AlertRule,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertRule {
    DeploymentFailed,
    DomainFailed,
}

impl AppSpec {
    pub fn from_options(options: &AdapterOptions) -> Result<Self, AdapterError> {
        options.check()?;
        let name = options.app_name().to_string();
        Ok(Self {
            name: name.clone(),
            region: options.region().to_string(),
            domains: vec![DomainSpec {
                domain: options.domain().to_string(),
                kind: DomainKind::Primary,
            }],
            functions: vec![FunctionComponent {
                name,
                source_dir: options.out_dir().to_string_lossy().into_owned(),
                routes: vec![RouteSpec {
                    path: "/".to_string(),
                }],
            }],
            alerts: BASE_ALERTS
                .into_iter()
                .map(|rule| AlertSpec { rule })
                .collect(),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), AdapterError> {
        let json = self.to_json_pretty().map_err(std::io::Error::from)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn options() -> AdapterOptions {
        AdapterOptions {
            app_name: Some("storefront".to_string()),
            domain: Some("shop.example.com".to_string()),
            region: Some("ams".to_string()),
            out_dir: None,
        }
    }

    #[test]
    fn spec_carries_domain_region_and_alerts() {
        let spec = AppSpec::from_options(&options()).unwrap();
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "storefront",
                "region": "ams",
                "domains": [{ "domain": "shop.example.com", "type": "PRIMARY" }],
                "functions": [{
                    "name": "storefront",
                    "source_dir": "build",
                    "routes": [{ "path": "/" }]
                }],
                "alerts": [
                    { "rule": "DEPLOYMENT_FAILED" },
                    { "rule": "DOMAIN_FAILED" }
                ]
            })
        );
    }

    #[test]
    fn spec_requires_valid_options() {
        let err = AppSpec::from_options(&AdapterOptions::default()).unwrap_err();
        assert!(matches!(err, AdapterError::MissingField("appName")));
    }

    #[test]
    fn write_to_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join(".do/app.json");
        AppSpec::from_options(&options())
            .unwrap()
            .write_to(&path)
            .unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["domains"][0]["domain"], "shop.example.com");
    }
}
