//! Cluster Configuration Types
//!
//! The declarative cluster definition as the phase pipeline hands it over.
//! The ledger reads only the cluster name and node-pool names; the sanitizer
//! walks the provider credentials. Everything else is carried verbatim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Complete cluster configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Cluster identity and labels
    #[serde(default)]
    pub metadata: ClusterMetadata,

    /// Cloud provider credentials and settings
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Node pools keyed by pool name
    #[serde(default)]
    pub node_pools: BTreeMap<String, NodePool>,

    /// Network and mesh VPN settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Kubernetes distribution settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesConfig>,
}

/// Cluster metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    /// Cluster name (e.g., "prod-cluster")
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub environment: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

// =============================================================================
// Providers
// =============================================================================

/// Per-provider configuration; an absent provider is unconfigured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digitalocean: Option<DigitalOceanProvider>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linode: Option<LinodeProvider>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsProvider>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureProvider>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpProvider>,
}

/// DigitalOcean provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalOceanProvider {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<String>,
}

/// Linode provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinodeProvider {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub root_password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorized_keys: Vec<String>,
}

/// AWS provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsProvider {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vpc_id: String,
}

/// Azure provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureProvider {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub subscription_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
}

/// GCP provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpProvider {
    #[serde(default)]
    pub enabled: bool,
    /// Service account JSON blob
    #[serde(default)]
    pub credentials: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
}

// =============================================================================
// Node Pools & Network
// =============================================================================

/// A group of identically-shaped nodes on one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// Network settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mode: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pod_cidr: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_cidr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn: Option<VpnConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsConfig>,
}

/// Mesh VPN settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet: String,
}

/// DNS settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
}

/// Kubernetes distribution settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub distribution: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl ClusterConfig {
    /// Create a named cluster with no providers or pools
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ClusterMetadata {
                name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Add a node pool (builder style)
    pub fn with_pool(mut self, name: impl Into<String>, pool: NodePool) -> Self {
        self.node_pools.insert(name.into(), pool);
        self
    }

    /// Cluster name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Total nodes across all pools
    pub fn total_nodes(&self) -> i64 {
        self.node_pools.values().map(|p| p.count).sum()
    }

    /// Parse a cluster definition; YAML is a superset of JSON so both work
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a cluster definition file, returning the parsed config and
    /// its raw text (the manifest that gets hashed)
    pub fn load(path: &Path) -> anyhow::Result<(Self, String)> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok((config, content))
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl NodePool {
    pub fn new(provider: impl Into<String>, count: i64) -> Self {
        Self {
            provider: provider.into(),
            count,
            ..Default::default()
        }
    }
}
