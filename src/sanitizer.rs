//! Configuration Sanitizer
//!
//! Produces a redacted, fully independent copy of a cluster configuration
//! that is safe to persist. Each populated provider credential is replaced
//! by a `${ENV_VAR}` placeholder naming the variable it is normally read
//! from; everything else is copied verbatim.

use crate::models::cluster::{ClusterConfig, ProvidersConfig};

pub const DIGITALOCEAN_TOKEN: &str = "DIGITALOCEAN_TOKEN";
pub const LINODE_TOKEN: &str = "LINODE_TOKEN";
pub const LINODE_ROOT_PASSWORD: &str = "LINODE_ROOT_PASSWORD";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const GCP_CREDENTIALS: &str = "GCP_CREDENTIALS";

/// Errors from credential reconstruction
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    #[error("Environment variable {0} is not set")]
    MissingVariable(String),
}

/// `${NAME}`
pub fn placeholder(var: &str) -> String {
    format!("${{{}}}", var)
}

/// Return a redacted copy of `config`; the input is never modified
///
/// The copy shares nothing with the input, so mutating either afterwards
/// cannot affect the other. Absent providers stay absent and empty
/// credential fields stay empty.
pub fn sanitize_config(config: &ClusterConfig) -> ClusterConfig {
    let mut sanitized = config.clone();
    let mut redacted = 0usize;

    for (var, field) in credential_fields_mut(&mut sanitized.providers) {
        if !field.is_empty() {
            *field = placeholder(var);
            redacted += 1;
        }
    }

    tracing::debug!(
        cluster = %config.name(),
        redacted,
        "sanitized cluster configuration"
    );
    sanitized
}

/// Rebuild a usable configuration from a sanitized one
///
/// Each placeholder is resolved through `lookup` (typically the process
/// environment). Fields that do not hold their placeholder are left as-is.
pub fn restore_credentials<F>(
    sanitized: &ClusterConfig,
    lookup: F,
) -> Result<ClusterConfig, SanitizeError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut restored = sanitized.clone();

    for (var, field) in credential_fields_mut(&mut restored.providers) {
        if *field == placeholder(var) {
            *field = lookup(var).ok_or_else(|| SanitizeError::MissingVariable(var.to_string()))?;
        }
    }

    Ok(restored)
}

/// Names of credential fields holding something other than a placeholder
///
/// An empty result means the configuration is safe to persist.
pub fn find_exposed_credentials(config: &ClusterConfig) -> Vec<&'static str> {
    credential_fields(&config.providers)
        .into_iter()
        .filter(|(var, value)| !value.is_empty() && **value != placeholder(var))
        .map(|(var, _)| var)
        .collect()
}

fn credential_fields_mut(providers: &mut ProvidersConfig) -> Vec<(&'static str, &mut String)> {
    let mut fields = Vec::new();

    if let Some(p) = providers.digitalocean.as_mut() {
        fields.push((DIGITALOCEAN_TOKEN, &mut p.token));
    }
    if let Some(p) = providers.linode.as_mut() {
        fields.push((LINODE_TOKEN, &mut p.token));
        fields.push((LINODE_ROOT_PASSWORD, &mut p.root_password));
    }
    if let Some(p) = providers.aws.as_mut() {
        fields.push((AWS_ACCESS_KEY_ID, &mut p.access_key_id));
        fields.push((AWS_SECRET_ACCESS_KEY, &mut p.secret_access_key));
    }
    if let Some(p) = providers.azure.as_mut() {
        fields.push((AZURE_CLIENT_ID, &mut p.client_id));
        fields.push((AZURE_CLIENT_SECRET, &mut p.client_secret));
        fields.push((AZURE_TENANT_ID, &mut p.tenant_id));
        fields.push((AZURE_SUBSCRIPTION_ID, &mut p.subscription_id));
    }
    if let Some(p) = providers.gcp.as_mut() {
        fields.push((GCP_CREDENTIALS, &mut p.credentials));
    }

    fields
}

fn credential_fields(providers: &ProvidersConfig) -> Vec<(&'static str, &String)> {
    let mut fields = Vec::new();

    if let Some(p) = &providers.digitalocean {
        fields.push((DIGITALOCEAN_TOKEN, &p.token));
    }
    if let Some(p) = &providers.linode {
        fields.push((LINODE_TOKEN, &p.token));
        fields.push((LINODE_ROOT_PASSWORD, &p.root_password));
    }
    if let Some(p) = &providers.aws {
        fields.push((AWS_ACCESS_KEY_ID, &p.access_key_id));
        fields.push((AWS_SECRET_ACCESS_KEY, &p.secret_access_key));
    }
    if let Some(p) = &providers.azure {
        fields.push((AZURE_CLIENT_ID, &p.client_id));
        fields.push((AZURE_CLIENT_SECRET, &p.client_secret));
        fields.push((AZURE_TENANT_ID, &p.tenant_id));
        fields.push((AZURE_SUBSCRIPTION_ID, &p.subscription_id));
    }
    if let Some(p) = &providers.gcp {
        fields.push((GCP_CREDENTIALS, &p.credentials));
    }

    fields
}

// =============================================================================
// Tests
// =============================================================================
