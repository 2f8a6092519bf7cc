use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding step in [`migrate`]. Version 1 is the
/// first on-disk shape, so there are no steps yet.
pub const CURRENT_VERSION: u32 = 1;

const APP_DIR: &str = "com.carepoint.cli";
const FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarepointConfig {
    /// Schema version, stamped on every save.
    pub config_version: u32,
    pub region: String,
    /// Bucket holding the assessment, protocol and reference records.
    pub bucket: String,
    /// Custom S3 endpoint, for S3-compatible stores.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    pub created_at: jiff::Timestamp,
    pub credentials: CredentialSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_token: Option<String>,
    },
    Profile {
        profile_name: String,
    },
    DefaultChain,
}

/// Config with secrets removed, for `config show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigInfo {
    pub region: String,
    pub bucket: String,
    pub endpoint_url: Option<String>,
    pub created_at: String,
    pub credential_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_hint: Option<String>,
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join(APP_DIR))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join(FILE_NAME))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn load_config() -> eyre::Result<CarepointConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> eyre::Result<CarepointConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Migrations operate on the raw JSON, before the shape is enforced.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    // Anything past u32 is certainly newer than this build.
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX));

    let migrated = migrate(json, on_disk_version)?;
    let config: CarepointConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
pub fn migrate(json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update carepoint."
        ));
    }

    if from_version == 0 {
        return Err(eyre::eyre!("config has no config_version; run `carepoint configure` again"));
    }

    // Steps go here, oldest first: `if from_version < 2 { ... }`.
    Ok(json)
}

pub fn save_config(config: &CarepointConfig) -> eyre::Result<PathBuf> {
    save_config_in(&config_dir()?, config)
}

/// Write `config.json` into `dir`, stamped with [`CURRENT_VERSION`].
pub fn save_config_in(dir: &Path, config: &CarepointConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join(FILE_NAME);
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = dir.join(format!("{FILE_NAME}.tmp"));
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

pub fn config_info(config: &CarepointConfig) -> ConfigInfo {
    let (credential_type, profile_name, access_key_hint) = match &config.credentials {
        CredentialSource::Inline {
            access_key_id,
            session_token,
            ..
        } => {
            let kind = match session_token {
                Some(_) => "temporary",
                None => "inline",
            };
            (kind, None, Some(redact_access_key(access_key_id)))
        }
        CredentialSource::Profile { profile_name } => ("profile", Some(profile_name.clone()), None),
        CredentialSource::DefaultChain => ("default_chain", None, None),
    };

    ConfigInfo {
        region: config.region.clone(),
        bucket: config.bucket.clone(),
        endpoint_url: config.endpoint_url.clone(),
        created_at: config.created_at.to_string(),
        credential_type: credential_type.to_string(),
        profile_name,
        access_key_hint,
    }
}

fn redact_access_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
