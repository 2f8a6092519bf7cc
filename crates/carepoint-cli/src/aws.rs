use std::collections::BTreeSet;
use std::path::Path;

use aws_sdk_s3::Client;

use carepoint_storage::client;
use carepoint_storage::s3::S3RecordService;

use crate::config::{CarepointConfig, CredentialSource};

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_aws_config(region: &str, creds: &CredentialSource) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    match creds {
        CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            builder = builder.credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                "carepoint-config",
            ));
        }
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::DefaultChain => {}
    }

    builder.load().await
}

pub async fn s3_client(config: &CarepointConfig) -> Client {
    let sdk = build_aws_config(&config.region, &config.credentials).await;
    client::build_client(&sdk, config.endpoint_url.as_deref())
}

pub async fn record_service(config: &CarepointConfig) -> S3RecordService {
    S3RecordService::new(s3_client(config).await, config.bucket.clone())
}

/// HeadBucket, to check that the credentials reach the bucket.
pub async fn check_bucket(client: &Client, bucket: &str) -> eyre::Result<()> {
    client
        .head_bucket()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| eyre::eyre!("cannot reach bucket {bucket}: {e}"))?;
    Ok(())
}

/// Profile names from `~/.aws/credentials` and `~/.aws/config`, without
/// the implicit `default`.
pub fn list_aws_profiles() -> Vec<String> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    let aws_dir = home.join(".aws");

    let mut profiles = BTreeSet::new();
    profiles.extend(ini_sections(&aws_dir.join("credentials"), false));
    profiles.extend(ini_sections(&aws_dir.join("config"), true));
    profiles.remove("default");
    profiles.into_iter().collect()
}

/// Section headers of an INI file. `~/.aws/config` writes them as
/// `[profile name]`, hence `strip_profile_prefix`.
fn ini_sections(path: &Path, strip_profile_prefix: bool) -> Vec<String> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Vec::new();
    };

    contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix('[')?.strip_suffix(']'))
        .map(|name| {
            let name = name.trim();
            match name.strip_prefix("profile ") {
                Some(stripped) if strip_profile_prefix => stripped.trim(),
                _ => name,
            }
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
