//! Release API test utilities

use release_updater::config::UpdateConfig;

/// Config pointing at a mock API server
pub fn test_config(api_base_url: &str) -> UpdateConfig {
    UpdateConfig {
        repo_owner: "acme".to_string(),
        repo_name: "journal".to_string(),
        artifact_base_name: "journal".to_string(),
        download_notification_title: "Journal update".to_string(),
        api_base_url: api_base_url.to_string(),
        fetch_timeout_ms: 5_000,
        ..UpdateConfig::default()
    }
}

/// GitHub release JSON for `tag` with the given asset names
pub fn release_json(tag: &str, asset_names: &[&str]) -> String {
    let assets: Vec<serde_json::Value> = asset_names
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "browser_download_url": format!(
                    "https://github.com/acme/journal/releases/download/{}/{}",
                    tag, name
                ),
                "size": 4096,
                "download_count": 12
            })
        })
        .collect();

    serde_json::json!({
        "tag_name": tag,
        "name": format!("Release {}", tag),
        "html_url": format!("https://github.com/acme/journal/releases/tag/{}", tag),
        "body": format!("Changes in {}", tag),
        "author": { "login": "acme-bot" },
        "assets": assets
    })
    .to_string()
}
