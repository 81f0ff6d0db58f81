//! GitHub Releases 更新检查

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{UpdateError, UpdateResult};
use super::version::{UpdateType, Version};
use crate::state::config::UpdateConfig;
use crate::utils::{with_retry_if, RetryError, RetryPolicy};

const GITHUB_API_BASE: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 包含预发布时读取的发布数量
const RELEASE_PAGE_SIZE: u32 = 10;

/// GitHub 发布信息（只保留用到的字段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl GitHubRelease {
    /// 从标签解析版本
    pub fn version(&self) -> UpdateResult<Version> {
        Version::parse(&self.tag_name)
    }

    /// 显示名称，没有时使用标签
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.tag_name)
    }
}

/// 检查到的可用更新
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableUpdate {
    pub release: GitHubRelease,
    pub version: Version,
    pub update_type: UpdateType,
}

/// 从发布列表中挑出比 `current` 新的最高版本
///
/// 跳过草稿、无法解析版本的标签，以及未启用时的预发布
pub fn select_update(
    releases: Vec<GitHubRelease>,
    current: &Version,
    include_prereleases: bool,
) -> Option<AvailableUpdate> {
    releases
        .into_iter()
        .filter(|release| !release.draft)
        .filter(|release| include_prereleases || !release.prerelease)
        .filter_map(|release| match release.version() {
            Ok(version) => Some((version, release)),
            Err(e) => {
                tracing::debug!(tag = %release.tag_name, error = %e, "Skipping release");
                None
            }
        })
        .filter(|(version, _)| include_prereleases || version.is_stable())
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .and_then(|(version, release)| {
            current.update_type(&version).map(|update_type| AvailableUpdate {
                release,
                version,
                update_type,
            })
        })
}

/// 更新检查器
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    include_prereleases: bool,
    current: Version,
    policy: RetryPolicy,
}

impl UpdateChecker {
    /// 按配置创建检查器
    ///
    /// # Errors
    ///
    /// - [`UpdateError::InvalidRepository`] - 仓库不是 owner/name
    /// - [`UpdateError::Http`] - HTTP 客户端构建失败
    pub fn new(config: &UpdateConfig, current: Version) -> UpdateResult<Self> {
        let (owner, repo) = config
            .parse_repository()
            .ok_or_else(|| UpdateError::InvalidRepository(config.repository.clone()))?;

        let client = reqwest::Client::builder()
            .user_agent(format!("CaseShift/{}", current))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: GITHUB_API_BASE.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            include_prereleases: config.include_prereleases,
            current,
            policy: RetryPolicy::new(2, Duration::from_secs(2), 1.0),
        })
    }

    /// 替换 API 地址（GitHub Enterprise 或测试）
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn current_version(&self) -> &Version {
        &self.current
    }

    /// 最新正式发布的 API 地址
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.owner, self.repo
        )
    }

    /// 发布列表的 API 地址
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases?per_page={}",
            self.api_base, self.owner, self.repo, RELEASE_PAGE_SIZE
        )
    }

    /// 检查更新
    ///
    /// # Returns
    ///
    /// 有更新的版本时返回 `Some`
    ///
    /// # Errors
    ///
    /// 网络错误（重试后）或 GitHub 返回错误状态
    pub async fn check(&self) -> UpdateResult<Option<AvailableUpdate>> {
        tracing::debug!(
            repository = %format!("{}/{}", self.owner, self.repo),
            current = %self.current,
            include_prereleases = self.include_prereleases,
            "Checking for updates"
        );

        let releases = if self.include_prereleases {
            self.fetch::<Vec<GitHubRelease>>(&self.releases_url()).await?
        } else {
            vec![self.fetch::<GitHubRelease>(&self.latest_release_url()).await?]
        };

        let update = select_update(releases, &self.current, self.include_prereleases);

        match &update {
            Some(update) => tracing::info!(
                current = %self.current,
                latest = %update.version,
                update_type = ?update.update_type,
                "Update available"
            ),
            None => tracing::debug!(current = %self.current, "No update available"),
        }

        Ok(update)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> UpdateResult<T> {
        with_retry_if(
            &self.policy,
            "update_check",
            || self.get_json::<T>(url),
            UpdateError::is_transient,
        )
        .await
        .map_err(RetryError::into_inner)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> UpdateResult<T> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, prerelease: bool) -> GitHubRelease {
        GitHubRelease {
            tag_name: tag.to_string(),
            name: None,
            body: None,
            html_url: format!("https://github.com/o/r/releases/tag/{}", tag),
            prerelease,
            draft: false,
            published_at: None,
        }
    }

    #[test]
    fn test_parse_github_payload() {
        let json = r#"{
            "tag_name": "v1.4.0",
            "name": "CaseShift 1.4.0",
            "body": "notes",
            "html_url": "https://github.com/o/r/releases/tag/v1.4.0",
            "prerelease": false,
            "draft": false,
            "published_at": "2026-01-02T03:04:05Z",
            "assets": []
        }"#;
        let release: GitHubRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.version().unwrap(), Version::new(1, 4, 0));
        assert_eq!(release.display_name(), "CaseShift 1.4.0");
    }

    #[test]
    fn test_select_update_picks_highest_newer_release() {
        let current = Version::new(1, 0, 0);
        let releases = vec![
            release("v1.1.0", false),
            release("v1.2.0-beta.1", true),
            release("not-a-version", false),
            release("v0.9.0", false),
        ];

        let stable = select_update(releases.clone(), &current, false).unwrap();
        assert_eq!(stable.version, Version::new(1, 1, 0));
        assert_eq!(stable.update_type, UpdateType::Minor);

        let pre = select_update(releases, &current, true).unwrap();
        assert_eq!(pre.release.tag_name, "v1.2.0-beta.1");
    }

    #[test]
    fn test_select_update_none_when_current() {
        let current = Version::new(2, 0, 0);
        assert!(select_update(vec![release("v2.0.0", false)], &current, false).is_none());
    }

    #[test]
    fn test_drafts_are_ignored() {
        let mut draft = release("v9.0.0", false);
        draft.draft = true;
        assert!(select_update(vec![draft], &Version::new(1, 0, 0), true).is_none());
    }

    #[test]
    fn test_urls() {
        let config = UpdateConfig {
            repository: "acme/caseshift".to_string(),
            ..UpdateConfig::default()
        };
        let checker = UpdateChecker::new(&config, Version::new(1, 0, 0))
            .unwrap()
            .with_api_base("http://localhost:9/");

        assert_eq!(
            checker.latest_release_url(),
            "http://localhost:9/repos/acme/caseshift/releases/latest"
        );
        assert!(checker.releases_url().ends_with("/releases?per_page=10"));
    }

    #[test]
    fn test_invalid_repository() {
        let config = UpdateConfig {
            repository: "nope".to_string(),
            ..UpdateConfig::default()
        };
        assert!(matches!(
            UpdateChecker::new(&config, Version::new(1, 0, 0)),
            Err(UpdateError::InvalidRepository(_))
        ));
    }
}
