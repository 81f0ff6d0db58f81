//! 更新检查模块
//!
//! 只检查并提示，不下载或安装

mod error;
mod github;
mod version;

pub use error::{UpdateError, UpdateResult};
pub use github::{select_update, AvailableUpdate, GitHubRelease, UpdateChecker};
pub use version::{UpdateType, Version};
