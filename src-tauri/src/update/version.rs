//! 语义化版本
//!
//! 支持 `MAJOR.MINOR.PATCH[-pre][+build]`，可带前缀 `v`。
//! 比较时预发布版本低于对应正式版本，构建元数据不参与比较。

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::{UpdateError, UpdateResult};

/// 更新类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Major,
    Minor,
    Patch,
    Prerelease,
}

/// 语义化版本号
#[derive(Debug, Clone, Eq, Serialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// 当前程序版本
    pub fn current() -> Self {
        Self::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Self::new(0, 0, 0))
    }

    /// 解析版本字符串
    ///
    /// # Errors
    ///
    /// 格式不符时返回 [`UpdateError::InvalidVersion`]
    ///
    /// # Example
    ///
    /// ```
    /// use caseshift_lib::update::Version;
    ///
    /// let v = Version::parse("v1.2.3-beta.1+build.7").unwrap();
    /// assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    /// assert_eq!(v.prerelease.as_deref(), Some("beta.1"));
    /// ```
    pub fn parse(input: &str) -> UpdateResult<Self> {
        let invalid = || UpdateError::InvalidVersion(input.to_string());

        let trimmed = input.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let (rest, build) = match trimmed.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (trimmed, None),
        };
        let (core, prerelease) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        for label in prerelease.iter().chain(build.iter()) {
            if !is_valid_label(label) {
                return Err(invalid());
            }
        }

        let mut parts = core.split('.');
        let mut number = || -> UpdateResult<u64> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        let (major, minor, patch) = (number()?, number()?, number()?);
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
            prerelease: prerelease.map(str::to_string),
            build: build.map(str::to_string),
        })
    }

    pub fn is_stable(&self) -> bool {
        self.prerelease.is_none()
    }

    /// `newer` 相对于自身的更新类型，不是更新时返回 None
    pub fn update_type(&self, newer: &Version) -> Option<UpdateType> {
        if newer <= self {
            return None;
        }

        Some(if newer.major > self.major {
            UpdateType::Major
        } else if newer.minor > self.minor {
            UpdateType::Minor
        } else if newer.patch > self.patch {
            UpdateType::Patch
        } else {
            UpdateType::Prerelease
        })
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .split('.')
            .all(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'))
}

/// 预发布标识逐段比较：数字按数值，数字低于字母，段数少的更低
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
        assert_eq!(v("v2.0.0-rc.1+sha.abc").to_string(), "2.0.0-rc.1+sha.abc");
        assert!(v("1.0.0").is_stable());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "1", "1.2", "1.2.3.4", "a.b.c", "1.2.3-", "1.2.3+", "1..3", "1.2.3-be ta"] {
            assert!(Version::parse(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_ordering() {
        assert!(v("1.0.0-alpha") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert!(v("1.0.0-alpha.2") < v("1.0.0-alpha.10"));
        assert!(v("1.0.0-beta") > v("1.0.0-alpha.10"));
        assert!(v("1.10.0") > v("1.9.9"));
        assert_eq!(v("1.0.0+a"), v("1.0.0+b"));
    }

    #[test]
    fn test_update_type() {
        let current = v("1.2.3");
        assert_eq!(current.update_type(&v("2.0.0")), Some(UpdateType::Major));
        assert_eq!(current.update_type(&v("1.3.0")), Some(UpdateType::Minor));
        assert_eq!(current.update_type(&v("1.2.4")), Some(UpdateType::Patch));
        assert_eq!(v("1.2.3-beta").update_type(&v("1.2.3")), Some(UpdateType::Prerelease));
        assert_eq!(current.update_type(&v("1.2.3")), None);
        assert_eq!(current.update_type(&v("1.0.0")), None);
    }

    #[test]
    fn test_current_matches_package() {
        assert_eq!(Version::current().to_string(), env!("CARGO_PKG_VERSION"));
    }
}
