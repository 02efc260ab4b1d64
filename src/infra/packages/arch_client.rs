use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::core::packages::{Package, PackageError, PackageIndex};

/// Client for the official package search of archlinux.org. Only exact name
/// matches are considered and the AUR is not searched.
pub struct ArchPackageClient {
    client: Client,
    base_url: String,
}

impl ArchPackageClient {
    pub fn new() -> Result<Self, PackageError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert(
            "User-Agent",
            HeaderValue::from_static(concat!("archer-bot/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| PackageError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: "https://archlinux.org".to_string(),
        })
    }

    fn parse_datetime(value: Option<&str>) -> Option<DateTime<Utc>> {
        value
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Pick the stable build of `name` from a search response. Testing
    /// repositories only count when nothing else matches.
    fn select(name: &str, response: ApiSearch) -> Result<Option<Package>, PackageError> {
        let mut candidates: Vec<ApiPackage> = response
            .results
            .into_iter()
            .filter(|p| p.pkgname == name)
            .collect();
        candidates.sort_by_key(|p| p.repo.as_deref().is_some_and(|r| r.ends_with("testing")));

        let Some(api) = candidates.into_iter().next() else {
            return Ok(None);
        };

        let build_date = Self::parse_datetime(api.build_date.as_deref()).ok_or_else(|| {
            PackageError::InvalidResponse(format!("bad build date for {}", api.pkgname))
        })?;
        let last_update = Self::parse_datetime(api.last_update.as_deref()).unwrap_or(build_date);

        Ok(Some(Package {
            version: Package::format_version(api.epoch.unwrap_or(0), &api.pkgver, &api.pkgrel),
            name: api.pkgname,
            size: api.installed_size.unwrap_or_default(),
            build_date,
            last_update,
        }))
    }
}

#[async_trait]
impl PackageIndex for ArchPackageClient {
    async fn lookup(&self, name: &str) -> Result<Option<Package>, PackageError> {
        let url = format!("{}/packages/search/json/", self.base_url);
        let resp = self
            .client
            .get(url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| PackageError::Request(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(PackageError::Request(format!(
                "archlinux.org returned {} for {}",
                resp.status(),
                name
            )));
        }

        let search: ApiSearch = resp
            .json()
            .await
            .map_err(|e| PackageError::InvalidResponse(e.to_string()))?;
        tracing::debug!(package = name, results = search.results.len(), "Package search done");
        Self::select(name, search)
    }
}

// --------------------
// API response types
// --------------------

#[derive(Debug, Deserialize)]
struct ApiSearch {
    #[serde(default)]
    results: Vec<ApiPackage>,
}

#[derive(Debug, Deserialize)]
struct ApiPackage {
    pkgname: String,
    pkgver: String,
    pkgrel: String,
    epoch: Option<u32>,
    repo: Option<String>,
    installed_size: Option<u64>,
    build_date: Option<String>,
    last_update: Option<String>,
}
