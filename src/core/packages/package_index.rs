// Package lookup port. The bot only needs a small summary of an official
// Arch Linux package; where it comes from is an infra concern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

const MIB: f64 = 1024.0 * 1024.0;
const KIB: f64 = 1024.0;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Package index request failed: {0}")]
    Request(String),

    #[error("Package index returned an unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    /// `[epoch:]pkgver-pkgrel`
    pub version: String,
    /// Installed size in bytes.
    pub size: u64,
    pub build_date: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

impl Package {
    pub fn format_version(epoch: u32, pkgver: &str, pkgrel: &str) -> String {
        if epoch > 0 {
            format!("{}:{}-{}", epoch, pkgver, pkgrel)
        } else {
            format!("{}-{}", pkgver, pkgrel)
        }
    }

    /// MiB once the package reaches one MiB, KiB below that.
    pub fn human_size(&self) -> String {
        let bytes = self.size as f64;
        if bytes >= MIB {
            format!("{:.4} MiB", bytes / MIB)
        } else {
            format!("{:.4} KiB", bytes / KIB)
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: `{}`", self.name)?;
        writeln!(f, "Version: `{}`", self.version)?;
        writeln!(f, "Größe: `{}`", self.human_size())?;
        writeln!(
            f,
            "Erstellungsdatum: `{}`",
            self.build_date.format("%d.%m.%Y, %B")
        )?;
        write!(
            f,
            "Zuletzt aktualisiert: `{}`",
            self.last_update.format("%d.%m.%Y")
        )
    }
}

#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// `Ok(None)` when no official package has exactly this name.
    async fn lookup(&self, name: &str) -> Result<Option<Package>, PackageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn package(size: u64) -> Package {
        let date = Utc.with_ymd_and_hms(2021, 4, 3, 12, 0, 0).unwrap();
        Package {
            name: "pacman".into(),
            version: Package::format_version(0, "6.0.0", "1"),
            size,
            build_date: date,
            last_update: date,
        }
    }

    #[test]
    fn version_includes_epoch_only_when_set() {
        assert_eq!(Package::format_version(0, "1.2", "3"), "1.2-3");
        assert_eq!(Package::format_version(2, "1.2", "3"), "2:1.2-3");
    }

    #[test]
    fn size_switches_units_at_one_mib() {
        assert_eq!(package(512).human_size(), "0.5000 KiB");
        assert_eq!(package(1024 * 1024 - 1).human_size(), "1023.9990 KiB");
        assert_eq!(package(3 * 1024 * 1024 / 2).human_size(), "1.5000 MiB");
    }

    #[test]
    fn display_lists_the_summary() {
        let text = package(2048).to_string();
        assert_eq!(
            text,
            "Name: `pacman`\nVersion: `6.0.0-1`\nGröße: `2.0000 KiB`\nErstellungsdatum: `03.04.2021, April`\nZuletzt aktualisiert: `03.04.2021`"
        );
    }
}
