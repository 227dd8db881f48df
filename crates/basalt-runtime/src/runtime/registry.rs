use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::bundled::BundledRuntime;
use crate::error::{Result, RuntimeError};
use crate::runtime::descriptor::{major_from_version, ReleaseInfo, RuntimeDescriptor};
use crate::runtime::matcher::find_nearest_at_least;
use crate::utils::version::compare_versions;

const RELEASE_FILE: &str = "release";
const VERSION_TAG_FILE: &str = "version";
const JAVA_VERSION_MARKER: &str = "JAVA_VERSION=\"";
const OS_ARCH_MARKER: &str = "OS_ARCH=\"";

/// Concurrent cache of installed runtimes, keyed by directory name.
///
/// One instance lives for the whole process and is shared by handle.
/// Reads never block unrelated keys; writes are exclusive per key, and
/// a reload race resolves as last-writer-wins.
pub struct RuntimeRegistry {
    root: PathBuf,
    cache: DashMap<String, RuntimeDescriptor>,
}

impl RuntimeRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: DashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a runtime occupies, whether or not it is installed.
    pub fn runtime_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// All installed runtimes, newest version first. Runtimes without a
    /// version string sort by name instead.
    pub fn list_runtimes(&self, force_reload: bool) -> Result<Vec<RuntimeDescriptor>> {
        if !self.root.exists() {
            log::warn!("Runtime directory not found: {}", self.root.display());
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| RuntimeError::StorageUnavailable {
            path: self.root.clone(),
            source: e,
        })?;

        let mut runtimes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RuntimeError::StorageUnavailable {
                path: self.root.clone(),
                source: e,
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            runtimes.push(self.load_runtime(&name, force_reload));
        }

        runtimes.sort_by(|a, b| {
            let left = a.version_string().unwrap_or(a.name.as_str());
            let right = b.version_string().unwrap_or(b.name.as_str());
            compare_versions(right, left)
        });
        Ok(runtimes)
    }

    /// Loads one runtime, from cache unless `force_reload` is set.
    ///
    /// Missing or malformed metadata is not an error: the runtime is
    /// cached as a placeholder so it stays visible and removable.
    pub fn load_runtime(&self, name: &str, force_reload: bool) -> RuntimeDescriptor {
        if !force_reload {
            if let Some(cached) = self.cache.get(name) {
                return cached.clone();
            }
        }

        let descriptor = self.parse_runtime(name);
        self.cache.insert(name.to_string(), descriptor.clone());
        descriptor
    }

    /// Evicts the cache entry and reparses from disk.
    pub fn force_reload(&self, name: &str) -> RuntimeDescriptor {
        self.cache.remove(name);
        self.load_runtime(name, true)
    }

    /// Deletes a runtime from disk and drops it from the cache. Nothing
    /// happens when the directory is already absent.
    pub fn remove_runtime(&self, name: &str) -> Result<()> {
        let dir = self.runtime_dir(name);
        if !dir.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&dir)
            .map_err(|e| RuntimeError::io(format!("Remove runtime {}", name), e))?;
        self.cache.remove(name);
        Ok(())
    }

    /// Launch-readiness gate: the directory must exist and a fresh parse
    /// must yield usable version info.
    pub fn runtime_home(&self, name: &str) -> Result<PathBuf> {
        let dir = self.runtime_dir(name);
        if !dir.exists() || self.force_reload(name).release.is_none() {
            return Err(RuntimeError::BrokenRuntime {
                name: name.to_string(),
            });
        }
        Ok(dir)
    }

    /// Name of an installed runtime whose major version matches exactly.
    pub fn exact_runtime_for(&self, major: u32) -> Result<Option<String>> {
        Ok(self
            .list_runtimes(false)?
            .into_iter()
            .find(|r| r.major_version() == major)
            .map(|r| r.name))
    }

    /// Name of the closest installed runtime at or above `major`.
    pub fn nearest_runtime_for(&self, major: u32) -> Result<Option<String>> {
        let runtimes = self.list_runtimes(false)?;
        Ok(find_nearest_at_least(major, runtimes, |r| r.major_version()).map(|m| m.value.name))
    }

    /// Version tag stamped by bin-pack installs. Plain read, no parsing;
    /// `None` when absent or unreadable.
    pub fn bin_pack_version(&self, name: &str) -> Option<String> {
        let version_file = self.runtime_dir(name).join(VERSION_TAG_FILE);
        if !version_file.exists() {
            return None;
        }
        fs::read_to_string(&version_file).ok()
    }

    fn parse_runtime(&self, name: &str) -> RuntimeDescriptor {
        let dir = self.runtime_dir(name);
        let release_file = dir.join(RELEASE_FILE);
        if !release_file.exists() {
            return RuntimeDescriptor::unreadable(name);
        }

        let content = match fs::read_to_string(&release_file) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to read release metadata for {}: {}", name, e);
                return RuntimeDescriptor::unreadable(name);
            }
        };

        let version = extract_between(&content, JAVA_VERSION_MARKER, '"');
        let arch = extract_between(&content, OS_ARCH_MARKER, '"');
        match (version, arch) {
            (Some(version), Some(arch)) => RuntimeDescriptor {
                name: name.to_string(),
                release: Some(ReleaseInfo {
                    major_version: major_from_version(version),
                    version: version.to_string(),
                    arch: arch.to_string(),
                }),
                is_bundled: BundledRuntime::is_bundled(name),
                is_legacy_layout: is_legacy_layout(&dir),
            },
            _ => RuntimeDescriptor::unreadable(name),
        }
    }
}

/// Older distributions nest a `jre/` tree next to a full JDK `bin/javac`.
pub fn is_legacy_layout(runtime_dir: &Path) -> bool {
    runtime_dir.join("jre").exists() && runtime_dir.join("bin/javac").exists()
}

/// Returns the substring following `marker`, up to but excluding the
/// next `terminator`.
fn extract_between<'a>(content: &'a str, marker: &str, terminator: char) -> Option<&'a str> {
    let start = content.find(marker)? + marker.len();
    let rest = &content[start..];
    Some(&rest[..rest.find(terminator)?])
}
