use crate::runtime::registry::RuntimeRegistry;

/// Runtimes shipped inside the launcher package as bin-packs.
///
/// Each ships as a universal payload plus a per-architecture binary
/// payload under `asset_path`, stamped with a plain version tag instead
/// of embedded release metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundledRuntime {
    Jre8,
    Jre17,
    Jre21,
}

impl BundledRuntime {
    pub const ALL: [BundledRuntime; 3] = [Self::Jre8, Self::Jre17, Self::Jre21];

    /// Registry name, which doubles as the install directory name.
    pub fn runtime_name(&self) -> &'static str {
        match self {
            Self::Jre8 => "Internal-8",
            Self::Jre17 => "Internal-17",
            Self::Jre21 => "Internal-21",
        }
    }

    /// Location of the packaged payloads inside the application bundle.
    pub fn asset_path(&self) -> &'static str {
        match self {
            Self::Jre8 => "runtimes/jre-8",
            Self::Jre17 => "runtimes/jre-17",
            Self::Jre21 => "runtimes/jre-21",
        }
    }

    pub fn major_version(&self) -> u32 {
        match self {
            Self::Jre8 => 8,
            Self::Jre17 => 17,
            Self::Jre21 => 21,
        }
    }

    pub(crate) fn is_bundled(name: &str) -> bool {
        Self::ALL.iter().any(|jre| jre.runtime_name() == name)
    }

    /// Whether the installed copy is missing or carries a different
    /// version tag than the packaged one.
    pub fn needs_reinstall(&self, registry: &RuntimeRegistry, packaged_version: &str) -> bool {
        registry
            .bin_pack_version(self.runtime_name())
            .map_or(true, |installed| installed != packaged_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_names_are_recognized() {
        assert!(BundledRuntime::is_bundled("Internal-17"));
        assert!(!BundledRuntime::is_bundled("temurin-17"));
    }

    #[test]
    fn reinstall_needed_until_version_tags_match() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = RuntimeRegistry::new(tmp.path());
        let jre = BundledRuntime::Jre17;

        assert!(jre.needs_reinstall(&registry, "3.2.0"));

        let dir = registry.runtime_dir(jre.runtime_name());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("version"), "3.2.0").unwrap();
        assert!(!jre.needs_reinstall(&registry, "3.2.0"));
        assert!(jre.needs_reinstall(&registry, "3.3.0"));
    }
}
