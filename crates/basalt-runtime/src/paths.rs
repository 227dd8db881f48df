use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::runtime::installer::RuntimeInstaller;
use crate::runtime::registry::RuntimeRegistry;
use crate::runtime::unpack::CommandUnpacker;

/// Filesystem anchors supplied by the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherPaths {
    /// Directory holding one subdirectory per installed runtime.
    pub runtime_root: PathBuf,
    /// Directory with the launcher's packaged native artifacts (the
    /// unpack helper and the xawt bridge library).
    pub native_lib_dir: PathBuf,
}

impl LauncherPaths {
    pub fn new(runtime_root: impl Into<PathBuf>, native_lib_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime_root: runtime_root.into(),
            native_lib_dir: native_lib_dir.into(),
        }
    }

    /// Builds the registry/installer pair wired to the real unpack
    /// helper. The registry handle is shared; clone it freely.
    pub fn bootstrap(self) -> (Arc<RuntimeRegistry>, RuntimeInstaller) {
        let registry = Arc::new(RuntimeRegistry::new(self.runtime_root));
        let unpacker = Arc::new(CommandUnpacker::new(self.native_lib_dir.clone()));
        let installer = RuntimeInstaller::new(registry.clone(), self.native_lib_dir, unpacker);
        (registry, installer)
    }
}
