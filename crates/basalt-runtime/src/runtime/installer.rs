use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::{Result, RuntimeError};
use crate::reporter::InstallReporter;
use crate::runtime::descriptor::RuntimeDescriptor;
use crate::runtime::extract::extract_archive;
use crate::runtime::patcher::patch_runtime;
use crate::runtime::registry::{is_legacy_layout, RuntimeRegistry};
use crate::runtime::unpack::PackUnpacker;

const VERSION_TAG_FILE: &str = "version";
const PACK_EXTENSION: &str = "pack";

/// Drives install-or-replace operations end to end.
///
/// Stages run strictly in sequence per destination; installs of
/// different runtimes may run concurrently. Any failure, including
/// cancellation, deletes the destination before the error surfaces, so
/// callers never observe a half-installed runtime.
pub struct RuntimeInstaller {
    registry: Arc<RuntimeRegistry>,
    native_lib_dir: PathBuf,
    unpacker: Arc<dyn PackUnpacker>,
}

impl RuntimeInstaller {
    pub fn new(
        registry: Arc<RuntimeRegistry>,
        native_lib_dir: impl Into<PathBuf>,
        unpacker: Arc<dyn PackUnpacker>,
    ) -> Self {
        Self {
            registry,
            native_lib_dir: native_lib_dir.into(),
            unpacker,
        }
    }

    /// Installs a runtime from a single compressed archive, replacing
    /// any prior install under the same name.
    pub async fn install_runtime<R>(
        &self,
        stream: R,
        name: &str,
        reporter: Arc<dyn InstallReporter>,
    ) -> Result<RuntimeDescriptor>
    where
        R: Read + Send + 'static,
    {
        self.run_install(
            name,
            reporter,
            move |dest, reporter| extract_archive(stream, dest, reporter),
            None,
        )
        .await
    }

    /// Installs a runtime packaged as a universal payload plus a
    /// platform-specific binary payload, stamping `version_tag` into the
    /// destination on success. Used for runtimes whose packaging carries
    /// no embedded release metadata.
    pub async fn install_bin_pack<U, P>(
        &self,
        universal: U,
        platform_bins: P,
        name: &str,
        version_tag: &str,
        reporter: Arc<dyn InstallReporter>,
    ) -> Result<RuntimeDescriptor>
    where
        U: Read + Send + 'static,
        P: Read + Send + 'static,
    {
        self.run_install(
            name,
            reporter,
            move |dest, reporter| {
                extract_archive(universal, dest, reporter)?;
                extract_archive(platform_bins, dest, reporter)
            },
            Some(version_tag.to_string()),
        )
        .await
    }

    async fn run_install<F>(
        &self,
        name: &str,
        reporter: Arc<dyn InstallReporter>,
        extract: F,
        version_tag: Option<String>,
    ) -> Result<RuntimeDescriptor>
    where
        F: FnOnce(&Path, &dyn InstallReporter) -> Result<()> + Send + 'static,
    {
        let dest = self.registry.runtime_dir(name);
        log::info!("Installing runtime {} into {}", name, dest.display());

        match self
            .run_stages(&dest, name, reporter, extract, version_tag)
            .await
        {
            Ok(()) => Ok(self.registry.force_reload(name)),
            Err(err) => {
                log::warn!("Install of {} failed, rolling back: {}", name, err);
                rollback(&dest);
                Err(err)
            }
        }
    }

    async fn run_stages<F>(
        &self,
        dest: &Path,
        name: &str,
        reporter: Arc<dyn InstallReporter>,
        extract: F,
        version_tag: Option<String>,
    ) -> Result<()>
    where
        F: FnOnce(&Path, &dyn InstallReporter) -> Result<()> + Send + 'static,
    {
        if dest.exists() {
            tokio::fs::remove_dir_all(dest)
                .await
                .map_err(|e| RuntimeError::io(format!("Remove stale {}", dest.display()), e))?;
        }

        reporter.set_percent(-1);
        {
            let dest = dest.to_path_buf();
            let reporter = reporter.clone();
            run_blocking(move || extract(&dest, reporter.as_ref())).await?;
        }

        self.unpack_legacy_classes(dest, reporter.clone()).await?;

        let arch = self
            .registry
            .load_runtime(name, true)
            .release
            .map(|r| r.arch);
        {
            let dest = dest.to_path_buf();
            let native_lib_dir = self.native_lib_dir.clone();
            run_blocking(move || {
                let legacy = is_legacy_layout(&dest);
                patch_runtime(&dest, arch.as_deref(), legacy, &native_lib_dir)
            })
            .await?;
        }

        if let Some(tag) = version_tag {
            tokio::fs::write(dest.join(VERSION_TAG_FILE), tag)
                .await
                .map_err(|e| RuntimeError::io("Write version tag", e))?;
        }

        Ok(())
    }

    /// Unpacks legacy compressed-class files left behind by extraction.
    ///
    /// Files are processed one at a time so at most one helper process
    /// runs per install; a failed unpack is logged and skipped, since
    /// the remaining files are still worth converting.
    async fn unpack_legacy_classes(
        &self,
        dest: &Path,
        reporter: Arc<dyn InstallReporter>,
    ) -> Result<()> {
        let unpacker = self.unpacker.clone();
        let dest = dest.to_path_buf();

        run_blocking(move || {
            let packs: Vec<PathBuf> = WalkDir::new(&dest)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| path.extension().is_some_and(|ext| ext == PACK_EXTENSION))
                .collect();

            for pack in packs {
                if reporter.is_cancelled() {
                    return Err(RuntimeError::Cancelled);
                }
                let unpacked = pack.with_extension("");
                if let Err(e) = unpacker.unpack(&pack, &unpacked) {
                    log::error!("Failed to unpack {}: {}", pack.display(), e);
                }
            }
            Ok(())
        })
        .await
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RuntimeError::io("Join install worker", io::Error::other(e)))?
}

fn rollback(dest: &Path) {
    if !dest.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(dest) {
        log::error!("Rollback could not remove {}: {}", dest.display(), e);
    }
}
