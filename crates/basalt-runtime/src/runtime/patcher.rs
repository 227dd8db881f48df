use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RuntimeError};

const VERSIONED_FREETYPE: &str = "libfreetype.so.6";
const FREETYPE: &str = "libfreetype.so";
const XAWT_SHIM: &str = "libawt_xawt.so";

/// Deterministic fix-ups applied after a runtime is extracted.
///
/// Safe to run repeatedly over the same tree. The freetype rename is
/// fatal on failure: a runtime without a text-rendering library breaks
/// at launch time, not here, so the install has to fail instead.
pub fn patch_runtime(
    home: &Path,
    arch: Option<&str>,
    is_legacy_layout: bool,
    native_lib_dir: &Path,
) -> Result<()> {
    if !home.exists() {
        return Ok(());
    }

    let lib_dir = resolve_lib_dir(home, arch, is_legacy_layout);

    let versioned = lib_dir.join(VERSIONED_FREETYPE);
    let unversioned = lib_dir.join(FREETYPE);
    if versioned.exists() && (!unversioned.exists() || file_len(&versioned) != file_len(&unversioned))
    {
        fs::rename(&versioned, &unversioned)
            .map_err(|e| RuntimeError::io("Rename freetype library", e))?;
    }

    // Legacy layouts run the rename again against the final name; a
    // failure in this pass is not fatal.
    if is_legacy_layout && unversioned.exists() {
        let _ = fs::rename(&unversioned, &unversioned);
    }

    let shim_src = native_lib_dir.join(XAWT_SHIM);
    let shim_dest = lib_dir.join(XAWT_SHIM);
    if shim_dest.exists() {
        fs::remove_file(&shim_dest)
            .map_err(|e| RuntimeError::io("Replace xawt bridge library", e))?;
    }
    fs::copy(&shim_src, &shim_dest)
        .map_err(|e| RuntimeError::io("Copy xawt bridge library", e))?;

    Ok(())
}

/// `lib`, refined to `lib/<arch>` when that subdirectory exists, nested
/// under `jre/` for legacy layouts. The arch probe runs against the
/// non-legacy location first; that ordering is load-bearing.
fn resolve_lib_dir(home: &Path, arch: Option<&str>, is_legacy_layout: bool) -> PathBuf {
    let mut rel = PathBuf::from("lib");
    if let Some(arch) = arch {
        if home.join("lib").join(arch).exists() {
            rel.push(arch);
        }
    }
    if is_legacy_layout {
        rel = Path::new("jre").join(rel);
    }
    home.join(rel)
}

fn file_len(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
