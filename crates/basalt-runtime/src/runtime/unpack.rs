use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Capability to unpack one legacy compressed-class file into a sibling
/// destination. Injected into the installer so installs can be tested
/// without spawning real processes.
pub trait PackUnpacker: Send + Sync {
    fn unpack(&self, pack_file: &Path, dest: &Path) -> io::Result<()>;
}

/// Runs the launcher-supplied unpack helper as an external process.
///
/// The helper ships next to the other native libraries and is invoked
/// with that directory as working directory, one file at a time.
pub struct CommandUnpacker {
    native_lib_dir: PathBuf,
}

impl CommandUnpacker {
    const HELPER: &'static str = "./libunpack200.so";

    pub fn new(native_lib_dir: impl Into<PathBuf>) -> Self {
        Self {
            native_lib_dir: native_lib_dir.into(),
        }
    }
}

impl PackUnpacker for CommandUnpacker {
    fn unpack(&self, pack_file: &Path, dest: &Path) -> io::Result<()> {
        let status = Command::new(Self::HELPER)
            .current_dir(&self.native_lib_dir)
            .arg("-r")
            .arg(pack_file)
            .arg(dest)
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!(
                "unpack helper exited with {}",
                status
            )));
        }
        Ok(())
    }
}
