use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::error::{Result, RuntimeError};
use crate::reporter::InstallReporter;

/// Streams a compressed tar archive into `dest`.
///
/// Entries are visited in archive order and `reporter.entry` fires for
/// each one. Re-running over a partially written destination rewrites
/// only files whose length differs from the archive entry, so a
/// repeated extraction is cheap and produces identical output.
///
/// Symlink creation failures are logged and skipped; restricted
/// environments frequently deny symlinks and the runtime still works
/// without them. Every other I/O failure aborts the extraction.
pub fn extract_archive<R: Read>(
    stream: R,
    dest: &Path,
    reporter: &dyn InstallReporter,
) -> Result<()> {
    fs::create_dir_all(dest)
        .map_err(|e| RuntimeError::io(format!("Create {}", dest.display()), e))?;

    let mut archive = Archive::new(GzDecoder::new(stream));
    let entries = archive
        .entries()
        .map_err(|e| RuntimeError::io("Open archive", e))?;

    for entry in entries {
        if reporter.is_cancelled() {
            return Err(RuntimeError::Cancelled);
        }

        let mut entry = entry.map_err(|e| RuntimeError::io("Read archive entry", e))?;
        let rel = entry
            .path()
            .map_err(|e| RuntimeError::io("Read archive entry path", e))?
            .into_owned();
        reporter.entry(&rel.to_string_lossy());

        let target = dest.join(&rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RuntimeError::io(format!("Create {}", parent.display()), e))?;
        }

        match entry.header().entry_type() {
            EntryType::Symlink => {
                let link = entry
                    .link_name()
                    .map_err(|e| RuntimeError::io("Read symlink target", e))?;
                match link {
                    Some(link) => {
                        if let Err(e) = make_symlink(&link, &target) {
                            log::warn!(
                                "Could not create symlink {} -> {}: {}",
                                target.display(),
                                link.display(),
                                e
                            );
                        }
                    }
                    None => log::warn!("Symlink entry {} has no target, skipping", rel.display()),
                }
            }
            EntryType::Directory => {
                fs::create_dir_all(&target)
                    .map_err(|e| RuntimeError::io(format!("Create {}", target.display()), e))?;
            }
            _ => {
                let size = entry
                    .header()
                    .size()
                    .map_err(|e| RuntimeError::io("Read archive entry size", e))?;
                if needs_write(&target, size) {
                    let mut out = File::create(&target)
                        .map_err(|e| RuntimeError::io(format!("Create {}", target.display()), e))?;
                    io::copy(&mut entry, &mut out)
                        .map_err(|e| RuntimeError::io(format!("Write {}", target.display()), e))?;
                }
            }
        }
    }

    Ok(())
}

fn needs_write(target: &Path, size: u64) -> bool {
    match fs::metadata(target) {
        Ok(meta) => meta.len() != size,
        Err(_) => true,
    }
}

#[cfg(unix)]
fn make_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(link, target)
}

#[cfg(not(unix))]
fn make_symlink(_link: &Path, _target: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::SilentReporter;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::sync::Mutex;

    struct RecordingReporter {
        entries: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn new() -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
            }
        }
    }

    impl InstallReporter for RecordingReporter {
        fn set_percent(&self, _percent: i32) {}
        fn entry(&self, name: &str) {
            self.entries.lock().unwrap().push(name.to_string());
        }
    }

    fn archive_with(files: &[(&str, &[u8])], symlinks: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());

        let mut dir_header = tar::Header::new_gnu();
        dir_header.set_entry_type(EntryType::Directory);
        dir_header.set_size(0);
        dir_header.set_mode(0o755);
        builder
            .append_data(&mut dir_header, "bin/", io::empty())
            .unwrap();

        for (path, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, path, *data).unwrap();
        }
        for (path, link) in symlinks {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(EntryType::Symlink);
            header.set_size(0);
            header.set_mode(0o777);
            header.set_link_name(link).unwrap();
            builder.append_data(&mut header, path, io::empty()).unwrap();
        }
        let tar_bytes = builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn extracts_files_directories_and_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("jre");
        let archive = archive_with(
            &[("bin/java", b"#!bin"), ("release", b"JAVA_VERSION=\"17\"")],
            &[("bin/java-link", "java")],
        );

        let reporter = RecordingReporter::new();
        extract_archive(archive.as_slice(), &dest, &reporter).unwrap();

        assert_eq!(fs::read(dest.join("bin/java")).unwrap(), b"#!bin");
        assert!(dest.join("release").exists());
        assert_eq!(reporter.entries.lock().unwrap().len(), 4);

        #[cfg(unix)]
        {
            let link = dest.join("bin/java-link");
            assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
            assert_eq!(fs::read_link(&link).unwrap(), Path::new("java"));
        }
    }

    #[test]
    fn second_pass_skips_files_with_matching_length() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("jre");
        let archive = archive_with(&[("bin/java", b"12345")], &[]);

        extract_archive(archive.as_slice(), &dest, &SilentReporter).unwrap();

        // Same length, different bytes: an idempotent pass must not rewrite.
        fs::write(dest.join("bin/java"), b"ABCDE").unwrap();
        extract_archive(archive.as_slice(), &dest, &SilentReporter).unwrap();
        assert_eq!(fs::read(dest.join("bin/java")).unwrap(), b"ABCDE");

        // Length mismatch gets rewritten.
        fs::write(dest.join("bin/java"), b"AB").unwrap();
        extract_archive(archive.as_slice(), &dest, &SilentReporter).unwrap();
        assert_eq!(fs::read(dest.join("bin/java")).unwrap(), b"12345");
    }

    #[test]
    fn truncated_stream_propagates_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("jre");
        let archive = archive_with(&[("bin/java", b"12345")], &[]);

        let err = extract_archive(&archive[..archive.len() / 2], &dest, &SilentReporter);
        assert!(matches!(err, Err(RuntimeError::Io { .. })));
    }

    #[test]
    fn cancellation_stops_before_the_first_entry() {
        struct Cancelled;
        impl InstallReporter for Cancelled {
            fn set_percent(&self, _percent: i32) {}
            fn entry(&self, _name: &str) {}
            fn is_cancelled(&self) -> bool {
                true
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("jre");
        let archive = archive_with(&[("bin/java", b"12345")], &[]);

        let err = extract_archive(archive.as_slice(), &dest, &Cancelled);
        assert!(matches!(err, Err(RuntimeError::Cancelled)));
        assert!(!dest.join("bin/java").exists());
    }
}
