//! Archive creation and extraction.
//!
//! Both formats are written deterministically: entries in sorted order with
//! normalized timestamps and ownership, so the same bundle tree always
//! produces the same archive bytes. File permission bits are kept as they
//! are on disk.
//!
//! Everything here is blocking IO; async callers wrap it in
//! `tokio::task::spawn_blocking`.

use super::error::{Error, ErrorExt, Result};
use super::settings::ArchiveFormat;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Compresses `src_dir` into `dest`.
///
/// Entries are stored under the final component of `src_dir`, so
/// unpacking the archive recreates the directory itself.
pub fn create_archive(src_dir: &Path, dest: &Path, format: ArchiveFormat) -> Result<()> {
    let Some(root_name) = src_dir.file_name().map(PathBuf::from) else {
        crate::bail!("cannot archive {}: no directory name", src_dir.display());
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }

    log::debug!("Archiving {} into {}", src_dir.display(), dest.display());
    match format {
        ArchiveFormat::TarGz => write_tar_gz(src_dir, &root_name, dest),
        ArchiveFormat::Zip => write_zip(src_dir, &root_name, dest),
    }
}

/// Extracts `archive` into `dest_dir`, returning the files written.
///
/// Entries that would land outside `dest_dir` abort the extraction.
pub fn extract_archive(archive: &Path, dest_dir: &Path, format: ArchiveFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest_dir).fs_context("creating directory", dest_dir)?;

    match format {
        ArchiveFormat::TarGz => extract_tar_gz(archive, dest_dir),
        ArchiveFormat::Zip => extract_zip(archive, dest_dir),
    }
}

/// Gzip-compresses a single file.
pub fn gzip_file(src: &Path, dest: &Path) -> Result<u64> {
    let mut input = BufReader::new(File::open(src).fs_context("opening", src)?);
    let output = BufWriter::new(File::create(dest).fs_context("creating", dest)?);

    let mut encoder = GzEncoder::new(output, Compression::default());
    let copied = io::copy(&mut input, &mut encoder).fs_context("compressing", src)?;
    encoder
        .finish()
        .and_then(|mut w| w.flush())
        .fs_context("finishing", dest)?;

    Ok(copied)
}

/// Walks `src_dir` in sorted order, yielding `(path, name inside archive, is_dir)`.
fn sorted_entries(src_dir: &Path, root_name: &Path) -> Result<Vec<(PathBuf, PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|e| Error::GenericError(e.to_string()))?;
        entries.push((
            entry.path().to_path_buf(),
            root_name.join(relative),
            entry.file_type().is_dir(),
        ));
    }
    Ok(entries)
}

fn write_tar_gz(src_dir: &Path, root_name: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest).fs_context("creating", dest)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);
    builder.follow_symlinks(false);

    for (path, name, is_dir) in sorted_entries(src_dir, root_name)? {
        if is_dir {
            builder.append_dir(&name, &path).fs_context("archiving", &path)?;
            continue;
        }

        // Deterministic mode would normalize permissions to 0644/0755 and
        // lose the read-only manifest, so the file's own mode is kept.
        let metadata = fs::metadata(&path).fs_context("reading metadata of", &path)?;
        let mut header = tar::Header::new_gnu();
        header.set_metadata_in_mode(&metadata, tar::HeaderMode::Deterministic);
        header.set_mode(entry_mode(&metadata));
        let input = File::open(&path).fs_context("opening", &path)?;
        builder
            .append_data(&mut header, &name, input)
            .fs_context("archiving", &path)?;
    }

    builder
        .into_inner()
        .and_then(GzEncoder::finish)
        .and_then(|mut w| w.flush())
        .fs_context("finishing", dest)?;
    Ok(())
}

fn write_zip(src_dir: &Path, root_name: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest).fs_context("creating", dest)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let base_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for (path, name, is_dir) in sorted_entries(src_dir, root_name)? {
        // Zip entry names always use forward slashes.
        let name = name
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if is_dir {
            zip.add_directory(format!("{name}/"), base_options)?;
            continue;
        }

        let metadata = fs::metadata(&path).fs_context("reading metadata of", &path)?;
        let options = base_options.unix_permissions(entry_mode(&metadata));
        zip.start_file(name, options)?;
        let mut input = File::open(&path).fs_context("opening", &path)?;
        io::copy(&mut input, &mut zip).fs_context("archiving", &path)?;
    }

    zip.finish()?.flush().fs_context("finishing", dest)?;
    Ok(())
}

/// Permission bits stored for a file entry.
#[cfg(unix)]
fn entry_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn entry_mode(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}

fn extract_tar_gz(archive: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive).fs_context("opening", archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    tar.set_preserve_permissions(true);

    let mut extracted = Vec::new();
    for entry in tar.entries().fs_context("reading", archive)? {
        let mut entry = entry.fs_context("reading", archive)?;
        let relative = entry.path().fs_context("reading", archive)?.into_owned();

        // unpack_in refuses `..` and absolute paths by returning false
        if !entry.unpack_in(dest_dir).fs_context("extracting", &relative)? {
            return Err(Error::UnsafeEntry(relative));
        }
        if entry.header().entry_type().is_file() {
            extracted.push(dest_dir.join(relative));
        }
    }

    Ok(extracted)
}

fn extract_zip(archive: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive).fs_context("opening", archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;

    let mut extracted = Vec::new();
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(Error::UnsafeEntry(PathBuf::from(entry.name())));
        };
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).fs_context("creating directory", &target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }
        let mut output = File::create(&target).fs_context("creating", &target)?;
        io::copy(&mut entry, &mut output).fs_context("extracting", &target)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))
                .fs_context("setting permissions on", &target)?;
        }

        extracted.push(target);
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree(root: &Path) -> PathBuf {
        let bundle = root.join("daprbundle");
        fs::create_dir_all(bundle.join("dist")).unwrap();
        fs::write(bundle.join("dist/daprd_linux_amd64.tar.gz"), b"daprd").unwrap();
        fs::write(bundle.join("details.json"), b"{}").unwrap();
        bundle
    }

    #[test]
    fn tar_gz_unpacks_under_bundle_name() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = sample_tree(tmp.path());
        let archive = tmp.path().join("archive/out.tar.gz");

        create_archive(&bundle, &archive, ArchiveFormat::TarGz).unwrap();

        let unpacked = tmp.path().join("unpacked");
        let files = extract_archive(&archive, &unpacked, ArchiveFormat::TarGz).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(
            fs::read(unpacked.join("daprbundle/dist/daprd_linux_amd64.tar.gz")).unwrap(),
            b"daprd"
        );
    }

    #[test]
    fn zip_unpacks_under_bundle_name() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = sample_tree(tmp.path());
        let archive = tmp.path().join("out.zip");

        create_archive(&bundle, &archive, ArchiveFormat::Zip).unwrap();

        let unpacked = tmp.path().join("unpacked");
        extract_archive(&archive, &unpacked, ArchiveFormat::Zip).unwrap();
        assert_eq!(fs::read(unpacked.join("daprbundle/details.json")).unwrap(), b"{}");
        assert!(unpacked.join("daprbundle/dist").is_dir());
    }

    #[test]
    fn archives_are_reproducible() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = sample_tree(tmp.path());
        let first = tmp.path().join("first.tar.gz");
        let second = tmp.path().join("second.tar.gz");

        create_archive(&bundle, &first, ArchiveFormat::TarGz).unwrap();
        create_archive(&bundle, &second, ArchiveFormat::TarGz).unwrap();

        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn tar_gz_keeps_read_only_modes() {
        use std::io::Read;
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let bundle = sample_tree(tmp.path());
        fs::set_permissions(bundle.join("details.json"), fs::Permissions::from_mode(0o444))
            .unwrap();
        let archive = tmp.path().join("out.tar.gz");

        create_archive(&bundle, &archive, ArchiveFormat::TarGz).unwrap();

        let mut tar = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
        let mut manifest_header = None;
        for entry in tar.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap() == Path::new("daprbundle/details.json") {
                let mut body = Vec::new();
                entry.read_to_end(&mut body).unwrap();
                assert_eq!(body, b"{}");
                manifest_header = Some(entry.header().clone());
            }
        }

        let header = manifest_header.unwrap();
        assert_eq!(header.mode().unwrap(), 0o444);
        assert_eq!(header.uid().unwrap(), 0);
        assert_eq!(header.gid().unwrap(), 0);
    }

    #[test]
    fn zip_rejects_escaping_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("evil.zip");
        {
            let mut zip = ZipWriter::new(File::create(&archive).unwrap());
            zip.start_file("../escape.txt", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"nope").unwrap();
            zip.finish().unwrap();
        }

        let err = extract_archive(&archive, &tmp.path().join("out"), ArchiveFormat::Zip)
            .unwrap_err();
        assert!(matches!(err, Error::UnsafeEntry(_)));
        assert!(!tmp.path().join("escape.txt").exists());
    }

    #[test]
    fn gzip_file_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("image.tar");
        let dest = tmp.path().join("image.tar.gz");
        fs::write(&src, vec![1u8; 10_000]).unwrap();

        assert_eq!(gzip_file(&src, &dest).unwrap(), 10_000);

        let mut decoded = Vec::new();
        io::Read::read_to_end(&mut GzDecoder::new(File::open(&dest).unwrap()), &mut decoded)
            .unwrap();
        assert_eq!(decoded.len(), 10_000);
    }
}
