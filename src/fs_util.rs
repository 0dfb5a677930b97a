use std::fs;
use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;
use zip::ZipArchive;

use crate::error::SeqDbError;

pub fn extract_zip(zip_path: &Path, target_dir: &Path) -> Result<usize, SeqDbError> {
    let fs_err = |err: &dyn std::fmt::Display| {
        SeqDbError::Filesystem(format!("unzip {}: {err}", zip_path.display()))
    };
    let file = fs::File::open(zip_path).map_err(|err| fs_err(&err))?;
    let mut archive = ZipArchive::new(file).map_err(|err| fs_err(&err))?;

    let mut written = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|err| fs_err(&err))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(fs_err(&format!("entry '{}' escapes the target", entry.name())));
        };
        if relative.starts_with("__MACOSX") {
            continue;
        }
        let entry_path = target_dir.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&entry_path).map_err(|err| fs_err(&err))?;
            continue;
        }
        if let Some(parent) = entry_path.parent() {
            fs::create_dir_all(parent).map_err(|err| fs_err(&err))?;
        }
        let mut outfile = fs::File::create(&entry_path).map_err(|err| fs_err(&err))?;
        io::copy(&mut entry, &mut outfile).map_err(|err| fs_err(&err))?;
        written += 1;
    }
    debug!("unpacked {written} files from {}", zip_path.display());
    Ok(written)
}

pub fn gunzip(gz_path: &Path, target: &Path) -> Result<(), SeqDbError> {
    let file = fs::File::open(gz_path)
        .map_err(|err| SeqDbError::Filesystem(format!("open {}: {err}", gz_path.display())))?;
    let mut decoder = GzDecoder::new(file);
    let mut outfile =
        fs::File::create(target).map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
    io::copy(&mut decoder, &mut outfile)
        .map_err(|err| SeqDbError::Filesystem(format!("gunzip {}: {err}", gz_path.display())))?;
    Ok(())
}

pub fn atomic_rename_dir(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        fs::remove_dir_all(to)?;
    }
    fs::rename(from, to)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use zip::write::SimpleFileOptions;

    use super::*;

    #[test]
    fn gunzip_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let gz = dir.path().join("seqs.fas.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(b">a\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let out = dir.path().join("seqs.fas");
        gunzip(&gz, &out).unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), ">a\nACGT\n");
    }

    #[test]
    fn extracts_zip_entries() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("db.zip");
        let mut writer = zip::ZipWriter::new(fs::File::create(&zip_path).unwrap());
        writer
            .start_file("inner/seqs.fasta", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b">a\nAC\n").unwrap();
        writer.finish().unwrap();

        let target = dir.path().join("out");
        assert_eq!(extract_zip(&zip_path, &target).unwrap(), 1);
        assert!(target.join("inner/seqs.fasta").exists());
    }
}
