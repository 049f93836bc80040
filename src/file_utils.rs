use anyhow::{Result, Context};
use std::fs;
use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Sibling path `{stem}{suffix}.{extension}` inside output_dir
    pub fn derive_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut file_name = stem.to_string_lossy().to_string();
        file_name.push_str(suffix);
        file_name.push('.');
        file_name.push_str(extension);

        output_dir.as_ref().join(file_name)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Append content to a file, creating it if needed
    ///
    /// The handle is opened, written, synced and dropped within this call.
    /// Nothing already in the file is touched.
    pub fn append_to_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        file.write_all(content.as_bytes())?;
        file.sync_data()
    }

    /// Read at most the last `len` bytes of a file
    ///
    /// A missing file reads as empty.
    pub fn read_tail<P: AsRef<Path>>(path: P, len: u64) -> io::Result<Vec<u8>> {
        let mut file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let size = file.metadata()?.len();
        file.seek(SeekFrom::Start(size.saturating_sub(len)))?;

        let mut tail = Vec::with_capacity(len.min(size) as usize);
        file.read_to_end(&mut tail)?;
        Ok(tail)
    }

    /// Replace the whole file with `content`
    ///
    /// Writes into a temporary file in the same directory and renames it over
    /// the destination, so readers see either the old or the new file.
    pub fn replace_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_data()?;
        temp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Remove a file if it exists
    pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
