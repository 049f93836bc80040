/*!
 * Output serialization.
 */

use std::path::Path;
use log::debug;

use crate::errors::PersistenceError;
use crate::file_utils::FileManager;
use crate::ledger::LedgerEntry;

/// Render entries as subtitle blocks, in the given order
pub fn render(entries: &[LedgerEntry]) -> String {
    entries.iter().map(|entry| entry.to_string()).collect()
}

/// Replace `path` with the rendered entries
pub fn write_output<P: AsRef<Path>>(path: P, entries: &[LedgerEntry]) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    FileManager::replace_file(path, &render(entries)).map_err(|source| {
        PersistenceError::OutputWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!("Wrote {} entries to {:?}", entries.len(), path);
    Ok(())
}
