//! Writing tag archives
//!

use std::io::Write;
use tracing::{debug, instrument};

use crate::archive::TagArchive;
use crate::error::{Error, Result};
use crate::types::{ArchiveHeader, DirectoryEntry};

impl TagArchive {
    /// Write the directory and every payload into `writer`, returning the writer
    ///
    /// Fails before anything is written when a payload is too large for the directory.
    #[instrument(skip_all, fields(entries = self.len()), err)]
    pub fn write<W: Write>(&self, mut writer: W) -> Result<W> {
        let directory = self
            .entries
            .iter()
            .map(|(name, payload)| {
                let size = u32::try_from(payload.len()).map_err(|_| Error::EntryTooLarge {
                    name: name.clone(),
                    size: payload.len(),
                })?;
                Ok(DirectoryEntry {
                    name: name.clone(),
                    size,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        ArchiveHeader::default().write_to(&mut writer)?;
        for entry in &directory {
            entry.write_to(&mut writer)?;
        }
        DirectoryEntry::write_end(&mut writer)?;

        for payload in self.entries.values() {
            writer.write_all(payload)?;
        }
        writer.flush()?;

        debug!(
            payload_bytes = self.entries.values().map(Vec::len).sum::<usize>(),
            "wrote archive"
        );
        Ok(writer)
    }
}
