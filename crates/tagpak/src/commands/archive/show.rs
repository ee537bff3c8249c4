use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};
use tagpak_archive::{Error, TagArchive};

use crate::render::TreeView;

#[derive(Args)]
pub struct ShowArgs {
    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The entry to print
    #[arg(short, long)]
    name: String,
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        let structure = TagArchive::extract_one(BufReader::new(f), &self.name)?
            .ok_or_else(|| Error::EntryNotFound(self.name.clone()))?;

        print!("{}", TreeView::new(&structure));
        Ok(())
    }
}
