use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};
use tracing::debug;

use crate::render::TreeView;

#[derive(Args)]
pub struct ShowArgs {
    /// An input binary tag file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        let mut reader = tagpak_binary::BinaryReader::new(BufReader::new(f))?;
        let structure = tagpak_tree::Structure::read_from(&mut reader)?;
        debug!(
            compression = ?reader.compression(),
            dictionary = reader.dictionary().len(),
            "decoded tag file"
        );

        print!("{}", TreeView::new(&structure));
        Ok(())
    }
}
