use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::{fs::File, io::BufReader, path::PathBuf};
use tagpak_archive::TagArchive;

#[derive(Args)]
pub struct ListArgs {
    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let archive = TagArchive::read(BufReader::new(f))?;

        for name in archive.names() {
            let size = archive.get_raw(name).map_or(0, <[u8]>::len);
            println!("{:>10} {}", size.dimmed(), name);
        }
        println!("{} entries", archive.len().bold());

        Ok(())
    }
}
