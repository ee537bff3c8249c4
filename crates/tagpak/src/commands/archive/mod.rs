use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::Path};

pub mod extract;
pub mod list;
pub mod merge;
pub mod show;

#[derive(clap::Subcommand)]
pub enum ArchiveCommands {
    /// List the entries of an archive
    List(list::ListArgs),
    /// Print a single entry of an archive
    Show(show::ShowArgs),
    /// Extract every entry of an archive into a directory
    Extract(extract::ExtractArgs),
    /// Merge a directory of tag files into an archive
    Merge(merge::MergeArgs),
}

impl ArchiveCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            ArchiveCommands::List(list) => list.handle(),
            ArchiveCommands::Show(show) => show.handle(),
            ArchiveCommands::Extract(extract) => extract.handle(),
            ArchiveCommands::Merge(merge) => merge.handle(),
        }
    }
}

/// Create `path`, refusing to replace an existing file unless `overwrite` is set
pub(crate) fn create_output(path: &Path, overwrite: bool) -> Result<File> {
    let file = if overwrite {
        File::create(path)
    } else {
        File::create_new(path)
    };
    file.into_diagnostic()
        .context(format!("creating {}", path.display()))
}
