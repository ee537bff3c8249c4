use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Component, Path, PathBuf},
};
use tagpak_archive::TagArchive;
use tracing::info;

use super::create_output;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Entry names become paths below the target directory and must stay inside it
fn entry_path(directory: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let escapes = name.is_empty()
        || relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
    if escapes {
        return Err(miette!("refusing to extract entry {name:?} outside of the target"));
    }
    Ok(directory.join(relative))
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let archive = TagArchive::read(BufReader::new(f))?;

        for name in archive.names() {
            let p = entry_path(&self.directory, name)?;
            info!("writing {}", p.display());

            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)
                    .into_diagnostic()
                    .context(format!("creating {}", parent.display()))?;
            }

            let payload = archive.get_raw(name).unwrap_or_default();
            create_output(&p, self.overwrite)?
                .write_all(payload)
                .into_diagnostic()
                .context(format!("writing {}", p.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::entry_path;

    #[test]
    fn entry_paths_stay_inside() {
        let target = Path::new("out");
        assert_eq!(
            entry_path(target, "maps/first").ok(),
            Some(Path::new("out").join("maps").join("first"))
        );
        assert!(entry_path(target, "../escape").is_err());
        assert!(entry_path(target, "/absolute").is_err());
        assert!(entry_path(target, "").is_err());
    }
}
