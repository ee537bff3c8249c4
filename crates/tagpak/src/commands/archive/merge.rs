use clap::Args;
use miette::miette;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};
use tagpak_archive::TagArchive;
use tagpak_binary::{BinaryWriterOptions, CompressionMethod};
use tracing::info;
use walkdir::WalkDir;

use super::create_output;

#[derive(Args)]
pub struct MergeArgs {
    /// An input directory of binary tag files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Compress every entry with zlib at this level
    #[arg(short, long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=9))]
    compression: Option<u8>,

    /// Write every key inline instead of through a key dictionary
    #[arg(long, default_value_t = false)]
    no_dictionary: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl MergeArgs {
    fn options(&self) -> BinaryWriterOptions {
        BinaryWriterOptions::builder()
            .use_dictionary(!self.no_dictionary)
            .compression(self.compression.map_or(CompressionMethod::None, CompressionMethod::Zlib))
            .build()
    }

    pub fn handle(&self) -> Result<()> {
        info!("creating {}", &self.file.display());

        let files = WalkDir::new(&self.directory)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        let mut archive = TagArchive::with_options(self.options());
        for file in files {
            let name = file
                .path()
                .strip_prefix(&self.directory)
                .into_diagnostic()?;
            let name = name
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect::<Option<Vec<_>>>()
                .ok_or(miette!("unable to convert {} to a string", name.display()))?
                .join("/");
            info!("merging {}", name);

            let f = File::open(file.path())
                .into_diagnostic()
                .context(format!("opening {}", file.path().display()))?;
            let structure = tagpak_binary::decode(BufReader::new(f))
                .context(format!("decoding {}", file.path().display()))?;

            archive.put(name, &structure)?;
        }

        archive
            .write(create_output(&self.file, self.overwrite)?)
            .context("finalizing archive")?;

        Ok(())
    }
}
