pub mod archive;
pub mod tag;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle tag archives
    Archive {
        #[command(subcommand)]
        command: archive::ArchiveCommands,
    },
    /// Handle single binary tag files
    Tag {
        #[command(subcommand)]
        command: tag::TagCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Archive { command } => command.handle(),
            Commands::Tag { command } => command.handle(),
        }
    }
}
