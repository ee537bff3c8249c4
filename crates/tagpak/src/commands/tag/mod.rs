pub mod show;

#[derive(clap::Subcommand)]
pub enum TagCommands {
    /// Print the tree stored in a binary tag file
    Show(show::ShowArgs),
}

impl TagCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            TagCommands::Show(show) => show.handle(),
        }
    }
}
