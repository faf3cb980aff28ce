use clap::{Parser, Subcommand};

use crate::commands::{
    book::BookCmd, library::LibraryCmd, like::LikeCmd, profile::ProfileCmd,
    progress::ProgressCmd, recommend::RecommendCmd, search::SearchCmd,
};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for hondana - search books in the catalog and keep track of your reading."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search the catalog
    Search(SearchCmd),
    /// Popular books for a country
    Recommend(RecommendCmd),
    /// Show details of one book
    Book(BookCmd),
    /// Like or unlike a book
    Like(LikeCmd),
    /// Update reading status or progress of a book
    Progress(ProgressCmd),
    /// List books in your library
    Library(LibraryCmd),
    /// Show or change your profile
    Profile(ProfileCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Search(cmd) => cmd.run().await,
            Command::Recommend(cmd) => cmd.run().await,
            Command::Book(cmd) => cmd.run().await,
            Command::Like(cmd) => cmd.run().await,
            Command::Progress(cmd) => cmd.run().await,
            Command::Library(cmd) => cmd.run().await,
            Command::Profile(cmd) => cmd.run().await,
        }
    }
}
