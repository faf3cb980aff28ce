use clap::Parser;
use hondana_app::session::{Activate as _, LikeController};

use crate::commands::{Executor, UserArgs};

#[derive(Parser, Debug)]
pub struct LikeCmd {
    #[command(flatten)]
    user: UserArgs,
    #[arg(help = "Book id in the catalog")]
    book_id: String,
    #[arg(long, help = "Remove like instead")]
    remove: bool,
}

impl Executor for LikeCmd {
    async fn run(self) -> anyhow::Result<()> {
        let session = self.user.open().await?;
        let like = LikeController::new(
            &session.store,
            session.identity.subscribe(),
            &self.book_id,
        );
        like.activate().await;
        if let Some(error) = like.state().error {
            anyhow::bail!("Cannot read like: {error}");
        }
        let wanted = !self.remove;
        if like.state().is_liked != wanted {
            like.toggle_like().await?;
        }
        println!(
            "{} {}",
            self.book_id,
            if wanted { "liked" } else { "not liked" }
        );
        Ok(())
    }
}
