use clap::{ArgGroup, Parser};
use hondana_app::session::{Activate as _, ReadingProgressController};
use hondana_types::ReadingStatus;

use crate::commands::{Executor, UserArgs};

#[derive(Parser, Debug)]
#[command(
    group(
        ArgGroup::new("change")
            .required(true)
            .multiple(true)
            .args(["progress", "status", "remove"])
    )
)]
pub struct ProgressCmd {
    #[command(flatten)]
    user: UserArgs,
    #[arg(help = "Book id in the catalog")]
    book_id: String,
    #[arg(long, allow_hyphen_values = true, help = "Progress in percent, limited to 0-100")]
    progress: Option<i64>,
    #[arg(long, help = "Reading status: want_to_read, reading or finished")]
    status: Option<ReadingStatus>,
    #[arg(long, conflicts_with_all = ["progress", "status"], help = "Remove book from library")]
    remove: bool,
}

impl Executor for ProgressCmd {
    async fn run(self) -> anyhow::Result<()> {
        let session = self.user.open().await?;
        let controller = ReadingProgressController::new(
            &session.store,
            session.identity.subscribe(),
            &self.book_id,
        );
        controller.activate().await;
        if let Some(error) = controller.state().error {
            anyhow::bail!("Cannot read progress: {error}");
        }

        if self.remove {
            controller.remove_from_library().await?;
        }
        if let Some(status) = self.status {
            controller.update_status(status).await?;
        }
        if let Some(progress) = self.progress {
            controller.update_progress(progress).await?;
        }

        let state = controller.state();
        match state.status {
            Some(status) => println!("{}: {status}, {}%", self.book_id, state.progress),
            None => println!("{}: not in library", self.book_id),
        }
        Ok(())
    }
}
