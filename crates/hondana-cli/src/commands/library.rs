use clap::Parser;
use hondana_app::session::{Activate as _, Library, LikedBooks};
use hondana_dal::UserBook;
use hondana_types::ReadingStatus;

use crate::commands::{Executor, UserArgs};

#[derive(Parser, Debug)]
pub struct LibraryCmd {
    #[command(flatten)]
    user: UserArgs,
    #[arg(long, help = "Only books with this status")]
    status: Option<ReadingStatus>,
    #[arg(long, help = "List liked books instead")]
    liked: bool,
}

fn print_books(books: &[UserBook]) {
    for book in books {
        println!(
            "{:<24} {:<13} {:>3}%",
            book.book_id,
            book.status.as_str(),
            book.progress
        );
    }
}

impl Executor for LibraryCmd {
    async fn run(self) -> anyhow::Result<()> {
        let session = self.user.open().await?;
        if self.liked {
            let liked = LikedBooks::new(&session.store, session.identity.subscribe());
            liked.activate().await;
            let state = liked.state();
            if let Some(error) = state.error {
                anyhow::bail!("Cannot load liked books: {error}");
            }
            for id in state.liked_book_ids {
                println!("{id}");
            }
            return Ok(());
        }

        let library = Library::new(&session.store, session.identity.subscribe());
        library.activate().await;
        let state = library.state();
        if let Some(error) = state.error {
            anyhow::bail!("Cannot load library: {error}");
        }
        match self.status {
            Some(ReadingStatus::Reading) => print_books(&state.reading),
            Some(ReadingStatus::Finished) => print_books(&state.finished),
            Some(ReadingStatus::WantToRead) => print_books(&state.want_to_read),
            None => print_books(&state.books),
        }
        let counts = state.counts;
        println!(
            "Total {}: reading {}, finished {}, want to read {}",
            counts.total, counts.reading, counts.finished, counts.want_to_read
        );
        Ok(())
    }
}
