use clap::Parser;
use hondana_types::{config::CatalogArgs, locale::DEFAULT_COUNTRY};

use crate::commands::{catalog_client, print_book_line, Executor};

#[derive(Parser, Debug)]
pub struct RecommendCmd {
    #[command(flatten)]
    catalog: CatalogArgs,
    #[arg(long, default_value = DEFAULT_COUNTRY, help = "Country code")]
    country: String,
    #[arg(long, help = "Subject category, bestsellers if not given")]
    category: Option<String>,
    #[arg(long, help = "Number of books")]
    max_results: Option<u32>,
}

impl Executor for RecommendCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = catalog_client(&self.catalog)?;
        let page = client
            .books_by_country(&self.country, self.category.as_deref(), self.max_results)
            .await?;
        for (i, book) in page.books.iter().enumerate() {
            print_book_line(i + 1, book);
        }
        Ok(())
    }
}
