use clap::Parser;
use hondana_app::session::{SearchOptions, SearchSession};
use hondana_catalog::OrderBy;
use hondana_types::{config::CatalogArgs, locale};

use crate::commands::{catalog_client, print_book_line, Executor};

#[derive(Parser, Debug)]
pub struct SearchCmd {
    #[command(flatten)]
    catalog: CatalogArgs,
    #[arg(help = "Search query")]
    query: String,
    #[arg(long, default_value_t = 1, help = "Number of pages to load")]
    pages: u32,
    #[arg(long, default_value_t = 10, help = "Results per page, at most 40")]
    page_size: u32,
    #[arg(long, help = "Result order, relevance or newest")]
    order_by: Option<OrderBy>,
    #[arg(long, help = "Restrict results to language, e.g. ja")]
    lang: Option<String>,
    #[arg(
        long,
        help = "Country for sale information, derived from --lang if not given"
    )]
    country: Option<String>,
}

impl Executor for SearchCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = catalog_client(&self.catalog)?;
        let mut options = SearchOptions::default().page_size(self.page_size);
        if let Some(order_by) = self.order_by {
            options = options.order_by(order_by);
        }
        let country = self.country.or_else(|| {
            self.lang
                .as_deref()
                .map(|l| locale::country_for_locale(l).code.to_string())
        });
        if let Some(lang) = self.lang {
            options = options.lang_restrict(lang);
        }
        if let Some(country) = country {
            options = options.country(country);
        }

        let session = SearchSession::with_options(client, options);
        session.search(&self.query).await;
        for _ in 1..self.pages {
            session.load_more().await;
        }

        let state = session.state();
        if let Some(error) = state.error {
            anyhow::bail!("Search failed: {error}");
        }
        for (i, book) in state.books.iter().enumerate() {
            print_book_line(i + 1, book);
        }
        println!(
            "Shown {} of {} results{}",
            state.books.len(),
            state.total_items,
            if state.has_more { ", more available" } else { "" }
        );
        Ok(())
    }
}
