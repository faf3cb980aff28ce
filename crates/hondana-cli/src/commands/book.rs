use clap::Parser;
use hondana_types::config::CatalogArgs;

use crate::commands::{catalog_client, Executor};

#[derive(Parser, Debug)]
pub struct BookCmd {
    #[command(flatten)]
    catalog: CatalogArgs,
    #[arg(help = "Book id in the catalog")]
    id: String,
    #[arg(long, help = "Country for sale information")]
    country: Option<String>,
}

impl Executor for BookCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = catalog_client(&self.catalog)?;
        let book = client.get_by_id(&self.id, self.country.as_deref()).await?;
        println!("{}", book.title);
        if let Some(subtitle) = &book.subtitle {
            println!("{subtitle}");
        }
        println!("Authors:   {}", book.authors_line());
        let fields = [
            ("Publisher", book.publisher.clone()),
            ("Published", book.published_date.clone()),
            ("Pages", book.page_count.map(|p| p.to_string())),
            ("ISBN", book.isbn.clone()),
            ("Language", book.language.clone()),
            ("Rating", book.average_rating.map(|r| format!("{r:.1}"))),
            ("Cover", book.thumbnail.clone()),
            ("Preview", book.preview_link.clone()),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                println!("{:<10} {value}", format!("{name}:"));
            }
        }
        if !book.categories.is_empty() {
            println!("{:<10} {}", "Subjects:", book.categories.join(", "));
        }
        if let Some(description) = &book.description {
            println!();
            println!("{description}");
        }
        Ok(())
    }
}
