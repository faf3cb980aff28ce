use hondana_types::Book;

use crate::volume::{IndustryIdentifier, Volume};

const ISBN_13: &str = "ISBN_13";
const ISBN_10: &str = "ISBN_10";

fn pick_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    let find = |kind: &str| {
        identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.clone())
    };
    find(ISBN_13).or_else(|| find(ISBN_10))
}

fn secure_url(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_string(),
    }
}

/// Maps catalog volume record to application [`Book`]
pub fn transform(volume: Volume) -> Book {
    let Volume {
        id,
        volume_info: info,
        sale_info,
        ..
    } = volume;
    let sale_info = sale_info.unwrap_or_default();

    let isbn = info.industry_identifiers.as_deref().and_then(pick_isbn);
    let thumbnail = info
        .image_links
        .as_ref()
        .and_then(|links| links.thumbnail.as_deref())
        .map(secure_url);

    Book {
        id,
        title: info.title,
        subtitle: info.subtitle,
        authors: info.authors.unwrap_or_default(),
        publisher: info.publisher,
        published_date: info.published_date,
        description: info.description,
        page_count: info.page_count,
        categories: info.categories.unwrap_or_default(),
        average_rating: info.average_rating,
        ratings_count: info.ratings_count,
        thumbnail,
        language: info.language,
        preview_link: info.preview_link,
        info_link: info.info_link,
        isbn,
        saleability: sale_info.saleability,
        is_ebook: sale_info.is_ebook,
        country: sale_info.country,
    }
}
