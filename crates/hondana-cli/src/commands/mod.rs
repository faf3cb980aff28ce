use anyhow::{Context as _, Result};
use clap::Args;
use hondana_catalog::{CatalogClient, CatalogConfig};
use hondana_dal::{CreateUser, Preferences, UserProfile};
use hondana_types::{
    config::{BackendConfig, CatalogArgs},
    AuthUser, Book, Identity,
};
use tracing::debug;

pub mod book;
pub mod library;
pub mod like;
pub mod profile;
pub mod progress;
pub mod recommend;
pub mod search;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

/// Local user whose preferences are used
#[derive(Args, Debug)]
pub struct UserArgs {
    #[arg(short, long, env = "HONDANA_USER", help = "User id")]
    pub user: String,
    #[command(flatten)]
    pub backend: BackendConfig,
}

/// Opened store with signed in user
pub struct Session {
    pub store: Preferences,
    pub identity: Identity,
    pub profile: UserProfile,
}

impl UserArgs {
    pub async fn open(&self) -> Result<Session> {
        let db_url = self.backend.database_url();
        debug!("Opening database {db_url}");
        let pool = hondana_dal::new_pool(&db_url).await?;
        hondana_dal::migrate(&pool).await?;
        let store = Preferences::new(pool);
        let user = AuthUser::new(&self.user);
        let profile = store
            .users()
            .get_or_create(CreateUser::from(&user))
            .await?;
        Ok(Session {
            store,
            identity: Identity::signed_in(user),
            profile,
        })
    }
}

pub fn catalog_client(args: &CatalogArgs) -> Result<CatalogClient> {
    let config = CatalogConfig::from_args(args).context(
        "Catalog API key not configured, use --catalog-api-key or HONDANA_CATALOG_API_KEY",
    )?;
    Ok(CatalogClient::new(config)?)
}

pub fn print_book_line(index: usize, book: &Book) {
    println!("{:>4}. {} [{}]", index, book.title, book.id);
    println!("      {}", book.authors_line());
}
