use clap::Parser;
use hondana_dal::{UpdateUser, UserProfile};
use hondana_types::Patch;

use crate::commands::{Executor, UserArgs};

#[derive(Parser, Debug)]
pub struct ProfileCmd {
    #[command(flatten)]
    user: UserArgs,
    #[arg(long, help = "New email")]
    email: Option<String>,
    #[arg(long, help = "New display name")]
    name: Option<String>,
    #[arg(long, help = "Remove display name")]
    clear_name: bool,
    #[arg(long, help = "Country code, e.g. JP")]
    country: Option<String>,
    #[arg(long, help = "Language code, e.g. ja")]
    language: Option<String>,
}

fn name_patch(name: Option<&String>, clear: bool) -> Patch<String> {
    match (name, clear) {
        (_, true) => Patch::Clear,
        (Some(name), false) => Patch::Set(name.clone()),
        (None, false) => Patch::Keep,
    }
}

impl ProfileCmd {
    fn update(&self) -> Option<UpdateUser> {
        let display_name = name_patch(self.name.as_ref(), self.clear_name);
        let update = UpdateUser {
            email: self.email.clone().map(Patch::Set).unwrap_or_default(),
            display_name,
            photo_url: Patch::Keep,
            country: self.country.clone(),
            language: self.language.clone(),
        };
        let unchanged = update.email.is_keep()
            && update.display_name.is_keep()
            && update.country.is_none()
            && update.language.is_none();
        (!unchanged).then_some(update)
    }
}

fn print_profile(profile: &UserProfile) {
    println!("User:     {}", profile.uid);
    if let Some(email) = &profile.email {
        println!("Email:    {email}");
    }
    if let Some(name) = &profile.display_name {
        println!("Name:     {name}");
    }
    println!("Country:  {}", profile.country);
    println!("Language: {}", profile.language);
    println!("Since:    {}", profile.created_at);
}

impl Executor for ProfileCmd {
    async fn run(self) -> anyhow::Result<()> {
        let session = self.user.open().await?;
        let profile = match self.update() {
            Some(update) => session.store.users().update(&self.user.user, update).await?,
            None => session.profile,
        };
        print_profile(&profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_patch() {
        let name = "Reader".to_string();
        assert_eq!(name_patch(None, false), Patch::Keep);
        assert_eq!(name_patch(Some(&name), false), Patch::Set(name.clone()));
        assert_eq!(name_patch(Some(&name), true), Patch::Clear);
    }
}
