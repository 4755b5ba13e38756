use anyhow::Result;
use clap::Args;

use crate::access::Page;

use super::Context;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        if !ctx.config.is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'athlete-results login' to authenticate.");
            return Ok(());
        }

        let session = ctx.session()?;
        let client = ctx.api()?;

        match client.user_by_username(&session.username).await {
            Ok(user) => {
                println!("✓ Authenticated as:");
                println!();
                println!("  Username: {}", user.username);
                if let Some(email) = &user.email {
                    println!("  Email:    {}", email);
                }
                println!("  User ID:  {}", user.id);
                println!("  Roles:    {}", session.role_list());
                if let Some(coach_id) = session.coach_id {
                    println!("  Coach:    {}", coach_id);
                }
                if let Some(athlete_id) = session.athlete_id {
                    println!("  Athlete:  {}", athlete_id);
                }

                let pages: Vec<String> = pages_for(session.roles.as_slice())
                    .iter()
                    .map(|p| format!("{:?}", p))
                    .collect();
                println!("  Pages:    {}", pages.join(", "));

                Ok(())
            }
            Err(e) => {
                println!("✗ Failed to fetch user information: {}", e);
                println!();
                println!("Your session may have expired.");
                println!("Use 'athlete-results login' to authenticate again.");
                Err(e.into())
            }
        }
    }
}

fn pages_for(roles: &[crate::access::Role]) -> Vec<Page> {
    let mut pages: Vec<Page> = Vec::new();
    for page in roles.iter().flat_map(|r| r.pages().iter().copied()) {
        if !pages.contains(&page) {
            pages.push(page);
        }
    }
    pages
}
