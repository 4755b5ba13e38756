use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Password};

use crate::session::sign_in;

use super::Context;

#[derive(Args)]
pub struct LoginCommand {
    /// Username to sign in with (prompted when omitted)
    #[arg(short, long)]
    username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "ATHLETE_RESULTS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, ctx: &mut Context) -> Result<()> {
        println!("Athlete Results - Login");
        println!();

        let username = match self.username {
            Some(username) => username,
            None => Input::new().with_prompt("Username").interact_text()?,
        };

        let password = match self.password {
            Some(password) => password,
            None => Password::new().with_prompt("Password").interact()?,
        };

        println!();
        println!("Logging in as {}...", username);

        let client = ctx.api()?;

        match sign_in(&client, &username, &password).await {
            Ok(session) => {
                println!("✓ Login successful!");
                println!();
                println!("Welcome, {}!", session.username);
                println!("Roles: {}", session.role_list());
                if let Some(coach_id) = session.coach_id {
                    println!("Coach ID: {}", coach_id);
                }
                if let Some(athlete_id) = session.athlete_id {
                    println!("Athlete ID: {}", athlete_id);
                }

                ctx.config.session = session;
                ctx.config.save()?;

                Ok(())
            }
            Err(e) => {
                println!("✗ Login failed: {}", e);
                Err(e)
            }
        }
    }
}
