use anyhow::Result;
use clap::Args;

use super::Context;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, ctx: &mut Context) -> Result<()> {
        if !ctx.config.is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        ctx.config.session.clear();
        ctx.config.save()?;

        println!("✓ Logged out successfully!");

        Ok(())
    }
}
