//! List workspace members sorted by first name, optionally posting a summary
//! to the configured webhook.
//!
//! Run with: SLK_API__TOKEN=xoxb-... cargo run -p slk-core --example list_users

use std::time::Duration;

use slk_core::slack::sort_by_name;
use slk_core::{AppConfig, AppPaths, CallContext, OutgoingMessage, SlackClient, WebHook};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = AppPaths::discover(None)?;
    let config = AppConfig::load(&paths, true)?;
    slk_core::init_logging(&config.logging)?;

    let client = SlackClient::from_config(&config)?;
    let cx = CallContext::new().with_timeout(Duration::from_secs(config.runtime.timeout));

    let mut users = client.users_list(&cx).await?;
    sort_by_name(&mut users);
    let active: Vec<_> = users.iter().filter(|u| !u.deleted).collect();
    for user in &active {
        println!("{:<12} {:<20} {}", user.id, user.name, user.first_name());
    }

    if config.api.webhook_url.is_some() {
        let hook = WebHook::from_config(&config)?;
        let summary = OutgoingMessage::text(format!("{} active members", active.len()))
            .username("slk")
            .icon_emoji(":busts_in_silhouette:");
        hook.post_message(&summary, &cx).await?;
    }

    Ok(())
}
