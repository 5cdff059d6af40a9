mod commands;
mod streamlinks;

use crate::config::Config;
use crate::errors::Result;
use crate::structs::Cooldown;

use log::{debug, info, warn};
use regex::Regex;
use serenity::{
    async_trait,
    model::{channel::Message, channel::Reaction, gateway::Ready},
    prelude::*,
};
use std::time::Duration;

// `streamlinks <subject>` may be used twice per 30s by each user
const COOLDOWN_RATE: usize = 2;
const COOLDOWN_PER: Duration = Duration::from_secs(30);
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Handler {
    config: Config,
    command_re: Regex,
    cooldown: Cooldown,
    http_client: reqwest::Client,
}

impl Handler {
    pub fn new(config: Config) -> Result<Handler> {
        let command_re = commands::command_regex(&config.prefix)?;
        let http_client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("streamlinks-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Handler {
            config,
            command_re,
            cooldown: Cooldown::new(COOLDOWN_RATE, COOLDOWN_PER),
            http_client,
        })
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        // dont care about bot messages
        if msg.author.bot {
            return;
        }

        if let Some(reply) = commands::handle_command(self, &ctx, &msg).await {
            if let Err(why) = reply.send(&ctx).await {
                warn!("Failed to send reply {:?} with err: {why}", reply.text());
            }
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        let bot_id = ctx.cache.current_user_id();
        if reaction.user_id == Some(bot_id) {
            return;
        }

        let msg = match reaction.message(&ctx).await {
            Ok(msg) => msg,
            Err(why) => {
                debug!("Failed to load reacted message {}: {why}", reaction.message_id);
                return;
            }
        };
        if msg.author.id != bot_id || !streamlinks::is_streamlinks_embed(&msg) {
            return;
        }

        if let Err(why) = streamlinks::handle_reaction(&ctx, &reaction, msg).await {
            warn!(
                "Failed to handle reaction on message {} with err: {why}",
                reaction.message_id
            );
        }
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!(
            "{} is connected to {} guilds",
            ready.user.name,
            ready.guilds.len()
        );
    }
}
