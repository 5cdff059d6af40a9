#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

mod checks;
mod config;
mod errors;
mod handler;
mod messages;
mod pagination;
mod structs;

use log::LevelFilter;
use log::{error, info};
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use simple_logger::SimpleLogger;
use time::UtcOffset;

use std::process;

use config::Config;
use handler::Handler;

fn migrate_db() {
    match db::migrate() {
        Ok(_) => info!("sucessfully loaded and migrated db at {}", db::db_path()),
        Err(why) => {
            error!("Failed to migrate, exiting {why:?}");
            process::exit(-1);
        }
    };
}

fn init_logger(utc_offset: i8) {
    let offset = UtcOffset::from_hms(utc_offset, 0, 0).unwrap_or(UtcOffset::UTC);
    if let Err(why) = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("bot", LevelFilter::Debug)
        .with_module_level("db", LevelFilter::Debug)
        .with_utc_offset(offset)
        .init()
    {
        eprintln!("Failed to init logger: {why}");
        process::exit(-1);
    }
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            eprintln!("Failed to load config, exiting: {why}");
            process::exit(-1);
        }
    };
    init_logger(config.log_utc_offset);

    // migrate the db
    migrate_db();

    let intents = GatewayIntents::GUILDS
        .union(GatewayIntents::GUILD_MESSAGES)
        .union(GatewayIntents::GUILD_MESSAGE_REACTIONS)
        .union(GatewayIntents::DIRECT_MESSAGES)
        .union(GatewayIntents::DIRECT_MESSAGE_REACTIONS)
        .union(GatewayIntents::MESSAGE_CONTENT);

    let token = config.token.clone();
    let handler = match Handler::new(config) {
        Ok(handler) => handler,
        Err(why) => {
            error!("Failed to create handler, exiting: {why}");
            process::exit(-1);
        }
    };

    let mut client = match Client::builder(&token, intents)
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Err creating client: {why:?}");
            process::exit(-1);
        }
    };

    // Shards will automatically attempt to reconnect, and will perform
    // exponential backoff until it reconnects.
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
