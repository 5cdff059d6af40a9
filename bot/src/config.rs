use crate::errors::{Error, Result};

use log::{debug, info};
use serenity::model::channel::ReactionType;
use serenity::model::id::RoleId;
use std::env;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_LOADING_EMOTE: &str = "⏳";

/// Runtime configuration, read once from the environment in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub prefix: String,
    /// Roles that count as "helper or above", may add streamlinks
    pub helper_roles: Vec<RoleId>,
    pub loading_emote: ReactionType,
    /// Offset in hours used for log timestamps
    pub log_utc_offset: i8,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let token = env::var("DISCORD_TOKEN")
            .map_err(|_| Error::ConstStr("Expected DISCORD_TOKEN in the environment"))?;

        Config::from_lookup(token, |key| env::var(key).ok())
    }

    /// Builds the config from anything that can answer a variable lookup,
    /// split out from `from_env` so tests don't touch the process env.
    pub fn from_lookup<F>(token: String, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = lookup("STREAMLINKS_PREFIX")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_PREFIX));

        let helper_roles = match lookup("STREAMLINKS_HELPER_ROLES") {
            Some(raw) => parse_role_list(&raw)?,
            None => {
                info!("STREAMLINKS_HELPER_ROLES not set, nobody will be able to add streamlinks");
                Vec::new()
            }
        };

        let emote = lookup("STREAMLINKS_LOADING_EMOTE")
            .unwrap_or_else(|| String::from(DEFAULT_LOADING_EMOTE));
        let loading_emote = ReactionType::try_from(emote.as_str())
            .map_err(|why| Error::Config(format!("loading emote {emote:?}: {why:?}")))?;

        let log_utc_offset = match lookup("STREAMLINKS_LOG_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)?,
            None => 0,
        };

        let config = Config {
            token,
            prefix,
            helper_roles,
            loading_emote,
            log_utc_offset,
        };
        debug!(
            "loaded config with prefix {:?} and {} helper roles",
            config.prefix,
            config.helper_roles.len()
        );
        Ok(config)
    }
}

fn parse_role_list(raw: &str) -> Result<Vec<RoleId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .map(RoleId)
                .map_err(|_| Error::Config(format!("role id {id:?} is not a number")))
        })
        .collect()
}

fn parse_utc_offset(raw: &str) -> Result<i8> {
    match raw.trim().parse::<i8>() {
        Ok(hours) if (-23..=23).contains(&hours) => Ok(hours),
        _ => Err(Error::Config(format!(
            "log utc offset {raw:?} must be a whole number of hours between -23 and 23"
        ))),
    }
}
