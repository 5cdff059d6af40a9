mod embed;
mod link_data;
mod page_marker;
mod reactions;

pub use reactions::{handle_reaction, is_streamlinks_embed};

use embed::{create_embed_of_link, Requester, MAX_LINK_LEN};
use link_data::{fetch_link_data, LinkData};

use crate::checks::helper_plus;
use crate::config::Config;
use crate::errors::{Error, Result};
use crate::messages;
use crate::pagination::add_pagination_reactions;
use crate::structs::reply::{Reply, ReplyType};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use db::structs::NewStreamLink;
use db::{read_only_db_call, writable_db_call, ReadOnlyDb, WriteableDb};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serenity::model::channel::{Message, ReactionType};
use serenity::model::id::UserId;
use serenity::prelude::*;
use url::Url;

const SUCCESS_EMOJI: &str = "✅";
const FAILURE_EMOJI: &str = "❌";

/// `streamlinks <subject>`, replies with the first page of the subject.
pub async fn get_streamlinks<'a>(
    ctx: &Context,
    msg: &'a Message,
    subject: &str,
) -> Result<Option<Reply<'a>>> {
    let streamlinks = read_only_db_call(|db| db.get_streamlinks_of_subject(subject))?;
    let Some(first) = streamlinks.first() else {
        info!("no streamlinks for subject {subject:?}");
        return Ok(Some(Reply::new(
            messages::streamlinks_no_links(subject),
            ReplyType::Message(msg),
        )));
    };

    let requester = Requester::of_user(ctx, &msg.author, msg.guild_id).await;
    let embed = create_embed_of_link(first, &requester, streamlinks.len(), 1, Utc::now());
    let sent = msg
        .channel_id
        .send_message(ctx, |m| {
            m.reference_message(msg)
                .set_embeds(vec![embed.to_create_embed()])
        })
        .await?;
    add_pagination_reactions(ctx, &sent, streamlinks.len()).await?;

    Ok(None)
}

/// Positional arguments of `streamlinks add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddArguments {
    pub subject: String,
    pub link: String,
    pub user: String,
    pub words: Vec<String>,
}

impl AddArguments {
    pub fn parse(args: &[String]) -> Result<AddArguments> {
        let mut args = args.iter();
        let subject = args.next().ok_or(Error::MissingArgument("subject"))?;
        let link = args.next().ok_or(Error::MissingArgument("link"))?;
        let user = args.next().ok_or(Error::MissingArgument("user"))?;

        Ok(AddArguments {
            subject: subject.clone(),
            link: link.clone(),
            user: user.clone(),
            words: args.cloned().collect(),
        })
    }
}

/// Removes the `<` `>` used to suppress link previews.
pub fn clear_link_escape(link: &str) -> String {
    let link = link.trim();
    let link = link.strip_prefix('<').unwrap_or(link);
    let link = link.strip_suffix('>').unwrap_or(link);
    link.to_string()
}

/// Only http(s) links short enough to render in the listing are accepted.
fn validate_link(link: &str) -> Result<()> {
    if link.chars().count() > MAX_LINK_LEN {
        debug!("link of {} chars is too long", link.chars().count());
        return Err(Error::InvalidLink(link.to_string()));
    }
    match Url::parse(link) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        Ok(_) => Err(Error::InvalidLink(link.to_string())),
        Err(why) => {
            debug!("failed to parse link {link:?}: {why}");
            Err(Error::InvalidLink(link.to_string()))
        }
    }
}

/// Id of a `<@id>` or `<@!id>` mention.
pub fn mentioned_user_id(token: &str) -> Option<UserId> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^<@!?(\d+)>$").unwrap();
    }
    let caps = RE.captures(token.trim())?;
    caps[1].parse::<u64>().ok().map(UserId)
}

async fn resolve_member_name(ctx: &Context, msg: &Message, token: &str) -> String {
    let Some(user_id) = mentioned_user_id(token) else {
        return token.to_string();
    };
    let Some(user) = msg.mentions.iter().find(|u| u.id == user_id) else {
        return token.to_string();
    };

    match msg.guild_id {
        Some(guild_id) => user
            .nick_in(ctx, guild_id)
            .await
            .unwrap_or_else(|| user.name.clone()),
        None => user.name.clone(),
    }
}

fn is_iso_date(token: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    }
    RE.is_match(token)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// Picks the upload date of a new link.
///
/// A leading `YYYY-MM-DD` word is always taken out of `words`. It is only
/// used when the page itself had no date, without either the date is `now`.
pub fn resolve_upload_date(
    scraped: Option<NaiveDate>,
    words: &mut Vec<String>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    if !words.first().map_or(false, |w| is_iso_date(w)) {
        return Ok(scraped.map_or(now, start_of_day));
    }

    let token = words.remove(0);
    match scraped {
        Some(date) => {
            debug!("discarding date {token}, the page has its own date {date}");
            Ok(start_of_day(date))
        }
        None => Ok(start_of_day(NaiveDate::parse_from_str(&token, "%Y-%m-%d")?)),
    }
}

pub fn build_streamlink(
    args: AddArguments,
    link: String,
    member_name: String,
    link_data: LinkData,
    now: DateTime<Utc>,
) -> Result<NewStreamLink> {
    let mut words = args.words;
    let upload_date = resolve_upload_date(link_data.upload_date, &mut words, now)?;

    Ok(NewStreamLink {
        subject: args.subject.to_lowercase(),
        link,
        member_name,
        description: words.join(" "),
        thumbnail_url: link_data.image,
        upload_date,
    })
}

pub fn ensure_new_link(db: &impl ReadOnlyDb, link: &str) -> Result<()> {
    if db.exists_link(link)? {
        return Err(Error::LinkExists(link.to_string()));
    }
    Ok(())
}

/// Inserts `new` unless its link is already stored.
pub fn store_streamlink(db: &impl WriteableDb, new: &NewStreamLink) -> Result<i64> {
    ensure_new_link(db, &new.link)?;
    Ok(db.create_streamlink(new)?)
}

async fn replace_reaction(ctx: &Context, msg: &Message, emoji: &str) {
    if let Err(why) = msg.delete_reactions(ctx).await {
        debug!("failed to clear reactions of {}: {why}", msg.id);
    }
    if let Err(why) = msg
        .react(ctx, ReactionType::Unicode(emoji.to_string()))
        .await
    {
        debug!("failed to react {emoji} to {}: {why}", msg.id);
    }
}

async fn add_streamlink(
    ctx: &Context,
    msg: &Message,
    args: AddArguments,
    config: &Config,
    client: &reqwest::Client,
) -> Result<()> {
    msg.react(ctx, config.loading_emote.clone()).await?;

    let member_name = resolve_member_name(ctx, msg, &args.user).await;
    let link = clear_link_escape(&args.link);
    validate_link(&link)?;
    read_only_db_call(|db| Ok(ensure_new_link(&db, &link)))??;

    let link_data = fetch_link_data(client, &link).await?;
    debug!("metadata of {link}: {link_data:?}");
    let new = build_streamlink(args, link, member_name, link_data, Utc::now())?;
    writable_db_call(|db| Ok(store_streamlink(&db, &new)))??;
    info!(
        "{} added streamlink {} to subject {}",
        msg.author.name, new.link, new.subject
    );
    Ok(())
}

/// How a finished `streamlinks add` is reported back.
#[derive(Debug)]
pub enum AddOutcome {
    Added,
    /// Refused with a notice for the author, nothing was stored
    Refused(String),
    /// Unexpected failure, reported by the command dispatcher
    Failed(Error),
}

impl AddOutcome {
    pub fn of(result: Result<()>, author: UserId) -> AddOutcome {
        match result {
            Ok(()) => AddOutcome::Added,
            Err(Error::LinkExists(link)) => {
                info!("refusing to add {link}, already stored");
                AddOutcome::Refused(messages::streamlinks_add_link_exists(author))
            }
            Err(Error::InvalidLink(link)) => {
                AddOutcome::Refused(messages::streamlinks_invalid_link(&link))
            }
            Err(why) => AddOutcome::Failed(why),
        }
    }

    pub const fn indicator(&self) -> &'static str {
        match self {
            AddOutcome::Added => SUCCESS_EMOJI,
            AddOutcome::Refused(_) | AddOutcome::Failed(_) => FAILURE_EMOJI,
        }
    }
}

/// `streamlinks add <subject> <link> <user> [words...]`
pub async fn add<'a>(
    ctx: &Context,
    msg: &'a Message,
    args: &[String],
    config: &Config,
    client: &reqwest::Client,
) -> Result<Option<Reply<'a>>> {
    let roles = msg.member.as_ref().map_or(&[][..], |m| m.roles.as_slice());
    if !helper_plus(roles, config) {
        return Ok(Some(Reply::new_const(
            messages::STREAMLINKS_NOT_HELPER,
            ReplyType::Message(msg),
        )));
    }

    let args = match AddArguments::parse(args) {
        Ok(args) => args,
        Err(Error::MissingArgument(name)) => {
            debug!("streamlinks add is missing <{name}>");
            return Ok(Some(Reply::new_const(
                messages::STREAMLINKS_ADD_FORMAT,
                ReplyType::Channel(msg.channel_id),
            )));
        }
        Err(why) => return Err(why),
    };

    let result = add_streamlink(ctx, msg, args, config, client).await;
    let outcome = AddOutcome::of(result, msg.author.id);
    let indicator = outcome.indicator();
    match outcome {
        AddOutcome::Added => {
            Reply::new_const(messages::STREAMLINKS_ADD_SUCCESS, ReplyType::Message(msg))
                .send(ctx)
                .await?;
            replace_reaction(ctx, msg, indicator).await;
            Ok(None)
        }
        AddOutcome::Refused(notice) => {
            replace_reaction(ctx, msg, indicator).await;
            Ok(Some(Reply::new(notice, ReplyType::Message(msg))))
        }
        AddOutcome::Failed(why) => {
            replace_reaction(ctx, msg, indicator).await;
            Err(why)
        }
    }
}
