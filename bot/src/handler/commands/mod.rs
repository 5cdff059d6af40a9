use super::streamlinks;
use super::Handler;
use crate::errors::{Error, Result};
use crate::messages;
use crate::structs::reply::{Reply, ReplyType};

use humantime::format_duration;
use log::{debug, error, trace};
use regex::Regex;
use serenity::{model::channel::Message, prelude::*};
use std::time::{Duration, Instant};

/// Matches `<prefix>streamlinks` followed by whitespace or the end of the
/// message, case insensitive.
pub(super) fn command_regex(prefix: &str) -> Result<Regex> {
    Regex::new(&format!(
        r"(?i)^{}streamlinks(?:\s+|$)",
        regex::escape(prefix)
    ))
    .map_err(|why| Error::Internal(format!("failed to build command regex: {why}")))
}

/// Splits command arguments on whitespace the way a shell does: quoted runs
/// stay together and a backslash escapes the next character. `None` for an
/// unterminated quote or a trailing backslash.
pub fn split_arguments(input: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            // only the closing quote and backslash are escaped inside "..."
            Some('"') if c == '\\' => match chars.next()? {
                escaped @ ('"' | '\\') => current.push(escaped),
                other => {
                    current.push(c);
                    current.push(other);
                }
            },
            Some(_) => current.push(c),
            None if c == '\\' => {
                current.push(chars.next()?);
                in_arg = true;
            }
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if quote.is_some() {
        return None;
    }
    if in_arg {
        args.push(current);
    }
    Some(args)
}

/// Where a `streamlinks` invocation goes.
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    Add(&'a [String]),
    List(&'a str),
    Usage,
}

impl<'a> Route<'a> {
    pub fn of(args: &'a [String]) -> Route<'a> {
        match args {
            [first, rest @ ..] if first == "add" => Route::Add(rest),
            [subject] => Route::List(subject),
            _ => Route::Usage,
        }
    }

    /// `add` is gated by roles instead of the cooldown.
    pub const fn is_rate_limited(&self) -> bool {
        !matches!(self, Route::Add(_))
    }
}

fn cooldown_reply(msg: &Message, remaining: Duration) -> Reply<'_> {
    // whole seconds read better than humantime's nanosecond precision
    let remaining = Duration::from_secs(remaining.as_secs().max(1));
    Reply::new(
        messages::cooldown(&format_duration(remaining).to_string()),
        ReplyType::Message(msg),
    )
}

async fn run_streamlinks<'a>(
    handler: &Handler,
    ctx: &Context,
    msg: &'a Message,
    args: &[String],
) -> Result<Option<Reply<'a>>> {
    let route = Route::of(args);
    if route.is_rate_limited() {
        if let Err(remaining) = handler.cooldown.check(msg.author.id, Instant::now()) {
            return Ok(Some(cooldown_reply(msg, remaining)));
        }
    }

    match route {
        Route::Add(rest) => {
            streamlinks::add(ctx, msg, rest, &handler.config, &handler.http_client).await
        }
        Route::List(subject) => streamlinks::get_streamlinks(ctx, msg, subject).await,
        Route::Usage => Ok(Some(Reply::new_const(
            messages::STREAMLINKS_FORMAT,
            ReplyType::Message(msg),
        ))),
    }
}

pub async fn handle_command<'a>(
    handler: &Handler,
    ctx: &Context,
    msg: &'a Message,
) -> Option<Reply<'a>> {
    let matched = handler.command_re.find(&msg.content)?;
    let Some(args) = split_arguments(&msg.content[matched.end()..]) else {
        debug!("unbalanced quotes in {:?}", msg.content);
        return Some(Reply::new_const(
            messages::STREAMLINKS_FORMAT,
            ReplyType::Message(msg),
        ));
    };
    trace!("streamlinks command from {} with args {args:?}", msg.author.id);

    match run_streamlinks(handler, ctx, msg, &args).await {
        Ok(reply) => reply,
        Err(why) => {
            error!("Failed to process command {:?} with err: {why}", msg.content);
            Some(Reply::new_const(
                messages::COMMAND_FAILED,
                ReplyType::Message(msg),
            ))
        }
    }
}
