use crate::errors::Result;

use log::debug;
use serenity::model;
use serenity::prelude::Context;

#[derive(Debug, PartialEq, Eq)]
pub enum ReplyContents {
    String(String),
    ConstStr(&'static str),
}

#[derive(Debug)]
pub enum ReplyType<'a> {
    Message(&'a model::channel::Message),
    Channel(model::id::ChannelId),
}

/// A plain text answer to a command, produced by the command code and sent
/// by the dispatcher.
#[derive(Debug)]
pub struct Reply<'a> {
    message: ReplyContents,
    place: ReplyType<'a>,
}

impl Reply<'_> {
    pub const fn new(message: String, place: ReplyType<'_>) -> Reply<'_> {
        Reply {
            message: ReplyContents::String(message),
            place,
        }
    }

    pub const fn new_const<'a>(message: &'static str, place: ReplyType<'a>) -> Reply<'a> {
        Reply {
            message: ReplyContents::ConstStr(message),
            place,
        }
    }

    pub fn text(&self) -> &str {
        match &self.message {
            ReplyContents::String(inner) => inner,
            ReplyContents::ConstStr(inner) => inner,
        }
    }

    pub async fn send(&self, ctx: &Context) -> Result<()> {
        let resp = self.text();

        match &self.place {
            ReplyType::Channel(channel) => {
                channel.say(ctx, resp).await?;
            }
            ReplyType::Message(msg) => {
                debug!("replying to message {}", msg.id);
                msg.reply(ctx, resp).await?;
            }
        };

        Ok(())
    }
}
