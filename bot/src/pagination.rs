//! Reaction driven pagination shared by every paginated embed the bot sends.

use crate::errors::Result;

use log::trace;
use phf::phf_map;
use serenity::model::channel::{Message, ReactionType};
use serenity::prelude::*;

pub const FIRST: &str = "⏪";
pub const PREVIOUS: &str = "◀";
pub const NEXT: &str = "▶";
pub const LAST: &str = "⏩";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    First,
    Previous,
    Next,
    Last,
}

static DIRECTIONS: phf::Map<&'static str, Direction> = phf_map! {
    "⏪" => Direction::First,
    "◀" => Direction::Previous,
    "◀️" => Direction::Previous,
    "🔼" => Direction::Previous,
    "▶" => Direction::Next,
    "▶️" => Direction::Next,
    "🔽" => Direction::Next,
    "⏩" => Direction::Last,
};

/// Maps a reaction to a paging direction, custom emoji never page.
pub fn direction(emoji: &ReactionType) -> Option<Direction> {
    match emoji {
        ReactionType::Unicode(glyph) => DIRECTIONS.get(glyph.as_str()).copied(),
        _ => None,
    }
}

/// Page a reaction asks for, clamped to `1..=max_page`.
///
/// Returns 0 when the emoji is not a paging emoji or there is nothing to
/// page through. Pages never wrap around.
pub fn pagination_next(emoji: &ReactionType, page: usize, max_page: usize) -> usize {
    let Some(direction) = direction(emoji) else {
        return 0;
    };
    if max_page == 0 {
        return 0;
    }

    let next = match direction {
        Direction::First => 1,
        Direction::Previous => page.saturating_sub(1),
        Direction::Next => page.saturating_add(1),
        Direction::Last => max_page,
    };
    next.clamp(1, max_page)
}

/// Emoji to put under a message with `count` pages, in display order.
pub fn pagination_emoji(count: usize) -> Vec<&'static str> {
    let mut emoji = Vec::new();
    if count > 2 {
        emoji.push(FIRST);
    }
    if count > 1 {
        emoji.push(PREVIOUS);
        emoji.push(NEXT);
    }
    if count > 2 {
        emoji.push(LAST);
    }
    emoji
}

pub async fn add_pagination_reactions(ctx: &Context, msg: &Message, count: usize) -> Result<()> {
    for emoji in pagination_emoji(count) {
        trace!("adding pagination reaction {emoji} to {}", msg.id);
        msg.react(ctx, ReactionType::Unicode(String::from(emoji)))
            .await?;
    }
    Ok(())
}
