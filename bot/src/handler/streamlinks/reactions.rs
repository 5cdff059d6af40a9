use super::embed::{create_embed_of_link, Requester, EMBED_AUTHOR};
use super::page_marker::PageMarker;
use crate::errors::Result;
use crate::messages;
use crate::pagination::pagination_next;

use chrono::Utc;
use db::structs::StreamLink;
use db::{read_only_db_call, ReadOnlyDb};
use log::{debug, info, trace};
use serenity::builder::CreateEmbed;
use serenity::model::channel::{Message, Reaction, ReactionType};
use serenity::prelude::*;

/// What a reaction does to a rendered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTurn {
    /// The listing isn't a reply anymore, there is no requester to render for
    MissingOriginal,
    /// The footer carries no page marker
    Unsupported,
    /// Links of the subject were added or removed since render
    Stale,
    /// Unknown emoji or already on the requested page
    Stay,
    Turn {
        streamlink: StreamLink,
        page: usize,
        total: usize,
    },
}

pub fn is_streamlinks_embed(msg: &Message) -> bool {
    msg.embeds
        .first()
        .and_then(|embed| embed.author.as_ref())
        .map_or(false, |author| author.name == EMBED_AUTHOR)
}

/// Decides the next state of a listing from its footer and the live data.
pub fn turn_page(
    db: &impl ReadOnlyDb,
    has_original: bool,
    footer: Option<&str>,
    emoji: &ReactionType,
) -> rusqlite::Result<PageTurn> {
    if !has_original {
        return Ok(PageTurn::MissingOriginal);
    }

    let Some(marker) = footer.and_then(PageMarker::from_footer) else {
        return Ok(PageTurn::Unsupported);
    };

    let count = db.count_streamlinks_of_subject(&marker.subject)?;
    if count != marker.total {
        debug!(
            "listing of {} shows {} links, {count} are stored",
            marker.subject, marker.total
        );
        return Ok(PageTurn::Stale);
    }

    let page = pagination_next(emoji, marker.current, marker.total);
    if page == 0 || page == marker.current {
        return Ok(PageTurn::Stay);
    }

    Ok(
        match db.get_streamlink_of_subject_at(&marker.subject, page - 1)? {
            Some(streamlink) => PageTurn::Turn {
                streamlink,
                page,
                total: marker.total,
            },
            None => PageTurn::Stale,
        },
    )
}

async fn replace_with_notice(ctx: &Context, msg: &mut Message, notice: &str) -> Result<()> {
    msg.edit(ctx, |m| m.content(notice).set_embeds(Vec::<CreateEmbed>::new()))
        .await?;
    Ok(())
}

async fn apply_reaction(ctx: &Context, reaction: &Reaction, msg: &mut Message) -> Result<()> {
    let footer = msg
        .embeds
        .first()
        .and_then(|embed| embed.footer.as_ref())
        .map(|footer| footer.text.clone());
    let has_original = msg.referenced_message.is_some();

    let turn = read_only_db_call(|db| {
        turn_page(&db, has_original, footer.as_deref(), &reaction.emoji)
    })?;

    match turn {
        PageTurn::MissingOriginal => {
            replace_with_notice(ctx, msg, messages::STREAMLINKS_MISSING_ORIGINAL).await
        }
        PageTurn::Unsupported => {
            replace_with_notice(ctx, msg, messages::STREAMLINKS_UNSUPPORTED_EMBED).await
        }
        PageTurn::Stale => replace_with_notice(ctx, msg, messages::STREAMLINKS_NOT_ACTUAL).await,
        PageTurn::Stay => {
            trace!("reaction {} on {} doesn't turn the page", reaction.emoji, msg.id);
            Ok(())
        }
        PageTurn::Turn {
            streamlink,
            page,
            total,
        } => {
            let requester = match msg.referenced_message.as_deref() {
                Some(original) => {
                    Requester::of_user(ctx, &original.author, reaction.guild_id).await
                }
                None => {
                    return replace_with_notice(ctx, msg, messages::STREAMLINKS_MISSING_ORIGINAL)
                        .await
                }
            };
            let embed = create_embed_of_link(&streamlink, &requester, total, page, Utc::now());
            msg.edit(ctx, |m| m.set_embeds(vec![embed.to_create_embed()]))
                .await?;
            info!("turned listing {} to page {page} / {total}", msg.id);
            Ok(())
        }
    }
}

/// Handles a reaction on a streamlinks listing. The reaction is removed
/// afterwards in guilds whatever the outcome, dms don't allow removing
/// reactions of others.
pub async fn handle_reaction(ctx: &Context, reaction: &Reaction, mut msg: Message) -> Result<()> {
    let result = apply_reaction(ctx, reaction, &mut msg).await;

    if reaction.guild_id.is_some() {
        if let Err(why) = reaction.delete(ctx).await {
            debug!("failed to remove reaction from {}: {why}", msg.id);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{FIRST, NEXT, PREVIOUS};
    use chrono::TimeZone;
    use db::structs::NewStreamLink;
    use db::{WriteableConn, WriteableDb};

    fn emoji(glyph: &str) -> ReactionType {
        ReactionType::Unicode(String::from(glyph))
    }

    fn db_with_links(subject: &str, count: u32) -> rusqlite::Result<WriteableConn> {
        let db = WriteableConn::in_memory()?;
        for day in 1..=count {
            db.create_streamlink(&NewStreamLink {
                subject: subject.to_string(),
                link: format!("https://youtu.be/{subject}{day}"),
                member_name: String::from("Lecturer"),
                description: format!("lecture {day}"),
                thumbnail_url: None,
                upload_date: Utc.with_ymd_and_hms(2023, 3, day, 10, 0, 0).unwrap(),
            })?;
        }
        Ok(db)
    }

    fn footer(current: usize, total: usize) -> String {
        PageMarker::new("izp", current, total).footer("student")
    }

    #[test]
    fn test_next_page() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 5)?;
        let turn = turn_page(&db, true, Some(footer(2, 5).as_str()), &emoji(NEXT))?;

        match turn {
            PageTurn::Turn {
                streamlink,
                page,
                total,
            } => {
                assert_eq!(page, 3);
                assert_eq!(total, 5);
                assert_eq!(streamlink.link, "https://youtu.be/izp3");
            }
            other => panic!("expected a page turn, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_first_page() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 5)?;
        let turn = turn_page(&db, true, Some(footer(4, 5).as_str()), &emoji(FIRST))?;
        assert!(matches!(turn, PageTurn::Turn { page: 1, .. }));
        Ok(())
    }

    #[test]
    fn test_previous_on_first_page_stays() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 5)?;
        assert_eq!(
            turn_page(&db, true, Some(footer(1, 5).as_str()), &emoji(PREVIOUS))?,
            PageTurn::Stay
        );
        Ok(())
    }

    #[test]
    fn test_next_on_last_page_stays() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 3)?;
        assert_eq!(
            turn_page(&db, true, Some(footer(3, 3).as_str()), &emoji(NEXT))?,
            PageTurn::Stay
        );
        Ok(())
    }

    #[test]
    fn test_unknown_emoji_stays() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 3)?;
        assert_eq!(
            turn_page(&db, true, Some(footer(2, 3).as_str()), &emoji("🎉"))?,
            PageTurn::Stay
        );
        Ok(())
    }

    #[test]
    fn test_stale_listing() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 4)?;
        assert_eq!(
            turn_page(&db, true, Some(footer(2, 5).as_str()), &emoji(NEXT))?,
            PageTurn::Stale
        );
        Ok(())
    }

    #[test]
    fn test_missing_original() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 4)?;
        assert_eq!(
            turn_page(&db, false, Some(footer(2, 4).as_str()), &emoji(NEXT))?,
            PageTurn::MissingOriginal
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_footer() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 4)?;
        assert_eq!(
            turn_page(&db, true, Some("student | page two"), &emoji(NEXT))?,
            PageTurn::Unsupported
        );
        assert_eq!(
            turn_page(&db, true, None, &emoji(NEXT))?,
            PageTurn::Unsupported
        );
        Ok(())
    }

    #[test]
    fn test_other_subjects_dont_count() -> rusqlite::Result<()> {
        let db = db_with_links("izp", 2)?;
        for day in 1..=3 {
            db.create_streamlink(&NewStreamLink {
                subject: String::from("ias"),
                link: format!("https://youtu.be/ias{day}"),
                member_name: String::from("Lecturer"),
                description: String::new(),
                thumbnail_url: None,
                upload_date: Utc.with_ymd_and_hms(2023, 4, day, 10, 0, 0).unwrap(),
            })?;
        }
        assert!(matches!(
            turn_page(&db, true, Some(footer(1, 2).as_str()), &emoji(NEXT))?,
            PageTurn::Turn { page: 2, total: 2, .. }
        ));
        Ok(())
    }
}
