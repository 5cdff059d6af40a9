use super::page_marker::PageMarker;

use chrono::{DateTime, Utc};
use db::structs::StreamLink;
use serenity::builder::CreateEmbed;
use serenity::model::id::GuildId;
use serenity::model::user::User;
use serenity::prelude::Context;
use unicode_segmentation::UnicodeSegmentation;

pub const EMBED_AUTHOR: &str = "Streamlinks";
const EMBED_COLOUR: u32 = 0xEEE657;
// discord rejects longer field values
const FIELD_VALUE_LIMIT: usize = 1024;
/// Longest link whose `[link](link)` field still fits a field value.
pub(super) const MAX_LINK_LEN: usize = (FIELD_VALUE_LIMIT - 4) / 2;

/// Whoever asked for the listing, shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub name: String,
    pub avatar: Option<String>,
}

impl Requester {
    /// Guild nickname when there is one, the username otherwise.
    pub fn new(nick: Option<String>, user: &User) -> Requester {
        Requester {
            name: nick.unwrap_or_else(|| user.name.clone()),
            avatar: Some(user.face()),
        }
    }

    /// `guild_id` comes from the event, messages fetched over http carry
    /// none.
    pub async fn of_user(ctx: &Context, user: &User, guild_id: Option<GuildId>) -> Requester {
        let nick = match guild_id {
            Some(guild_id) => user.nick_in(ctx, guild_id).await,
            None => None,
        };
        Requester::new(nick, user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: &'static str,
    pub value: String,
    pub inline: bool,
}

/// One page of a streamlinks listing, converted into a serenity embed only
/// when it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamlinkEmbed {
    pub image: Option<String>,
    pub fields: Vec<EmbedField>,
    pub timestamp: DateTime<Utc>,
    pub footer_text: String,
    pub footer_icon: Option<String>,
}

impl StreamlinkEmbed {
    pub fn to_create_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::default();
        embed.colour(EMBED_COLOUR);
        embed.author(|a| a.name(EMBED_AUTHOR));
        if let Some(image) = &self.image {
            embed.image(image);
        }
        for field in &self.fields {
            embed.field(field.name, &field.value, field.inline);
        }
        embed.timestamp(self.timestamp);
        embed.footer(|f| {
            f.text(&self.footer_text);
            if let Some(icon) = &self.footer_icon {
                f.icon_url(icon);
            }
            f
        });
        embed
    }
}

fn field_value(value: &str) -> String {
    if value.trim().is_empty() {
        return String::from("-");
    }
    let graphemes: Vec<&str> = value.graphemes(true).collect();
    if graphemes.len() <= FIELD_VALUE_LIMIT {
        value.to_string()
    } else {
        let mut truncated = graphemes[..FIELD_VALUE_LIMIT - 1].concat();
        truncated.push('…');
        truncated
    }
}

/// Renders `streamlink` as page `current_pos` of `links_count`.
pub fn create_embed_of_link(
    streamlink: &StreamLink,
    requester: &Requester,
    links_count: usize,
    current_pos: usize,
    now: DateTime<Utc>,
) -> StreamlinkEmbed {
    let marker = PageMarker::new(&streamlink.subject, current_pos, links_count);

    StreamlinkEmbed {
        image: streamlink.thumbnail_url.clone(),
        fields: vec![
            EmbedField {
                name: "Subject",
                value: streamlink.subject.to_uppercase(),
                inline: true,
            },
            EmbedField {
                name: "From",
                value: field_value(&streamlink.member_name),
                inline: true,
            },
            EmbedField {
                name: "Release date",
                value: streamlink.created_at.format("%d. %m. %Y").to_string(),
                inline: true,
            },
            EmbedField {
                name: "Link",
                value: format!("[{0}]({0})", streamlink.link),
                inline: false,
            },
            EmbedField {
                name: "Description",
                value: field_value(&streamlink.description),
                inline: false,
            },
        ],
        timestamp: now,
        footer_text: marker.footer(&requester.name),
        footer_icon: requester.avatar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn streamlink() -> StreamLink {
        StreamLink {
            id: 1,
            subject: String::from("izp"),
            link: String::from("https://youtu.be/abc"),
            member_name: String::from("Lecturer"),
            description: String::from("pointers and arrays"),
            thumbnail_url: Some(String::from("https://i.ytimg.com/vi/abc/hq.jpg")),
            created_at: Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    fn requester() -> Requester {
        Requester {
            name: String::from("student"),
            avatar: None,
        }
    }

    fn user(name: &str) -> User {
        let mut user = User::default();
        user.name = name.to_string();
        user
    }

    #[test]
    fn test_requester_prefers_nick() {
        let author = user("jnovak");
        assert_eq!(
            Requester::new(Some(String::from("Jan Novák")), &author).name,
            "Jan Novák"
        );
        assert_eq!(Requester::new(None, &author).name, "jnovak");
        assert_eq!(
            Requester::new(None, &author).avatar,
            Some(author.face())
        );
    }

    #[test]
    fn test_footer_carries_page() {
        for (pos, count) in [(1, 1), (2, 5), (5, 5)] {
            let embed = create_embed_of_link(&streamlink(), &requester(), count, pos, Utc::now());
            assert_eq!(
                embed.footer_text,
                format!("student | [IZP] Page: {pos} / {count}")
            );
            assert_eq!(
                PageMarker::from_footer(&embed.footer_text),
                Some(PageMarker::new("izp", pos, count))
            );
        }
    }

    #[test]
    fn test_fields() {
        let embed = create_embed_of_link(&streamlink(), &requester(), 3, 1, Utc::now());
        let values: Vec<(&str, &str, bool)> = embed
            .fields
            .iter()
            .map(|f| (f.name, f.value.as_str(), f.inline))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Subject", "IZP", true),
                ("From", "Lecturer", true),
                ("Release date", "01. 05. 2023", true),
                ("Link", "[https://youtu.be/abc](https://youtu.be/abc)", false),
                ("Description", "pointers and arrays", false),
            ]
        );
        assert_eq!(
            embed.image.as_deref(),
            Some("https://i.ytimg.com/vi/abc/hq.jpg")
        );
    }

    #[test]
    fn test_no_thumbnail() {
        let mut link = streamlink();
        link.thumbnail_url = None;
        let embed = create_embed_of_link(&link, &requester(), 1, 1, Utc::now());
        assert!(embed.image.is_none());
    }

    #[test]
    fn test_empty_description_placeholder() {
        let mut link = streamlink();
        link.description = String::new();
        let embed = create_embed_of_link(&link, &requester(), 1, 1, Utc::now());
        assert_eq!(embed.fields[4].value, "-");
    }

    #[test]
    fn test_long_description_truncated() {
        let mut link = streamlink();
        link.description = "ř".repeat(FIELD_VALUE_LIMIT + 10);
        let embed = create_embed_of_link(&link, &requester(), 1, 1, Utc::now());
        assert_eq!(
            embed.fields[4].value.graphemes(true).count(),
            FIELD_VALUE_LIMIT
        );
        assert!(embed.fields[4].value.ends_with('…'));
    }

    #[test]
    fn test_longest_link_fits_field() {
        let mut link = streamlink();
        link.link = format!(
            "https://youtu.be/{}",
            "a".repeat(MAX_LINK_LEN - "https://youtu.be/".len())
        );
        let embed = create_embed_of_link(&link, &requester(), 1, 1, Utc::now());
        assert!(embed.fields[3].value.chars().count() <= FIELD_VALUE_LIMIT);
    }
}
