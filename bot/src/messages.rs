//! User facing texts of the streamlinks command.

use serenity::model::id::UserId;

pub const STREAMLINKS_FORMAT: &str =
    "Usage: `streamlinks <subject>`, e.g. `streamlinks izp`. Use quotes for subjects with spaces.";
pub const STREAMLINKS_ADD_FORMAT: &str = "Usage: `streamlinks add <subject> <link> <user or name> [YYYY-MM-DD] [description...]`";
pub const STREAMLINKS_ADD_SUCCESS: &str = "Streamlink was successfully added.";
pub const STREAMLINKS_MISSING_ORIGINAL: &str =
    "The original message with the command was deleted, this listing can't be browsed anymore.";
pub const STREAMLINKS_UNSUPPORTED_EMBED: &str =
    "This listing is not supported anymore, call the command again.";
pub const STREAMLINKS_NOT_ACTUAL: &str =
    "The list of streamlinks changed, this listing is no longer accurate. Call the command again.";
pub const STREAMLINKS_NOT_HELPER: &str = "Only helpers and above may add streamlinks.";
pub const COMMAND_FAILED: &str = "Something went wrong while processing the command.";

pub fn streamlinks_add_link_exists(user: UserId) -> String {
    format!("<@{}> this link is already stored.", user.0)
}

pub fn streamlinks_invalid_link(link: &str) -> String {
    format!("`{link}` is not a valid http(s) link of at most 510 characters.")
}

pub fn streamlinks_no_links(subject: &str) -> String {
    format!(
        "There are no streamlinks for subject **{}** yet.",
        subject.to_uppercase()
    )
}

pub fn cooldown(remaining: &str) -> String {
    format!("Slow down, you can use this command again in {remaining}.")
}
