use crate::errors::Result;

use chrono::NaiveDate;
use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use reqwest::StatusCode;
use std::collections::HashMap;

/// Metadata scraped from the SEO meta tags of a linked page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkData {
    pub image: Option<String>,
    pub upload_date: Option<NaiveDate>,
}

/// Downloads `link` and reads its meta tags. Anything but a 200 yields no
/// metadata, transport errors are returned.
pub async fn fetch_link_data(client: &reqwest::Client, link: &str) -> Result<LinkData> {
    let response = client.get(link).send().await?;
    if response.status() != StatusCode::OK {
        info!(
            "fetching {link} returned {}, skipping metadata",
            response.status()
        );
        return Ok(LinkData::default());
    }

    let body = response.text().await?;
    Ok(parse_link_data(&body))
}

fn meta_attributes(tag: &str) -> HashMap<String, String> {
    lazy_static! {
        static ref ATTR: Regex =
            Regex::new(r#"(?s)([A-Za-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
                .unwrap();
    }
    ATTR.captures_iter(tag)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
            Some((
                caps[1].to_ascii_lowercase(),
                decode_html_entities(value.as_str()).into_owned(),
            ))
        })
        .collect()
}

/// Reads the leading `YYYY-MM-DD` of a date or datetime value.
pub fn parse_meta_date(value: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref DATE: Regex = Regex::new(r"^\s*(\d{4}-\d{2}-\d{2})").unwrap();
    }
    let caps = DATE.captures(value)?;
    match NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(why) => {
            debug!("ignoring unparsable meta date {value:?}: {why}");
            None
        }
    }
}

/// Scans every `<meta>` tag of `html` for `og:image` and a
/// `datePublished`/`uploadDate` itemprop. Broken markup around the tags is
/// ignored, later tags win.
pub fn parse_link_data(html: &str) -> LinkData {
    lazy_static! {
        static ref META_TAG: Regex = Regex::new(r"(?is)<meta\b[^>]*>").unwrap();
    }
    let mut data = LinkData::default();

    for tag in META_TAG.find_iter(html) {
        let attrs = meta_attributes(tag.as_str());
        let Some(content) = attrs.get("content") else {
            continue;
        };

        if attrs.get("property").map(String::as_str) == Some("og:image") {
            data.image = Some(content.clone());
        }
        if matches!(
            attrs.get("itemprop").map(String::as_str),
            Some("datePublished") | Some("uploadDate")
        ) {
            if let Some(date) = parse_meta_date(content) {
                data.upload_date = Some(date);
            }
        }
    }

    data
}
