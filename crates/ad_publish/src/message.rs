//! Slack mrkdwn renditions of the daily and weekly digests.

use chrono::NaiveDate;
use ad_core::dates::range_label;
use ad_core::{DigestItem, WeeklyResult};
use ad_storage::markdown::{DAILY_TITLE, EMPTY_DAILY, EMPTY_WEEKLY, WEEKLY_TITLE};

pub fn format_message(items: &[DigestItem], date: NaiveDate) -> String {
    let header = format!("{} — {}", DAILY_TITLE, date.format("%b %d, %Y"));

    if items.is_empty() {
        return format!("{}\n\n{}", header, EMPTY_DAILY);
    }

    let body = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let link = item.distinct_article_url().unwrap_or(&item.url);
            [
                format!("{}. *<{}|{}>*", i + 1, link, item.title),
                format!("   Source: {} | Tags: {}", item.source, item.tags.join(", ")),
                format!("   {}", item.summary),
                format!("   {}", item.url),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}", header, body)
}

pub fn format_weekly_message(result: &WeeklyResult, start: NaiveDate, end: NaiveDate) -> String {
    let header = format!("{} — {}", WEEKLY_TITLE, range_label(start, end));

    if result.is_empty() {
        return format!("{}\n\n{}", header, EMPTY_WEEKLY);
    }

    // Numbering runs across themes.
    let mut number = 0;
    let body = result
        .themes
        .iter()
        .filter(|theme| !theme.items.is_empty())
        .map(|theme| {
            let items = theme
                .items
                .iter()
                .map(|item| {
                    number += 1;
                    let mut lines = vec![
                        format!("{}. *{}*", number, item.title),
                        format!("   Source: {}", item.source),
                        format!("   {}", item.why_it_matters),
                        format!("   {}", item.url),
                    ];
                    if let Some(article_url) = item.distinct_article_url() {
                        lines.push(format!("   Discussion: {}", article_url));
                    }
                    lines.join("\n")
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("*Theme: {}*\n{}", theme.theme, items)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}", header, body)
}
