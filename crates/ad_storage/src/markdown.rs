use chrono::NaiveDate;
use ad_core::dates::range_label;
use ad_core::{DigestItem, WeeklyResult};

pub const DAILY_TITLE: &str = "AI Digest";
pub const WEEKLY_TITLE: &str = "Weekly Best of AI";
pub const EMPTY_DAILY: &str = "No relevant AI news found today.";
pub const EMPTY_WEEKLY: &str = "No notable items this week.";

pub fn render_daily(items: &[DigestItem], date: NaiveDate) -> String {
    let header = format!("# {} — {}", DAILY_TITLE, date.format("%B %d, %Y"));

    if items.is_empty() {
        return format!("{}\n\n{}\n", header, EMPTY_DAILY);
    }

    let sections = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let tags = item
                .tags
                .iter()
                .map(|t| format!("`{}`", t))
                .collect::<Vec<_>>()
                .join(" ");
            [
                format!("## {}. {}", i + 1, item.title),
                String::new(),
                format!("**Source:** {} | **Tags:** {}", item.source, tags),
                String::new(),
                item.summary.clone(),
                String::new(),
                links(&item.url, item.distinct_article_url()),
                String::new(),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n---\n\n");

    format!("{}\n\n{}", header, sections)
}

pub fn render_weekly(result: &WeeklyResult, start: NaiveDate, end: NaiveDate) -> String {
    let header = format!("# {} — {}", WEEKLY_TITLE, range_label(start, end));

    if result.is_empty() {
        return format!("{}\n\n{}\n", header, EMPTY_WEEKLY);
    }

    let mut number = 0;
    let themes = result
        .themes
        .iter()
        .filter(|theme| !theme.items.is_empty())
        .map(|theme| {
            let items = theme
                .items
                .iter()
                .map(|item| {
                    number += 1;
                    [
                        format!("### {}. {}", number, item.title),
                        String::new(),
                        format!("**Source:** {}", item.source),
                        String::new(),
                        item.why_it_matters.clone(),
                        String::new(),
                        links(&item.url, item.distinct_article_url()),
                    ]
                    .join("\n")
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("## Theme: {}\n\n{}\n", theme.theme, items)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n{}", header, themes)
}

fn links(url: &str, article_url: Option<&str>) -> String {
    match article_url {
        Some(article_url) => format!("[Read more]({}) | [Source]({})", url, article_url),
        None => format!("[Read more]({})", url),
    }
}
