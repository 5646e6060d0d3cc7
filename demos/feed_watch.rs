//! Print the top of a feed, then keep polling for new stories.
//!
//! Run with `cargo run --example feed_watch`. Stop with Ctrl+C.

use anyhow::Result;
use std::time::Duration;

use hn_reader::api::{FeedType, HnClient};
use hn_reader::config::AppConfig;
use hn_reader::internal::freshness::FreshnessPoller;
use hn_reader::logging;
use hn_reader::utils::{datetime::format_timestamp, url::extract_domain};

fn print_story(story: &hn_reader::internal::models::Story) {
    let title = story.title.as_deref().unwrap_or("(untitled)");
    let domain = story
        .url
        .as_deref()
        .and_then(extract_domain)
        .map(|d| format!(" ({d})"))
        .unwrap_or_default();
    let age = story
        .time
        .map(|t| format_timestamp(&t))
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "  {:>4} points  {:<8}  {}{}",
        story.score.unwrap_or(0),
        age,
        title,
        domain
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load();
    logging::init_console_logging(&config.logging);

    let client = HnClient::with_base_url(config.api_base_url.clone());

    let ids = client.fetch_feed_ids(FeedType::Top, false).await?;
    let stories = client.get_stories(FeedType::Top, 10, 0).await?;

    println!("Top stories:");
    for story in &stories {
        print_story(story);
    }

    let mut poller = FreshnessPoller::with_interval(Duration::from_secs(config.poll_interval_secs));
    poller.set_low_data(config.low_data_mode);
    poller.start_polling(FeedType::Top, ids);

    println!(
        "\nWatching for new stories (poll every {}s)...",
        config.poll_interval_secs
    );

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.poll_if_due(&client).await;

        if poller.new_story_count() > 0 {
            println!("\n{} new stories:", poller.new_story_count());
            for id in poller.consume_new_stories() {
                if let Some(story) = client.get_story(id).await
                    && !story.is_tombstone()
                {
                    print_story(&story);
                }
            }
        }
    }
}
