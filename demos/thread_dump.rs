//! Progressively load and print a story's comment thread.
//!
//! Run with `cargo run --example thread_dump [story_id]`.

use anyhow::{Context, Result};

use hn_reader::api::comments::{COMMENT_BATCH_SIZE, LazyComment, REPLY_BATCH_SIZE};
use hn_reader::api::{FeedType, HnClient};
use hn_reader::config::AppConfig;
use hn_reader::logging;
use hn_reader::utils::html::comment_preview;

fn print_comment(comment: &LazyComment, depth: usize) {
    let indent = "  ".repeat(depth);
    let author = comment.comment.by.as_deref().unwrap_or("?");
    let body = comment
        .comment
        .text
        .as_deref()
        .map(|html| comment_preview(html, 100))
        .unwrap_or_default();
    println!("{indent}{author}: {body}");

    for reply in &comment.replies {
        print_comment(reply, depth + 1);
    }
    if comment.has_more_replies {
        println!(
            "{indent}  ... {} more replies",
            comment.reply_ids.len() - comment.replies.len()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load();
    logging::init_console_logging(&config.logging);

    let client = HnClient::with_base_url(config.api_base_url.clone());

    // Use the given story id, or fall back to the current #1 story.
    let story_id = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u32>().context("story id must be a number")?,
        None => *client
            .fetch_feed_ids(FeedType::Top, false)
            .await?
            .first()
            .context("empty feed")?,
    };

    let story = client
        .fetch_story(story_id)
        .await?
        .context("story not found")?;

    println!(
        "{} ({} comments)\n",
        story.title.as_deref().unwrap_or("(untitled)"),
        story.descendants.unwrap_or(0)
    );

    let ids = story.comment_ids();
    let batch = client.comment_batch(&ids, 0, COMMENT_BATCH_SIZE).await;

    for comment in &batch.comments {
        print_comment(comment, 0);
    }
    if batch.has_more {
        println!(
            "\n... {} more top-level comments",
            batch.total - batch.comments.len()
        );
    }

    // Demonstrate on-demand expansion for the first comment that has more.
    if let Some(parent) = batch.comments.iter().find(|c| c.has_more_replies) {
        println!(
            "\nExpanding replies of {} ({} known children):",
            parent.comment.id,
            parent.reply_ids.len()
        );
        let page = client
            .more_replies(&parent.reply_ids, REPLY_BATCH_SIZE, REPLY_BATCH_SIZE)
            .await;
        for reply in &page.replies {
            print_comment(reply, 1);
        }
    }

    Ok(())
}
