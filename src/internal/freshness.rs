//! Poll-based detection of new stories at the top of a feed.
//!
//! The poller re-fetches a feed's id list on a fixed cadence (bypassing
//! the item cache) and diffs it against the ids the view currently
//! shows, surfacing an "N new stories" count without forcing a
//! re-render. Scheduling is deadline-based: the owning loop calls
//! [`FreshnessPoller::poll_if_due`] each frame, so no timer can outlive
//! the poller.

use crate::api::{FeedType, HnClient};
use std::collections::HashSet;
use std::time::{Duration, Instant};

pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Bound on the reported id list when the fresh feed shares no id with
/// the displayed one (after a long gap or a large reshuffle).
const NO_OVERLAP_CAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Idle,
    Polling,
}

/// New ids at the top of the fresh list, relative to `current`.
///
/// If any currently-displayed id appears in the fresh list, everything
/// strictly before the first such overlap is unambiguously new. With no
/// overlap at all the whole list is "new" in the set sense; we report a
/// bounded guess of the first [`NO_OVERLAP_CAP`] ids. That fallback is a
/// known approximation: after a large reshuffle it can both over- and
/// under-report the true new-story count.
pub fn top_new_ids(current: &[u32], fresh: &[u32]) -> Vec<u32> {
    let current_set: HashSet<u32> = current.iter().copied().collect();

    match fresh.iter().position(|id| current_set.contains(id)) {
        Some(first_overlap) => fresh[..first_overlap].to_vec(),
        None => fresh.iter().take(NO_OVERLAP_CAP).copied().collect(),
    }
}

/// One poller per feed view. Construct directly in tests; nothing here is
/// global.
pub struct FreshnessPoller {
    state: PollState,
    feed: Option<FeedType>,
    current_ids: Vec<u32>,
    pending_ids: Vec<u32>,
    interval: Duration,
    next_poll_at: Option<Instant>,
    visible: bool,
    low_data: bool,
}

impl FreshnessPoller {
    pub fn new() -> Self {
        Self::with_interval(POLL_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            state: PollState::Idle,
            feed: None,
            current_ids: Vec::new(),
            pending_ids: Vec::new(),
            interval,
            next_poll_at: None,
            visible: true,
            low_data: false,
        }
    }

    /// Idle -> Polling. Records the feed and the ids the view currently
    /// shows, resets any pending report, and arms the poll deadline.
    pub fn start_polling(&mut self, feed: FeedType, current_ids: Vec<u32>) {
        self.state = PollState::Polling;
        self.feed = Some(feed);
        self.current_ids = current_ids;
        self.pending_ids.clear();
        self.next_poll_at = if self.visible {
            Some(Instant::now() + self.interval)
        } else {
            None
        };
    }

    /// Polling -> Idle. A pending report survives until consumed.
    pub fn stop_polling(&mut self) {
        self.state = PollState::Idle;
        self.feed = None;
        self.next_poll_at = None;
    }

    pub fn is_polling(&self) -> bool {
        self.state == PollState::Polling
    }

    pub fn new_story_count(&self) -> usize {
        self.pending_ids.len()
    }

    pub fn new_story_ids(&self) -> &[u32] {
        &self.pending_ids
    }

    /// Take the pending ids and fold them into the tracked current set
    /// (prepended, fresh-list order) so the next poll does not re-report
    /// them. The caller merges the returned ids into its view.
    pub fn consume_new_stories(&mut self) -> Vec<u32> {
        let ids = std::mem::take(&mut self.pending_ids);
        let mut merged = ids.clone();
        merged.append(&mut self.current_ids);
        self.current_ids = merged;
        ids
    }

    /// Page visibility: hiding pauses the schedule, showing re-arms it.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        match visible {
            false => self.next_poll_at = None,
            true => {
                if self.state == PollState::Polling && self.next_poll_at.is_none() {
                    self.next_poll_at = Some(Instant::now() + self.interval);
                }
            }
        }
    }

    /// Low-data mode makes each due tick a silent no-op without disarming
    /// the schedule, so polling resumes transparently once the flag drops.
    pub fn set_low_data(&mut self, low_data: bool) {
        self.low_data = low_data;
    }

    pub fn poll_due(&self) -> bool {
        self.state == PollState::Polling
            && self.visible
            && self
                .next_poll_at
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Run one poll iteration if the deadline has passed. Fetches the feed
    /// id list bypassing the cache and updates the pending report. Fetch
    /// failures leave the previous report untouched and wait for the next
    /// tick.
    pub async fn poll_if_due(&mut self, client: &HnClient) {
        if !self.poll_due() {
            return;
        }
        // Re-arm before the fetch so a slow request cannot tighten the cadence.
        self.next_poll_at = Some(Instant::now() + self.interval);

        if self.low_data {
            return;
        }
        let Some(feed) = self.feed else {
            return;
        };

        let fresh = match client.fetch_feed_ids(feed, true).await {
            Ok(ids) => ids,
            Err(err) => {
                tracing::debug!(?feed, error = %err, "freshness poll failed");
                return;
            }
        };
        if fresh.is_empty() {
            return;
        }

        self.apply_fresh_ids(&fresh);
    }

    /// Pure state transition from a fresh id list; split out so the diff
    /// policy is testable without IO.
    pub fn apply_fresh_ids(&mut self, fresh: &[u32]) {
        self.pending_ids = top_new_ids(&self.current_ids, fresh);
    }
}

impl Default for FreshnessPoller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn diff_takes_everything_before_first_overlap() {
        assert_eq!(top_new_ids(&[10, 9, 8], &[12, 11, 10, 9, 8]), vec![12, 11]);
    }

    #[test]
    fn diff_overlap_at_head_reports_nothing() {
        assert_eq!(top_new_ids(&[10, 9, 8], &[10, 9, 8]), Vec::<u32>::new());
        // New ids interleaved below the head are not "new at the top".
        assert_eq!(top_new_ids(&[10, 9, 8], &[10, 42, 9, 8]), Vec::<u32>::new());
    }

    #[test]
    fn diff_no_overlap_caps_at_ten() {
        let current = vec![10, 9, 8];
        let fresh: Vec<u32> = (100..130).collect();
        let reported = top_new_ids(&current, &fresh);
        assert_eq!(reported.len(), 10);
        assert_eq!(reported, (100..110).collect::<Vec<u32>>());
    }

    #[test]
    fn start_polling_resets_pending_report() {
        let mut poller = FreshnessPoller::new();
        poller.start_polling(FeedType::Top, vec![3, 2, 1]);
        poller.apply_fresh_ids(&[5, 4, 3, 2, 1]);
        assert_eq!(poller.new_story_count(), 2);

        poller.start_polling(FeedType::New, vec![9]);
        assert_eq!(poller.new_story_count(), 0);
    }

    #[test]
    fn consume_folds_ids_into_current_set() {
        let mut poller = FreshnessPoller::new();
        poller.start_polling(FeedType::Top, vec![3, 2, 1]);

        poller.apply_fresh_ids(&[5, 4, 3, 2, 1]);
        assert_eq!(poller.new_story_ids(), &[5, 4]);

        let consumed = poller.consume_new_stories();
        assert_eq!(consumed, vec![5, 4]);
        assert_eq!(poller.new_story_count(), 0);

        // The same fresh list no longer reports anything new.
        poller.apply_fresh_ids(&[5, 4, 3, 2, 1]);
        assert_eq!(poller.new_story_count(), 0);

        // But a genuinely newer list does.
        poller.apply_fresh_ids(&[6, 5, 4, 3, 2, 1]);
        assert_eq!(poller.new_story_ids(), &[6]);
    }

    #[test]
    fn schedule_respects_visibility() {
        let mut poller = FreshnessPoller::with_interval(Duration::from_millis(5));
        poller.start_polling(FeedType::Top, vec![1]);
        thread::sleep(Duration::from_millis(10));
        assert!(poller.poll_due());

        poller.set_visible(false);
        assert!(!poller.poll_due());

        poller.set_visible(true);
        // Re-armed from now, so not due until a full interval elapses.
        assert!(!poller.poll_due());
        thread::sleep(Duration::from_millis(10));
        assert!(poller.poll_due());
    }

    #[test]
    fn stop_polling_disarms_schedule() {
        let mut poller = FreshnessPoller::with_interval(Duration::from_millis(1));
        poller.start_polling(FeedType::Top, vec![1]);
        poller.stop_polling();
        thread::sleep(Duration::from_millis(5));
        assert!(!poller.poll_due());
        assert!(!poller.is_polling());
    }

    #[tokio::test]
    async fn low_data_tick_is_a_silent_noop_that_keeps_the_schedule() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/topstories.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[2, 1]")
            .expect(1)
            .create_async()
            .await;

        let client = HnClient::with_base_url(format!("{}/", server.url()));
        let mut poller = FreshnessPoller::with_interval(Duration::from_millis(1));
        poller.start_polling(FeedType::Top, vec![1]);
        poller.set_low_data(true);

        tokio::time::sleep(Duration::from_millis(5)).await;
        poller.poll_if_due(&client).await;
        assert_eq!(poller.new_story_count(), 0);

        // Flag drops; the next due tick fetches and diffs as usual.
        poller.set_low_data(false);
        tokio::time::sleep(Duration::from_millis(5)).await;
        poller.poll_if_due(&client).await;

        mock.assert_async().await;
        assert_eq!(poller.new_story_ids(), &[2]);
    }

    #[tokio::test]
    async fn poll_failure_keeps_previous_report() {
        let client = HnClient::with_base_url("http://127.0.0.1:1/".to_string());
        let mut poller = FreshnessPoller::with_interval(Duration::from_millis(1));
        poller.start_polling(FeedType::Top, vec![1]);
        poller.apply_fresh_ids(&[2, 1]);
        assert_eq!(poller.new_story_count(), 1);

        tokio::time::sleep(Duration::from_millis(5)).await;
        poller.poll_if_due(&client).await;
        assert_eq!(poller.new_story_count(), 1);
    }
}
