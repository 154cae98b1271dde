//! Time-window pagination.
//!
//! Message history endpoints page by narrowing a time range instead of
//! handing out cursors: each call covers `(oldest, latest)` and reports
//! whether more data exists. Which boundary gets narrowed, and which end of
//! the accumulated sequence a new page attaches to, depends only on which
//! bounds the caller supplied. That policy is fixed once at the start of the
//! walk and never re-derived per iteration.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;

/// Items that carry a stable, sortable timestamp identifier.
///
/// Slack message timestamps are strings of the form `"1503435956.000247"`;
/// the collector only ever copies them into the next window boundary, so the
/// raw string form is kept.
pub trait Timestamped {
    /// The item's timestamp identifier.
    fn timestamp(&self) -> &str;
}

impl Timestamped for String {
    fn timestamp(&self) -> &str {
        self
    }
}

/// Time range limiting a history walk. Bounds are exclusive, which is what
/// lets boundary narrowing advance without refetching the boundary item.
///
/// Both bounds are optional; absent bounds mean "all history" on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    /// Lower bound: only items after this timestamp.
    pub oldest: Option<String>,
    /// Upper bound: only items before this timestamp.
    pub latest: Option<String>,
}

impl WindowBounds {
    /// Returns unbounded window covering all history.
    pub fn all() -> Self {
        Self::default()
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn with_oldest(mut self, oldest: impl Into<String>) -> Self {
        self.oldest = Some(oldest.into());
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn with_latest(mut self, latest: impl Into<String>) -> Self {
        self.latest = Some(latest.into());
        self
    }
}

/// One page of a time-windowed history listing.
#[derive(Debug, Clone)]
pub struct WindowPage<T> {
    /// Items of this page, in the service's delivery order.
    pub items: Vec<T>,
    /// Whether more data exists beyond this page within the window.
    pub has_more: bool,
}

impl<T> WindowPage<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, has_more: bool) -> Self {
        Self { items, has_more }
    }

    /// Creates a terminal page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
        }
    }
}

/// Walking policy of a window collection, decided once from the initial
/// bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Walk {
    /// Lower bound only: the walk climbs toward the present by narrowing
    /// `oldest`; each page attaches to the front of the accumulation.
    FromOldest,
    /// Upper bound present: the walk descends into the past by narrowing
    /// `latest`; each page attaches to the back.
    FromLatest,
    /// No bounds: native newest-first delivery, narrowing `oldest` off the
    /// front of the accumulation; pages attach to the back.
    Unbounded,
}

impl Walk {
    /// Derives the walking policy from the caller's initial bounds.
    pub fn from_bounds(bounds: &WindowBounds) -> Self {
        match (&bounds.oldest, &bounds.latest) {
            (Some(_), None) => Walk::FromOldest,
            (_, Some(_)) => Walk::FromLatest,
            (None, None) => Walk::Unbounded,
        }
    }

    /// Whether this walk narrows the `oldest` boundary (as opposed to
    /// `latest`).
    fn narrows_oldest(self) -> bool {
        matches!(self, Walk::FromOldest | Walk::Unbounded)
    }

    /// Whether new pages attach to the front of the accumulation.
    fn prepends(self) -> bool {
        matches!(self, Walk::FromOldest)
    }
}

/// A fully walked history: every item between the bounds, exactly once.
///
/// The accumulated order is the service's delivery order under the walk
/// policy (newest-first for Slack-style history); [`into_chronological`]
/// reverses it into oldest-first reading order for rendering.
///
/// [`into_chronological`]: History::into_chronological
#[derive(Debug, Clone)]
pub struct History<T> {
    items: VecDeque<T>,
    walk: Walk,
}

impl<T> History<T> {
    fn new(items: VecDeque<T>, walk: Walk) -> Self {
        Self { items, walk }
    }

    /// The walking policy that produced this history.
    pub fn walk(&self) -> Walk {
        self.walk
    }

    /// Number of collected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates items in accumulated (delivery) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Consumes the history into a vector in accumulated order.
    pub fn into_delivery_order(self) -> Vec<T> {
        self.items.into()
    }

    /// Consumes the history into oldest-first reading order.
    pub fn into_chronological(self) -> Vec<T> {
        let mut items: Vec<T> = self.items.into();
        items.reverse();
        items
    }
}

/// Collects a complete time-windowed history by repeatedly narrowing the
/// window until the service reports no further data.
///
/// `fetch` receives the current window and returns one page in the service's
/// delivery order. The boundary-narrowing and attachment policy is the
/// [`Walk`] derived from `bounds`:
///
/// - lower bound only: `oldest` is narrowed to the front item of the
///   accumulation and pages are prepended;
/// - upper bound present: `latest` is narrowed to the back item and pages
///   are appended;
/// - no bounds: `oldest` is narrowed off the (unchanging) front item and
///   pages are appended.
///
/// An empty page ends the walk: with nothing to narrow the boundary on, the
/// next request would repeat the last one, so a claimed `has_more` on an
/// empty page is logged and ignored. Fetch errors are fatal and unretried:
/// resuming would require knowing which boundary was last incorporated,
/// which the caller does not durably record.
pub async fn collect_window<T, E, F, Fut>(
    mut fetch: F,
    bounds: WindowBounds,
) -> Result<History<T>, E>
where
    T: Timestamped,
    F: FnMut(WindowBounds) -> Fut,
    Fut: Future<Output = Result<WindowPage<T>, E>>,
{
    let walk = Walk::from_bounds(&bounds);
    let mut window = bounds;

    let first = fetch(window.clone()).await?;
    let mut items: VecDeque<T> = first.items.into();
    let mut has_more = first.has_more;
    let mut pages = 1u32;

    while has_more && !items.is_empty() {
        if walk.narrows_oldest() {
            if let Some(front) = items.front() {
                window.oldest = Some(front.timestamp().to_owned());
            }
        } else if let Some(back) = items.back() {
            window.latest = Some(back.timestamp().to_owned());
        }

        let page = fetch(window.clone()).await?;
        pages += 1;

        // An empty page cannot narrow the window, so the walk ends here
        // even if the service claims more data.
        if page.items.is_empty() {
            if page.has_more {
                tracing::warn!(
                    target: TRACING_TARGET,
                    walk = ?walk,
                    pages,
                    "more data reported on an empty page, ending walk"
                );
            }
            break;
        }
        has_more = page.has_more;

        if walk.prepends() {
            for item in page.items.into_iter().rev() {
                items.push_front(item);
            }
        } else {
            items.extend(page.items);
        }
    }

    tracing::debug!(
        target: TRACING_TARGET,
        walk = ?walk,
        pages,
        items = items.len(),
        "window walk complete"
    );

    Ok(History::new(items, walk))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Msg {
        ts: String,
    }

    impl Msg {
        fn at(seconds: u64) -> Self {
            Self {
                ts: format!("{seconds}.000000"),
            }
        }
    }

    impl Timestamped for Msg {
        fn timestamp(&self) -> &str {
            &self.ts
        }
    }

    fn seconds(msg: &Msg) -> u64 {
        msg.ts
            .split('.')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap()
    }

    /// Simulates a Slack-style history endpoint over the given ascending
    /// seconds, delivering `page_size` messages per call, newest-first
    /// within each page. With only a lower bound the oldest chunk is
    /// served first; otherwise chunks are served from the top.
    struct FakeHistory {
        all: Vec<u64>,
        page_size: usize,
        calls: usize,
    }

    impl FakeHistory {
        fn new(all: Vec<u64>, page_size: usize) -> Self {
            Self {
                all,
                page_size,
                calls: 0,
            }
        }

        fn page(&mut self, window: &WindowBounds) -> WindowPage<Msg> {
            self.calls += 1;
            let oldest = window.oldest.as_deref().map(parse_ts);
            let latest = window.latest.as_deref().map(parse_ts);

            let mut matching: Vec<u64> = self
                .all
                .iter()
                .copied()
                .filter(|s| oldest.is_none_or(|o| *s > o))
                .filter(|s| latest.is_none_or(|l| *s < l))
                .collect();

            let from_bottom = window.oldest.is_some() && window.latest.is_none();
            let chunk: Vec<u64> = if from_bottom {
                matching.iter().copied().take(self.page_size).collect()
            } else {
                matching.reverse();
                matching.iter().copied().take(self.page_size).collect()
            };
            let has_more = matching.len() > chunk.len();

            // Pages themselves are always delivered newest-first.
            let mut page: Vec<Msg> = chunk.into_iter().map(Msg::at).collect();
            page.sort_by(|a, b| seconds(b).cmp(&seconds(a)));
            WindowPage::new(page, has_more)
        }
    }

    fn parse_ts(ts: &str) -> u64 {
        ts.split('.').next().and_then(|s| s.parse().ok()).unwrap()
    }

    async fn walk(history: &mut FakeHistory, bounds: WindowBounds) -> History<Msg> {
        collect_window(
            |window| std::future::ready(Ok::<_, String>(history.page(&window))),
            bounds,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn lower_bound_walk_prepends_newer_pages() {
        // 7 messages over [10, 70], pages of 3, oldest bound below them all.
        let mut remote = FakeHistory::new(vec![10, 20, 30, 40, 50, 60, 70], 3);
        let history = walk(&mut remote, WindowBounds::all().with_oldest("5.000000")).await;

        assert_eq!(history.len(), 7);
        assert_eq!(remote.calls, 3);
        assert_eq!(history.walk(), Walk::FromOldest);

        // Delivery order is newest-first end to end; chronological reverses it.
        let chronological: Vec<u64> = history.into_chronological().iter().map(seconds).collect();
        assert_eq!(chronological, vec![10, 20, 30, 40, 50, 60, 70]);
    }

    #[tokio::test]
    async fn upper_bound_walk_appends_older_pages() {
        let mut remote = FakeHistory::new(vec![10, 20, 30, 40, 50], 2);
        let history = walk(&mut remote, WindowBounds::all().with_latest("100.000000")).await;

        assert_eq!(history.walk(), Walk::FromLatest);
        let delivery: Vec<u64> = history.iter().map(seconds).collect();
        assert_eq!(delivery, vec![50, 40, 30, 20, 10]);
    }

    #[tokio::test]
    async fn two_sided_window_narrows_latest() {
        let mut remote = FakeHistory::new(vec![10, 20, 30, 40, 50, 60], 2);
        let bounds = WindowBounds::all()
            .with_oldest("15.000000")
            .with_latest("55.000000");
        let history = walk(&mut remote, bounds).await;

        assert_eq!(history.walk(), Walk::FromLatest);
        let delivery: Vec<u64> = history.iter().map(seconds).collect();
        assert_eq!(delivery, vec![50, 40, 30, 20]);
    }

    #[tokio::test]
    async fn unbounded_walk_narrows_off_the_unchanging_front() {
        // Without bounds the front of the accumulation never moves, so the
        // second call covers (newest, now) and the remote reports no more
        // data; only the first page is kept.
        let mut remote = FakeHistory::new(vec![10, 20, 30, 40, 50], 2);
        let history = walk(&mut remote, WindowBounds::all()).await;

        assert_eq!(history.walk(), Walk::Unbounded);
        assert_eq!(remote.calls, 2);
        let delivery: Vec<u64> = history.iter().map(seconds).collect();
        assert_eq!(delivery, vec![50, 40]);
    }

    #[tokio::test]
    async fn no_duplicates_across_pages() {
        let mut remote = FakeHistory::new((1..=25).map(|s| s * 10).collect(), 4);
        let history = walk(&mut remote, WindowBounds::all().with_latest("10000.000000")).await;

        let unique: HashSet<u64> = history.iter().map(seconds).collect();
        assert_eq!(unique.len(), history.len());
        assert_eq!(history.len(), 25);
    }

    #[tokio::test]
    async fn empty_first_page_makes_no_further_calls() {
        let mut calls = 0u32;
        let history = collect_window(
            |_window| {
                calls += 1;
                std::future::ready(Ok::<WindowPage<Msg>, String>(WindowPage::new(vec![], true)))
            },
            WindowBounds::all(),
        )
        .await
        .unwrap();

        assert!(history.is_empty());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn empty_page_claiming_more_ends_the_walk() {
        let mut calls = 0u32;
        let history = collect_window(
            |_window| {
                calls += 1;
                std::future::ready(Ok::<_, String>(if calls == 1 {
                    WindowPage::new(vec![Msg::at(20), Msg::at(10)], true)
                } else {
                    WindowPage::new(vec![], true)
                }))
            },
            WindowBounds::all().with_latest("100.000000"),
        )
        .await
        .unwrap();

        assert_eq!(calls, 2);
        let delivery: Vec<u64> = history.iter().map(seconds).collect();
        assert_eq!(delivery, vec![20, 10]);
    }

    #[tokio::test]
    async fn chronological_is_reversed_delivery() {
        let mut remote = FakeHistory::new(vec![10, 20, 30, 40], 2);
        let history = walk(&mut remote, WindowBounds::all().with_latest("99.000000")).await;

        let mut expected: Vec<u64> = history.clone().into_delivery_order().iter().map(seconds).collect();
        expected.reverse();
        let chronological: Vec<u64> = history.into_chronological().iter().map(seconds).collect();
        assert_eq!(chronological, expected);
    }

    #[tokio::test]
    async fn fetch_error_is_fatal() {
        let mut calls = 0u32;
        let result = collect_window(
            |_window| {
                calls += 1;
                std::future::ready(if calls == 1 {
                    Ok(WindowPage::new(vec![Msg::at(10)], true))
                } else {
                    Err("socket closed".to_string())
                })
            },
            WindowBounds::all().with_latest("100.000000"),
        )
        .await;

        assert_eq!(result.unwrap_err(), "socket closed");
    }

    #[tokio::test]
    async fn rerun_over_unchanged_data_is_identical() {
        let mut first_remote = FakeHistory::new(vec![10, 20, 30, 40], 3);
        let mut second_remote = FakeHistory::new(vec![10, 20, 30, 40], 3);
        let bounds = WindowBounds::all().with_latest("99.000000");

        let first = walk(&mut first_remote, bounds.clone()).await;
        let second = walk(&mut second_remote, bounds).await;
        assert_eq!(first.into_delivery_order(), second.into_delivery_order());
    }

    #[test]
    fn walk_policy_from_bounds() {
        assert_eq!(
            Walk::from_bounds(&WindowBounds::all().with_oldest("1")),
            Walk::FromOldest
        );
        assert_eq!(
            Walk::from_bounds(&WindowBounds::all().with_latest("1")),
            Walk::FromLatest
        );
        assert_eq!(
            Walk::from_bounds(&WindowBounds::all().with_oldest("1").with_latest("2")),
            Walk::FromLatest
        );
        assert_eq!(Walk::from_bounds(&WindowBounds::all()), Walk::Unbounded);
    }
}
