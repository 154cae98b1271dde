//! Cursor-driven pagination.

use crate::TRACING_TARGET;

/// One page of a cursor-paginated listing.
///
/// The continuation token is opaque and server-issued; an empty string is
/// normalized to "no further pages" at construction, matching how Slack-style
/// APIs signal the end of a listing.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    /// Items of this page, in the order the service returned them.
    pub items: Vec<T>,
    /// Continuation token for the next page, if any.
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Creates a page, treating an empty cursor string as "no more pages".
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.filter(|cursor| !cursor.is_empty()),
        }
    }

    /// Creates a terminal page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// Collects every page of a cursor-paginated listing into one ordered vector.
///
/// `fetch` is called with the page size and the cursor to resume from
/// (`None` for the first call). Pages are appended in arrival order; the
/// walk ends when a page carries no continuation token.
///
/// Any fetch error aborts the whole collection: a server-issued cursor is
/// single-use, so there is no safe point to resume from and no retry is
/// attempted.
pub async fn collect_cursor<T, E, F, Fut>(mut fetch: F, page_size: u32) -> Result<Vec<T>, E>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, E>>,
{
    let first = fetch(page_size, None).await?;
    let mut items = first.items;
    let mut cursor = first.next_cursor.filter(|c| !c.is_empty());
    let mut pages = 1u32;

    while let Some(token) = cursor.take() {
        let page = fetch(page_size, Some(token)).await?;
        items.extend(page.items);
        cursor = page.next_cursor.filter(|c| !c.is_empty());
        pages += 1;
    }

    tracing::debug!(
        target: TRACING_TARGET,
        pages,
        items = items.len(),
        "cursor walk complete"
    );

    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Serves scripted pages in order, handing out cursors "c1", "c2", ...
    fn scripted_fetch(
        pages: Vec<Vec<u32>>,
    ) -> impl FnMut(u32, Option<String>) -> std::future::Ready<Result<CursorPage<u32>, String>>
    {
        let calls = RefCell::new(0usize);
        move |_limit, cursor| {
            let mut calls = calls.borrow_mut();
            let index = *calls;
            *calls += 1;

            // The cursor handed back must be the one we issued.
            match (index, cursor) {
                (0, None) => {}
                (n, Some(token)) => assert_eq!(token, format!("c{n}")),
                (n, None) => panic!("call {n} arrived without a cursor"),
            }

            let next = (index + 1 < pages.len()).then(|| format!("c{}", index + 1));
            std::future::ready(Ok(CursorPage::new(pages[index].clone(), next)))
        }
    }

    #[tokio::test]
    async fn concatenates_pages_in_arrival_order() {
        let items = collect_cursor(scripted_fetch(vec![vec![1, 2], vec![3, 4], vec![5]]), 200)
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn single_page_makes_exactly_one_call() {
        let items = collect_cursor(scripted_fetch(vec![vec![7, 8, 9]]), 200)
            .await
            .unwrap();
        assert_eq!(items, vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn empty_first_page_yields_empty_result() {
        let items = collect_cursor(scripted_fetch(vec![vec![]]), 200).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn empty_cursor_string_terminates_the_walk() {
        let mut calls = 0u32;
        let items = collect_cursor(
            |_limit, _cursor| {
                calls += 1;
                std::future::ready(Ok::<_, String>(CursorPage::new(
                    vec![1, 2],
                    Some(String::new()),
                )))
            },
            200,
        )
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn fetch_error_propagates_and_aborts() {
        let mut calls = 0u32;
        let result = collect_cursor(
            |_limit, cursor| {
                calls += 1;
                std::future::ready(if cursor.is_none() {
                    Ok(CursorPage::new(vec![1u32], Some("c1".to_string())))
                } else {
                    Err("boom".to_string())
                })
            },
            200,
        )
        .await;
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn rerun_over_unchanged_data_is_identical() {
        let first = collect_cursor(scripted_fetch(vec![vec![1, 2], vec![3]]), 200)
            .await
            .unwrap();
        let second = collect_cursor(scripted_fetch(vec![vec![1, 2], vec![3]]), 200)
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
