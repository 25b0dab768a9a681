//! Paginated gallery loader
//!
//! A pure state machine: operations hand back [`FetchRequest`]s for the caller
//! to execute, and the caller feeds each result back through
//! [`GalleryLoader::complete`] together with the ticket it was issued with.
//! Tickets carry the generation and subject they belong to, so a response that
//! arrives after the subject changed is recognised and dropped.

use super::error::FetchError;
use super::gallery::{Cursor, GalleryItem, Page, SubjectId};

pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    FirstPage,
    NextPage,
}

/// Tag attached to every in-flight fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub subject: SubjectId,
    pub cursor: Option<Cursor>,
    pub kind: FetchKind,
}

/// A fetch the caller must perform against the paged source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub limit: usize,
}

/// Outcome of applying a fetch result
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied { kind: FetchKind, received: usize },
    Failed { kind: FetchKind, error: FetchError },
    /// Result belonged to a superseded request and was dropped
    Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: FetchKind,
    pub error: FetchError,
}

/// What the render surface needs on each refresh
#[derive(Clone, Debug, Default)]
pub struct LoaderSnapshot {
    pub subject: Option<SubjectId>,
    pub items: Vec<GalleryItem>,
    pub is_loading_first: bool,
    pub is_loading_next: bool,
    pub has_more: bool,
    pub error: Option<LoadFailure>,
}

#[derive(Debug)]
pub struct GalleryLoader {
    page_size: usize,
    generation: u64,
    subject: Option<SubjectId>,
    items: Vec<GalleryItem>,
    cursor: Option<Cursor>,
    has_more: bool,
    is_loading_first_page: bool,
    is_loading_next_page: bool,
    last_error: Option<LoadFailure>,
    revision: u64,
}

impl Default for GalleryLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl GalleryLoader {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            generation: 0,
            subject: None,
            items: Vec::new(),
            cursor: None,
            has_more: false,
            is_loading_first_page: false,
            is_loading_next_page: false,
            last_error: None,
            revision: 0,
        }
    }

    /// Start browsing `subject` from scratch.
    ///
    /// The previous state is thrown away wholesale and the generation bumped,
    /// which invalidates every ticket issued before this call.
    pub fn reset(&mut self, subject: SubjectId) -> FetchRequest {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            subject: Some(subject.clone()),
            is_loading_first_page: true,
            ..Self::new(self.page_size)
        };

        tracing::debug!(%subject, generation, "Loader reset");

        FetchRequest {
            ticket: FetchTicket {
                generation,
                subject,
                cursor: None,
                kind: FetchKind::FirstPage,
            },
            limit: self.page_size,
        }
    }

    /// Request the page after the current cursor, if one may be requested now
    pub fn load_next(&mut self) -> Option<FetchRequest> {
        let subject = self.subject.clone()?;
        if self.is_loading_first_page || self.is_loading_next_page || !self.has_more {
            return None;
        }
        // has_more without a cursor is a malformed page; nothing to resume from
        let cursor = self.cursor.clone()?;

        self.is_loading_next_page = true;
        tracing::debug!(%subject, cursor = cursor.as_str(), "Requesting next page");

        Some(FetchRequest {
            ticket: FetchTicket {
                generation: self.generation,
                subject,
                cursor: Some(cursor),
                kind: FetchKind::NextPage,
            },
            limit: self.page_size,
        })
    }

    /// Re-issue whatever failed last. No-op when nothing failed.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        let failed = self.last_error.as_ref()?.kind;
        match failed {
            FetchKind::FirstPage => {
                if self.is_loading_first_page {
                    return None;
                }
                let subject = self.subject.clone()?;
                Some(self.reset(subject))
            }
            FetchKind::NextPage => self.load_next(),
        }
    }

    /// Apply the result of a fetch issued under `ticket`
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<Page, FetchError>) -> Completion {
        if !self.is_current(ticket) {
            tracing::debug!(
                subject = %ticket.subject,
                generation = ticket.generation,
                current_generation = self.generation,
                kind = ?ticket.kind,
                "Dropping stale fetch result"
            );
            return Completion::Stale;
        }

        match ticket.kind {
            FetchKind::FirstPage => self.is_loading_first_page = false,
            FetchKind::NextPage => self.is_loading_next_page = false,
        }

        match result {
            Ok(page) => {
                let received = page.items.len();
                if page.has_more && page.next_cursor.is_none() {
                    tracing::warn!(
                        subject = %ticket.subject,
                        "Page reports more data but carries no cursor; further loads disabled"
                    );
                }

                match ticket.kind {
                    FetchKind::FirstPage => self.items = page.items,
                    FetchKind::NextPage => self.items.extend(page.items),
                }
                self.cursor = page.next_cursor;
                self.has_more = page.has_more;
                self.last_error = None;
                self.revision += 1;

                Completion::Applied { kind: ticket.kind, received }
            }
            Err(error) => {
                // cursor and has_more stay as they were so the same page can be retried
                self.last_error = Some(LoadFailure {
                    kind: ticket.kind,
                    error: error.clone(),
                });
                Completion::Failed { kind: ticket.kind, error }
            }
        }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        if ticket.generation != self.generation || self.subject.as_ref() != Some(&ticket.subject) {
            return false;
        }
        match ticket.kind {
            FetchKind::FirstPage => self.is_loading_first_page,
            FetchKind::NextPage => self.is_loading_next_page && ticket.cursor == self.cursor,
        }
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        LoaderSnapshot {
            subject: self.subject.clone(),
            items: self.items.clone(),
            is_loading_first: self.is_loading_first_page,
            is_loading_next: self.is_loading_next_page,
            has_more: self.has_more,
            error: self.last_error.clone(),
        }
    }

    /// Bumped by every applied page, including empty ones
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[cfg(test)]
    pub fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    #[cfg(test)]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[cfg(test)]
    pub fn is_loading_first_page(&self) -> bool {
        self.is_loading_first_page
    }

    #[cfg(test)]
    pub fn is_loading_next_page(&self) -> bool {
        self.is_loading_next_page
    }

    #[cfg(test)]
    pub fn last_error(&self) -> Option<&LoadFailure> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn item(id: &str) -> GalleryItem {
        GalleryItem {
            id: id.to_string(),
            media_url: format!("http://booth.local/api/assets/{id}.jpg"),
            created_at: Utc.with_ymd_and_hms(2025, 4, 25, 20, 0, 0).unwrap(),
        }
    }

    fn page(ids: &[&str], cursor: Option<&str>, has_more: bool) -> Page {
        Page {
            items: ids.iter().map(|id| item(id)).collect(),
            next_cursor: cursor.map(Cursor::new),
            has_more,
        }
    }

    fn ids(loader: &GalleryLoader) -> Vec<&str> {
        loader.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn load_next_without_subject_is_noop() {
        let mut loader = GalleryLoader::new(2);
        assert!(loader.load_next().is_none());
        assert!(!loader.is_loading_next_page());
    }

    #[test]
    fn reset_issues_first_page_without_cursor() {
        let mut loader = GalleryLoader::new(10);
        let request = loader.reset(SubjectId::new("wedding"));

        assert_eq!(request.limit, 10);
        assert_eq!(request.ticket.kind, FetchKind::FirstPage);
        assert_eq!(request.ticket.cursor, None);
        assert!(loader.is_loading_first_page());
        assert!(loader.items().is_empty());
    }

    #[test]
    fn two_pages_end_to_end() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        let outcome = loader.complete(&first.ticket, Ok(page(&["A", "B"], Some("c1"), true)));
        assert_eq!(outcome, Completion::Applied { kind: FetchKind::FirstPage, received: 2 });
        assert!(!loader.is_loading_first_page());

        let next = loader.load_next().expect("second page should be requested");
        assert_eq!(next.ticket.cursor, Some(Cursor::new("c1")));
        assert!(loader.is_loading_next_page());

        loader.complete(&next.ticket, Ok(page(&["C", "D"], None, false)));
        assert_eq!(ids(&loader), vec!["A", "B", "C", "D"]);
        assert!(!loader.has_more());
        assert!(loader.load_next().is_none());
        assert!(loader.load_next().is_none());
    }

    #[test]
    fn overlapping_load_next_is_noop() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        loader.complete(&first.ticket, Ok(page(&["A", "B"], Some("c1"), true)));

        assert!(loader.load_next().is_some());
        assert!(loader.load_next().is_none());
        assert!(loader.load_next().is_none());
    }

    #[test]
    fn load_next_waits_for_first_page() {
        let mut loader = GalleryLoader::new(2);
        loader.reset(SubjectId::new("event"));
        assert!(loader.load_next().is_none());
    }

    #[test]
    fn first_page_failure_leaves_list_empty() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        let error = FetchError::Transport("connection refused".into());

        let outcome = loader.complete(&first.ticket, Err(error.clone()));
        assert_eq!(outcome, Completion::Failed { kind: FetchKind::FirstPage, error: error.clone() });
        assert!(loader.items().is_empty());
        assert!(!loader.is_loading_first_page());
        assert_eq!(loader.last_error().map(|f| &f.error), Some(&error));
        assert!(loader.load_next().is_none());
    }

    #[test]
    fn next_page_failure_keeps_items_and_cursor() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        loader.complete(&first.ticket, Ok(page(&["A", "B"], Some("c1"), true)));

        let next = loader.load_next().unwrap();
        let outcome = loader.complete(&next.ticket, Err(FetchError::Status { status: 502, url: "x".into() }));
        assert!(matches!(outcome, Completion::Failed { kind: FetchKind::NextPage, .. }));
        assert_eq!(ids(&loader), vec!["A", "B"]);
        assert!(loader.has_more());
        assert!(!loader.is_loading_next_page());

        // next trigger retries the same page
        let again = loader.load_next().unwrap();
        assert_eq!(again.ticket.cursor, Some(Cursor::new("c1")));
    }

    #[test]
    fn stale_subject_result_is_discarded() {
        let mut loader = GalleryLoader::new(2);
        let for_a = loader.reset(SubjectId::new("A"));
        let for_b = loader.reset(SubjectId::new("B"));

        let outcome = loader.complete(&for_a.ticket, Ok(page(&["a1", "a2"], Some("ca"), true)));
        assert_eq!(outcome, Completion::Stale);
        assert!(loader.items().is_empty());
        assert!(loader.is_loading_first_page());

        loader.complete(&for_b.ticket, Ok(page(&["b1"], None, false)));
        assert_eq!(ids(&loader), vec!["b1"]);
        assert_eq!(loader.subject(), Some(&SubjectId::new("B")));
        assert!(!loader.has_more());
    }

    #[test]
    fn reset_to_same_subject_invalidates_older_tickets() {
        let mut loader = GalleryLoader::new(2);
        let old = loader.reset(SubjectId::new("A"));
        let fresh = loader.reset(SubjectId::new("A"));

        assert_eq!(loader.complete(&old.ticket, Ok(page(&["old"], None, false))), Completion::Stale);
        loader.complete(&fresh.ticket, Ok(page(&["new"], None, false)));
        assert_eq!(ids(&loader), vec!["new"]);
    }

    #[test]
    fn stale_next_page_after_reset_does_not_append() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("A"));
        loader.complete(&first.ticket, Ok(page(&["a1", "a2"], Some("c1"), true)));
        let next = loader.load_next().unwrap();

        let for_b = loader.reset(SubjectId::new("B"));
        loader.complete(&for_b.ticket, Ok(page(&["b1", "b2"], Some("cb"), true)));

        assert_eq!(loader.complete(&next.ticket, Ok(page(&["a3"], None, false))), Completion::Stale);
        assert_eq!(ids(&loader), vec!["b1", "b2"]);
        assert!(loader.has_more());
    }

    #[test]
    fn has_more_without_cursor_stops_loading() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        loader.complete(&first.ticket, Ok(page(&["A", "B"], None, true)));

        assert!(loader.has_more());
        assert!(loader.load_next().is_none());
        assert!(!loader.is_loading_next_page());
    }

    #[test]
    fn retry_reissues_failed_first_page() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        assert!(loader.retry().is_none());

        loader.complete(&first.ticket, Err(FetchError::Transport("down".into())));
        let retried = loader.retry().expect("first page retried");
        assert_eq!(retried.ticket.kind, FetchKind::FirstPage);
        assert!(retried.ticket.generation > first.ticket.generation);
        assert!(loader.last_error().is_none());

        loader.complete(&retried.ticket, Ok(page(&["A"], None, false)));
        assert_eq!(ids(&loader), vec!["A"]);
    }

    #[test]
    fn snapshot_reflects_flags() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        let snapshot = loader.snapshot();
        assert!(snapshot.is_loading_first);
        assert!(!snapshot.is_loading_next);

        loader.complete(&first.ticket, Ok(page(&["A", "B"], Some("c1"), true)));
        loader.load_next();
        let snapshot = loader.snapshot();
        assert!(!snapshot.is_loading_first);
        assert!(snapshot.is_loading_next);
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.subject, Some(SubjectId::new("event")));
    }

    #[test]
    fn revision_counts_applied_pages_only() {
        let mut loader = GalleryLoader::new(2);
        let first = loader.reset(SubjectId::new("event"));
        loader.complete(&first.ticket, Ok(page(&["A", "B"], Some("c1"), true)));
        assert_eq!(loader.revision(), 1);

        // an empty page still moves the cursor along
        let next = loader.load_next().unwrap();
        loader.complete(&next.ticket, Ok(page(&[], Some("c2"), true)));
        assert_eq!(loader.revision(), 2);

        let failing = loader.load_next().unwrap();
        loader.complete(&failing.ticket, Err(FetchError::Transport("down".into())));
        assert_eq!(loader.revision(), 2);

        loader.reset(SubjectId::new("other"));
        assert_eq!(loader.revision(), 0);
    }

    proptest! {
        /// Accumulated items are the concatenation of every page, in fetch order
        #[test]
        fn items_concatenate_in_fetch_order(page_sizes in prop::collection::vec(0usize..6, 1..12)) {
            let mut loader = GalleryLoader::new(5);
            let mut expected = Vec::new();
            let mut next_id = 0usize;
            let last = page_sizes.len() - 1;

            let mut request = Some(loader.reset(SubjectId::new("event")));
            for (index, size) in page_sizes.iter().enumerate() {
                let ticket = request.take().expect("request available while has_more").ticket;
                let ids: Vec<String> = (0..*size).map(|n| format!("item-{}", next_id + n)).collect();
                next_id += size;
                expected.extend(ids.clone());

                let has_more = index < last;
                let page = Page {
                    items: ids.iter().map(|id| item(id)).collect(),
                    next_cursor: has_more.then(|| Cursor::new(format!("c{index}"))),
                    has_more,
                };
                let applied = matches!(loader.complete(&ticket, Ok(page)), Completion::Applied { .. });
                prop_assert!(applied);
                request = loader.load_next();
            }

            prop_assert!(request.is_none());
            let actual: Vec<String> = loader.items().iter().map(|i| i.id.clone()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
