//! Per-session list views.
//!
//! Each admin session keeps one [`ListView`] per record type: the list
//! state (filters, search, sort, page), the checked rows and the open
//! dialog. Commands mutate the view and the caller renders the visible
//! slice afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::pagination::PaginationMeta;
use crate::domain::{Record, ResourceKind};
use crate::error::{ApiError, ApiResult};
use crate::query::deriver::filter_records;
use crate::query::{
    derive, ensure_filter_field, ensure_sort_field, ListState, ModalKind, ModalState,
    SelectionState, SortDirection, SortSpec,
};
use crate::services::{bulk, records, BulkAction, BulkResult};
use crate::store::{AdminStore, Resource};

/// One command against a list view, tagged by `command`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewCommand {
    SetFilter { field: String, value: String },
    ClearFilters,
    SetSearch { query: String },
    SortBy { field: String },
    SetSort { field: String, direction: SortDirection },
    SetPageSize { size: u32 },
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    GoToPage { page: u32 },
    ToggleSelect { id: Uuid },
    ToggleSelectPage,
    ClearSelection,
    OpenModal { kind: ModalKind, id: Uuid },
    CloseModal,
    ConfirmModal,
    Bulk { action: BulkAction },
}

#[derive(Debug, Clone, Serialize)]
pub struct ModalView<T> {
    pub kind: ModalKind,
    pub record: T,
}

/// Everything the list screen needs to draw itself
#[derive(Debug, Clone, Serialize)]
pub struct RenderedView<T> {
    pub kind: ResourceKind,
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    pub filters: BTreeMap<String, String>,
    pub search: Option<String>,
    pub sort: SortSpec,
    pub selected: Vec<Uuid>,
    pub page_selected: bool,
    pub modal: Option<ModalView<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_result: Option<BulkResult>,
}

#[derive(Debug, Clone)]
pub struct ListView {
    pub list: ListState,
    pub selection: SelectionState,
    pub modal: ModalState,
}

impl ListView {
    pub fn new(page_size: u32) -> Self {
        Self {
            list: ListState::new(page_size),
            selection: SelectionState::default(),
            modal: ModalState::default(),
        }
    }

    /// Pages in the currently filtered record set
    fn total_pages<T: Resource>(&self, store: &AdminStore) -> u32 {
        let query = self.list.to_query();
        let matched = T::collection(store).read(|records| filter_records(records, &query).len());
        PaginationMeta::total_pages(matched as u64, self.list.page_size())
    }

    /// Ids of the rows on the current page
    fn page_ids<T: Resource>(&self, store: &AdminStore) -> Vec<Uuid> {
        let query = self.list.to_query();
        T::collection(store).read(|records| {
            derive(records, &query)
                .items
                .iter()
                .map(Record::id)
                .collect()
        })
    }

    /// Apply one command. Returns the bulk result when the command was a
    /// bulk action.
    pub fn apply<T: Resource>(
        &mut self,
        store: &AdminStore,
        actor: &str,
        command: ViewCommand,
    ) -> ApiResult<Option<BulkResult>> {
        match command {
            ViewCommand::SetFilter { field, value } => {
                ensure_filter_field::<T>(&field)?;
                self.list.set_filter(&field, &value);
            }
            ViewCommand::ClearFilters => {
                self.list.clear_filters();
            }
            ViewCommand::SetSearch { query } => {
                self.list.set_search(&query);
            }
            ViewCommand::SortBy { field } => {
                ensure_sort_field::<T>(&field)?;
                self.list.sort_by(&field);
            }
            ViewCommand::SetSort { field, direction } => {
                ensure_sort_field::<T>(&field)?;
                self.list.set_sort(&field, direction);
            }
            ViewCommand::SetPageSize { size } => {
                if size == 0 {
                    return Err(ApiError::bad_request("Page size must be at least 1"));
                }
                self.list.set_page_size(size);
            }
            ViewCommand::FirstPage => self.list.first_page(),
            ViewCommand::PrevPage => {
                let total = self.total_pages::<T>(store);
                self.list.prev_page(total);
            }
            ViewCommand::NextPage => {
                let total = self.total_pages::<T>(store);
                self.list.next_page(total);
            }
            ViewCommand::LastPage => {
                let total = self.total_pages::<T>(store);
                self.list.last_page(total);
            }
            ViewCommand::GoToPage { page } => {
                let total = self.total_pages::<T>(store);
                self.list.go_to_page(page, total);
            }
            ViewCommand::ToggleSelect { id } => {
                if !T::collection(store).contains(id) {
                    return Err(ApiError::not_found(format!("{} {} not found", T::KIND, id)));
                }
                self.selection.toggle(id);
            }
            ViewCommand::ToggleSelectPage => {
                let ids = self.page_ids::<T>(store);
                self.selection.toggle_page(&ids);
            }
            ViewCommand::ClearSelection => self.selection.clear(),
            ViewCommand::OpenModal { kind, id } => self.open_modal::<T>(store, actor, kind, id)?,
            ViewCommand::CloseModal => self.modal.close(),
            ViewCommand::ConfirmModal => self.confirm_modal::<T>(store, actor)?,
            ViewCommand::Bulk { action } => {
                let result = bulk::apply::<T>(store, actor, action, self.selection.ids())?;
                self.selection.clear();
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    fn open_modal<T: Resource>(
        &mut self,
        store: &AdminStore,
        actor: &str,
        kind: ModalKind,
        id: Uuid,
    ) -> ApiResult<()> {
        if kind == ModalKind::Reply && !T::REPLYABLE {
            return Err(ApiError::bad_request(format!("{} do not accept replies", T::LABEL)));
        }

        match kind {
            ModalKind::View => {
                records::mark_viewed::<T>(store, actor, id)?;
            }
            _ => {
                records::get::<T>(store, id)?;
            }
        }

        self.modal.open(kind, id);
        Ok(())
    }

    fn confirm_modal<T: Resource>(&mut self, store: &AdminStore, actor: &str) -> ApiResult<()> {
        match self.modal.current() {
            Some((ModalKind::ConfirmDelete, id)) => {
                self.modal.close();
                records::delete::<T>(store, actor, id)?;
                self.selection.retain_existing(|selected| *selected != id);
                Ok(())
            }
            Some(_) => Err(ApiError::bad_request("Only a delete confirmation can be confirmed")),
            None => Err(ApiError::bad_request("No dialog is open")),
        }
    }

    /// Sync the view with the store and produce the visible slice.
    ///
    /// Selected rows and the open dialog that point at deleted records are
    /// dropped, and the page is pulled back inside the record set.
    pub fn render<T: Resource>(&mut self, store: &AdminStore, today: NaiveDate) -> RenderedView<T> {
        let collection = T::collection(store);

        let existing = collection.ids();
        self.selection.retain_existing(|id| existing.contains(id));
        if let Some((_, id)) = self.modal.current() {
            if !existing.contains(&id) {
                self.modal.close();
            }
        }

        let query = self.list.to_query();
        let mut page = collection.read(|records| derive(records, &query));
        self.list.clamp(page.meta.total_pages);

        for item in &mut page.items {
            item.refresh(today);
        }
        let page_ids: Vec<Uuid> = page.items.iter().map(Record::id).collect();

        let modal = self.modal.current().and_then(|(kind, id)| {
            collection.get(id).map(|mut record| {
                record.refresh(today);
                ModalView { kind, record }
            })
        });

        RenderedView {
            kind: T::KIND,
            items: page.items,
            pagination: page.meta,
            empty_message: page.empty_message,
            filters: self.list.filters().clone(),
            search: self.list.search().map(str::to_string),
            sort: query.resolved_sort::<T>(),
            selected: self.selection.ids().iter().copied().collect(),
            page_selected: self.selection.is_page_selected(&page_ids),
            modal,
            bulk_result: None,
        }
    }
}

struct SessionView {
    /// Expiry of the owning session token
    expires_at: DateTime<Utc>,
    view: Arc<Mutex<ListView>>,
}

/// List views keyed by session and record type.
///
/// Views of sessions whose token has expired are dropped whenever a new
/// view is created.
pub struct WorkspaceRegistry {
    default_page_size: u32,
    views: RwLock<HashMap<(Uuid, ResourceKind), SessionView>>,
}

impl WorkspaceRegistry {
    pub fn new(default_page_size: u32) -> Self {
        Self {
            default_page_size,
            views: RwLock::new(HashMap::new()),
        }
    }

    /// The session's view of `kind`, created on first use
    pub fn view(
        &self,
        session_id: Uuid,
        expires_at: DateTime<Utc>,
        kind: ResourceKind,
    ) -> Arc<Mutex<ListView>> {
        if let Some(entry) = self.views.read().get(&(session_id, kind)) {
            return entry.view.clone();
        }

        let now = Utc::now();
        let mut views = self.views.write();
        views.retain(|_, entry| entry.expires_at > now);
        views
            .entry((session_id, kind))
            .or_insert_with(|| SessionView {
                expires_at,
                view: Arc::new(Mutex::new(ListView::new(self.default_page_size))),
            })
            .view
            .clone()
    }

    /// Forget every view of a session. Returns how many were dropped.
    pub fn drop_session(&self, session_id: Uuid) -> usize {
        let mut views = self.views.write();
        let before = views.len();
        views.retain(|(sid, _), _| *sid != session_id);
        before - views.len()
    }

    /// Clear every selection and close every dialog, e.g. after a restore
    /// replaced the records they pointed at.
    pub fn reset_selections(&self) {
        for entry in self.views.read().values() {
            let mut view = entry.view.lock();
            view.selection.clear();
            view.modal.close();
        }
    }

    pub fn len(&self) -> usize {
        self.views.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Inquiry, InquiryStatus, Notice, ResourceDocument};
    use chrono::{Duration, Utc};

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn run<T: Resource>(view: &mut ListView, store: &AdminStore, command: ViewCommand) -> RenderedView<T> {
        let bulk_result = view.apply::<T>(store, "admin", command).unwrap();
        let mut rendered = view.render::<T>(store, today());
        rendered.bulk_result = bulk_result;
        rendered
    }

    #[test]
    fn paging_through_resources() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);

        let first = view.render::<ResourceDocument>(&store, today());
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.pagination.summary, "Showing 1 to 10 of 18 entries");

        let second = run::<ResourceDocument>(&mut view, &store, ViewCommand::NextPage);
        assert_eq!(second.items.len(), 8);
        assert_eq!(second.pagination.summary, "Showing 11 to 18 of 18 entries");

        let clamped = run::<ResourceDocument>(&mut view, &store, ViewCommand::NextPage);
        assert_eq!(clamped.pagination.page, 2);

        let jumped = run::<ResourceDocument>(&mut view, &store, ViewCommand::GoToPage { page: 99 });
        assert_eq!(jumped.pagination.page, 2);
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(5);
        run::<ResourceDocument>(&mut view, &store, ViewCommand::LastPage);
        assert_eq!(view.list.page(), 4);

        let filtered = run::<ResourceDocument>(
            &mut view,
            &store,
            ViewCommand::SetFilter {
                field: "category".into(),
                value: "reports".into(),
            },
        );
        assert_eq!(filtered.pagination.page, 1);
        assert!(filtered.items.iter().all(|r| r.category == "Reports"));

        let cleared = run::<ResourceDocument>(
            &mut view,
            &store,
            ViewCommand::SetFilter {
                field: "category".into(),
                value: "all".into(),
            },
        );
        assert_eq!(cleared.pagination.total_items, 18);
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);
        let err = view
            .apply::<Notice>(
                &store,
                "admin",
                ViewCommand::SetFilter {
                    field: "colour".into(),
                    value: "red".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn sort_by_toggles_direction() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);
        let asc = run::<Notice>(&mut view, &store, ViewCommand::SortBy { field: "title".into() });
        assert_eq!(asc.sort.direction, SortDirection::Asc);
        let desc = run::<Notice>(&mut view, &store, ViewCommand::SortBy { field: "title".into() });
        assert_eq!(desc.sort.direction, SortDirection::Desc);
        assert!(desc.items.windows(2).all(|w| w[0].title.to_lowercase() >= w[1].title.to_lowercase()));
    }

    #[test]
    fn select_page_then_bulk_archive() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);

        let selected = run::<Inquiry>(&mut view, &store, ViewCommand::ToggleSelectPage);
        assert!(selected.page_selected);
        assert_eq!(selected.selected.len(), store.inquiries.len());

        let archived = run::<Inquiry>(
            &mut view,
            &store,
            ViewCommand::Bulk {
                action: BulkAction::Archive,
            },
        );
        assert!(archived.selected.is_empty());
        let result = archived.bulk_result.unwrap();
        assert_eq!(result.affected.len() + result.unchanged.len(), store.inquiries.len());
        assert_eq!(result.unchanged.len(), 1);
        assert!(archived.items.iter().all(|i| i.status == InquiryStatus::Archived));
    }

    #[test]
    fn view_modal_marks_inquiry_read() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);
        let id = store
            .inquiries
            .read(|all| all.iter().find(|i| i.status == InquiryStatus::New).map(|i| i.id))
            .unwrap();

        let rendered = run::<Inquiry>(&mut view, &store, ViewCommand::OpenModal { kind: ModalKind::View, id });
        let modal = rendered.modal.unwrap();
        assert_eq!(modal.kind, ModalKind::View);
        assert_eq!(modal.record.status, InquiryStatus::Read);
    }

    #[test]
    fn reply_modal_requires_repliable_type() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);
        let id = store.notices.read(|all| all[0].id);
        assert!(view
            .apply::<Notice>(&store, "admin", ViewCommand::OpenModal { kind: ModalKind::Reply, id })
            .is_err());
        assert!(!view.modal.is_open());
    }

    #[test]
    fn confirm_delete_removes_record_and_selection() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);
        let id = store.notices.read(|all| all[0].id);
        let before = store.notices.len();

        run::<Notice>(&mut view, &store, ViewCommand::ToggleSelect { id });
        run::<Notice>(&mut view, &store, ViewCommand::OpenModal { kind: ModalKind::ConfirmDelete, id });
        let rendered = run::<Notice>(&mut view, &store, ViewCommand::ConfirmModal);

        assert_eq!(store.notices.len(), before - 1);
        assert!(rendered.modal.is_none());
        assert!(rendered.selected.is_empty());

        assert!(view.apply::<Notice>(&store, "admin", ViewCommand::ConfirmModal).is_err());
    }

    #[test]
    fn deleting_elsewhere_clamps_page_and_closes_modal() {
        let store = AdminStore::seeded();
        let mut view = ListView::new(10);
        run::<ResourceDocument>(&mut view, &store, ViewCommand::LastPage);
        let on_last = view.render::<ResourceDocument>(&store, today());
        let id = on_last.items[0].id;
        run::<ResourceDocument>(&mut view, &store, ViewCommand::OpenModal { kind: ModalKind::Edit, id });

        let doomed: std::collections::BTreeSet<Uuid> = store.resources.ids().into_iter().take(9).collect();
        store.resources.remove_many(&doomed);
        let rendered = view.render::<ResourceDocument>(&store, today());
        assert_eq!(rendered.pagination.page, 1);
        assert_eq!(view.list.page(), 1);
        if doomed.contains(&id) {
            assert!(rendered.modal.is_none());
        }
    }

    #[test]
    fn registry_is_per_session_and_kind() {
        let registry = WorkspaceRegistry::new(10);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let expires = Utc::now() + Duration::hours(1);

        registry.view(a, expires, ResourceKind::Notice).lock().list.set_search("copper");
        assert_eq!(
            registry.view(a, expires, ResourceKind::Notice).lock().list.search(),
            Some("copper")
        );
        assert_eq!(registry.view(b, expires, ResourceKind::Notice).lock().list.search(), None);
        assert_eq!(registry.view(a, expires, ResourceKind::Job).lock().list.search(), None);
        assert_eq!(registry.len(), 3);

        assert_eq!(registry.drop_session(a), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn expired_sessions_lose_their_views() {
        let registry = WorkspaceRegistry::new(10);
        let expired = Utc::now() - Duration::seconds(1);
        for _ in 0..1000 {
            registry.view(Uuid::new_v4(), expired, ResourceKind::Inquiry);
        }

        let live = Uuid::new_v4();
        registry.view(live, Utc::now() + Duration::hours(8), ResourceKind::Inquiry);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.drop_session(live), 1);
        assert!(registry.is_empty());
    }
}
