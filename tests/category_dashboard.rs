use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use storefront_api::admin::{
    CategoryApi, CategoryDashboard, CategoryDraft, CategoryRecord, ClientError, DashboardView,
    DeleteOutcome, FormMode, SubmitOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Create(String),
    Update(String, String),
    Delete(String),
}

/// In-memory category store that records every call made to it.
#[derive(Default)]
struct FakeApi {
    store: Mutex<Vec<CategoryRecord>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
    failing: Mutex<bool>,
}

impl FakeApi {
    fn with(records: &[(&str, &str)]) -> Arc<Self> {
        let api = Self::default();
        *api.store.lock().unwrap() = records
            .iter()
            .map(|(id, name)| CategoryRecord::new(*id, *name))
            .collect();
        *api.next_id.lock().unwrap() = 100;
        Arc::new(api)
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn fail_requests(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        if *self.failing.lock().unwrap() {
            return Err(ClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryApi for FakeApi {
    async fn list(&self) -> Result<Vec<CategoryRecord>, ClientError> {
        self.record(Call::List)?;
        Ok(self.store.lock().unwrap().clone())
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<CategoryRecord, ClientError> {
        self.record(Call::Create(draft.name.clone()))?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let record = CategoryRecord::new(next_id.to_string(), draft.name.clone());
        self.store.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &str,
        draft: &CategoryDraft,
    ) -> Result<CategoryRecord, ClientError> {
        self.record(Call::Update(id.to_string(), draft.name.clone()))?;
        let mut store = self.store.lock().unwrap();
        let entry = store
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(ClientError::Status {
                status: StatusCode::NOT_FOUND,
                body: "Not Found".into(),
            })?;
        entry.name = draft.name.clone();
        Ok(entry.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.record(Call::Delete(id.to_string()))?;
        self.store.lock().unwrap().retain(|entry| entry.id != id);
        Ok(())
    }
}

fn names<A: CategoryApi>(dashboard: &CategoryDashboard<A>) -> Vec<String> {
    dashboard
        .categories()
        .iter()
        .map(|c| c.name.clone())
        .collect()
}

#[tokio::test]
async fn mount_fetches_once_and_starts_listing() {
    let api = FakeApi::with(&[("1", "Books"), ("2", "Games")]);
    let dashboard = CategoryDashboard::mount(api.clone()).await;

    assert!(dashboard.is_listing());
    assert_eq!(api.calls(), vec![Call::List]);
    assert_eq!(names(&dashboard), vec!["Books", "Games"]);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_list() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;

    api.fail_requests(true);
    assert!(!dashboard.refresh().await);
    assert_eq!(names(&dashboard), vec!["Books"]);
}

#[tokio::test]
async fn blank_names_are_blocked_without_a_request() {
    let api = FakeApi::with(&[]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;
    dashboard.toggle_form();

    for name in ["", "   ", "\t\n"] {
        dashboard.set_name(name);
        assert_eq!(dashboard.submit().await, SubmitOutcome::Blocked);
        assert_eq!(dashboard.name_error(), Some("Please enter a category name"));
        assert_eq!(dashboard.form(), &FormMode::Create);
    }

    assert_eq!(api.calls(), vec![Call::List]);
}

#[tokio::test]
async fn creating_electronics_posts_and_appends_once() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;
    let before = dashboard.categories().len();

    dashboard.toggle_form();
    dashboard.set_name("Electronics");
    let created = match dashboard.submit().await {
        SubmitOutcome::Created(record) => record,
        other => panic!("expected a create, got {other:?}"),
    };
    assert_eq!(created.name, "Electronics");
    assert_eq!(api.calls(), vec![Call::List, Call::Create("Electronics".into())]);
    assert_eq!(dashboard.categories().len(), before + 1);
    assert_eq!(
        dashboard
            .categories()
            .iter()
            .filter(|c| c.id == created.id)
            .count(),
        1
    );
    assert!(dashboard.is_listing());
    assert_eq!(dashboard.draft_name(), "");
    assert_eq!(dashboard.name_error(), None);
}

#[tokio::test]
async fn editing_books_puts_and_replaces_only_that_entry() {
    let api = FakeApi::with(&[("1", "Books"), ("2", "Games"), ("3", "Music")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;

    assert!(dashboard.begin_edit("1"));
    assert_eq!(dashboard.draft_name(), "Books");
    assert_eq!(
        dashboard.form(),
        &FormMode::Edit(CategoryRecord::new("1", "Books"))
    );

    dashboard.set_name("Literature");
    let outcome = dashboard.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Updated(CategoryRecord::new("1", "Literature"))
    );
    assert_eq!(
        api.calls().last(),
        Some(&Call::Update("1".into(), "Literature".into()))
    );
    assert_eq!(
        dashboard.categories().as_slice(),
        &[
            CategoryRecord::new("1", "Literature"),
            CategoryRecord::new("2", "Games"),
            CategoryRecord::new("3", "Music"),
        ]
    );
    assert!(dashboard.is_listing());
}

#[tokio::test]
async fn begin_edit_requires_known_id_and_list_screen() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api).await;

    assert!(!dashboard.begin_edit("42"));
    assert!(dashboard.is_listing());

    dashboard.toggle_form();
    assert!(!dashboard.begin_edit("1"));
    assert_eq!(dashboard.form(), &FormMode::Create);
}

#[tokio::test]
async fn failed_submit_keeps_form_and_input() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;

    dashboard.toggle_form();
    dashboard.set_name("Garden");
    api.fail_requests(true);

    assert_eq!(dashboard.submit().await, SubmitOutcome::Failed);
    assert_eq!(dashboard.form(), &FormMode::Create);
    assert_eq!(dashboard.draft_name(), "Garden");
    assert_eq!(names(&dashboard), vec!["Books"]);
}

#[tokio::test]
async fn toggling_discards_edits_without_sending() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;

    dashboard.begin_edit("1");
    dashboard.set_name("Comics");
    dashboard.toggle_form();

    assert!(dashboard.is_listing());
    assert_eq!(dashboard.draft_name(), "");
    assert_eq!(names(&dashboard), vec!["Books"]);

    // Reopening starts a fresh create form, not the abandoned edit.
    dashboard.toggle_form();
    assert_eq!(dashboard.form(), &FormMode::Create);
    assert_eq!(dashboard.draft_name(), "");
    assert_eq!(api.calls(), vec![Call::List]);
}

#[tokio::test]
async fn submit_with_hidden_form_does_nothing() {
    let api = FakeApi::with(&[]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;

    dashboard.set_name("Orphan");
    assert_eq!(dashboard.submit().await, SubmitOutcome::FormClosed);
    assert_eq!(api.calls(), vec![Call::List]);
}

#[tokio::test]
async fn confirmed_delete_removes_entry() {
    let api = FakeApi::with(&[("1", "Books"), ("2", "Games"), ("3", "Music")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;
    let mut asked = Vec::new();

    let outcome = dashboard
        .delete("2", &mut |prompt: &str| {
            asked.push(prompt.to_string());
            true
        })
        .await;

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(asked, vec!["Are you sure you want to delete this category?"]);
    assert_eq!(api.calls().last(), Some(&Call::Delete("2".into())));
    assert_eq!(dashboard.categories().len(), 2);
    assert!(dashboard.categories().get("2").is_none());
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let api = FakeApi::with(&[("1", "Books"), ("2", "Games")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;

    let outcome = dashboard.delete("2", &mut |_: &str| false).await;

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(api.calls(), vec![Call::List]);
    assert_eq!(names(&dashboard), vec!["Books", "Games"]);
}

#[tokio::test]
async fn delete_is_refused_while_a_form_is_open() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;
    let mut asked = false;

    dashboard.toggle_form();
    let outcome = dashboard
        .delete("1", &mut |_: &str| {
            asked = true;
            true
        })
        .await;

    assert_eq!(outcome, DeleteOutcome::FormOpen);
    assert!(!asked);
    assert_eq!(api.calls(), vec![Call::List]);
    assert_eq!(names(&dashboard), vec!["Books"]);
}

#[tokio::test]
async fn failed_delete_keeps_entry() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api.clone()).await;
    api.fail_requests(true);

    let outcome = dashboard.delete("1", &mut |_: &str| true).await;

    assert_eq!(outcome, DeleteOutcome::Failed);
    assert_eq!(names(&dashboard), vec!["Books"]);
}

#[tokio::test]
async fn render_follows_the_form_state() {
    let api = FakeApi::with(&[("1", "Books")]);
    let mut dashboard = CategoryDashboard::mount(api).await;

    assert_eq!(
        dashboard.render(),
        DashboardView::Listing {
            rows: vec![CategoryRecord::new("1", "Books")]
        }
    );

    dashboard.begin_edit("1");
    let DashboardView::Form {
        heading,
        submit_label,
        name,
        error,
    } = dashboard.render()
    else {
        panic!("expected the form");
    };
    assert_eq!(heading, "Edit Category");
    assert_eq!(submit_label, "Update Category");
    assert_eq!(name, "Books");
    assert_eq!(error, None);
}
