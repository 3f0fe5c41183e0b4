use tracing::{error, info};

use super::{
    client::{CategoryApi, CategoryDraft, CategoryRecord},
    collection::CategoryList,
    view::DashboardView,
};

pub const NAME_REQUIRED: &str = "Please enter a category name";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this category?";

/// Which screen the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// The category list; the form is hidden.
    Hidden,
    Create,
    /// Editing the selected category.
    Edit(CategoryRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty name; nothing was sent.
    Blocked,
    /// The form is not open.
    FormClosed,
    Created(CategoryRecord),
    Updated(CategoryRecord),
    /// The request failed; the form keeps its input.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A form is open; delete is only offered from the list.
    FormOpen,
    Declined,
    Deleted,
    Failed,
}

/// Interactive yes/no question asked before a delete.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Category management screen. Owns the list state for its lifetime; every
/// mutation of the list happens after a successful response, so a failed
/// call leaves the previous state untouched.
pub struct CategoryDashboard<A> {
    api: A,
    categories: CategoryList,
    form: FormMode,
    draft: CategoryDraft,
    name_error: Option<String>,
}

impl<A: CategoryApi> CategoryDashboard<A> {
    /// Builds an empty dashboard and performs the initial fetch.
    pub async fn mount(api: A) -> Self {
        let mut dashboard = Self {
            api,
            categories: CategoryList::default(),
            form: FormMode::Hidden,
            draft: CategoryDraft::default(),
            name_error: None,
        };
        dashboard.refresh().await;
        dashboard
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn form(&self) -> &FormMode {
        &self.form
    }

    pub fn draft_name(&self) -> &str {
        &self.draft.name
    }

    pub fn name_error(&self) -> Option<&str> {
        self.name_error.as_deref()
    }

    pub fn is_listing(&self) -> bool {
        self.form == FormMode::Hidden
    }

    /// Reloads the list. Returns whether the fetch succeeded.
    pub async fn refresh(&mut self) -> bool {
        match self.api.list().await {
            Ok(items) => {
                info!(count = items.len(), "categories loaded");
                self.categories.replace_all(items);
                true
            }
            Err(err) => {
                error!(error = %err, "error fetching categories");
                false
            }
        }
    }

    /// Shows the create form, or hides whichever form is open and discards
    /// its input.
    pub fn toggle_form(&mut self) {
        match self.form {
            FormMode::Hidden => {
                self.reset_form();
                self.form = FormMode::Create;
            }
            FormMode::Create | FormMode::Edit(_) => self.reset_form(),
        }
    }

    /// Opens the edit form for `id`, seeded with its current name. Only
    /// possible from the list screen and for a known id.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        if !self.is_listing() {
            return false;
        }
        let Some(selected) = self.categories.get(id).cloned() else {
            return false;
        };
        self.draft = CategoryDraft {
            name: selected.name.clone(),
        };
        self.name_error = None;
        self.form = FormMode::Edit(selected);
        true
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Creates or updates depending on the open form.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let selected = match &self.form {
            FormMode::Hidden => return SubmitOutcome::FormClosed,
            FormMode::Create => None,
            FormMode::Edit(record) => Some(record.id.clone()),
        };

        if !self.validate() {
            return SubmitOutcome::Blocked;
        }

        let result = match &selected {
            Some(id) => self.api.update(id, &self.draft).await,
            None => self.api.create(&self.draft).await,
        };

        match result {
            Ok(record) => {
                self.categories.upsert(record.clone());
                self.reset_form();
                match selected {
                    Some(_) => {
                        info!(id = %record.id, "category updated");
                        SubmitOutcome::Updated(record)
                    }
                    None => {
                        info!(id = %record.id, "category created");
                        SubmitOutcome::Created(record)
                    }
                }
            }
            Err(err) => {
                error!(error = %err, "error adding/editing category");
                SubmitOutcome::Failed
            }
        }
    }

    /// Deletes `id` once `confirm` agrees. Only possible from the list
    /// screen; a declined confirmation sends nothing.
    pub async fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> DeleteOutcome {
        if !self.is_listing() {
            return DeleteOutcome::FormOpen;
        }
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Declined;
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.categories.remove(id);
                info!(id, "category deleted");
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!(error = %err, id, "error deleting category");
                DeleteOutcome::Failed
            }
        }
    }

    pub fn render(&self) -> DashboardView {
        match &self.form {
            FormMode::Hidden => DashboardView::Listing {
                rows: self.categories.as_slice().to_vec(),
            },
            FormMode::Create => DashboardView::Form {
                heading: "Add Category".into(),
                submit_label: "Add Category".into(),
                name: self.draft.name.clone(),
                error: self.name_error.clone(),
            },
            FormMode::Edit(_) => DashboardView::Form {
                heading: "Edit Category".into(),
                submit_label: "Update Category".into(),
                name: self.draft.name.clone(),
                error: self.name_error.clone(),
            },
        }
    }

    fn validate(&mut self) -> bool {
        if self.draft.name.trim().is_empty() {
            self.name_error = Some(NAME_REQUIRED.to_string());
            false
        } else {
            self.name_error = None;
            true
        }
    }

    fn reset_form(&mut self) {
        self.form = FormMode::Hidden;
        self.draft = CategoryDraft::default();
        self.name_error = None;
    }
}
