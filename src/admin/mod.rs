//! Operator-side category management: a REST client for `/api/categories`
//! and the dashboard state that drives the list/form screens.

pub mod client;
pub mod collection;
pub mod dashboard;
pub mod view;

pub use client::{CategoryApi, CategoryDraft, CategoryRecord, ClientError, HttpCategoryClient};
pub use collection::{CategoryList, Upsert};
pub use dashboard::{CategoryDashboard, Confirm, DeleteOutcome, FormMode, SubmitOutcome};
pub use view::DashboardView;
