use std::fmt;

use super::client::CategoryRecord;

/// What the dashboard currently shows. The list and the form are never
/// visible together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Listing {
        rows: Vec<CategoryRecord>,
    },
    Form {
        heading: String,
        submit_label: String,
        name: String,
        error: Option<String>,
    },
}

impl DashboardView {
    /// Label of the button that flips between list and form.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            DashboardView::Listing { .. } => "Add Category",
            DashboardView::Form { .. } => "Hide Form",
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Category Dashboard")?;
        writeln!(f, "[{}]", self.toggle_label())?;
        match self {
            DashboardView::Listing { rows } => {
                writeln!(f, "Category List")?;
                if rows.is_empty() {
                    writeln!(f, "  No categories found")?;
                }
                for row in rows {
                    writeln!(f, "  {}  ({})  [Edit] [Delete]", row.name, row.id)?;
                }
            }
            DashboardView::Form {
                heading,
                submit_label,
                name,
                error,
            } => {
                writeln!(f, "{heading}")?;
                writeln!(f, "  Name: {name}")?;
                if let Some(error) = error {
                    writeln!(f, "  ! {error}")?;
                }
                writeln!(f, "  [{submit_label}]")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_says_so() {
        let text = DashboardView::Listing { rows: Vec::new() }.to_string();
        assert!(text.contains("No categories found"));
        assert!(text.contains("[Add Category]"));
    }

    #[test]
    fn form_shows_inline_error() {
        let view = DashboardView::Form {
            heading: "Edit Category".into(),
            submit_label: "Update Category".into(),
            name: String::new(),
            error: Some("Please enter a category name".into()),
        };
        let text = view.to_string();
        assert!(text.contains("[Hide Form]"));
        assert!(text.contains("! Please enter a category name"));
        assert!(text.contains("[Update Category]"));
    }
}
