use std::fmt;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Assessments,
    /// `None` creates a new assessment; `Some(id)` edits an existing one.
    AssessmentForm(Option<i64>),
    Protocols,
    References,
}

impl Route {
    pub fn path(self) -> String {
        match self {
            Route::Assessments => "/assessments".to_string(),
            Route::AssessmentForm(None) => "/assessments/new".to_string(),
            Route::AssessmentForm(Some(id)) => format!("/assessments/{id}"),
            Route::Protocols => "/protocols".to_string(),
            Route::References => "/references".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
