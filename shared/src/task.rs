use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 100;
/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A task record as stored and served. Timestamps are server-assigned;
/// `created_at` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
}

/// Full-object update payload. Every field is required: PUT overwrites the
/// whole record, so callers echo back whatever they do not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl Task {
    /// Build a fresh task from validated fields. The server picks the id and
    /// both timestamps; `completed` starts false.
    pub fn new(title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field and refresh `updated_at`. The id and
    /// `created_at` stay as they are.
    pub fn apply_update(&mut self, title: String, description: String, completed: bool) {
        self.title = title;
        self.description = description;
        self.completed = completed;
        self.updated_at = Utc::now();
    }
}

/// Trimmed fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
}

/// Check a title and description against the field rules.
///
/// Both values are trimmed first. Returns the trimmed pair, or one message
/// per violated rule so callers can show everything that is wrong at once.
pub fn validate_task_fields(title: &str, description: &str) -> Result<TaskFields, Vec<String>> {
    let title = title.trim();
    let description = description.trim();
    let mut errors = Vec::new();

    if title.is_empty() {
        errors.push("Title is required".to_string());
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("Title cannot exceed {MAX_TITLE_LEN} characters"));
    }

    if description.is_empty() {
        errors.push("Description is required".to_string());
    } else if description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        ));
    }

    if errors.is_empty() {
        Ok(TaskFields {
            title: title.to_string(),
            description: description.to_string(),
        })
    } else {
        Err(errors)
    }
}
