use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{validate_task_fields, ApiResponse, CreateTaskRequest, Task, UpdateTaskRequest};
use uuid::Uuid;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, window, Request, RequestInit, Response};

const API_URL: &str = "/api/v1/tasks";

#[derive(Debug, Clone)]
pub enum Msg {
    LoadTasks,
    TasksLoaded(Vec<Task>),
    SetNewTitle(String),
    SetNewDescription(String),
    CreateTask,
    ToggleTask(Uuid),
    EditTask(Uuid),
    SetEditTitle(String),
    SetEditDescription(String),
    SaveEdit(Uuid),
    CancelEdit,
    DeleteTask(Uuid),
    DismissError,
    Error(String),
}

/// The whole client state. The task list is a cache of the server's
/// collection: every mutation reloads it rather than patching it locally,
/// so the UI always shows what the server last confirmed.
#[derive(Debug, Clone)]
pub struct Model {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    new_title: String,
    new_description: String,
    editing_task: Option<Uuid>,
    edit_title: String,
    edit_description: String,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
            error: None,
            new_title: String::new(),
            new_description: String::new(),
            editing_task: None,
            edit_title: String::new(),
            edit_description: String::new(),
        }
    }
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTasks })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTasks => {
                self.loading = true;
                Cmd::new(async {
                    match fetch_tasks().await {
                        Ok(tasks) => Msg::TasksLoaded(tasks),
                        Err(e) => Msg::Error(e),
                    }
                })
            }
            Msg::TasksLoaded(tasks) => {
                self.tasks = tasks;
                self.loading = false;
                self.error = None;
                Cmd::none()
            }
            Msg::SetNewTitle(title) => {
                self.new_title = title;
                Cmd::none()
            }
            Msg::SetNewDescription(description) => {
                self.new_description = description;
                Cmd::none()
            }
            Msg::CreateTask => match validate_task_fields(&self.new_title, &self.new_description) {
                Ok(fields) => {
                    self.new_title.clear();
                    self.new_description.clear();
                    self.error = None;
                    Cmd::new(async move {
                        match create_task(fields.title, fields.description).await {
                            Ok(_) => Msg::LoadTasks,
                            Err(e) => Msg::Error(e),
                        }
                    })
                }
                Err(errors) => {
                    self.error = Some(errors.join(", "));
                    Cmd::none()
                }
            },
            Msg::ToggleTask(id) => {
                let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
                    return Cmd::none();
                };
                // Full-object update: echo the current text, flip completed.
                let title = task.title.clone();
                let description = task.description.clone();
                let completed = !task.completed;
                Cmd::new(async move {
                    match update_task(id, title, description, completed).await {
                        Ok(_) => Msg::LoadTasks,
                        Err(e) => Msg::Error(e),
                    }
                })
            }
            Msg::EditTask(id) => {
                if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
                    self.editing_task = Some(id);
                    self.edit_title = task.title.clone();
                    self.edit_description = task.description.clone();
                }
                Cmd::none()
            }
            Msg::SetEditTitle(title) => {
                self.edit_title = title;
                Cmd::none()
            }
            Msg::SetEditDescription(description) => {
                self.edit_description = description;
                Cmd::none()
            }
            Msg::SaveEdit(id) => {
                // Guard: only save if we're actually editing this task
                if self.editing_task != Some(id) {
                    return Cmd::none();
                }
                let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
                    return Cmd::none();
                };
                let completed = task.completed;
                match validate_task_fields(&self.edit_title, &self.edit_description) {
                    Ok(fields) => {
                        self.editing_task = None;
                        self.edit_title.clear();
                        self.edit_description.clear();
                        self.error = None;
                        Cmd::new(async move {
                            match update_task(id, fields.title, fields.description, completed).await
                            {
                                Ok(_) => Msg::LoadTasks,
                                Err(e) => Msg::Error(e),
                            }
                        })
                    }
                    Err(errors) => {
                        self.error = Some(errors.join(", "));
                        Cmd::none()
                    }
                }
            }
            Msg::CancelEdit => {
                self.editing_task = None;
                self.edit_title.clear();
                self.edit_description.clear();
                Cmd::none()
            }
            Msg::DeleteTask(id) => {
                let confirmed = window()
                    .and_then(|w| {
                        w.confirm_with_message("Are you sure you want to delete this task?")
                            .ok()
                    })
                    .unwrap_or(false);
                if !confirmed {
                    return Cmd::none();
                }
                Cmd::new(async move {
                    match delete_task(id).await {
                        Ok(_) => Msg::LoadTasks,
                        Err(e) => Msg::Error(e),
                    }
                })
            }
            Msg::DismissError => {
                self.error = None;
                Cmd::none()
            }
            Msg::Error(message) => {
                console::error_1(&format!("request failed: {}", message).into());
                self.error = Some(message);
                self.loading = false;
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                self.view_header(),
                div(
                    [class("max-w-4xl mx-auto px-6 py-8 space-y-6")],
                    [
                        self.view_error_banner(),
                        self.view_create_form(),
                        if self.loading && self.tasks.is_empty() {
                            div(
                                [class("text-center py-10 text-ctp-subtext0 italic")],
                                [text("Loading...")],
                            )
                        } else {
                            self.view_task_list()
                        },
                        self.view_stats(),
                    ],
                ),
            ],
        )
    }
}

impl Model {
    fn view_header(&self) -> Node<Msg> {
        header([class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")], [
            div([class("max-w-4xl mx-auto px-6 py-4")], [
                h1([class("text-2xl font-bold text-ctp-text")], [text("Task Manager")]),
                p([class("text-sm text-ctp-subtext0 mt-1")], [text("Stay on top of what needs doing")]),
            ]),
        ])
    }

    fn view_error_banner(&self) -> Node<Msg> {
        match &self.error {
            Some(message) => div(
                [class("flex items-center justify-between bg-ctp-red/20 border border-ctp-red rounded-lg px-4 py-3")],
                [
                    span([class("text-sm font-medium text-ctp-red")], [text(message)]),
                    button([
                        on_click(|_| Msg::DismissError),
                        class("text-ctp-red hover:text-ctp-maroon font-bold px-2"),
                        r#type("button"),
                    ], [text("✕")]),
                ],
            ),
            None => span([], []),
        }
    }

    fn view_create_form(&self) -> Node<Msg> {
        div(
            [class("p-6 bg-ctp-surface1 rounded-lg border border-ctp-surface2")],
            [
                h2([class("text-xl font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [text("Add New Task")]),
                div([class("space-y-4")], [
                    input([
                        r#type("text"),
                        placeholder("Task title"),
                        value(&self.new_title),
                        on_input(|event| Msg::SetNewTitle(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                    ], []),
                    textarea([
                        placeholder("Task description"),
                        value(&self.new_description),
                        on_input(|event| Msg::SetNewDescription(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent h-20 resize-y"),
                    ], []),
                    button([
                        on_click(|_| Msg::CreateTask),
                        class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                    ], [text("Add Task")]),
                ]),
            ],
        )
    }

    fn view_task_list(&self) -> Node<Msg> {
        if self.tasks.is_empty() {
            div([class("text-center py-12")], [
                div([class("text-ctp-overlay0 text-6xl mb-4")], [text("✨")]),
                h3([class("text-lg font-medium text-ctp-text mb-2")], [text("No tasks yet")]),
                p([class("text-ctp-subtext0")], [text("Create your first task above to get started!")]),
            ])
        } else {
            div(
                [class("space-y-4")],
                self.tasks.iter().map(|task| self.view_task(task)).collect::<Vec<_>>(),
            )
        }
    }

    fn view_task(&self, task: &Task) -> Node<Msg> {
        let is_editing = self.editing_task == Some(task.id);

        div(
            [key(task.id.to_string()),
            class(&format!(
                "group border rounded-xl p-6 bg-ctp-surface0 shadow-sm transition-all duration-300 hover:shadow-lg {}",
                if task.completed {
                    "border-ctp-green bg-ctp-green/10"
                } else {
                    "border-ctp-surface1 hover:border-ctp-blue hover:-translate-y-0.5"
                }
            ))],
            if is_editing {
                vec![
                    div([class("space-y-3")], [
                        input([
                            r#type("text"),
                            value(&self.edit_title),
                            on_input(|event| Msg::SetEditTitle(event.value())),
                            class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                        ], []),
                        textarea([
                            value(&self.edit_description),
                            on_input(|event| Msg::SetEditDescription(event.value())),
                            class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent h-20 resize-y"),
                        ], []),
                        div([class("flex gap-2")], [
                            button([
                                on_click({
                                    let captured_id = task.id;
                                    move |_| Msg::SaveEdit(captured_id)
                                }),
                                class("bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                                r#type("button"),
                            ], [text("Save")]),
                            button([
                                on_click(|_| Msg::CancelEdit),
                                class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                                r#type("button"),
                            ], [text("Cancel")]),
                        ]),
                    ]),
                ]
            } else {
                vec![
                    div([class("flex items-start gap-4")], [
                        div([class("flex-shrink-0 pt-1")], [
                            label([class("relative flex items-center cursor-pointer")], [
                                input([
                                    r#type("checkbox"),
                                    checked(task.completed),
                                    on_click({
                                        let task_id = task.id;
                                        move |_| Msg::ToggleTask(task_id)
                                    }),
                                    class("sr-only"),
                                ], []),
                                div([class(&format!(
                                    "w-6 h-6 rounded-lg border-2 flex items-center justify-center transition-all duration-200 {}",
                                    if task.completed {
                                        "bg-ctp-green border-ctp-green shadow-sm"
                                    } else {
                                        "border-ctp-surface2 hover:border-ctp-blue hover:bg-ctp-blue/10"
                                    }
                                ))], [
                                    if task.completed {
                                        span([class("text-ctp-base text-sm font-bold")], [text("✓")])
                                    } else {
                                        span([], [])
                                    }
                                ]),
                            ]),
                        ]),
                        div([class("flex-1 min-w-0")], [
                            h3([class(&format!(
                                "text-lg font-semibold mb-2 transition-all duration-200 {}",
                                if task.completed {
                                    "line-through text-ctp-overlay1"
                                } else {
                                    "text-ctp-text"
                                }
                            ))], [text(&task.title)]),
                            p([class(&format!(
                                "text-sm leading-relaxed break-words {}",
                                if task.completed {
                                    "text-ctp-overlay0 line-through"
                                } else {
                                    "text-ctp-subtext1"
                                }
                            ))], [text(&task.description)]),
                            self.view_timeline(task),
                        ]),
                        div([class("flex-shrink-0")], [
                            div([class("flex flex-col gap-2")], [
                                button([
                                    on_click({
                                        let captured_id = task.id;
                                        move |_| Msg::EditTask(captured_id)
                                    }),
                                    class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30 transition-colors duration-200"),
                                    r#type("button"),
                                ], [
                                    span([class("text-sm")], [text("✏️")])
                                ]),
                                button([
                                    on_click({
                                        let captured_id = task.id;
                                        move |_| Msg::DeleteTask(captured_id)
                                    }),
                                    class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 transition-colors duration-200"),
                                    r#type("button"),
                                ], [
                                    span([class("text-sm")], [text("🗑️")])
                                ]),
                            ]),
                        ]),
                    ]),
                ]
            },
        )
    }

    fn view_timeline(&self, task: &Task) -> Node<Msg> {
        let mut timeline = format!("Created {}", task.created_at.format("%b %e, %Y %H:%M"));
        if task.updated_at != task.created_at {
            timeline.push_str(&format!(
                ", updated {}",
                task.updated_at.format("%b %e, %Y %H:%M")
            ));
        }
        p([class("text-xs text-ctp-overlay1 mt-3")], [text(&timeline)])
    }

    fn view_stats(&self) -> Node<Msg> {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        let pending = self.tasks.len() - completed;
        div([class("grid grid-cols-1 md:grid-cols-3 gap-6")], [
            self.stat_card("Total Tasks", &self.tasks.len().to_string(), "📝"),
            self.stat_card("Completed", &completed.to_string(), "✅"),
            self.stat_card("Pending", &pending.to_string(), "⏳"),
        ])
    }

    fn stat_card(&self, card_title: &str, card_value: &str, icon: &str) -> Node<Msg> {
        div([class("bg-ctp-surface1 rounded-lg p-6 border border-ctp-surface2")], [
            div([class("flex items-center justify-between")], [
                div([], [
                    p([class("text-sm font-medium text-ctp-subtext0")], [text(card_title)]),
                    p([class("text-2xl font-bold text-ctp-text mt-1")], [text(card_value)]),
                ]),
                span([class("text-3xl")], [text(icon)]),
            ]),
        ])
    }
}

/// Run one request against the API and hand back the raw response body.
/// Transport failures come back as short human-readable strings; the caller
/// decides what the body means.
async fn request(method: &str, url: &str, body: Option<String>) -> Result<String, String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&wasm_bindgen::JsValue::from_str(body));
    }

    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|_| "Failed to create request")?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| "Failed to set header")?;
    }

    let promise = window()
        .ok_or("Browser window is unavailable")?
        .fetch_with_request(&request);
    let response: Response = JsFuture::from(promise)
        .await
        .map_err(|_| "Failed to send request")?
        .into();

    let text_promise = response.text().map_err(|_| "Failed to read response")?;
    JsFuture::from(text_promise)
        .await
        .map_err(|_| "Failed to get text")?
        .as_string()
        .ok_or_else(|| "Failed to convert to string".to_string())
}

/// Unwrap the `{ statusCode, data, message, success }` envelope. A response
/// with `success: false` surfaces its message as the error, so the server's
/// own wording reaches the banner.
fn parse_envelope<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, String> {
    let envelope: ApiResponse<T> =
        serde_json::from_str(body).map_err(|e| format!("Failed to parse response: {}", e))?;
    if !envelope.success {
        return Err(envelope.message);
    }
    envelope
        .data
        .ok_or_else(|| "Response carried no data".to_string())
}

async fn fetch_tasks() -> Result<Vec<Task>, String> {
    let body = request("GET", API_URL, None).await?;
    parse_envelope(&body)
}

async fn create_task(title: String, description: String) -> Result<Task, String> {
    let payload = CreateTaskRequest { title, description };
    let body = serde_json::to_string(&payload).map_err(|_| "Failed to serialize request")?;
    let body = request("POST", API_URL, Some(body)).await?;
    parse_envelope(&body)
}

async fn update_task(
    id: Uuid,
    title: String,
    description: String,
    completed: bool,
) -> Result<Task, String> {
    let payload = UpdateTaskRequest {
        title,
        description,
        completed,
    };
    let body = serde_json::to_string(&payload).map_err(|_| "Failed to serialize request")?;
    let body = request("PUT", &format!("{}/{}", API_URL, id), Some(body)).await?;
    parse_envelope(&body)
}

async fn delete_task(id: Uuid) -> Result<Task, String> {
    let body = request("DELETE", &format!("{}/{}", API_URL, id), None).await?;
    parse_envelope(&body)
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
