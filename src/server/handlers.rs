//! Route handlers for the JSON API

use crate::server::error::ApiError;
use crate::server::{AppState, CurrentUser};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};
use dodo_db::{
    CoverUpload, ImageKind, NewTodo, PagedResult, StatusFilter, Todo, TodoQuery, TodoStats,
    TodoUpdate,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Query string of the listing endpoint
///
/// Values are kept as raw strings so malformed input falls back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub filter: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    /// Build the listing query for a user
    pub fn to_query(&self, user_id: &str, path: &str) -> TodoQuery {
        let mut query = TodoQuery::for_user(user_id)
            .with_page(TodoQuery::parse_page(self.page.as_deref()))
            .with_path(path);

        if let Some(search) = &self.search {
            query = query.with_search(search.clone());
        }

        if let Some(filter) = self.filter.as_deref().and_then(StatusFilter::parse) {
            query = query.with_filter(filter);
        }

        query
    }
}

/// The search/filter values echoed back to the client
///
/// These are the values the listing applied, the same ones carried in
/// the page links.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub search: Option<String>,
    pub filter: Option<String>,
}

impl Filters {
    /// Applied search term and status filter of a listing query
    pub fn from_query(query: &TodoQuery) -> Self {
        Self {
            search: query.search_term().map(str::to_string),
            filter: query.filter.map(|f| f.as_str().to_string()),
        }
    }
}

/// Body of the listing endpoint
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub todos: PagedResult<Todo>,
    pub filters: Filters,
    pub stats: TodoStats,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
}

#[get("/")]
pub async fn index(
    state: web::Data<AppState>,
    user: CurrentUser,
    params: web::Query<ListParams>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let query = params.to_query(&user.0, req.path());

    let todos = state.db.lister().list(&query).await?;
    let stats = state.db.lister().stats(&user.0).await?;

    Ok(HttpResponse::Ok().json(IndexResponse {
        todos,
        filters: Filters::from_query(&query),
        stats,
    }))
}

#[post("/todos")]
pub async fn create_todo(
    state: web::Data<AppState>,
    user: CurrentUser,
    new_todo: web::Json<NewTodo>,
) -> Result<HttpResponse, ApiError> {
    let todo = state.db.todos().create(&user.0, &new_todo).await?;
    Ok(HttpResponse::Created().json(todo))
}

#[patch("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
    update: web::Json<TodoUpdate>,
) -> Result<HttpResponse, ApiError> {
    let todo = state.db.todos().update(&user.0, &id, &update).await?;
    Ok(HttpResponse::Ok().json(todo))
}

#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state
        .db
        .todos()
        .delete(&user.0, &id, &state.store)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/todos/{id}/cover")]
pub async fn upload_cover(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    debug!("Cover upload for {}: {} bytes", id, body.len());
    let upload = CoverUpload::new(body.to_vec());
    let todo = state
        .db
        .todos()
        .set_cover(&user.0, &id, upload, &state.store)
        .await?;
    Ok(HttpResponse::Ok().json(todo))
}

#[get("/todos/{id}/cover")]
pub async fn get_cover(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let path = state
        .db
        .todos()
        .cover(&user.0, &id)
        .await?
        .ok_or(ApiError::NoCover { todo_id: id })?;

    let store = state.store.clone();
    let file = path.clone();
    let bytes = web::block(move || store.read(&file)).await??;
    let content_type =
        ImageKind::from_path(&path).map_or("application/octet-stream", |k| k.mime_type());

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

#[get("/health")]
pub async fn healthcheck() -> impl Responder {
    HttpResponse::Ok().json(Response {
        message: "ok".to_string(),
    })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(Response {
        message: "Resource not found".to_string(),
    })
}
