use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{jwt::AuthUser, repo::User},
    error::ApiError,
    state::AppState,
};

use super::dto::{ListPostsQuery, PostBody, PostResponse};
use super::repo::{self, PostFilter};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
}

async fn resolve_author(state: &AppState, username: &str) -> Result<Uuid, ApiError> {
    User::find_id_by_username(&state.db, username)
        .await?
        .ok_or_else(|| ApiError::validation(format!("author {username:?} does not exist")))
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(q): Query<ListPostsQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let filter = match (q.author, q.tag) {
        (Some(_), Some(_)) => {
            return Err(ApiError::validation(
                "query posts by either author or tag, not both",
            ))
        }
        (Some(author), None) => match User::find_id_by_username(&state.db, &author).await? {
            Some(id) => PostFilter::Author(id),
            // unknown author matches nothing rather than erroring
            None => return Ok(Json(Vec::new())),
        },
        (None, Some(tag)) => PostFilter::Tag(tag),
        (None, None) => PostFilter::All,
    };

    let posts = repo::list(&state.db, filter, q.sort_by, q.sort_order).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))?;
    Ok(Json(post.into()))
}

#[instrument(skip(state, body))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<PostBody>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let body = body.validate()?;
    let author_id = resolve_author(&state, &body.author).await?;

    let id = repo::create(
        &state.db,
        author_id,
        &body.title,
        body.contents.as_deref(),
        &body.tags,
    )
    .await?;

    let post = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("created post {id} missing on read-back"))?;

    info!(post_id = %id, author = %body.author, created_by = %user_id, "post created");
    Ok((StatusCode::CREATED, Json(post.into())))
}

#[instrument(skip(state, body))]
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<PostBody>,
) -> Result<Json<PostResponse>, ApiError> {
    let body = body.validate()?;
    let author_id = resolve_author(&state, &body.author).await?;

    let updated = repo::update(
        &state.db,
        id,
        author_id,
        &body.title,
        body.contents.as_deref(),
        &body.tags,
    )
    .await?;

    if updated.is_none() {
        return Err(ApiError::not_found("post not found"));
    }

    let post = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))?;

    info!(post_id = %id, updated_by = %user_id, "post updated");
    Ok(Json(post.into()))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repo::delete(&state.db, id).await?;
    if deleted == 0 {
        // deleting an already-absent id reports not-found, never escalates
        return Err(ApiError::not_found("post not found"));
    }
    info!(post_id = %id, deleted_by = %user_id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}
