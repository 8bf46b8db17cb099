use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Form, FromRequestParts, Path, Query, State,
        rejection::{FormRejection, JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::{
    AppState,
    error::{AppResult, CatalogError, Missing},
    models::{CastRoleQuery, CreateActor, CreateCastForm, CreateMovie, RenameMovie},
    templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/actor", get(actors_page))
        .route("/cast", get(cast_page))
        .route("/movie/create", post(create_movie))
        .route("/movies/{id}", get(get_movie).delete(delete_movie))
        .route("/update_movie_title/{id}", post(update_movie_title))
        .route("/actor/create", post(create_actor))
        .route("/actor/{id}", get(get_actor).delete(delete_actor))
        .route("/actor/{id}/movies", get(actor_movies))
        .route("/actor/{id}/casts", get(actor_casts))
        .route("/movie/{id}/cast", get(movie_cast))
        .route("/movie/{mov_id}/cast/add/{act_id}", post(add_actor_to_cast))
        .route("/movie/{mov_id}/cast/delete/{act_id}", post(remove_actor_from_cast))
        .route("/cast/create", post(create_cast))
        .with_state(state)
}

/// Numeric ids taken from the URL. Anything that does not parse names no
/// record, so it answers 404 like a missing one.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(UnknownId))]
pub struct Ids<T>(T);

pub struct UnknownId;

impl From<PathRejection> for UnknownId {
    fn from(rejection: PathRejection) -> Self {
        debug!(error = %rejection, "unparseable id in path");
        Self
    }
}

impl IntoResponse for UnknownId {
    fn into_response(self) -> Response {
        reply(StatusCode::NOT_FOUND, json!({ "success": false, "error": "Not found" }))
    }
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// Logs the underlying error and hands back a body that carries no detail.
fn database_failure(err: &CatalogError, body: Value) -> Response {
    error!(error = %err, "database operation failed");
    reply(StatusCode::INTERNAL_SERVER_ERROR, body)
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.catalog.list_movies().await?;
    let actors = state.catalog.list_actors().await?;
    Ok(Html(templates::index_page(&movies, &actors)))
}

pub async fn actors_page(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let mut portfolios = Vec::new();
    for actor in state.catalog.list_actors().await? {
        let credits = state.catalog.get_movies_for_actor(actor.act_id).await?;
        portfolios.push((actor, credits));
    }
    Ok(Html(templates::actors_page(&portfolios)))
}

pub async fn cast_page(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let mut listings = Vec::new();
    for movie in state.catalog.list_movies().await? {
        let members = state.catalog.get_cast_for_movie(movie.mov_id).await?;
        listings.push((movie, members));
    }
    Ok(Html(templates::cast_page(&listings)))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMovie>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return reply(StatusCode::BAD_REQUEST, json!({ "error": "Invalid request data in Movies" }));
    };

    match state.catalog.create_movie(req).await {
        Ok(movie) => (StatusCode::CREATED, Json(movie)).into_response(),
        Err(CatalogError::Validation(msg)) => reply(StatusCode::BAD_REQUEST, json!({ "error": msg })),
        Err(err) => database_failure(&err, json!({ "error": "Database error" })),
    }
}

pub async fn get_movie(State(state): State<Arc<AppState>>, Ids(id): Ids<i32>) -> Response {
    match state.catalog.get_movie(id).await {
        Ok(movie) => Json(movie).into_response(),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "error": "Movie not found in database" }),
        ),
        Err(err) => database_failure(&err, json!({ "success": false, "error": "Database error" })),
    }
}

pub async fn delete_movie(State(state): State<Arc<AppState>>, Ids(id): Ids<i32>) -> Response {
    match state.catalog.delete_movie(id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "error": "Movie not found in database" }),
        ),
        Err(err) => database_failure(&err, json!({ "success": false, "error": "Database error" })),
    }
}

pub async fn update_movie_title(
    State(state): State<Arc<AppState>>,
    Ids(id): Ids<i32>,
    payload: Result<Json<RenameMovie>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "error": "Invalid request data" }),
        );
    };

    match state.catalog.rename_movie(id, req.new_title).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(CatalogError::Validation(msg)) => {
            reply(StatusCode::BAD_REQUEST, json!({ "success": false, "error": msg }))
        },
        Err(CatalogError::NotFound(_)) => {
            reply(StatusCode::NOT_FOUND, json!({ "success": false, "error": "Movie not found" }))
        },
        Err(err) => database_failure(&err, json!({ "success": false, "error": "Database error" })),
    }
}

pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateActor>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return reply(StatusCode::BAD_REQUEST, json!({ "error": "Invalid request data in Actors" }));
    };

    match state.catalog.create_actor(req).await {
        Ok(actor) => (StatusCode::CREATED, Json(actor)).into_response(),
        Err(CatalogError::Validation(msg)) => reply(StatusCode::BAD_REQUEST, json!({ "error": msg })),
        Err(err) => database_failure(&err, json!({ "error": "Database error" })),
    }
}

pub async fn get_actor(State(state): State<Arc<AppState>>, Ids(id): Ids<i32>) -> Response {
    match state.catalog.get_actor(id).await {
        Ok(actor) => Json(actor).into_response(),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "error": "Actor was not found in database" }),
        ),
        Err(err) => database_failure(&err, json!({ "success": false, "error": "Database error" })),
    }
}

pub async fn delete_actor(State(state): State<Arc<AppState>>, Ids(id): Ids<i32>) -> Response {
    match state.catalog.delete_actor(id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "error": "Actor was not found in database" }),
        ),
        Err(err) => database_failure(&err, json!({ "success": false, "error": "Database error" })),
    }
}

pub async fn actor_movies(State(state): State<Arc<AppState>>, Ids(id): Ids<i32>) -> Response {
    match state.catalog.get_movies_for_actor(id).await {
        Ok(credits) => Json(json!({ "success": true, "cast_list": credits })).into_response(),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "message": "Failed to retrieve movies" }),
        ),
        Err(err) => database_failure(
            &err,
            json!({ "success": false, "message": "Failed to retrieve movies" }),
        ),
    }
}

pub async fn actor_casts(State(state): State<Arc<AppState>>, Ids(id): Ids<i32>) -> Response {
    match state.catalog.casts_by_actor(id).await {
        Ok(casts) => Json(json!({ "success": true, "cast_list": casts })).into_response(),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "message": "Failed to retrieve movies" }),
        ),
        Err(err) => database_failure(
            &err,
            json!({ "success": false, "message": "Failed to retrieve movies" }),
        ),
    }
}

pub async fn movie_cast(State(state): State<Arc<AppState>>, Ids(id): Ids<i32>) -> Response {
    match state.catalog.get_cast_for_movie(id).await {
        Ok(members) => Json(json!({ "success": true, "cast_list": members })).into_response(),
        Err(CatalogError::NotFound(_)) => {
            reply(StatusCode::NOT_FOUND, json!({ "success": false, "error": "Movie not found" }))
        },
        Err(err) => database_failure(&err, json!({ "success": false, "error": "Database error" })),
    }
}

pub async fn add_actor_to_cast(
    State(state): State<Arc<AppState>>,
    Ids((mov_id, act_id)): Ids<(i32, i32)>,
    Query(q): Query<CastRoleQuery>,
) -> Response {
    match state.catalog.assign_actor_to_cast(mov_id, act_id, q.cas_role).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(CatalogError::Conflict) => reply(
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "error": "Actor is already in this movies cast" }),
        ),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "error": "Movie or actor not found" }),
        ),
        Err(err) => database_failure(&err, json!({ "success": false, "error": "Database error" })),
    }
}

pub async fn remove_actor_from_cast(
    State(state): State<Arc<AppState>>,
    Ids((mov_id, act_id)): Ids<(i32, i32)>,
) -> Response {
    match state.catalog.remove_actor_from_cast(mov_id, act_id).await {
        Ok(()) => Json(json!({ "success": true, "message": "Actor removed from the cast list" }))
            .into_response(),
        Err(CatalogError::NotFound(Missing::CastEntry)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "message": "Actor not found in the cast list" }),
        ),
        Err(CatalogError::NotFound(_)) => reply(
            StatusCode::NOT_FOUND,
            json!({ "success": false, "message": "Movie or actor not found" }),
        ),
        Err(err) => database_failure(
            &err,
            json!({ "success": false, "message": "Failed to delete actor from the cast list" }),
        ),
    }
}

pub async fn create_cast(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<CreateCastForm>, FormRejection>,
) -> Response {
    let missing = || {
        reply(StatusCode::BAD_REQUEST, json!({ "error": "Please provide all required information." }))
    };

    let Ok(Form(form)) = payload else {
        return missing();
    };
    let mov_id = form.mov_id.and_then(|v| v.parse::<i32>().ok());
    let act_id = form.act_id.and_then(|v| v.parse::<i32>().ok());
    let role = form.cas_role.filter(|r| !r.is_empty());
    let (Some(mov_id), Some(act_id), Some(role)) = (mov_id, act_id, role) else {
        return missing();
    };

    match state.catalog.assign_actor_to_cast(mov_id, act_id, Some(role)).await {
        Ok(_) => reply(
            StatusCode::CREATED,
            json!({ "success": true, "message": "Cast created successfully!" }),
        ),
        Err(CatalogError::Conflict) => {
            reply(StatusCode::CONFLICT, json!({ "error": "Duplicate entry. Cast already exists." }))
        },
        Err(CatalogError::NotFound(_)) => {
            reply(StatusCode::NOT_FOUND, json!({ "error": "Movie or actor not found" }))
        },
        Err(err) => database_failure(&err, json!({ "error": "Failed to create cast." })),
    }
}
