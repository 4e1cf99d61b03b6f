use axum::{extract::State, response::Response, Form, Json};
use chrono::Utc;

use super::{notice_response, SearchForm};
use crate::forms::FormFields;
use crate::models::Kind;
use crate::mutations::{self, Failure};
use crate::queries;
use crate::views::{self, ArtistPage, ArtistsPage, FormPage, SearchPage};
use crate::web::{extractors::RecordId, AppContext, AppError, WebResult};

pub async fn index(State(ctx): State<AppContext>) -> WebResult<Json<ArtistsPage>> {
    let artists = ctx
        .with_store(|store| queries::list_artists(store))
        .await??;
    Ok(Json(views::artists(artists)))
}

pub async fn search(
    State(ctx): State<AppContext>,
    Form(form): Form<SearchForm>,
) -> WebResult<Json<SearchPage>> {
    let term = form.search_term.clone();
    let results = ctx
        .with_store(move |store| queries::search_artists(store, &term))
        .await??;
    Ok(Json(views::search(form.search_term, results)))
}

pub async fn show(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> WebResult<Json<ArtistPage>> {
    let now = Utc::now();
    let detail = ctx
        .with_store(move |store| queries::artist_detail(store, id, now))
        .await??;
    Ok(Json(views::artist(detail, ctx.timezone())))
}

pub async fn create_form() -> Json<FormPage> {
    Json(views::new_artist_form())
}

pub async fn create(
    State(ctx): State<AppContext>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let fields = FormFields::new(pairs);
    let notice = ctx
        .with_store(move |store| mutations::create_artist(store, &fields))
        .await?;
    Ok(notice_response(notice, None))
}

pub async fn edit_form(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> WebResult<Json<FormPage>> {
    let artist = ctx
        .with_store(move |store| queries::artist(store, id))
        .await??;
    Ok(Json(views::edit_artist_form(&artist)))
}

pub async fn edit(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let fields = FormFields::new(pairs);
    let notice = ctx
        .with_store(move |store| mutations::update_artist(store, id, &fields))
        .await?;
    if notice.failure == Some(Failure::NotFound) {
        return Err(AppError::not_found(Kind::Artist, id));
    }
    Ok(notice_response(notice, Some(format!("/artists/{id}"))))
}

pub async fn delete(State(ctx): State<AppContext>, RecordId(id): RecordId) -> WebResult<Response> {
    let notice = ctx
        .with_store(move |store| mutations::delete_artist(store, id))
        .await?;
    Ok(notice_response(notice, None))
}
