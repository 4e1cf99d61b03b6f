use axum::{extract::State, response::Response, Form, Json};
use chrono::Utc;

use super::{notice_response, SearchForm};
use crate::forms::FormFields;
use crate::models::Kind;
use crate::mutations::{self, Failure};
use crate::queries;
use crate::views::{self, FormPage, SearchPage, VenuePage, VenuesPage};
use crate::web::{extractors::RecordId, AppContext, AppError, WebResult};

pub async fn index(State(ctx): State<AppContext>) -> WebResult<Json<VenuesPage>> {
    let areas = ctx
        .with_store(|store| queries::venues_by_location(store))
        .await??;
    Ok(Json(views::venues(areas)))
}

pub async fn search(
    State(ctx): State<AppContext>,
    Form(form): Form<SearchForm>,
) -> WebResult<Json<SearchPage>> {
    let term = form.search_term.clone();
    let results = ctx
        .with_store(move |store| queries::search_venues(store, &term))
        .await??;
    Ok(Json(views::search(form.search_term, results)))
}

pub async fn show(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> WebResult<Json<VenuePage>> {
    let now = Utc::now();
    let detail = ctx
        .with_store(move |store| queries::venue_detail(store, id, now))
        .await??;
    Ok(Json(views::venue(detail, ctx.timezone())))
}

pub async fn create_form() -> Json<FormPage> {
    Json(views::new_venue_form())
}

pub async fn create(
    State(ctx): State<AppContext>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let fields = FormFields::new(pairs);
    let notice = ctx
        .with_store(move |store| mutations::create_venue(store, &fields))
        .await?;
    Ok(notice_response(notice, None))
}

pub async fn edit_form(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> WebResult<Json<FormPage>> {
    let venue = ctx
        .with_store(move |store| queries::venue(store, id))
        .await??;
    Ok(Json(views::edit_venue_form(&venue)))
}

pub async fn edit(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let fields = FormFields::new(pairs);
    let notice = ctx
        .with_store(move |store| mutations::update_venue(store, id, &fields))
        .await?;
    if notice.failure == Some(Failure::NotFound) {
        return Err(AppError::not_found(Kind::Venue, id));
    }
    Ok(notice_response(notice, Some(format!("/venues/{id}"))))
}

pub async fn delete(State(ctx): State<AppContext>, RecordId(id): RecordId) -> WebResult<Response> {
    let notice = ctx
        .with_store(move |store| mutations::delete_venue(store, id))
        .await?;
    Ok(notice_response(notice, None))
}
