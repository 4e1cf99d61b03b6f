use axum::{extract::State, response::Response, Form, Json};

use super::notice_response;
use crate::forms::FormFields;
use crate::mutations;
use crate::queries;
use crate::views::{self, FormPage, ShowsPage};
use crate::web::{AppContext, WebResult};

pub async fn index(State(ctx): State<AppContext>) -> WebResult<Json<ShowsPage>> {
    let listings = ctx
        .with_store(|store| queries::list_shows(store))
        .await??;
    Ok(Json(views::shows(listings, ctx.timezone())))
}

pub async fn create_form() -> Json<FormPage> {
    Json(views::new_show_form())
}

pub async fn create(
    State(ctx): State<AppContext>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let fields = FormFields::new(pairs);
    let tz = ctx.timezone();
    let notice = ctx
        .with_store(move |store| mutations::create_show(store, &fields, tz))
        .await?;
    Ok(notice_response(notice, None))
}
