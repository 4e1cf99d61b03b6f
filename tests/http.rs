use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono_tz::Tz;
use serde_json::Value;
use show_booking_lib::{router, AppContext};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    app: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = router(AppContext::new(dir.path().join("booking.sqlite"), Tz::UTC));
        Self { _dir: dir, app }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    async fn post(&self, uri: &str, form: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("request");
        self.send(request).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    async fn create_venue(&self, name: &str) -> i64 {
        let form = format!(
            "name={name}&city=San+Francisco&state=CA&address=1015+Folsom+Street\
             &phone=123-123-1234&genres=Jazz&genres=Folk&seeking_talent=Yes"
        );
        let (status, body) = self.post("/venues/create", &form).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["record_id"].as_i64().expect("venue id")
    }

    async fn create_artist(&self, name: &str) -> i64 {
        let form = format!("name={name}&city=New+York&state=NY&phone=(300)+400-5005&genres=Jazz");
        let (status, body) = self.post("/artists/create", &form).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["record_id"].as_i64().expect("artist id")
    }
}

#[tokio::test]
async fn home_page_links_to_sections() {
    let app = TestApp::new();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sections"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn created_venue_appears_in_detail_and_listing() {
    let app = TestApp::new();
    let id = app.create_venue("The+Musical+Hop").await;

    let (status, venue) = app.get(&format!("/venues/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(venue["name"], "The Musical Hop");
    assert_eq!(venue["phone"], "123-123-1234");
    assert_eq!(venue["genres"], serde_json::json!(["Jazz", "Folk"]));
    assert_eq!(venue["seeking_talent"], true);
    assert_eq!(venue["past_shows_count"], 0);

    let (_, listing) = app.get("/venues").await;
    let areas = listing["areas"].as_array().expect("areas");
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0]["city"], "San Francisco");
    assert_eq!(areas[0]["venues"][0]["id"], id);
}

#[tokio::test]
async fn every_submitted_venue_field_reads_back() {
    let app = TestApp::new();
    let form = "name=The+Musical+Hop&city=San+Francisco&state=CA&address=1015+Folsom+Street\
                &phone=%28123%29+123+1234\
                &image_link=https%3A%2F%2Fimages.example.com%2Fhop.jpg\
                &facebook_link=https%3A%2F%2Fwww.facebook.com%2FTheMusicalHop\
                &website=https%3A%2F%2Fwww.themusicalhop.com\
                &genres=Jazz&genres=Reggae&genres=Folk\
                &seeking_talent=Yes\
                &seeking_description=We+are+on+the+lookout+for+a+local+artist";
    let (status, body) = app.post("/venues/create", form).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Venue The Musical Hop was successfully listed!");
    let id = body["record_id"].as_i64().expect("venue id");

    let (status, venue) = app.get(&format!("/venues/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(venue["id"], id);
    assert_eq!(venue["name"], "The Musical Hop");
    assert_eq!(venue["city"], "San Francisco");
    assert_eq!(venue["state"], "CA");
    assert_eq!(venue["address"], "1015 Folsom Street");
    assert_eq!(venue["phone"], "123-123-1234");
    assert_eq!(venue["image_link"], "https://images.example.com/hop.jpg");
    assert_eq!(venue["facebook_link"], "https://www.facebook.com/TheMusicalHop");
    assert_eq!(venue["website"], "https://www.themusicalhop.com");
    assert_eq!(venue["genres"], serde_json::json!(["Jazz", "Reggae", "Folk"]));
    assert_eq!(venue["seeking_talent"], true);
    assert_eq!(
        venue["seeking_description"],
        "We are on the lookout for a local artist"
    );
}

#[tokio::test]
async fn create_form_lists_every_state() {
    let app = TestApp::new();
    let (status, form) = app.get("/venues/create").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["choices"]["state"].as_array().map(Vec::len), Some(51));

    let (status, form) = app.get("/artists/create").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["action"], "/artists/create");
}

#[tokio::test]
async fn invalid_phone_is_rejected_and_nothing_is_stored() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/venues/create",
            "name=Nowhere&city=Boise&state=ID&address=1+Main+St&phone=555",
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "error");
    assert_eq!(body["message"], "An error occurred. Invalid phone number.");

    let (_, listing) = app.get("/venues").await;
    assert_eq!(listing["areas"], serde_json::json!([]));
}

#[tokio::test]
async fn missing_required_field_is_a_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/artists/create", "name=Solo&state=NY&phone=300-400-5005")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "An error occurred. Artist Solo could not be listed.");
}

#[tokio::test]
async fn shows_split_into_past_and_upcoming() {
    let app = TestApp::new();
    let venue = app.create_venue("Park+Square").await;
    let artist = app.create_artist("Guns+N+Petals").await;

    for start in ["2001-05-21+21:30:00", "2099-06-01+20:00", "2099-07-01T20:00:00Z"] {
        let form = format!("artist_id={artist}&venue_id={venue}&start_time={start}");
        let (status, body) = app.post("/shows/create", &form).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Show was successfully listed!");
    }

    let (_, venue_page) = app.get(&format!("/venues/{venue}")).await;
    assert_eq!(venue_page["past_shows_count"], 1);
    assert_eq!(venue_page["upcoming_shows_count"], 2);
    assert_eq!(venue_page["past_shows"][0]["artist_name"], "Guns N Petals");

    let (_, artist_page) = app.get(&format!("/artists/{artist}")).await;
    assert_eq!(artist_page["past_shows_count"], 1);
    assert_eq!(artist_page["upcoming_shows_count"], 2);
    assert_eq!(artist_page["upcoming_shows"][0]["venue_name"], "Park Square");

    let (_, shows) = app.get("/shows").await;
    assert_eq!(shows["shows"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unparseable_start_time_is_reported() {
    let app = TestApp::new();
    let venue = app.create_venue("Hop").await;
    let artist = app.create_artist("Sax").await;
    let form = format!("artist_id={artist}&venue_id={venue}&start_time=next+tuesday");
    let (status, body) = app.post("/shows/create", &form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "An error occurred. Show could not be listed.");
}

#[tokio::test]
async fn search_is_case_insensitive_partial_match() {
    let app = TestApp::new();
    app.create_venue("The+Musical+Hop").await;
    app.create_venue("Park+Square+Live+Music").await;
    app.create_venue("The+Dueling+Pianos+Bar").await;

    let (status, body) = app.post("/venues/search", "search_term=MUSIC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search_term"], "MUSIC");
    assert_eq!(body["results"]["count"], 2);

    let (_, body) = app.post("/artists/search", "search_term=anything").await;
    assert_eq!(body["results"]["count"], 0);
}

#[tokio::test]
async fn search_folds_accented_letters() {
    let app = TestApp::new();
    app.create_venue("%C3%89toile+Caf%C3%A9").await;
    app.create_venue("Etoile+Bar").await;

    let (status, body) = app.post("/venues/search", "search_term=%C3%A9toile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["count"], 1);
    assert_eq!(body["results"]["data"][0]["name"], "Étoile Café");
}

#[tokio::test]
async fn edit_replaces_fields_and_points_back_to_detail() {
    let app = TestApp::new();
    let id = app.create_artist("Matt+Quevedo").await;

    let (status, form) = app.get(&format!("/artists/{id}/edit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["values"]["name"], "Matt Quevedo");

    let (status, body) = app
        .post(
            &format!("/artists/{id}/edit"),
            "name=Matt+Q&city=Boise&state=ID&phone=208.555.0100",
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Artist Matt Q was successfully updated!");
    assert_eq!(body["redirect"], format!("/artists/{id}"));

    let (_, artist) = app.get(&format!("/artists/{id}")).await;
    assert_eq!(artist["city"], "Boise");
    assert_eq!(artist["phone"], "208-555-0100");
    assert_eq!(artist["genres"], serde_json::json!([]));
}

#[tokio::test]
async fn deleting_a_venue_removes_its_shows() {
    let app = TestApp::new();
    let venue = app.create_venue("Closing+Soon").await;
    let artist = app.create_artist("Touring").await;
    let form = format!("artist_id={artist}&venue_id={venue}&start_time=2099-01-01+20:00");
    app.post("/shows/create", &form).await;

    let (status, body) = app.delete(&format!("/venues/{venue}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Venue Closing Soon was successfully deleted.");

    let (status, _) = app.get(&format!("/venues/{venue}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, artist_page) = app.get(&format!("/artists/{artist}")).await;
    assert_eq!(artist_page["upcoming_shows_count"], 0);
}

#[tokio::test]
async fn missing_records_get_not_found() {
    let app = TestApp::new();

    let (status, body) = app.delete("/venues/41").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "An error occurred. Venue 41 could not be deleted.");

    let (status, body) = app.get("/artists/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app
        .post("/venues/9/edit", "name=X&city=Y&state=CA&address=Z&phone=123-123-1234")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Page not found");
}

#[tokio::test]
async fn non_numeric_ids_get_the_not_found_page() {
    let app = TestApp::new();

    for uri in ["/venues/abc", "/artists/abc/edit", "/venues/99999999999999999999"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], "NOT_FOUND", "{uri}");
        assert_eq!(body["message"], "Page not found", "{uri}");
    }

    let (status, body) = app
        .post("/artists/abc/edit", "name=X&city=Y&state=NY&phone=300-400-5005")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app.delete("/venues/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
