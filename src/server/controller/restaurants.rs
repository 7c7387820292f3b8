use actix_web::{delete, get, put, web, HttpRequest, Responder};
use log::{error, info, warn};
use serde::Serialize;
use crate::server::availability::evaluate;
use crate::server::controller::check_range;
use crate::server::controller::error::CustomError;
use crate::server::model::restaurant::{Restaurant, RestaurantQuery, RestaurantUpdate};
use crate::server::model::{AvailabilityParams, CalendarDay, CalendarParams, GetAvailabilityResponse, GetCalendarResponse};
use crate::server::remote::BookingBackend;
use crate::server::session::Session;
use crate::server::state::AppState;
use crate::server::util::time::{helper, window_from};
use crate::server::venue::load_calendar;

#[derive(Debug, Serialize)]
pub(crate) struct GetRestaurantsResponse {
    pub result_code: Option<String>,
    pub restaurants: Vec<Restaurant>,
}

#[get("/v1/restaurants")]
/// list restaurants, filtered locally
async fn get_restaurants(query: web::Query<RestaurantQuery>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let restaurants = data.backend().list_restaurants().await.map_err(|e| {
        error!("get_restaurants failed, {}", e);
        CustomError::from(e)
    })?;
    let reserved = match query.available_on {
        Some(date) => data.backend().reserved_restaurants(date).await.map_err(|e| {
            error!("reserved restaurants on {} failed, {}", date, e);
            CustomError::from(e)
        })?,
        None => vec![],
    };
    Ok(web::Json(GetRestaurantsResponse {
        result_code: None,
        restaurants: restaurants
            .into_iter()
            .filter(|r| query.matches(r) && !reserved.contains(&r.id))
            .collect(),
    }))
}

#[get("/v1/restaurant/{id}")]
async fn get_restaurant(id: web::Path<i64>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let restaurant = data.backend().restaurant(id.into_inner()).await?;
    Ok(web::Json(restaurant))
}

#[get("/v1/restaurant/{id}/calendar")]
/// per-day availability for a date picker, `today..today + window` unless a range is given
async fn get_calendar(
    id: web::Path<i64>,
    req: HttpRequest,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let CalendarParams { start, end, guests } = web::Query::<CalendarParams>::from_query(req.query_string())
        .map_err(|e| CustomError::bad_request(e.to_string()))?
        .into_inner();
    if guests == Some(0) {
        return Err(CustomError::bad_request("guests must be at least 1"));
    }
    let (default_start, default_end) = window_from(start.unwrap_or_else(helper::get_today), data.calendar_window_days());
    let (start, end) = (start.unwrap_or(default_start), end.unwrap_or(default_end));

    check_range(start, end)?;

    let id = id.into_inner();
    let calendar = load_calendar(data.backend(), &session, id, start, end).await?;
    let days = calendar
        .days
        .iter()
        .map(|day| CalendarDay {
            day: day.clone(),
            classification: guests.map(|g| evaluate(day.date, g, std::slice::from_ref(day))),
        })
        .collect();

    Ok(web::Json(GetCalendarResponse {
        restaurant_id: id,
        capacity: calendar.restaurant.capacity,
        days,
    }))
}

#[get("/v1/restaurant/{id}/availability")]
/// classify one candidate date and party size
async fn get_availability(
    id: web::Path<i64>,
    params: web::Query<AvailabilityParams>,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let AvailabilityParams { date, guests } = params.into_inner();
    if guests == 0 {
        return Err(CustomError::bad_request("guests must be at least 1"));
    }
    let id = id.into_inner();
    let calendar = load_calendar(data.backend(), &session, id, date, date).await?;
    Ok(web::Json(GetAvailabilityResponse {
        restaurant_id: id,
        date,
        guests,
        classification: evaluate(date, guests, &calendar.days),
    }))
}

#[put("/v1/restaurant/{id}")]
/// owner edit, only the fields present in the body change
async fn put_restaurant(
    id: web::Path<i64>,
    body: web::Json<RestaurantUpdate>,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    body.validate().map_err(CustomError::bad_request)?;
    let id = id.into_inner();
    let restaurant = data.backend().update_restaurant(&session, id, &body).await.map_err(|e| {
        warn!("update of restaurant {} failed, {}", id, e);
        CustomError::from(e)
    })?;
    info!("restaurant {} updated", id);
    Ok(web::Json(restaurant))
}

#[delete("/v1/restaurant/{id}")]
async fn delete_restaurant(
    id: web::Path<i64>,
    session: Session,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let response = data.backend().delete_restaurant(&session, id).await.map_err(|e| {
        warn!("delete of restaurant {} failed, {}", id, e);
        CustomError::from(e)
    })?;
    info!("restaurant {} deleted", id);
    Ok(web::Json(response))
}

#[get("/v1/restaurant/{id}/images")]
async fn get_restaurant_images(id: web::Path<i64>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let images = data.backend().restaurant_images(id.into_inner()).await?;
    Ok(web::Json(images))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;
    use serde_json::Value;
    use crate::server::controller::routes;
    use crate::server::controller::test_util::state;
    use crate::server::model::booking::BookingStatus;
    use crate::server::model::restaurant::fixtures;
    use serde_json::json;
    use crate::server::model::restaurant::RestaurantImage;
    use crate::server::remote::mock::{record, MockBackend};
    use crate::server::session::ROLE_HEADER;

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn backend() -> MockBackend {
        let mut sushi = fixtures::restaurant(2, 40);
        sushi.name = "Sakura".to_string();
        sushi.category = "cafe".to_string();
        sushi.cuisines = vec!["Japanese".to_string()];
        MockBackend::new()
            .with_restaurant(fixtures::restaurant(1, 100))
            .with_restaurant(sushi)
            .with_booking(record(1, 1, june(10), 60, BookingStatus::Confirmed))
            .with_booking(record(2, 1, june(12), 100, BookingStatus::Confirmed))
            .with_booking(record(3, 1, june(12), 100, BookingStatus::Rejected))
    }

    #[actix_web::test]
    async fn lists_and_filters_restaurants() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get().uri("/v1/restaurants").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get().uri("/v1/restaurants?search=japanese").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let restaurants = body["restaurants"].as_array().unwrap();
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0]["name"], "Sakura");
    }

    #[actix_web::test]
    async fn unknown_restaurant_is_404() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get().uri("/v1/restaurant/77").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn calendar_defaults_to_window_from_today() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/calendar?guests=50")
            .insert_header(("Authorization", "Bearer tok"))
            .insert_header((ROLE_HEADER, "admin"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let days = body["days"].as_array().unwrap();
        // mocked today is 2024-06-10, window of 10 days
        assert_eq!(days.len(), 11);
        assert_eq!(days[0]["date"], "2024-06-10");
        assert_eq!(days[0]["remaining_capacity"], 40);
        assert_eq!(days[0]["classification"]["status"], "limited");
        assert_eq!(days[0]["classification"]["remaining"], 40);
        assert_eq!(days[1]["classification"]["status"], "available");
        assert_eq!(days[2]["is_fully_booked"], true);
        assert_eq!(days[2]["classification"]["status"], "unavailable");
        assert_eq!(body["capacity"], 100);
    }

    #[actix_web::test]
    async fn calendar_honours_explicit_range() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/calendar?start=2024-06-01&end=2024-06-03")
            .insert_header(("Authorization", "Bearer tok"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert!(days[0].get("classification").is_none());
    }

    #[actix_web::test]
    async fn user_calendar_counts_live_bookings_only() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/calendar?start=2024-06-10&end=2024-06-12&guests=10")
            .insert_header(("Authorization", "Bearer tok"))
            .insert_header((ROLE_HEADER, "user"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let status: Vec<&str> = body["days"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["classification"]["status"].as_str().unwrap())
            .collect();
        assert_eq!(status, vec!["unavailable", "available", "unavailable"]);
    }

    #[actix_web::test]
    async fn anonymous_calendar_is_401() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get().uri("/v1/restaurant/1/calendar").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn calendar_rejects_zero_guests_and_overlong_ranges() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/calendar?guests=0")
            .insert_header(("Authorization", "Bearer tok"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/calendar?start=2000-01-01&end=2080-01-01&guests=5")
            .insert_header(("Authorization", "Bearer tok"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("at most 366"));
    }

    #[actix_web::test]
    async fn catalog_hides_restaurants_reserved_on_a_date() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get().uri("/v1/restaurants?available_on=2024-06-12").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let restaurants = body["restaurants"].as_array().unwrap();
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0]["id"], 2);

        // only confirmed bookings reserve a restaurant
        let req = test::TestRequest::get().uri("/v1/restaurants?available_on=2024-06-11").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn staff_update_and_delete_restaurant() {
        let data = state(backend());
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

        let req = test::TestRequest::put()
            .uri("/v1/restaurant/1")
            .insert_header(("Authorization", "Bearer tok"))
            .set_json(json!({"capacity": 150}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri("/v1/restaurant/1")
            .insert_header(("Authorization", "Bearer tok"))
            .insert_header((ROLE_HEADER, "admin"))
            .set_json(json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/v1/restaurant/1")
            .insert_header(("Authorization", "Bearer tok"))
            .insert_header((ROLE_HEADER, "admin"))
            .set_json(json!({"capacity": 150, "name": "Grand Hall"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["capacity"], 150);
        assert_eq!(body["name"], "Grand Hall");

        let req = test::TestRequest::delete()
            .uri("/v1/restaurant/2")
            .insert_header(("Authorization", "Bearer tok"))
            .insert_header((ROLE_HEADER, "admin"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Restaurant deleted successfully");
        assert_eq!(data.backend().restaurant_count(), 1);

        let req = test::TestRequest::delete()
            .uri("/v1/restaurant/2")
            .insert_header(("Authorization", "Bearer tok"))
            .insert_header((ROLE_HEADER, "admin"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn lists_restaurant_images() {
        let mut restaurant = fixtures::restaurant(5, 80);
        restaurant.images = vec![RestaurantImage { id: 1, url: "https://img.example.com/hall.jpg".to_string() }];
        let app = test::init_service(
            App::new()
                .app_data(state(MockBackend::new().with_restaurant(restaurant)))
                .configure(routes),
        )
        .await;
        let req = test::TestRequest::get().uri("/v1/restaurant/5/images").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([{"id": 1, "url": "https://img.example.com/hall.jpg"}]));

        let req = test::TestRequest::get().uri("/v1/restaurant/6/images").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn calendar_rejects_inverted_range() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/calendar?start=2024-06-05&end=2024-06-01")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/v1/restaurant/1/calendar?start=june").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn availability_for_one_candidate() {
        let app = test::init_service(App::new().app_data(state(backend())).configure(routes)).await;
        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/availability?date=2024-06-10&guests=30")
            .insert_header(("Authorization", "Bearer tok"))
            .insert_header((ROLE_HEADER, "admin"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["classification"]["status"], "available");

        let req = test::TestRequest::get()
            .uri("/v1/restaurant/1/availability?date=2024-06-10&guests=0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
