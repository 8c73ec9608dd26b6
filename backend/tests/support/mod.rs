//! Shared harness for HTTP integration tests over the in-memory store.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::{Arc, Mutex};

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use dropme_backend::Trace;
use dropme_backend::domain::{RecyclingPolicy, RecyclingService, User, UserService};
use dropme_backend::inbound::http::state::{HttpState, HttpStatePorts};
use dropme_backend::inbound::http::{api_routes, json_config};
use dropme_backend::outbound::memory::InMemoryStore;

/// Clock the tests move forward by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Midday so a handful of minute steps never crosses midnight.
pub fn midday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0)
        .single()
        .expect("valid fixture time")
}

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    state: web::Data<HttpState>,
}

impl Harness {
    pub fn new(daily_limit: u32) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(ManualClock::starting_at(midday()));
        let users = Arc::new(UserService::new(store.clone()));
        let recycling = Arc::new(RecyclingService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
            RecyclingPolicy::new(daily_limit),
        ));
        let state = web::Data::new(HttpState::new(HttpStatePorts {
            users_command: users.clone(),
            users,
            recycling: recycling.clone(),
            recycling_query: recycling,
        }));
        Self {
            store,
            clock,
            state,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .app_data(json_config())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(api_routes))
    }
}

pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> User {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({ "email": email }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    envelope_data(body)
}

/// Deserialize `data` from a `{status, message, data}` success envelope.
pub fn envelope_data<T: serde::de::DeserializeOwned>(mut body: Value) -> T {
    assert_eq!(body.get("status").and_then(Value::as_str), Some("success"));
    let data = body.get_mut("data").map(Value::take).expect("envelope data");
    serde_json::from_value(data).expect("envelope data shape")
}

pub async fn submit(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user: &User,
    material: &str,
    weight_kg: f64,
) -> ServiceResponse {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/recycling")
        .set_json(json!({
            "userId": user.id().to_string(),
            "materialType": material,
            "weightKg": weight_kg,
        }))
        .to_request();
    actix_test::call_service(app, request).await
}

pub async fn balance(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user: &User,
) -> u64 {
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", user.id()))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    envelope_data::<User>(body).points()
}

pub async fn history(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user: &User,
) -> Vec<Value> {
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/recycling/user/{}", user.id()))
        .to_request();
    actix_test::call_and_read_body_json(app, request).await
}

/// `details.reason` from an error response body.
pub async fn rejection_reason(response: ServiceResponse) -> Option<String> {
    let body: Value = actix_test::read_body_json(response).await;
    body.pointer("/details/reason")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
