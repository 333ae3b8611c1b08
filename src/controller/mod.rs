//! Session & View Controller
//!
//! Owns the session, the chart registry and the set of revealed chart
//! containers, and drives a [`View`] through the login, plant and watering
//! flows.
//!
//! ## Lifecycle
//!
//! 1. Construct once per page load (or CLI run) from a [`Platform`]'s parts
//! 2. [`SessionController::init`] restores and validates the cached session
//! 3. UI events call the async operations; each runs to its next await
//! 4. [`SessionController::logout`] tears everything down
//!
//! ## Concurrency
//!
//! Single-threaded. State sits in `RefCell`s and no borrow is held across an
//! await, so overlapping handlers on one task cannot conflict.

mod plants;
pub mod view;

pub use view::{Form, Notice, View};

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ApiResult, Credentials, PlantApi, Transport};
use crate::charts::{ChartBackend, ChartRegistry};
use crate::model::{PlantId, Session};
use crate::session::SessionStore;
use view::{EMAIL_LOADING, LOGIN_FAILED, REGISTER_FAILED, REGISTER_SUCCEEDED};

/// Watering duration sent with every manual water command
pub const WATER_DURATION_MS: u64 = 5000;

/// How long the water control stays disabled after a click
pub const WATER_COOLDOWN: Duration = Duration::from_secs(2);

/// Async sleep provided by the platform
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

#[async_trait(?Send)]
impl<T: Timer + ?Sized> Timer for Rc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

/// The collaborators a controller runs on
pub trait Platform {
    type Transport: Transport;
    type Store: SessionStore;
    type View: View;
    type Charts: ChartBackend;
    type Timer: Timer;
}

/// Client-side session and data-sync controller
pub struct SessionController<P: Platform> {
    api: PlantApi<P::Transport>,
    store: P::Store,
    view: P::View,
    timer: P::Timer,
    charts: RefCell<ChartRegistry<P::Charts>>,
    session: RefCell<Session>,
    visible_charts: RefCell<HashSet<PlantId>>,
    /// Plants whose cards are currently rendered
    cards: RefCell<HashSet<PlantId>>,
    /// Bumped whenever the rendered list is replaced or torn down
    listing: Cell<u64>,
    utc_offset: FixedOffset,
}

impl<P: Platform> SessionController<P> {
    pub fn new(
        transport: P::Transport,
        store: P::Store,
        view: P::View,
        charts: P::Charts,
        timer: P::Timer,
    ) -> Self {
        Self {
            api: PlantApi::new(transport),
            store,
            view,
            timer,
            charts: RefCell::new(ChartRegistry::new(charts)),
            session: RefCell::new(Session::default()),
            visible_charts: RefCell::new(HashSet::new()),
            cards: RefCell::new(HashSet::new()),
            listing: Cell::new(0),
            utc_offset: Utc.fix(),
        }
    }

    /// Zone used for chart labels and reading timestamps
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn view(&self) -> &P::View {
        &self.view
    }

    pub fn store(&self) -> &P::Store {
        &self.store
    }

    pub fn timer(&self) -> &P::Timer {
        &self.timer
    }

    pub fn transport(&self) -> &P::Transport {
        self.api.transport()
    }

    pub fn charts(&self) -> Ref<'_, ChartRegistry<P::Charts>> {
        self.charts.borrow()
    }

    /// Current in-memory session
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    /// Whether the plant's chart container is revealed
    pub fn is_chart_visible(&self, plant: PlantId) -> bool {
        self.visible_charts.borrow().contains(&plant)
    }

    /// Whether the plant's card is part of the rendered list
    pub fn has_card(&self, plant: PlantId) -> bool {
        self.cards.borrow().contains(&plant)
    }

    /// Load the cached session into memory without touching the network
    pub fn restore(&self) -> Session {
        let session = self.store.load();
        *self.session.borrow_mut() = session.clone();
        session
    }

    /// Page-load sequence: restore, validate via `/api/me`, fall back to a
    /// plant-list probe, log out if both fail
    pub async fn init(&self) {
        let session = self.restore();
        let Some(token) = session.token.clone() else {
            info!("no cached session, showing auth view");
            self.view.show_auth();
            return;
        };

        self.view
            .set_user_email(Some(session.email.as_deref().unwrap_or(EMAIL_LOADING)));
        self.view.show_plants();
        self.view.show_plant_list_loading();

        match self.api.me(&token).await {
            Ok(profile) => {
                info!(email = %profile.email, "session validated");
                self.remember_email(&profile.email);
                self.list_plants().await;
            }
            Err(ApiError::Unauthorized) => self.expire_session(),
            Err(err) => {
                warn!(error = %err, "session check failed, probing plant list");
                match self.api.list_plants(&token).await {
                    Ok(plants) => {
                        info!(plants = plants.len(), "session accepted by plant list probe");
                        self.show_plant_cards(plants).await;
                    }
                    Err(err) => {
                        warn!(error = %err, "cached session rejected");
                        self.logout();
                    }
                }
            }
        }
    }

    /// Exchange credentials for a token and enter the plant view.
    ///
    /// Returns whether the login succeeded.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.view.clear_notices();

        let credentials = Credentials::new(email, password);
        let token = match self.api.login(&credentials).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "login failed");
                self.view
                    .show_notice(Form::Login, Notice::Error(err.user_message(LOGIN_FAILED)));
                return false;
            }
        };

        let mut session = Session::new(token.clone(), None);
        self.persist(&session);
        *self.session.borrow_mut() = session.clone();

        // The login response carries no identity; ask for it, keep the typed email otherwise
        let email = match self.api.me(&token).await {
            Ok(profile) => profile.email,
            Err(err) => {
                debug!(error = %err, "could not resolve user, using submitted email");
                email.to_string()
            }
        };
        session.email = Some(email.clone());
        self.persist(&session);
        *self.session.borrow_mut() = session;

        info!(email = %email, "logged in");
        self.view.set_user_email(Some(&email));
        self.view.reset_form(Form::Login);
        self.view.show_plants();
        self.list_plants().await;
        true
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, email: &str, password: &str) -> bool {
        self.view.clear_notices();

        match self.api.register(&Credentials::new(email, password)).await {
            Ok(message) => {
                info!(email = %email, "registered");
                let message = message.unwrap_or_else(|| REGISTER_SUCCEEDED.to_string());
                self.view.show_notice(Form::Register, Notice::Success(message));
                self.view.reset_form(Form::Register);
                true
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                self.view
                    .show_notice(Form::Register, Notice::Error(err.user_message(REGISTER_FAILED)));
                false
            }
        }
    }

    /// Discard the session, destroy all charts, clear the list, show auth
    pub fn logout(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear stored session");
        }
        *self.session.borrow_mut() = Session::default();
        self.charts.borrow_mut().destroy_all();
        self.visible_charts.borrow_mut().clear();
        self.begin_listing();

        self.view.clear_plant_list();
        self.view.set_user_email(None);
        self.view.show_auth();
        info!("logged out");
    }

    /// A rejected token logs out once; later rejections in the same flow are no-ops
    fn expire_session(&self) {
        if self.is_authenticated() {
            info!("session expired or rejected, logging out");
            self.logout();
        } else {
            self.view.show_auth();
        }
    }

    /// Run an authenticated call, turning a 401 (or a missing token) into a logout
    async fn authorized<T, F, Fut>(&self, call: F) -> ApiResult<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let token = self.session.borrow().token.clone();
        let result = match token {
            Some(token) => call(token).await,
            None => Err(ApiError::Unauthorized),
        };

        if let Err(ApiError::Unauthorized) = &result {
            self.expire_session();
        }
        result
    }

    /// Invalidate any in-flight listing and forget the rendered cards
    fn begin_listing(&self) -> u64 {
        let listing = self.listing.get().wrapping_add(1);
        self.listing.set(listing);
        self.cards.borrow_mut().clear();
        listing
    }

    fn remember_email(&self, email: &str) {
        let session = {
            let mut session = self.session.borrow_mut();
            session.email = Some(email.to_string());
            session.clone()
        };
        self.persist(&session);
        self.view.set_user_email(Some(email));
    }

    fn persist(&self, session: &Session) {
        if let Err(err) = self.store.save(session) {
            warn!(error = %err, "failed to persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, TransportError};
    use crate::session::MemorySessionStore;
    use crate::testing::{controller, logged_in_controller, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_login_caches_token_and_shows_plants() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/auth/login", 200, json!({"access_token": "T"}))
            .respond(Method::Get, "/api/me", 200, json!({"email": "a@b.com"}))
            .respond(Method::Get, "/api/plants", 200, json!([]));
        let ctrl = controller(transport);

        assert!(ctrl.login("a@b.com", "x").await);

        assert_eq!(ctrl.store().snapshot().token.as_deref(), Some("T"));
        assert_eq!(ctrl.store().snapshot().email.as_deref(), Some("a@b.com"));
        let view = ctrl.view().state();
        assert!(view.plants_visible && !view.auth_visible);
        assert_eq!(view.email.as_deref(), Some("a@b.com"));
        assert!(view.form_resets.contains(&Form::Login));
    }

    #[tokio::test]
    async fn test_login_falls_back_to_submitted_email() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/auth/login", 200, json!({"access_token": "T"}))
            .respond(Method::Get, "/api/me", 404, json!({"msg": "Not found"}))
            .respond(Method::Get, "/api/plants", 200, json!([]));
        let ctrl = controller(transport);

        assert!(ctrl.login("typed@b.com", "x").await);
        assert_eq!(ctrl.session().email.as_deref(), Some("typed@b.com"));
        assert_eq!(ctrl.view().state().email.as_deref(), Some("typed@b.com"));
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_message() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/auth/login", 401, json!({"msg": "Bad email or password"}));
        let ctrl = controller(transport);

        assert!(!ctrl.login("a@b.com", "wrong").await);

        assert_eq!(ctrl.store().snapshot(), Session::default());
        let view = ctrl.view().state();
        assert_eq!(
            view.notice(Form::Login),
            Some(Notice::Error("Bad email or password".to_string()))
        );
        assert!(!view.plants_visible);
    }

    #[tokio::test]
    async fn test_login_without_message_uses_generic_text() {
        let transport =
            ScriptedTransport::new().respond_empty(Method::Post, "/auth/login", 500);
        let ctrl = controller(transport);

        ctrl.login("a@b.com", "x").await;
        assert_eq!(
            ctrl.view().state().notice(Form::Login),
            Some(Notice::Error(LOGIN_FAILED.to_string()))
        );
    }

    #[tokio::test]
    async fn test_login_network_error() {
        let transport = ScriptedTransport::new().fail(
            Method::Post,
            "/auth/login",
            TransportError::Network("offline".to_string()),
        );
        let ctrl = controller(transport);

        ctrl.login("a@b.com", "x").await;
        assert_eq!(
            ctrl.view().state().notice(Form::Login),
            Some(Notice::Error(crate::api::NETWORK_ERROR_MESSAGE.to_string()))
        );
    }

    #[tokio::test]
    async fn test_auth_view_tracks_token_across_attempts() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/auth/login", 401, json!({"msg": "Bad email or password"}))
            .respond(Method::Post, "/auth/login", 200, json!({"access_token": "T"}))
            .respond(Method::Get, "/api/me", 200, json!({"email": "a@b.com"}))
            .respond(Method::Get, "/api/plants", 200, json!([]));
        let ctrl = controller(transport);
        ctrl.init().await;
        assert!(ctrl.view().state().auth_visible);

        ctrl.login("a@b.com", "wrong").await;
        assert_eq!(ctrl.view().state().auth_visible, !ctrl.is_authenticated());

        ctrl.login("a@b.com", "right").await;
        assert!(ctrl.is_authenticated());
        assert_eq!(ctrl.view().state().auth_visible, !ctrl.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/auth/register", 201, json!({"msg": "User created"}));
        let ctrl = controller(transport);

        assert!(ctrl.register("a@b.com", "x").await);

        assert!(!ctrl.is_authenticated());
        let view = ctrl.view().state();
        assert_eq!(
            view.notice(Form::Register),
            Some(Notice::Success("User created".to_string()))
        );
        assert!(view.form_resets.contains(&Form::Register));
    }

    #[tokio::test]
    async fn test_register_failure() {
        let transport = ScriptedTransport::new().respond(
            Method::Post,
            "/auth/register",
            409,
            json!({"msg": "Email already registered"}),
        );
        let ctrl = controller(transport);

        assert!(!ctrl.register("a@b.com", "x").await);
        assert_eq!(
            ctrl.view().state().notice(Form::Register),
            Some(Notice::Error("Email already registered".to_string()))
        );
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let transport = ScriptedTransport::new()
            .respond(Method::Get, "/api/plants", 200, json!([{"id": 1, "name": "Basil"}]))
            .respond(
                Method::Get,
                "/api/measurements/1",
                200,
                json!([{"ts": 200, "moisture": 30.0, "temperature": 21.0}]),
            );
        let ctrl = logged_in_controller(transport);
        ctrl.list_plants().await;
        ctrl.toggle_chart_visibility(1).await;
        assert_eq!(ctrl.charts().live_count(), 1);

        ctrl.logout();

        assert_eq!(ctrl.store().snapshot(), Session::default());
        assert_eq!(ctrl.charts().live_count(), 0);
        assert!(!ctrl.is_chart_visible(1));
        let view = ctrl.view().state();
        assert!(view.cards.is_empty());
        assert_eq!(view.email, None);
        assert!(view.auth_visible && !view.plants_visible);
    }

    #[tokio::test]
    async fn test_logout_without_session_is_safe() {
        let ctrl = controller(ScriptedTransport::new());
        ctrl.logout();
        assert!(ctrl.view().state().auth_visible);
        assert_eq!(ctrl.store().clear_count(), 1);
    }

    #[tokio::test]
    async fn test_init_without_token_shows_auth() {
        let ctrl = controller(ScriptedTransport::new());
        ctrl.init().await;

        assert!(ctrl.view().state().auth_visible);
        assert!(ctrl.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_init_validates_with_me() {
        let transport = ScriptedTransport::new()
            .respond(Method::Get, "/api/me", 200, json!({"email": "canonical@b.com"}))
            .respond(Method::Get, "/api/plants", 200, json!([]));
        let ctrl = logged_in_controller(transport);

        ctrl.init().await;

        let view = ctrl.view().state();
        assert!(view.plants_visible);
        assert_eq!(view.email.as_deref(), Some("canonical@b.com"));
        assert_eq!(view.email_history.first().map(String::as_str), Some("a@b.com"));
        assert_eq!(ctrl.store().snapshot().email.as_deref(), Some("canonical@b.com"));
    }

    #[tokio::test]
    async fn test_init_shows_loading_placeholder_without_cached_email() {
        let transport = ScriptedTransport::new()
            .respond(Method::Get, "/api/me", 200, json!({"email": "a@b.com"}))
            .respond(Method::Get, "/api/plants", 200, json!([]));
        let store = MemorySessionStore::with_session(Session::new("T", None));
        let ctrl = crate::testing::controller_with_store(transport, store);

        ctrl.init().await;
        assert_eq!(
            ctrl.view().state().email_history.first().map(String::as_str),
            Some(EMAIL_LOADING)
        );
    }

    #[tokio::test]
    async fn test_init_falls_back_to_plant_probe() {
        let transport = ScriptedTransport::new()
            .respond(Method::Get, "/api/me", 404, json!({"msg": "Not found"}))
            .respond(Method::Get, "/api/plants", 200, json!([{"id": 1, "name": "Basil"}]))
            .respond(Method::Get, "/api/measurements/1", 200, json!([]));
        let ctrl = logged_in_controller(transport);

        ctrl.init().await;

        assert!(ctrl.is_authenticated());
        assert_eq!(ctrl.view().state().cards, vec![1]);
        // The probe's result is rendered directly
        assert_eq!(ctrl.transport().count(Method::Get, "/api/plants"), 1);
    }

    #[tokio::test]
    async fn test_init_logs_out_when_both_checks_fail() {
        let transport = ScriptedTransport::new()
            .fail(Method::Get, "/api/me", TransportError::Network("offline".to_string()))
            .fail(Method::Get, "/api/plants", TransportError::Network("offline".to_string()));
        let ctrl = logged_in_controller(transport);

        ctrl.init().await;

        assert!(!ctrl.is_authenticated());
        assert_eq!(ctrl.store().clear_count(), 1);
        assert!(ctrl.view().state().auth_visible);
    }

    #[tokio::test]
    async fn test_init_401_from_me_logs_out_once() {
        let transport = ScriptedTransport::new()
            .respond(Method::Get, "/api/me", 401, json!({"msg": "Token has expired"}));
        let ctrl = logged_in_controller(transport);

        ctrl.init().await;

        assert_eq!(ctrl.store().clear_count(), 1);
        assert_eq!(ctrl.transport().count(Method::Get, "/api/plants"), 0);
        assert!(ctrl.view().state().notices.is_empty());
    }
}
