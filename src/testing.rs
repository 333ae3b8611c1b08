//! In-crate test doubles shared by the unit tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use crate::api::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::charts::{ChartBackend, ChartData, ChartKind};
use crate::controller::{Form, Notice, Platform, SessionController, Timer, View};
use crate::model::{Plant, PlantId, Session};
use crate::session::MemorySessionStore;

type Scripted = Result<ApiResponse, TransportError>;

/// Replays canned responses per route.
///
/// Responses for a route are served in order; the last one repeats.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<Scripted>>>,
    delays: HashMap<(Method, String), Duration>,
    log: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.push(method, path, Ok(ApiResponse::new(status, Some(body))))
    }

    pub fn respond_empty(self, method: Method, path: &str, status: u16) -> Self {
        self.push(method, path, Ok(ApiResponse::new(status, None)))
    }

    pub fn fail(self, method: Method, path: &str, error: TransportError) -> Self {
        self.push(method, path, Err(error))
    }

    /// Hold every response on the route for `delay` (tokio time)
    pub fn delay(mut self, method: Method, path: &str, delay: Duration) -> Self {
        self.delays.insert((method, path.to_string()), delay);
        self
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.borrow().clone()
    }

    /// Number of requests sent to one route
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn push(self, method: Method, path: &str, scripted: Scripted) -> Self {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    fn next(&self, method: Method, path: &str) -> Scripted {
        let mut routes = self.routes.borrow_mut();
        match routes.get_mut(&(method, path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Ok(ApiResponse::new(404, Some(json!({"msg": "Not scripted"})))),
        }
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let key = (request.method, request.path.clone());
        self.log.borrow_mut().push(request);

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        self.next(key.0, &key.1)
    }
}

/// Chart lifecycle call, as seen by the backend
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    Created { plant: PlantId, kind: ChartKind, data: ChartData },
    Updated { plant: PlantId, kind: ChartKind, data: ChartData },
    Destroyed { plant: PlantId, kind: ChartKind },
}

#[derive(Debug)]
pub struct RecordedChart {
    plant: PlantId,
    kind: ChartKind,
}

/// Chart backend that only records calls
#[derive(Default)]
pub struct RecordingCharts {
    events: RefCell<Vec<ChartEvent>>,
}

impl RecordingCharts {
    pub fn events(&self) -> Vec<ChartEvent> {
        self.events.borrow().clone()
    }

    pub fn created(&self, plant: PlantId) -> usize {
        self.count(|e| matches!(e, ChartEvent::Created { plant: p, .. } if *p == plant))
    }

    pub fn updated(&self, plant: PlantId) -> usize {
        self.count(|e| matches!(e, ChartEvent::Updated { plant: p, .. } if *p == plant))
    }

    pub fn destroyed(&self, plant: PlantId) -> usize {
        self.count(|e| matches!(e, ChartEvent::Destroyed { plant: p, .. } if *p == plant))
    }

    /// Data most recently drawn on one chart
    pub fn last_data(&self, plant: PlantId, kind: ChartKind) -> Option<ChartData> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            ChartEvent::Created { plant: p, kind: k, data }
            | ChartEvent::Updated { plant: p, kind: k, data }
                if *p == plant && *k == kind =>
            {
                Some(data.clone())
            }
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ChartEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl ChartBackend for RecordingCharts {
    type Handle = RecordedChart;

    fn create(&self, plant: PlantId, kind: ChartKind, data: &ChartData) -> RecordedChart {
        self.events.borrow_mut().push(ChartEvent::Created {
            plant,
            kind,
            data: data.clone(),
        });
        RecordedChart { plant, kind }
    }

    fn update(&self, handle: &mut RecordedChart, data: &ChartData) {
        self.events.borrow_mut().push(ChartEvent::Updated {
            plant: handle.plant,
            kind: handle.kind,
            data: data.clone(),
        });
    }

    fn destroy(&self, handle: RecordedChart) {
        self.events.borrow_mut().push(ChartEvent::Destroyed {
            plant: handle.plant,
            kind: handle.kind,
        });
    }
}

/// What the plant list area currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlantListState {
    #[default]
    Blank,
    Loading,
    Error(String),
    Empty(String),
    Cards,
}

/// Snapshot of everything a [`RecordingView`] has been told
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub auth_visible: bool,
    pub plants_visible: bool,
    pub email: Option<String>,
    pub email_history: Vec<String>,
    pub notices: HashMap<Form, Notice>,
    pub form_resets: Vec<Form>,
    pub list: PlantListState,
    pub cards: Vec<PlantId>,
    pub readings: HashMap<PlantId, Option<String>>,
    pub visible_charts: HashSet<PlantId>,
    pub placeholders: HashMap<PlantId, String>,
    pub water_pending: HashSet<PlantId>,
    pub delete_pending: HashSet<PlantId>,
    pub confirms: Vec<String>,
    pub alerts: Vec<String>,
}

impl ViewState {
    pub fn notice(&self, form: Form) -> Option<Notice> {
        self.notices.get(&form).cloned()
    }
}

/// Ordered log of the calls that matter for timing
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    ShowAuth,
    ShowPlants,
    WaterPending(PlantId, bool),
    DeletePending(PlantId, bool),
    Alert(String),
}

/// View that records state instead of drawing
pub struct RecordingView {
    state: RefCell<ViewState>,
    events: RefCell<Vec<ViewEvent>>,
    confirm_answer: Cell<bool>,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            state: RefCell::new(ViewState::default()),
            events: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
        }
    }
}

impl RecordingView {
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }

    /// Answer to give future confirmation prompts
    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    fn record(&self, event: ViewEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl View for RecordingView {
    fn show_auth(&self) {
        let mut state = self.state.borrow_mut();
        state.auth_visible = true;
        state.plants_visible = false;
        self.record(ViewEvent::ShowAuth);
    }

    fn show_plants(&self) {
        let mut state = self.state.borrow_mut();
        state.auth_visible = false;
        state.plants_visible = true;
        self.record(ViewEvent::ShowPlants);
    }

    fn set_user_email(&self, email: Option<&str>) {
        let mut state = self.state.borrow_mut();
        state.email = email.map(str::to_string);
        if let Some(email) = email {
            state.email_history.push(email.to_string());
        }
    }

    fn show_notice(&self, form: Form, notice: Notice) {
        let mut state = self.state.borrow_mut();
        match form {
            Form::Login => state.notices.remove(&Form::Register),
            Form::Register => state.notices.remove(&Form::Login),
            Form::AddPlant => None,
        };
        state.notices.insert(form, notice);
    }

    fn clear_notices(&self) {
        self.state.borrow_mut().notices.clear();
    }

    fn reset_form(&self, form: Form) {
        self.state.borrow_mut().form_resets.push(form);
    }

    fn show_plant_list_loading(&self) {
        self.state.borrow_mut().list = PlantListState::Loading;
    }

    fn show_plant_list_error(&self, message: &str) {
        let mut state = self.state.borrow_mut();
        state.list = PlantListState::Error(message.to_string());
        state.cards.clear();
    }

    fn render_plant_list(&self, plants: &[Plant]) {
        let mut state = self.state.borrow_mut();
        state.cards = plants.iter().map(|p| p.id).collect();
        state.visible_charts.clear();
        state.list = if plants.is_empty() {
            PlantListState::Empty(crate::controller::view::NO_PLANTS.to_string())
        } else {
            PlantListState::Cards
        };
    }

    fn clear_plant_list(&self) {
        let mut state = self.state.borrow_mut();
        state.list = PlantListState::Blank;
        state.cards.clear();
        state.readings.clear();
        state.visible_charts.clear();
        state.placeholders.clear();
    }

    fn remove_plant_card(&self, plant: PlantId) {
        let mut state = self.state.borrow_mut();
        state.cards.retain(|id| *id != plant);
        state.readings.remove(&plant);
    }

    fn render_latest_reading(&self, plant: PlantId, summary: Option<&str>) {
        self.state
            .borrow_mut()
            .readings
            .insert(plant, summary.map(str::to_string));
    }

    fn set_chart_visible(&self, plant: PlantId, visible: bool) {
        let mut state = self.state.borrow_mut();
        if visible {
            state.visible_charts.insert(plant);
        } else {
            state.visible_charts.remove(&plant);
        }
    }

    fn show_chart_placeholder(&self, plant: PlantId, message: Option<&str>) {
        let mut state = self.state.borrow_mut();
        match message {
            Some(message) => state.placeholders.insert(plant, message.to_string()),
            None => state.placeholders.remove(&plant),
        };
    }

    fn set_water_pending(&self, plant: PlantId, pending: bool) {
        let mut state = self.state.borrow_mut();
        if pending {
            state.water_pending.insert(plant);
        } else {
            state.water_pending.remove(&plant);
        }
        self.record(ViewEvent::WaterPending(plant, pending));
    }

    fn set_delete_pending(&self, plant: PlantId, pending: bool) {
        let mut state = self.state.borrow_mut();
        if pending {
            state.delete_pending.insert(plant);
        } else {
            state.delete_pending.remove(&plant);
        }
        self.record(ViewEvent::DeletePending(plant, pending));
    }

    fn confirm(&self, message: &str) -> bool {
        self.state.borrow_mut().confirms.push(message.to_string());
        self.confirm_answer.get()
    }

    fn alert(&self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
        self.record(ViewEvent::Alert(message.to_string()));
    }
}

/// Timer that records requested sleeps; optionally sleeps on tokio time
#[derive(Default)]
pub struct TestTimer {
    real: bool,
    sleeps: RefCell<Vec<Duration>>,
}

impl TestTimer {
    /// Returns immediately
    pub fn instant() -> Self {
        Self::default()
    }

    /// Sleeps on the tokio clock, for paused-time tests
    pub fn tokio() -> Self {
        Self {
            real: true,
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Timer for TestTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        if self.real {
            tokio::time::sleep(duration).await;
        }
    }
}

pub struct TestPlatform;

impl Platform for TestPlatform {
    type Transport = ScriptedTransport;
    type Store = MemorySessionStore;
    type View = RecordingView;
    type Charts = RecordingCharts;
    type Timer = TestTimer;
}

pub type TestController = SessionController<TestPlatform>;

/// Store holding a cached token `T` for `a@b.com`
pub fn session_store() -> MemorySessionStore {
    MemorySessionStore::with_session(Session::new("T", Some("a@b.com".to_string())))
}

pub fn controller_with_timer(
    transport: ScriptedTransport,
    store: MemorySessionStore,
    timer: TestTimer,
) -> TestController {
    let ctrl = SessionController::new(
        transport,
        store,
        RecordingView::default(),
        RecordingCharts::default(),
        timer,
    );
    ctrl.restore();
    ctrl
}

pub fn controller_with_store(
    transport: ScriptedTransport,
    store: MemorySessionStore,
) -> TestController {
    controller_with_timer(transport, store, TestTimer::instant())
}

/// Controller with no cached session
pub fn controller(transport: ScriptedTransport) -> TestController {
    controller_with_store(transport, MemorySessionStore::new())
}

/// Controller whose session was restored from [`session_store`]
pub fn logged_in_controller(transport: ScriptedTransport) -> TestController {
    controller_with_store(transport, session_store())
}
