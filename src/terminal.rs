//! Terminal Platform
//!
//! Implements the controller seams for the `plantwatch-cli` binary: HTTP via
//! reqwest, the session in a JSON file, and a view that prints to the
//! terminal. Charts are drawn as unicode sparklines.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::time::Duration;

use crate::api::HttpTransport;
use crate::charts::{ChartBackend, ChartData, ChartKind};
use crate::controller::view::{NO_MEASUREMENTS, NO_PLANTS};
use crate::controller::{Form, Notice, Platform, Timer, View};
use crate::model::{Plant, PlantId};
use crate::session::FileSessionStore;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Controller platform of the terminal client
pub struct TerminalPlatform;

impl Platform for TerminalPlatform {
    type Transport = HttpTransport;
    type Store = FileSessionStore;
    type View = TerminalView;
    type Charts = SparklineCharts;
    type Timer = TokioTimer;
}

/// Sleeps on the tokio clock
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// View that prints to stdout and reports errors on stderr
pub struct TerminalView {
    assume_yes: bool,
    show_charts: bool,
    names: RefCell<HashMap<PlantId, String>>,
    auth_requested: Cell<bool>,
}

impl TerminalView {
    pub fn new(assume_yes: bool, show_charts: bool) -> Self {
        Self {
            assume_yes,
            show_charts,
            names: RefCell::new(HashMap::new()),
            auth_requested: Cell::new(false),
        }
    }

    /// Whether the controller fell back to the auth view
    pub fn auth_requested(&self) -> bool {
        self.auth_requested.get()
    }

    fn plant_label(&self, plant: PlantId) -> String {
        match self.names.borrow().get(&plant) {
            Some(name) => format!("{} (#{})", name, plant),
            None => format!("#{}", plant),
        }
    }
}

impl View for TerminalView {
    fn show_auth(&self) {
        self.auth_requested.set(true);
    }

    fn show_plants(&self) {
        self.auth_requested.set(false);
    }

    fn set_user_email(&self, email: Option<&str>) {
        if let Some(email) = email {
            tracing::debug!(email, "user");
        }
    }

    fn show_notice(&self, _form: Form, notice: Notice) {
        match notice {
            Notice::Error(text) => eprintln!("Error: {}", text),
            Notice::Success(text) => println!("{}", text),
        }
    }

    fn clear_notices(&self) {}

    fn reset_form(&self, _form: Form) {}

    fn show_plant_list_loading(&self) {}

    fn show_plant_list_error(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn render_plant_list(&self, plants: &[Plant]) {
        let mut names = self.names.borrow_mut();
        names.clear();
        if plants.is_empty() {
            println!("{}", NO_PLANTS);
            return;
        }

        println!("{:<8} {}", "ID", "Name");
        println!("{}", "-".repeat(40));
        for plant in plants {
            println!("{:<8} {}", plant.id, plant.name);
            names.insert(plant.id, plant.name.clone());
        }
        println!();
    }

    fn clear_plant_list(&self) {
        self.names.borrow_mut().clear();
    }

    fn remove_plant_card(&self, plant: PlantId) {
        println!("Deleted plant {}.", self.plant_label(plant));
        self.names.borrow_mut().remove(&plant);
    }

    fn render_latest_reading(&self, plant: PlantId, summary: Option<&str>) {
        println!(
            "{}: {}",
            self.plant_label(plant),
            summary.unwrap_or(NO_MEASUREMENTS)
        );
    }

    fn set_chart_visible(&self, _plant: PlantId, _visible: bool) {}

    fn show_chart_placeholder(&self, plant: PlantId, message: Option<&str>) {
        if let (true, Some(message)) = (self.show_charts, message) {
            println!("  {} {}", self.plant_label(plant), message);
        }
    }

    fn set_water_pending(&self, plant: PlantId, pending: bool) {
        if pending {
            println!("Sending water command to plant {}...", plant);
        }
    }

    fn set_delete_pending(&self, _plant: PlantId, _pending: bool) {}

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// A drawn sparkline
#[derive(Debug)]
pub struct Sparkline {
    plant: PlantId,
    kind: ChartKind,
}

/// Prints each chart as a one-line sparkline when enabled
#[derive(Debug, Default)]
pub struct SparklineCharts {
    enabled: bool,
}

impl SparklineCharts {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn draw(&self, plant: PlantId, kind: ChartKind, data: &ChartData) {
        if self.enabled {
            println!("  #{} {}", plant, format_chart_line(kind, data));
        }
    }
}

impl ChartBackend for SparklineCharts {
    type Handle = Sparkline;

    fn create(&self, plant: PlantId, kind: ChartKind, data: &ChartData) -> Sparkline {
        self.draw(plant, kind, data);
        Sparkline { plant, kind }
    }

    fn update(&self, handle: &mut Sparkline, data: &ChartData) {
        self.draw(handle.plant, handle.kind, data);
    }

    fn destroy(&self, _handle: Sparkline) {}
}

/// Map values onto eight block heights, scaled to their own min and max
pub fn sparkline(values: &[f64]) -> String {
    let Some((min, max)) = (ChartData {
        labels: Vec::new(),
        values: values.to_vec(),
    })
    .bounds() else {
        return String::new();
    };

    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// `Moisture (%)      ▁▃█  28.0..35.5  (00:00:00 - 00:02:00)`
pub fn format_chart_line(kind: ChartKind, data: &ChartData) -> String {
    let range = data
        .bounds()
        .map(|(min, max)| format!("{:.1}..{:.1}", min, max))
        .unwrap_or_else(|| "-".to_string());
    let window = match (data.labels.first(), data.labels.last()) {
        (Some(first), Some(last)) => format!("  ({} - {})", first, last),
        _ => String::new(),
    };
    format!(
        "{:<18} {}  {}{}",
        kind.label(),
        sparkline(&data.values),
        range,
        window
    )
}
