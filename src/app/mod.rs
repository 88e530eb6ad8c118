use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui::{self, Context, Vec2};
use tracing::{error, info};

use crate::config::LayoutConfig;
use crate::explorer::GraphExplorer;
use crate::graph::{CollectedSnapshot, GraphSnapshot, collect_snapshot, demo_snapshot};

mod graph;
mod ui;

const LOADER_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct AppOptions {
    pub layout: LayoutConfig,
    pub snapshot: Option<PathBuf>,
    pub seed_demo: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadKind {
    /// Merge into the current graph and highlight what is new.
    Ingest,
    /// Replace the current graph with a fresh layout.
    Reload,
}

struct PendingLoad {
    kind: LoadKind,
    path: PathBuf,
    rx: Receiver<Result<CollectedSnapshot, String>>,
}

enum Status {
    Idle,
    Loading(String),
    Info(String),
    Error(String),
}

pub struct ExplorerApp {
    explorer: Option<GraphExplorer>,
    seed: Option<GraphSnapshot>,
    source_path: Option<PathBuf>,
    pending: Option<PendingLoad>,
    status: Status,
    ingest_path: String,
    tuning: LayoutConfig,
    surface_size: Vec2,
    pointer_inside: bool,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        let seed = options.seed_demo.then(demo_snapshot);
        let mut app = Self {
            explorer: None,
            seed,
            source_path: options.snapshot.clone(),
            pending: None,
            status: Status::Idle,
            ingest_path: String::new(),
            tuning: options.layout.sanitized(),
            surface_size: Vec2::ZERO,
            pointer_inside: false,
        };

        if let Some(path) = options.snapshot {
            app.start_load(LoadKind::Reload, path);
        }
        app
    }

    fn spawn_load(path: PathBuf) -> Receiver<Result<CollectedSnapshot, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = collect_snapshot(&path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(&mut self, kind: LoadKind, path: PathBuf) {
        if self.pending.is_some() {
            return;
        }
        info!(path = %path.display(), ?kind, "loading snapshot");
        self.status = Status::Loading(format!("Loading {}...", path.display()));
        self.pending = Some(PendingLoad {
            kind,
            rx: Self::spawn_load(path.clone()),
            path,
        });
    }

    fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Creates the explorer once the surface size is known.
    fn ensure_explorer(&mut self, size: Vec2) -> &mut GraphExplorer {
        self.surface_size = size;
        let tuning = self.tuning;
        let seed = &mut self.seed;
        self.explorer.get_or_insert_with(|| match seed.take() {
            Some(snapshot) => GraphExplorer::with_snapshot(tuning, size, snapshot),
            None => GraphExplorer::new(tuning, size),
        })
    }

    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        // Results wait until the first frame has sized the surface.
        let Some(explorer) = self.explorer.as_mut() else {
            self.pending = Some(pending);
            return;
        };

        match pending.rx.try_recv() {
            Ok(Ok(collected)) => {
                let report = match pending.kind {
                    LoadKind::Ingest => explorer.merge(collected.snapshot, Instant::now()),
                    LoadKind::Reload => {
                        self.source_path = Some(pending.path.clone());
                        explorer.reload(collected.snapshot, self.surface_size)
                    }
                };
                if collected.graph_id.is_some() {
                    explorer.set_graph_id(collected.graph_id);
                }
                self.status = Status::Info(report.summary());
            }
            Ok(Err(message)) => {
                error!(path = %pending.path.display(), %message, "snapshot load failed");
                self.status = Status::Error(message);
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
            }
            Err(TryRecvError::Disconnected) => {
                self.status = Status::Error("Background load worker disconnected".to_owned());
            }
        }
    }

    fn reload(&mut self) {
        match self.source_path.clone() {
            Some(path) => self.start_load(LoadKind::Reload, path),
            None => {
                let size = self.surface_size;
                if let Some(explorer) = self.explorer.as_mut() {
                    let report = explorer.reload(demo_snapshot(), size);
                    self.status = Status::Info(report.summary());
                }
            }
        }
    }

    fn reset(&mut self) {
        let size = self.surface_size;
        if let Some(explorer) = self.explorer.as_mut() {
            explorer.reset(size);
            self.status = Status::Info("Graph cleared".to_owned());
        }
    }

    fn ingest_from_field(&mut self) {
        let path = self.ingest_path.trim();
        if path.is_empty() {
            self.status = Status::Error("Enter a snapshot path to ingest".to_owned());
            return;
        }
        self.start_load(LoadKind::Ingest, PathBuf::from(path));
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_pending();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        if self.is_loading() {
            ctx.request_repaint_after(LOADER_POLL_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(explorer) = self.explorer.as_mut() {
            explorer.teardown();
        }
    }
}
