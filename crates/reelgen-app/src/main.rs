//! ReelGen Studio - AI video editor timeline
//!
//! Entry point: loads a project and runs the timeline window.

mod demo;

use anyhow::Result;
use eframe::egui;
use reelgen_core::{preview_start_frame, EditorConfig, PREVIEW_FPS};
use reelgen_timeline::{InMemoryStore, ProjectFile, QueuedStore};
use reelgen_ui::{TimelineAction, TimelineView};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_SAVE_PATH: &str = "reelgen-project.json";

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("ReelGen Studio starting...");

    let config = EditorConfig::load_or_default(&EditorConfig::default_path())?;

    let project_path = std::env::args().nth(1).map(PathBuf::from);
    let project = match &project_path {
        Some(path) => {
            let file = ProjectFile::load_from_file(path)?;
            info!("Opened project {:?} from {:?}", file.project.title, path);
            file.project
        }
        None => demo::demo_project()?,
    };

    let store = QueuedStore::new(InMemoryStore::new(project))?;
    let app = ReelgenApp::new(config, store, project_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 420.0])
            .with_title("ReelGen Studio"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "ReelGen Studio",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )?;

    Ok(())
}

struct ReelgenApp {
    store: QueuedStore<InMemoryStore>,
    timeline: TimelineView,
    project_path: Option<PathBuf>,
    status: String,
}

impl ReelgenApp {
    fn new(
        config: EditorConfig,
        store: QueuedStore<InMemoryStore>,
        project_path: Option<PathBuf>,
    ) -> Self {
        Self {
            store,
            timeline: TimelineView::new(config),
            project_path,
            status: String::new(),
        }
    }

    fn save(&mut self) {
        let path = self
            .project_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));
        let result = self
            .store
            .flush()
            .and_then(|()| ProjectFile::new(self.store.inner().snapshot()).save_to_file(&path));
        match result {
            Ok(()) => {
                info!("Saved project to {:?}", path);
                self.status = format!("Saved to {}", path.display());
                self.project_path = Some(path);
            }
            Err(e) => {
                warn!("Failed to save project: {}", e);
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn handle(&mut self, action: TimelineAction) {
        match action {
            TimelineAction::Selected(_) => {}
            TimelineAction::Deleted(id) => self.status = format!("Removed clip {id}"),
            TimelineAction::Committed(outcome) => {
                self.status = format!(
                    "Clip at {:.1}s (preview frame {}), {:.1}s long, source from {:.1}s",
                    outcome.placement.timestamp / 1000.0,
                    preview_start_frame(outcome.placement.timestamp, PREVIEW_FPS),
                    outcome.placement.duration / 1000.0,
                    outcome.placement.start_offset / 1000.0
                );
            }
            TimelineAction::Failed(message) => self.status = message,
        }
    }
}

impl eframe::App for ReelgenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for failure in self.store.failures() {
            self.status = format!("Could not save clip {}: {}", failure.clip_id, failure.message);
        }

        let project = self.store.inner().snapshot();

        let mut save_clicked = false;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&project.title);
                ui.label(format!(
                    "{} tracks, {}s composition",
                    project.tracks.len(),
                    project.composition_duration_secs()
                ));
                save_clicked = ui.button("Save").clicked();
            });
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            actions = self.timeline.show(ui, &project, &self.store);
        });
        for action in actions {
            self.handle(action);
        }

        if save_clicked {
            self.save();
        }
        if self.timeline.controller().active_clip().is_some() {
            ctx.request_repaint();
        }
    }
}

impl Drop for ReelgenApp {
    fn drop(&mut self) {
        if let Err(e) = self.timeline.teardown(&self.store) {
            warn!("Failed to commit drag on exit: {}", e);
        }
        if let Err(e) = self.store.flush() {
            warn!("Failed to flush pending writes: {}", e);
        }
    }
}
