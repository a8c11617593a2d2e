// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the project and every engine component. UI components
//! report actions; the app applies keyframe changes to the project,
//! records undo history and keeps the presentation scheduler in sync.

use crate::ui::canvas::{self, CanvasAction, CanvasEngine, CanvasView};
use crate::ui::presentation::{self, PresentationView};
use crate::ui::properties::{self, PropertiesAction};
use crate::ui::toolbar::{self, ToolbarAction};
use panframe::engine::gesture::zoom_to;
use panframe::engine::{
    compute_fitting_scale, DecodeError, DecodeTicket, DecodedImage, GestureTranslator,
    ImageSlot, KeyframeEditor, Resolution, TransitionScheduler, ViewportState,
};
use panframe::io::media::{self, LoadedImage};
use panframe::io::serialization;
use panframe::models::history::History;
use panframe::models::keyframe::{KeyframeChange, KeyframeId};
use panframe::models::project::Project;
use panframe::util::geometry::Size;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

/// Which surface fills the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Editor,
    Presentation,
}

/// What to open on launch, from the command line.
#[derive(Debug, Default)]
pub struct Startup {
    pub project: Option<PathBuf>,
    pub image: Option<PathBuf>,
    pub present: bool,
    pub keyframe: Option<KeyframeId>,
}

/// Result of a background decode.
struct DecodeMessage {
    ticket: DecodeTicket,
    result: Result<LoadedImage, DecodeError>,
}

/// Main application state.
pub struct PanframeApp {
    /// Current project (if one is open)
    project: Option<Project>,

    /// Where the project was loaded from or last saved to
    project_path: Option<PathBuf>,

    screen: Screen,
    editor: KeyframeEditor,
    viewport: ViewportState,
    gestures: GestureTranslator,
    needs_recenter: bool,

    /// History for undo/redo
    history: History,

    /// Current image texture plus decode bookkeeping
    image: ImageSlot<egui::TextureHandle>,
    decode_tx: Sender<DecodeMessage>,
    decode_rx: Receiver<DecodeMessage>,

    scheduler: TransitionScheduler,

    /// Presentation requested before the image finished loading
    pending_presentation: Option<Option<KeyframeId>>,

    /// Canvas size from the last frame, for toolbar zoom
    canvas_size: Size,

    /// Transient message for the presentation overlay
    notice: Option<String>,

    /// Last file error, shown in the status bar
    status: Option<String>,
}

impl PanframeApp {
    /// Create the application, opening whatever `startup` names.
    pub fn new(startup: Startup) -> Self {
        let (decode_tx, decode_rx) = channel();
        let mut app = Self {
            project: None,
            project_path: None,
            screen: Screen::Editor,
            editor: KeyframeEditor::default(),
            viewport: ViewportState::new(),
            gestures: GestureTranslator::new(),
            needs_recenter: false,
            history: History::new(),
            image: ImageSlot::new(),
            decode_tx,
            decode_rx,
            scheduler: TransitionScheduler::new(Default::default()),
            pending_presentation: None,
            canvas_size: Size::default(),
            notice: None,
            status: None,
        };

        if let Some(path) = startup.project {
            app.open_project(&path);
        } else if let Some(path) = startup.image {
            app.new_project_from_image(&path);
        }
        if startup.present {
            app.pending_presentation = Some(startup.keyframe);
        }
        app
    }

    /// Start a fresh project around an image file.
    fn new_project_from_image(&mut self, path: &Path) {
        let name = path
            .file_stem()
            .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string());
        let project = Project::new(name, path.to_string_lossy());
        self.project_path = None;
        self.install_project(project);
    }

    /// Load a project file and request its image.
    fn open_project(&mut self, path: &Path) {
        match serialization::import_project(path) {
            Ok(project) => {
                log::info!(
                    "Opened project {} with {} keyframes",
                    path.display(),
                    project.keyframes.len()
                );
                self.project_path = Some(path.to_path_buf());
                self.install_project(project);
            }
            Err(e) => {
                log::error!("Failed to open project: {:#}", e);
                self.status = Some(format!("Failed to open project: {:#}", e));
            }
        }
    }

    fn install_project(&mut self, project: Project) {
        self.exit_presentation();
        self.history.clear();
        self.editor = KeyframeEditor::default();
        self.scheduler.set_settings(project.settings);
        self.image.clear();
        self.request_image(project.image_source.clone());
        self.project = Some(project);
        self.status = None;
    }

    /// Save the project, choosing the format from the extension.
    fn save_project(&mut self, path: PathBuf) {
        let Some(ref project) = self.project else {
            return;
        };
        match serialization::export_project(project, &path) {
            Ok(()) => {
                log::info!("Saved project to {}", path.display());
                self.project_path = Some(path);
                self.status = None;
            }
            Err(e) => {
                log::error!("Failed to save project: {:#}", e);
                self.status = Some(format!("Failed to save project: {:#}", e));
            }
        }
    }

    /// Decode `source` on a background thread.
    fn request_image(&mut self, source: String) {
        let ticket = self.image.request(source);
        let sender = self.decode_tx.clone();
        std::thread::spawn(move || {
            let result = media::load_source(ticket.source());
            // The receiver only goes away when the app shuts down.
            let _ = sender.send(DecodeMessage { ticket, result });
        });
    }

    /// Install finished decodes. Results for superseded requests are dropped
    /// before a texture is created for them.
    fn poll_decodes(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.decode_rx.try_recv() {
            let result = match message.result {
                Ok(loaded) if self.image.is_current(&message.ticket) => {
                    let size = [loaded.width as usize, loaded.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                    let handle = ctx.load_texture(
                        message.ticket.source(),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    Ok(DecodedImage {
                        natural: Size::new(f64::from(loaded.width), f64::from(loaded.height)),
                        handle,
                    })
                }
                Ok(_) => {
                    log::debug!("Dropping superseded decode of {}", message.ticket.source());
                    continue;
                }
                Err(e) => Err(e),
            };

            if self.image.resolve(&message.ticket, result) == Resolution::Installed {
                self.needs_recenter = true;
            }
        }
    }

    /// Snapshot the keyframe list for undo.
    fn snapshot(&mut self) {
        if let Some(ref project) = self.project {
            self.history.push(project.keyframes.clone());
        }
    }

    fn apply_change(&mut self, change: KeyframeChange) {
        let Some(ref mut project) = self.project else {
            return;
        };
        if let Err(e) = project.apply(change) {
            log::warn!("Rejected keyframe change: {}", e);
        }
        self.editor.sync(&project.keyframes);
        self.scheduler.set_keyframes(&project.keyframes);
    }

    fn restore(&mut self, undo: bool) {
        let Some(ref mut project) = self.project else {
            return;
        };
        let current = project.keyframes.clone();
        let restored = if undo {
            self.history.undo(current)
        } else {
            self.history.redo(current)
        };
        if let Some(keyframes) = restored {
            project.keyframes = keyframes;
            self.editor.sync(&project.keyframes);
            self.scheduler.set_keyframes(&project.keyframes);
            log::debug!(
                "{} restored {} keyframes",
                if undo { "Undo" } else { "Redo" },
                project.keyframes.len()
            );
        }
    }

    /// Add a keyframe after the active one (or at the end) and start framing it.
    fn new_keyframe(&mut self) {
        let Some(ref mut project) = self.project else {
            return;
        };
        let index = self
            .editor
            .active_id()
            .and_then(|id| project.index_of(id))
            .map_or(project.keyframes.len(), |i| i + 1);
        let id = project.allocate_id();
        if let Some(change) = self.editor.begin_create(id, index, format!("Keyframe {}", id)) {
            self.snapshot();
            self.apply_change(change);
        }
    }

    fn delete_keyframe(&mut self, id: KeyframeId) {
        let change = self.editor.delete(id);
        self.snapshot();
        self.apply_change(change);
    }

    fn cancel_edit(&mut self) {
        if let Some(change) = self.editor.cancel() {
            self.apply_change(change);
            // Drop the snapshot taken before the insert so undo skips the aborted box.
            self.history.discard_last();
        }
    }

    fn zoom_by_button(&mut self, zoom_in: bool) {
        let container = self.canvas_size;
        let limits = self.editor.config().zoom;
        let current = self.viewport.user_scale();
        let target = if zoom_in {
            limits.zoom_in(current)
        } else {
            limits.zoom_out(current)
        };
        let natural = self.image.natural_size();
        let fit = compute_fitting_scale(
            container.width,
            container.height,
            natural.width,
            natural.height,
        );
        if let Err(e) = zoom_to(&mut self.viewport, &fit, target, 0.5, 0.5) {
            log::warn!("Zoom failed: {}", e);
        }
    }

    fn start_presentation(&mut self, initial: Option<KeyframeId>) {
        if self.project.is_none() {
            return;
        }
        self.cancel_edit();
        let Some(ref project) = self.project else {
            return;
        };
        self.notice = initial
            .filter(|id| project.keyframe(*id).is_none())
            .map(|id| format!("Keyframe {} not found, starting from the first keyframe", id));
        self.scheduler.set_settings(project.settings);
        self.scheduler.start(&project.keyframes, initial);
        self.screen = Screen::Presentation;
        log::info!("Presenting {} keyframes", project.keyframes.len());
    }

    fn exit_presentation(&mut self) {
        self.scheduler.stop();
        self.notice = None;
        self.screen = Screen::Editor;
    }

    fn handle_editor_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (cancel, delete, undo, redo) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                command
                    && (i.key_pressed(egui::Key::Y)
                        || (i.modifiers.shift && i.key_pressed(egui::Key::Z))),
            )
        });

        if cancel {
            self.cancel_edit();
        }
        if delete && !self.editor.is_capturing() {
            if let Some(id) = self.editor.active_id() {
                self.delete_keyframe(id);
            }
        }
        if !self.editor.is_capturing() {
            if undo {
                self.restore(true);
            } else if redo {
                self.restore(false);
            }
        }
    }

    fn handle_presentation_keys(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let (exit, next, previous, first, last) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowRight)
                    || i.key_pressed(egui::Key::Space)
                    || i.key_pressed(egui::Key::PageDown),
                i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::PageUp),
                i.key_pressed(egui::Key::Home),
                i.key_pressed(egui::Key::End),
            )
        });

        if exit {
            self.exit_presentation();
            return;
        }
        if next {
            self.scheduler.next(now);
        }
        if previous {
            self.scheduler.previous(now);
        }
        if first {
            self.scheduler.first(now);
        }
        if last {
            self.scheduler.last(now);
        }
    }

    fn handle_toolbar(&mut self, action: ToolbarAction) {
        let now = Instant::now();
        match action {
            ToolbarAction::NewKeyframe => self.new_keyframe(),
            ToolbarAction::ZoomIn => self.zoom_by_button(true),
            ToolbarAction::ZoomOut => self.zoom_by_button(false),
            ToolbarAction::ResetView => self.needs_recenter = true,
            ToolbarAction::Present => self.start_presentation(self.editor.active_id()),
            ToolbarAction::First => {
                self.scheduler.first(now);
            }
            ToolbarAction::Previous => {
                self.scheduler.previous(now);
            }
            ToolbarAction::Next => {
                self.scheduler.next(now);
            }
            ToolbarAction::Last => {
                self.scheduler.last(now);
            }
            ToolbarAction::ExitPresentation => self.exit_presentation(),
        }
    }

    fn handle_properties(&mut self, action: PropertiesAction) {
        match action {
            PropertiesAction::Select(id) => {
                self.editor.select(id);
            }
            PropertiesAction::Change(KeyframeChange::Delete { id }) => self.delete_keyframe(id),
            PropertiesAction::Change(change) => {
                self.snapshot();
                self.apply_change(change);
            }
            PropertiesAction::Rename(change) => self.apply_change(change),
            PropertiesAction::Settings(settings) => {
                if let Some(ref mut project) = self.project {
                    project.settings = settings;
                }
                self.scheduler.set_settings(settings);
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter(
                            "Images",
                            &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff", "tif"],
                        )
                        .pick_file()
                    {
                        self.new_project_from_image(&path);
                    }
                    ui.close_menu();
                }
                if ui.button("Open Project...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Projects", &["yaml", "yml", "json"])
                        .pick_file()
                    {
                        self.open_project(&path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                let has_project = self.project.is_some();
                if ui
                    .add_enabled(has_project && self.project_path.is_some(), egui::Button::new("Save"))
                    .clicked()
                {
                    if let Some(path) = self.project_path.clone() {
                        self.save_project(path);
                    }
                    ui.close_menu();
                }
                ui.add_enabled_ui(has_project, |ui| {
                    ui.menu_button("Save As", |ui| {
                        if ui.button("YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("project.yaml")
                                .save_file()
                            {
                                self.save_project(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("project.json")
                                .save_file()
                            {
                                self.save_project(path);
                            }
                            ui.close_menu();
                        }
                    });
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui
                    .add_enabled(self.history.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.restore(true);
                    ui.close_menu();
                }
                if ui
                    .add_enabled(self.history.can_redo(), egui::Button::new("Redo"))
                    .clicked()
                {
                    self.restore(false);
                    ui.close_menu();
                }
            });
        });
    }
}

impl eframe::App for PanframeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_decodes(ctx);

        // A presentation requested on launch waits for the image.
        if !self.image.is_loading() {
            if let Some(initial) = self.pending_presentation.take() {
                self.start_presentation(initial);
            }
        }

        match self.screen {
            Screen::Editor => self.handle_editor_keys(ctx),
            Screen::Presentation => self.handle_presentation_keys(ctx),
        }

        if self.screen == Screen::Editor {
            egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
                self.menu_bar(ctx, ui);
            });
        }

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| match self.screen {
                Screen::Editor => toolbar::show_editor(
                    ui,
                    self.editor.mode(),
                    self.viewport.zoom_percent(),
                    self.image.handle().is_some(),
                    self.project.as_ref().map_or(0, |p| p.keyframes.len()),
                ),
                Screen::Presentation => toolbar::show_presentation(ui, &self.scheduler),
            })
            .inner;
        if let Some(action) = toolbar_action {
            self.handle_toolbar(action);
        }

        if let Some(ref status) = self.status {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, status.as_str());
            });
        }

        if self.screen == Screen::Editor {
            if let Some(ref project) = self.project {
                let property_actions = egui::SidePanel::right("properties")
                    .default_width(260.0)
                    .show(ctx, |ui| properties::show(ui, project, self.editor.active_id()))
                    .inner;
                for action in property_actions {
                    self.handle_properties(action);
                }
            }
        }

        match self.screen {
            Screen::Editor => {
                let canvas_actions = egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        let size = ui.available_size();
                        self.canvas_size = Size::new(f64::from(size.x), f64::from(size.y));
                        canvas::show(
                            ui,
                            CanvasView {
                                project: self.project.as_ref(),
                                texture: self.image.handle(),
                                natural: self.image.natural_size(),
                                loading: self.image.is_loading(),
                                failure: self.image.failure(),
                            },
                            CanvasEngine {
                                editor: &mut self.editor,
                                viewport: &mut self.viewport,
                                gestures: &mut self.gestures,
                                needs_recenter: &mut self.needs_recenter,
                            },
                        )
                    })
                    .inner;
                for action in canvas_actions {
                    match action {
                        CanvasAction::BeginEdit => self.snapshot(),
                        CanvasAction::Propose(change) => self.apply_change(change),
                    }
                }
            }
            Screen::Presentation => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        presentation::show(
                            ui,
                            PresentationView {
                                texture: self.image.handle(),
                                natural: self.image.natural_size(),
                                loading: self.image.is_loading(),
                                failure: self.image.failure(),
                                notice: self.notice.as_deref(),
                            },
                            &mut self.scheduler,
                        );
                    });
            }
        }
    }
}
