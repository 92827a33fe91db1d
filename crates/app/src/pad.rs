//! The doodle pad host
//!
//! Owns the tool state, the surface manager and the storage/clipboard
//! backends, and turns UI messages into surface operations. Anything slow is
//! returned as a [`PadTask`] for the runner to execute; its result comes back
//! through [`DoodlePad::handle_completion`].

use std::fs;
use std::path::PathBuf;

use doodle_config::{
    DEFAULT_PALETTE, DOWNLOAD_FILE_NAME, STORAGE_KEY, SUGGESTION_MIME, SUGGESTION_QUALITY,
};
use doodle_ipc::{PadToUi, Toast, UiToPad};
use doodle_suggest::SuggestError;
use painting::{
    Bitmap, CodecError, ImageFormat, ImportJob, RedrawJob, RescaledBitmap, SurfaceError,
    SurfaceManager,
};
use tracing::{debug, info, warn};

use crate::bridge;
use crate::clipboard::Clipboard;
use crate::store::DrawingStore;
use crate::tool_state::ToolState;

/// Why a decode was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOrigin {
    /// The drawing saved in local storage, loaded on mount
    SavedDrawing,
    /// An explicit `Import` request
    Import,
}

/// Work the runner executes off the message loop
#[derive(Debug)]
pub enum PadTask {
    Redraw(RedrawJob),
    Decode { origin: DecodeOrigin, job: ImportJob },
    Suggest { drawing_data_uri: String },
}

/// Result of a [`PadTask`]
#[derive(Debug)]
pub enum Completion {
    Redrawn {
        generation: u64,
        result: Result<RescaledBitmap, CodecError>,
    },
    Decoded {
        origin: DecodeOrigin,
        result: Result<Bitmap, SurfaceError>,
    },
    Suggested(Result<Vec<String>, SuggestError>),
}

/// What handling one message produced
#[derive(Debug, Default)]
pub struct Outcome {
    pub messages: Vec<PadToUi>,
    pub tasks: Vec<PadTask>,
    pub shutdown: bool,
}

impl Outcome {
    fn send(&mut self, message: PadToUi) {
        self.messages.push(message);
    }

    fn toast(&mut self, toast: Toast) {
        self.messages.push(PadToUi::Toast(toast));
    }
}

pub struct DoodlePad<S, C> {
    manager: SurfaceManager,
    tools: ToolState,
    suggested_colors: Vec<String>,
    suggestions_enabled: bool,
    suggestion_in_flight: bool,
    store: S,
    clipboard: C,
    download_dir: PathBuf,
}

impl<S: DrawingStore, C: Clipboard> DoodlePad<S, C> {
    pub fn new(store: S, clipboard: C, download_dir: PathBuf, suggestions_enabled: bool) -> Self {
        let tools = ToolState::default();
        let mut manager = SurfaceManager::new();
        manager.apply_tool(bridge::to_tool(tools.tool), &tools.color, tools.width);

        Self {
            manager,
            tools,
            suggested_colors: Vec::new(),
            suggestions_enabled,
            suggestion_in_flight: false,
            store,
            clipboard,
            download_dir,
        }
    }

    /// First message sent to the UI
    pub fn initialize(&self) -> PadToUi {
        PadToUi::Initialize {
            tool: self.tools.snapshot(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            suggestions_enabled: self.suggestions_enabled,
        }
    }

    pub fn handle_message(&mut self, message: UiToPad) -> Outcome {
        let mut out = Outcome::default();

        match message {
            UiToPad::Mounted { bounds, scale } => {
                self.resize(bounds, scale, &mut out);
                self.load_saved_drawing(&mut out);
            }
            UiToPad::Resized { bounds, scale } => self.resize(bounds, scale, &mut out),
            UiToPad::Pointer(event) => {
                self.manager.handle_pointer(&bridge::to_pointer_input(event));
                self.flush_region(&mut out);
            }
            UiToPad::SetTool { tool } => {
                self.tools.tool = tool;
                self.manager.set_tool(bridge::to_tool(tool));
                out.send(PadToUi::ToolChanged(self.tools.snapshot()));
            }
            UiToPad::SetColor { color } => match self.manager.set_color(&color) {
                Ok(()) => {
                    self.tools.color = color;
                    out.send(PadToUi::ToolChanged(self.tools.snapshot()));
                }
                Err(e) => out.send(PadToUi::Error {
                    code: "invalid_color".to_string(),
                    message: e.to_string(),
                }),
            },
            UiToPad::SetStrokeWidth { width } => {
                self.tools.set_width(width);
                self.push_width(&mut out);
            }
            UiToPad::StepStrokeWidth { delta } => {
                self.tools.step_width(delta);
                self.push_width(&mut out);
            }
            UiToPad::Clear => {
                self.manager.clear();
                self.flush_region(&mut out);
                self.suggested_colors.clear();
                out.send(PadToUi::SuggestedColors { colors: Vec::new() });
                out.toast(Toast::new("Canvas Cleared!"));
            }
            UiToPad::Save => self.save(&mut out),
            UiToPad::Download => self.download(&mut out),
            UiToPad::CopyImage => self.copy_image(&mut out),
            UiToPad::GetSuggestions => self.request_suggestions(&mut out),
            UiToPad::Export { mime, quality } => {
                let data = self.manager.export(mime.as_deref(), quality);
                out.send(PadToUi::Exported { data });
            }
            UiToPad::Import { data } => match self.manager.prepare_import(data) {
                Ok(job) => out.tasks.push(PadTask::Decode {
                    origin: DecodeOrigin::Import,
                    job,
                }),
                Err(e) => {
                    out.toast(Toast::destructive("Import Failed").with_description(e.to_string()))
                }
            },
            UiToPad::Shutdown => {
                info!("Shutdown requested");
                out.shutdown = true;
            }
        }

        out
    }

    pub fn handle_completion(&mut self, completion: Completion) -> Outcome {
        let mut out = Outcome::default();

        match completion {
            Completion::Redrawn { result, generation } => {
                let applied = match result {
                    Ok(rescaled) => self.manager.complete_redraw(rescaled),
                    Err(e) => {
                        warn!("Redraw {} failed, rescaling inline: {}", generation, e);
                        self.manager.recover_redraw(generation)
                    }
                };
                if applied {
                    self.flush_region(&mut out);
                }
            }
            Completion::Decoded { origin, result } => {
                let applied = result.and_then(|bitmap| self.manager.apply_import(&bitmap));
                self.finish_decode(origin, applied, &mut out);
            }
            Completion::Suggested(result) => {
                self.suggestion_in_flight = false;
                self.finish_suggestions(result, &mut out);
            }
        }

        out
    }

    fn resize(&mut self, bounds: doodle_ipc::CanvasBounds, scale: f32, out: &mut Outcome) {
        if let Some(job) = self.manager.resize(bridge::to_bounds(bounds), scale) {
            out.tasks.push(PadTask::Redraw(job));
        }
        if let Some(surface) = self.manager.surface() {
            out.send(PadToUi::SurfaceResized(bridge::surface_info(surface)));
        }
        self.flush_region(out);
    }

    fn push_width(&mut self, out: &mut Outcome) {
        self.manager.set_width(self.tools.width);
        out.send(PadToUi::ToolChanged(self.tools.snapshot()));
    }

    /// Send whatever changed since the last flush
    fn flush_region(&mut self, out: &mut Outcome) {
        let Some(rect) = self.manager.take_dirty_region() else {
            return;
        };
        let Some(surface) = self.manager.surface() else {
            return;
        };
        if let Some(update) = bridge::region_update(surface, rect) {
            out.send(PadToUi::RegionUpdated(update));
        }
    }

    fn load_saved_drawing(&mut self, out: &mut Outcome) {
        let saved = match self.store.get(STORAGE_KEY) {
            Ok(Some(saved)) => saved,
            Ok(None) => return,
            Err(e) => {
                warn!("Could not read saved drawing: {}", e);
                return;
            }
        };
        match self.manager.prepare_import(saved) {
            Ok(job) => out.tasks.push(PadTask::Decode {
                origin: DecodeOrigin::SavedDrawing,
                job,
            }),
            // Surface refused the mounted size; keep the drawing for the next mount
            Err(e) => warn!("Saved drawing not loaded: {}", e),
        }
    }

    fn finish_decode(
        &mut self,
        origin: DecodeOrigin,
        result: Result<(), SurfaceError>,
        out: &mut Outcome,
    ) {
        match (origin, result) {
            (DecodeOrigin::SavedDrawing, Ok(())) => {
                self.flush_region(out);
                out.toast(Toast::new("Loaded saved drawing!"));
            }
            (DecodeOrigin::SavedDrawing, Err(e)) => {
                warn!("Error loading saved drawing: {}", e);
                if let Err(e) = self.store.remove(STORAGE_KEY) {
                    warn!("Could not remove saved drawing: {}", e);
                }
                out.toast(
                    Toast::destructive("Error loading saved drawing")
                        .with_description("Could not apply the saved drawing. It might be corrupted."),
                );
            }
            (DecodeOrigin::Import, Ok(())) => self.flush_region(out),
            (DecodeOrigin::Import, Err(e)) => {
                warn!("Import failed: {}", e);
                out.toast(Toast::destructive("Import Failed").with_description(e.to_string()));
            }
        }
    }

    fn save(&mut self, out: &mut Outcome) {
        let Some(data) = self.manager.export(None, None) else {
            return;
        };
        match self.store.set(STORAGE_KEY, data) {
            Ok(()) => out.toast(
                Toast::new("Drawing Saved!").with_description("Your artwork is saved in local storage."),
            ),
            Err(e) => {
                warn!("Save failed: {}", e);
                out.toast(Toast::destructive("Save Failed").with_description(e.to_string()));
            }
        }
    }

    fn download(&mut self, out: &mut Outcome) {
        let Some(png) = self.manager.export_bytes(ImageFormat::Png, 1.0) else {
            return;
        };
        let path = self.download_dir.join(DOWNLOAD_FILE_NAME);
        let written = fs::create_dir_all(&self.download_dir).and_then(|()| fs::write(&path, png));
        match written {
            Ok(()) => {
                info!("Downloaded drawing to {}", path.display());
                out.send(PadToUi::Downloaded {
                    path: path.display().to_string(),
                });
                out.toast(Toast::new("Image Downloading!"));
            }
            Err(e) => {
                warn!("Download failed: {}", e);
                out.toast(Toast::destructive("Download Failed").with_description(e.to_string()));
            }
        }
    }

    fn copy_image(&mut self, out: &mut Outcome) {
        let Some(png) = self.manager.export_bytes(ImageFormat::Png, 1.0) else {
            return;
        };
        let png_error = match self.clipboard.write_png(&png) {
            Ok(()) => {
                out.toast(Toast::new("Image Copied!").with_description("Artwork copied to clipboard."));
                return;
            }
            Err(e) => e,
        };
        debug!("Image copy failed, falling back to text: {}", png_error);

        let data_uri = painting::to_data_uri(&png, ImageFormat::Png);
        match self.clipboard.write_text(&data_uri) {
            Ok(()) => out.toast(
                Toast::new("Image Data Copied!").with_description("Data URL (text) copied to clipboard."),
            ),
            Err(e) => {
                warn!("Copy failed: {}", e);
                out.toast(Toast::destructive("Copy Failed").with_description(e.to_string()));
            }
        }
    }

    fn request_suggestions(&mut self, out: &mut Outcome) {
        if self.suggestion_in_flight {
            debug!("Suggestion request already in flight");
            return;
        }
        if !self.suggestions_enabled {
            self.finish_suggestions(Err(SuggestError::NotConfigured), out);
            return;
        }
        let Some(drawing_data_uri) = self
            .manager
            .export(Some(SUGGESTION_MIME), Some(SUGGESTION_QUALITY))
        else {
            out.toast(Toast::destructive("Error").with_description("Could not get drawing data."));
            return;
        };

        self.suggestion_in_flight = true;
        out.send(PadToUi::SuggestionsPending);
        out.tasks.push(PadTask::Suggest { drawing_data_uri });
    }

    fn finish_suggestions(&mut self, result: Result<Vec<String>, SuggestError>, out: &mut Outcome) {
        match result {
            Ok(colors) => {
                let toast = if colors.is_empty() {
                    Toast::new("No New Suggestions")
                        .with_description("AI couldn't find specific suggestions for this drawing.")
                } else {
                    Toast::new("Color Suggestions Ready!")
                        .with_description("Check the palette for new colors.")
                };
                self.suggested_colors = colors;
                out.send(PadToUi::SuggestedColors {
                    colors: self.suggested_colors.clone(),
                });
                out.toast(toast);
            }
            Err(e) => {
                warn!("Suggestion request failed: {}", e);
                self.suggested_colors.clear();
                out.send(PadToUi::SuggestedColors { colors: Vec::new() });
                out.toast(Toast::destructive("AI Error").with_description(e.user_message()));
            }
        }
    }
}

#[cfg(test)]
impl<S, C> DoodlePad<S, C> {
    pub fn manager(&self) -> &SurfaceManager {
        &self.manager
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn suggested_colors(&self) -> &[String] {
        &self.suggested_colors
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }
}
