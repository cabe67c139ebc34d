use iced::widget::{button, column, container, text, Column};
use iced::{Alignment, Element, Length, Size, Task, Theme};

// Declare the application modules
mod caption;
mod config;
mod picker;
mod state;
mod ui;

use caption::CaptionEngine;
use config::AppConfig;
use state::session::{Session, Stage, NO_IMAGE_WARNING};
use ui::preview::{Preview, VIEWPORT_SIZE};

/// Main application state
struct CaptionStudio {
    /// User settings (dialog cancellation behavior)
    config: AppConfig,
    /// The caption generator; `None` when startup loading failed
    engine: Option<CaptionEngine>,
    /// Selected image and its caption
    session: Session,
    /// Scaled preview for the viewport
    preview: Option<Preview>,
    /// The caption output area
    output: String,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Upload Image" button
    SelectImage,
    /// User clicked the "Generate Caption" button
    GenerateCaption,
}

impl CaptionStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();

        // Build the caption engine up front. The first run downloads the
        // pretrained weights; afterwards they come from the local hub cache.
        // A failure keeps the window usable and is reported in the status
        // line instead of taking the process down.
        let (engine, status) = match CaptionEngine::new() {
            Ok(engine) => {
                println!("🧠 Caption model ready on {}", engine.device_label());
                let status = format!("Ready. Model loaded on {}.", engine.device_label());
                (Some(engine), status)
            }
            Err(e) => {
                eprintln!("❌ Failed to load caption model: {e}");
                (None, format!("❌ Caption model unavailable: {e}"))
            }
        };

        (
            CaptionStudio {
                config,
                engine,
                session: Session::new(),
                preview: None,
                output: String::new(),
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectImage => {
                match picker::pick_image() {
                    Some(path) => {
                        // A new selection always discards the previous caption
                        self.session.select(path.clone());
                        self.output.clear();

                        match ui::preview::load_preview(&path) {
                            Ok(preview) => {
                                self.preview = Some(preview);
                                self.status = format!("📁 Selected {}", path.display());
                            }
                            Err(e) => {
                                // The selection survives; the generator will
                                // surface the same problem if captioning is
                                // attempted on this file.
                                self.preview = None;
                                log::warn!("preview failed for {}: {}", path.display(), e);
                                self.status = format!("⚠️ Could not preview {}", path.display());
                            }
                        }
                    }
                    None => {
                        self.session.dialog_cancelled(self.config.on_cancel);
                        if self.session.selected_path().is_none() {
                            self.preview = None;
                            self.output.clear();
                        }
                    }
                }

                Task::none()
            }
            Message::GenerateCaption => {
                self.output = match &mut self.engine {
                    Some(engine) => self.session.request_caption(engine),
                    // Engine never loaded: the no-selection warning still
                    // wins, otherwise point at the startup failure
                    None => match self.session.selected_path() {
                        None => NO_IMAGE_WARNING.to_string(),
                        Some(_) => "❌ Caption model is unavailable. See the status line.".to_string(),
                    },
                };

                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let preview: Element<Message> = match &self.preview {
            Some(preview) => iced::widget::image(preview.handle.clone())
                .width(Length::Fixed(preview.width as f32))
                .height(Length::Fixed(preview.height as f32))
                .into(),
            None => text(match self.session.stage() {
                Stage::Idle => "No image uploaded",
                _ => "Preview unavailable",
            })
            .size(16)
            .into(),
        };

        let viewport = container(preview)
            .center_x(Length::Fixed(VIEWPORT_SIZE as f32))
            .center_y(Length::Fixed(VIEWPORT_SIZE as f32));

        let content: Column<Message> = column![
            viewport,
            button("Upload Image")
                .on_press(Message::SelectImage)
                .padding(10),
            button("Generate Caption")
                .on_press(Message::GenerateCaption)
                .padding(10),
            text(&self.output).size(16),
            text(&self.status).size(14),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application(
        "Caption Studio",
        CaptionStudio::update,
        CaptionStudio::view,
    )
    .theme(CaptionStudio::theme)
    .window_size(Size::new(800.0, 600.0))
    .centered()
    .run_with(CaptionStudio::new)
}
