use std::collections::HashMap;
use std::time::Instant;

use iced::keyboard::{self, key};
use iced::widget::image::Handle;
use iced::widget::{button, canvas, column, container, row, text};
use iced::{window, Alignment, Element, Length, Size, Subscription, Task, Theme};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod gesture;
mod source;
mod state;
mod ui;

use config::AppConfig;
use error::FetchError;
use gesture::{GestureController, GesturePhase};
use source::ImageSource;
use state::data::{CardItem, Direction};
use state::session::{LoadTicket, Session, SessionPhase};
use ui::card::{CardFace, CardStage, PointerEvent, CARD_SIZE};
use ui::style;

/// Initial window size
const WINDOW_WIDTH: f32 = 480.0;
const WINDOW_HEIGHT: f32 = 720.0;

/// Download state of one card picture
#[derive(Debug, Clone)]
pub enum ImageSlot {
    Loading,
    Ready(Handle),
    Failed,
}

/// Card id to picture
pub type ImageCache = HashMap<String, ImageSlot>;

/// Main application state
struct PawsApp {
    config: AppConfig,
    client: reqwest::Client,
    /// Deck, cursor and liked cats
    session: Session,
    /// Drag and animation state of the top card
    gesture: GestureController,
    /// Pictures of the current deck
    images: ImageCache,
    /// Width a committed card has to clear
    viewport_width: f32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Retry / Reload after an error or an empty deck
    Load,
    /// "Try Again!" on the results screen
    Restart,
    /// A deck fetch finished
    DeckLoaded(LoadTicket, Result<Vec<CardItem>, FetchError>),
    /// A card picture finished downloading
    ImageLoaded(LoadTicket, String, Result<Handle, FetchError>),
    /// Pointer input on the top card
    Pointer(PointerEvent),
    /// Animation frame
    Frame(Instant),
    /// Arrow-key swipe
    KeySwipe(Direction),
    WindowResized(Size),
}

impl PawsApp {
    /// Create a new instance of the application and start the first load
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();
        let client = source::create_client(config.timeout()).unwrap_or_else(|err| {
            warn!("⚠️  Falling back to default HTTP client: {}", err);
            reqwest::Client::new()
        });
        Self::with_config(config, client)
    }

    fn with_config(config: AppConfig, client: reqwest::Client) -> (Self, Task<Message>) {
        let mut app = PawsApp {
            config,
            client,
            session: Session::new(),
            gesture: GestureController::new(),
            images: ImageCache::new(),
            viewport_width: WINDOW_WIDTH,
        };
        let task = app.start_load();
        (app, task)
    }

    /// Reset the session and fetch a fresh deck
    fn start_load(&mut self) -> Task<Message> {
        let ticket = self.session.begin_load();
        self.images.clear();
        self.gesture.activate(None);

        let source = ImageSource::from_config(&self.config, self.client.clone());
        Task::perform(source.fetch(self.config.deck_size), move |result| {
            Message::DeckLoaded(ticket, result)
        })
    }

    /// Start downloading every picture of the current deck
    fn download_images(&mut self, ticket: LoadTicket) -> Task<Message> {
        let tasks = self
            .session
            .deck()
            .iter()
            .map(|card| {
                self.images.insert(card.id.clone(), ImageSlot::Loading);
                let id = card.id.clone();
                Task::perform(
                    source::download_image(self.client.clone(), card.image_url.clone()),
                    move |result| Message::ImageLoaded(ticket, id.clone(), result),
                )
            })
            .collect::<Vec<_>>();
        Task::batch(tasks)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Load => self.start_load(),
            Message::Restart => {
                info!(
                    "🔁 Restarting after liking {} of {} cats",
                    self.session.liked().len(),
                    self.session.deck().len()
                );
                self.start_load()
            }
            Message::DeckLoaded(ticket, result) => {
                if !self.session.finish_load(ticket, result) {
                    return Task::none();
                }
                sync_gesture(&self.session, &mut self.gesture);
                self.download_images(ticket)
            }
            Message::ImageLoaded(ticket, id, result) => {
                if !self.session.is_current(ticket) {
                    return Task::none();
                }
                let slot = match result {
                    Ok(handle) => ImageSlot::Ready(handle),
                    Err(err) => {
                        warn!("⚠️  Picture for {} failed: {}", id, err);
                        ImageSlot::Failed
                    }
                };
                self.images.insert(id, slot);
                Task::none()
            }
            Message::Pointer(event) => {
                match event {
                    PointerEvent::Down { x, at } => self.gesture.pointer_down(x, at),
                    PointerEvent::Move { x, at } => self.gesture.pointer_move(x, at),
                    PointerEvent::Up {
                        x,
                        at,
                        viewport_width,
                    } => {
                        self.viewport_width = viewport_width;
                        self.gesture
                            .pointer_up(x, at, CARD_SIZE / 2.0, viewport_width);
                    }
                }
                Task::none()
            }
            Message::Frame(now) => {
                advance_frame(&mut self.session, &mut self.gesture, now);
                Task::none()
            }
            Message::KeySwipe(direction) => {
                self.gesture
                    .fling(direction, CARD_SIZE / 2.0, self.viewport_width);
                Task::none()
            }
            Message::WindowResized(size) => {
                self.viewport_width = size.width;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let title = row![
            text("Paws and Preferences").size(40).color(iced::Color::WHITE),
            text("🐾").size(40).color(style::PRIMARY),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let stage: Element<Message> = match self.session.phase() {
            SessionPhase::Loading => text("Loading adorable cats...")
                .size(20)
                .color(style::LIGHT_TEXT)
                .into(),
            SessionPhase::Error(message) => container(
                column![
                    text(message).size(16),
                    button("Retry")
                        .on_press(Message::Load)
                        .padding([8, 16])
                        .style(button::danger),
                ]
                .spacing(12)
                .align_x(Alignment::Center),
            )
            .padding(16)
            .max_width(320)
            .style(style::error_panel)
            .into(),
            SessionPhase::Empty => container(
                column![
                    text("No cats found. Please try again.").size(18),
                    button("Reload")
                        .on_press(Message::Load)
                        .padding([8, 16])
                        .style(button::primary),
                ]
                .spacing(16)
                .align_x(Alignment::Center),
            )
            .padding(16)
            .style(style::panel)
            .into(),
            SessionPhase::Active => self.card_stage(),
            SessionPhase::Complete => {
                ui::results::view(self.session.liked(), self.session.deck().len(), &self.images)
            }
        };

        let content = column![
            title,
            container(stage)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        ]
        .spacing(20)
        .padding(24)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::backdrop)
            .into()
    }

    fn card_stage(&self) -> Element<Message> {
        let face = |card: &CardItem| match self.images.get(&card.id) {
            Some(ImageSlot::Ready(handle)) => CardFace::Ready(handle),
            Some(ImageSlot::Failed) => CardFace::Failed,
            Some(ImageSlot::Loading) | None => CardFace::Loading,
        };

        let program = CardStage {
            top: self.session.current().map(face),
            below: self.session.upcoming().map(face),
            transform: self.gesture.transform(),
            interactive: !matches!(self.gesture.phase(), GesturePhase::Releasing(_)),
        };

        let progress = format!(
            "{} / {}   ←  pass · like  →",
            (self.session.cursor() + 1).min(self.session.deck().len()),
            self.session.deck().len()
        );

        column![
            canvas(program).width(Length::Fill).height(Length::Fill),
            text(progress).size(14).color(style::SECONDARY),
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
            keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
                keyboard::Key::Named(key::Named::ArrowLeft) => {
                    Some(Message::KeySwipe(Direction::Left))
                }
                keyboard::Key::Named(key::Named::ArrowRight) => {
                    Some(Message::KeySwipe(Direction::Right))
                }
                _ => None,
            }),
        ];

        // Frame ticks only while a card is springing
        if self.gesture.is_animating() {
            subscriptions.push(window::frames().map(Message::Frame));
        }

        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        style::app_theme()
    }
}

/// Point the gesture controller at the session's top card
fn sync_gesture(session: &Session, gesture: &mut GestureController) {
    let top = session.current().map(|card| card.id.as_str());
    if gesture.card_id() != top {
        gesture.activate(top.map(str::to_string));
    }
}

/// Run one animation frame; a finished exit advances the deck
fn advance_frame(session: &mut Session, gesture: &mut GestureController, now: Instant) {
    if let Some(decision) = gesture.tick(now) {
        session.apply_decision(&decision);
        sync_gesture(session, gesture);
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🐾 Paws and Preferences v{}", env!("CARGO_PKG_VERSION"));

    iced::application("Paws and Preferences", PawsApp::update, PawsApp::view)
        .theme(PawsApp::theme)
        .subscription(PawsApp::subscription)
        .window_size(Size::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .centered()
        .run_with(PawsApp::new)
}
