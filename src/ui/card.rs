use std::time::Instant;

use iced::advanced::image::Image;
use iced::alignment;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Frame, Path, Program, Stroke};
use iced::widget::image::Handle;
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, Vector};

use super::style;
use crate::gesture::CardTransform;
use crate::Message;

/// Edge length of a card on screen
pub const CARD_SIZE: f32 = 300.0;
/// Offset at which the like/pass marks are fully opaque
const MARK_FULL_OFFSET: f32 = 120.0;

/// Pointer input forwarded from the stage to the gesture controller
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    Down { x: f32, at: Instant },
    Move { x: f32, at: Instant },
    Up { x: f32, at: Instant, viewport_width: f32 },
}

/// What can be drawn on one card
#[derive(Debug, Clone, Copy)]
pub enum CardFace<'a> {
    Loading,
    Ready(&'a Handle),
    Failed,
}

/// Canvas program drawing the top card and the one underneath it.
///
/// Only the top card is hit-tested; the card below is decoration.
pub struct CardStage<'a> {
    pub top: Option<CardFace<'a>>,
    pub below: Option<CardFace<'a>>,
    pub transform: CardTransform,
    /// False while the top card is flying away
    pub interactive: bool,
}

impl CardStage<'_> {
    /// Screen rectangle of the top card, ignoring rotation
    fn top_card_bounds(&self, bounds: Rectangle) -> Rectangle {
        let size = CARD_SIZE * self.transform.scale;
        Rectangle::new(
            Point::new(
                bounds.width / 2.0 - size / 2.0 + self.transform.offset_x,
                bounds.height / 2.0 - size / 2.0,
            ),
            Size::new(size, size),
        )
    }
}

impl Program<Message> for CardStage<'_> {
    type State = StageState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();

        // Stack cue: the next card sits slightly higher, smaller and faded
        if let Some(face) = self.below {
            frame.with_save(|frame| {
                frame.translate(Vector::new(center.x, center.y - 10.0));
                frame.scale(0.95);
                draw_face(frame, face, 0.7);
            });
        }

        if let Some(face) = self.top {
            let t = self.transform;
            frame.with_save(|frame| {
                frame.translate(Vector::new(center.x + t.offset_x, center.y));
                frame.rotate(t.rotation_deg.to_radians());
                frame.scale(t.scale);
                draw_face(frame, face, 1.0);

                let like = (t.offset_x / MARK_FULL_OFFSET).clamp(0.0, 1.0);
                let pass = (-t.offset_x / MARK_FULL_OFFSET).clamp(0.0, 1.0);
                let half = CARD_SIZE / 2.0;
                if like > 0.0 {
                    draw_heart(frame, Point::new(-half + 54.0, -half + 54.0), like);
                }
                if pass > 0.0 {
                    draw_cross(frame, Point::new(half - 54.0, -half + 54.0), pass);
                }
            });
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if !self.interactive || self.top.is_none() {
                    return (canvas::event::Status::Ignored, None);
                }
                if let Some(pos) = cursor.position_in(bounds) {
                    if self.top_card_bounds(bounds).contains(pos) {
                        state.is_dragging = true;
                        state.last_x = pos.x;
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::Pointer(PointerEvent::Down {
                                x: pos.x,
                                at: Instant::now(),
                            })),
                        );
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.is_dragging {
                    // Keep tracking outside the canvas so fast flicks are not lost
                    let x = position.x - bounds.x;
                    state.last_x = x;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Pointer(PointerEvent::Move {
                            x,
                            at: Instant::now(),
                        })),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
            | canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    let x = cursor
                        .position()
                        .map(|p| p.x - bounds.x)
                        .unwrap_or(state.last_x);
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Pointer(PointerEvent::Up {
                            x,
                            at: Instant::now(),
                            viewport_width: bounds.width,
                        })),
                    );
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.is_dragging {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(pos) if self.interactive && self.top_card_bounds(bounds).contains(pos) => {
                mouse::Interaction::Grab
            }
            _ => mouse::Interaction::default(),
        }
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct StageState {
    pub is_dragging: bool,
    pub last_x: f32,
}

/// Draw a card centered on the current origin
fn draw_face(frame: &mut Frame, face: CardFace<'_>, opacity: f32) {
    let half = CARD_SIZE / 2.0;
    let rect = Rectangle::new(Point::new(-half, -half), Size::new(CARD_SIZE, CARD_SIZE));
    let outline = Path::rectangle(rect.position(), rect.size());

    frame.fill(
        &outline,
        Color {
            a: opacity,
            ..style::CARD_BACKGROUND
        },
    );

    match face {
        CardFace::Ready(handle) => {
            frame.draw_image(rect, Image::new(handle.clone()).opacity(opacity));
        }
        CardFace::Loading | CardFace::Failed => {
            let label = if matches!(face, CardFace::Failed) {
                "This cat ran away"
            } else {
                "Fetching a cat..."
            };
            frame.fill_text(canvas::Text {
                content: label.to_string(),
                position: Point::ORIGIN,
                color: Color {
                    a: opacity,
                    ..style::LIGHT_TEXT
                },
                size: 20.0.into(),
                horizontal_alignment: alignment::Horizontal::Center,
                vertical_alignment: alignment::Vertical::Center,
                ..canvas::Text::default()
            });
        }
    }

    frame.stroke(
        &outline,
        Stroke::default()
            .with_color(Color {
                a: 0.5 * opacity,
                ..Color::WHITE
            })
            .with_width(4.0),
    );
}

fn draw_heart(frame: &mut Frame, center: Point, opacity: f32) {
    let s = 24.0;
    let heart = Path::new(|b| {
        b.move_to(Point::new(center.x, center.y + s));
        b.bezier_curve_to(
            Point::new(center.x - s * 1.6, center.y - s * 0.2),
            Point::new(center.x - s * 0.6, center.y - s * 1.4),
            Point::new(center.x, center.y - s * 0.4),
        );
        b.bezier_curve_to(
            Point::new(center.x + s * 0.6, center.y - s * 1.4),
            Point::new(center.x + s * 1.6, center.y - s * 0.2),
            Point::new(center.x, center.y + s),
        );
        b.close();
    });
    frame.stroke(
        &heart,
        Stroke::default()
            .with_color(Color {
                a: opacity,
                ..style::LIKE
            })
            .with_width(5.0),
    );
}

fn draw_cross(frame: &mut Frame, center: Point, opacity: f32) {
    let s = 22.0;
    let cross = Path::new(|b| {
        b.move_to(Point::new(center.x - s, center.y - s));
        b.line_to(Point::new(center.x + s, center.y + s));
        b.move_to(Point::new(center.x + s, center.y - s));
        b.line_to(Point::new(center.x - s, center.y + s));
    });
    frame.stroke(
        &cross,
        Stroke::default()
            .with_color(Color {
                a: opacity,
                ..style::PASS
            })
            .with_width(6.0),
    );
}
