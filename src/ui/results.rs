/// End-of-session summary: how many cats were liked, and which
use iced::widget::{button, column, container, image, text, Space};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use super::style;
use crate::state::data::CardItem;
use crate::{ImageCache, ImageSlot, Message};

/// Size of a liked-cat thumbnail
const TILE_SIZE: f32 = 80.0;

/// The numbers behind the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub liked: usize,
    pub total: usize,
}

impl Summary {
    pub fn new(liked: &[CardItem], total: usize) -> Self {
        Self {
            liked: liked.len(),
            total,
        }
    }

    pub fn headline(&self) -> String {
        let noun = if self.total == 1 { "cat" } else { "cats" };
        format!("You liked {} out of {} {}!", self.liked, self.total, noun)
    }
}

/// Results panel with a thumbnail grid and the restart button
pub fn view<'a>(liked: &'a [CardItem], total: usize, images: &'a ImageCache) -> Element<'a, Message> {
    let summary = Summary::new(liked, total);

    let body: Element<'a, Message> = if liked.is_empty() {
        text("No cats made the cut this time 🫠")
            .size(18)
            .color(style::LIGHT_TEXT)
            .into()
    } else {
        let tiles = liked
            .iter()
            .map(|cat| thumbnail(cat, images))
            .collect::<Vec<_>>();

        column![
            text("Your Favorite Felines").size(24),
            Wrap::with_elements(tiles).spacing(12.0).line_spacing(12.0),
        ]
        .spacing(16)
        .align_x(Alignment::Center)
        .into()
    };

    let content = column![
        text("Your Purr-file 🐾").size(36),
        text(summary.headline()).size(18).color(style::LIGHT_TEXT),
        body,
        Space::with_height(8),
        button(text("Try Again!").size(18))
            .on_press(Message::Restart)
            .padding([12, 24])
            .style(button::primary),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    container(content)
        .padding(32)
        .max_width(440)
        .style(style::panel)
        .into()
}

fn thumbnail<'a>(cat: &'a CardItem, images: &'a ImageCache) -> Element<'a, Message> {
    let inner: Element<'a, Message> = match images.get(&cat.id) {
        Some(ImageSlot::Ready(handle)) => image(handle.clone())
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .content_fit(ContentFit::Cover)
            .into(),
        _ => text("🐱").size(32).into(),
    };

    container(inner)
        .center_x(Length::Fixed(TILE_SIZE))
        .center_y(Length::Fixed(TILE_SIZE))
        .style(style::tile)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_counts_likes() {
        let liked = vec![CardItem::new("a", "u"), CardItem::new("c", "u")];
        let summary = Summary::new(&liked, 3);
        assert_eq!(summary, Summary { liked: 2, total: 3 });
        assert_eq!(summary.headline(), "You liked 2 out of 3 cats!");
    }

    #[test]
    fn test_headline_singular() {
        assert_eq!(
            Summary::new(&[], 1).headline(),
            "You liked 0 out of 1 cat!"
        );
    }
}
