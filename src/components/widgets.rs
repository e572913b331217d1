//! UI widget components.
//!
//! Widgets are ordinary scene entities: a [`Button`] is an entity with
//! [`Bounds`](super::bounds::Bounds), a [`Clickable`](super::clickable::Clickable),
//! a [`Sprite`](super::sprite::Sprite) for its face and a
//! [`Label`](super::sprite::Label) for its caption. The components here only
//! hold widget state; the behaviour is in [`crate::systems::widgets`].

use std::sync::Arc;

use bevy_ecs::prelude::*;

use crate::error::SceneError;
use crate::resources::theme::Theme;

/// Clickable face that recolours itself from its theme on hover/press.
#[derive(Component, Clone, Debug)]
pub struct Button {
    pub theme: Arc<Theme>,
    /// Played through the audio bridge on click. Falls back to the theme's sound.
    pub click_sound: Option<String>,
}

impl Button {
    pub fn new(theme: Arc<Theme>) -> Self {
        Self {
            theme,
            click_sound: None,
        }
    }

    pub fn with_click_sound(mut self, id: impl Into<String>) -> Self {
        self.click_sound = Some(id.into());
        self
    }

    pub fn click_sound(&self) -> Option<&str> {
        self.click_sound
            .as_deref()
            .or(self.theme.click_sound.as_deref())
    }
}

/// Toggle button. Flips on every click and shows a mark in its caption.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct Checkbox {
    pub checked: bool,
    /// Caption without the check mark.
    pub caption: String,
}

impl Checkbox {
    pub fn new(caption: impl Into<String>, checked: bool) -> Self {
        Self {
            checked,
            caption: caption.into(),
        }
    }

    pub fn display_text(&self) -> String {
        let mark = if self.checked { "[x]" } else { "[ ]" };
        format!("{} {}", mark, self.caption)
    }
}

/// Container showing one group of child entities at a time.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct PagedPanel {
    pages: Vec<Vec<Entity>>,
    current: usize,
}

impl PagedPanel {
    pub fn new(pages: Vec<Vec<Entity>>) -> Result<Self, SceneError> {
        if pages.is_empty() {
            return Err(SceneError::EmptyPagedPanel);
        }
        Ok(Self { pages, current: 0 })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&[Entity]> {
        self.pages.get(index).map(Vec::as_slice)
    }

    pub fn pages(&self) -> impl Iterator<Item = &[Entity]> {
        self.pages.iter().map(Vec::as_slice)
    }

    pub(crate) fn select(&mut self, index: usize) -> Result<(), SceneError> {
        if index >= self.pages.len() {
            return Err(SceneError::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Index after the current one, wrapping to the first page.
    pub fn next_index(&self) -> usize {
        (self.current + 1) % self.pages.len()
    }

    /// Index before the current one, wrapping to the last page.
    pub fn prev_index(&self) -> usize {
        (self.current + self.pages.len() - 1) % self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_panel_is_rejected() {
        assert_eq!(PagedPanel::new(vec![]), Err(SceneError::EmptyPagedPanel));
    }

    #[test]
    fn page_indices_wrap() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut panel = PagedPanel::new(vec![vec![a], vec![b], vec![]]).unwrap();
        assert_eq!(panel.prev_index(), 2);
        panel.select(2).unwrap();
        assert_eq!(panel.next_index(), 0);
        assert_eq!(
            panel.select(3),
            Err(SceneError::PageOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn checkbox_caption_shows_mark() {
        let mut c = Checkbox::new("Sound", false);
        assert_eq!(c.display_text(), "[ ] Sound");
        c.checked = true;
        assert_eq!(c.display_text(), "[x] Sound");
    }
}
