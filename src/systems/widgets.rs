//! Widget construction and behaviour.
//!
//! - buttons recolour their face from their theme every frame
//!   ([`update_button_faces`]) and play a click sound ([`observe_button_click`]);
//! - checkboxes toggle on click and trigger [`CheckboxToggled`];
//! - paged panels show one page of children at a time.
//!
//! # Example
//!
//! ```ignore
//! let theme = Arc::new(Theme::default());
//! let ok = spawn_button(&mut world, Rect::new(10.0, 10.0, 80.0, 24.0), 0.0, "OK", theme.clone());
//! add_child(&mut world, screen, ok)?;
//! world.add_observer(move |trigger: On<LeftClicked>| {
//!     if trigger.event().entity == ok { log::info!("ok!"); }
//! });
//! ```

use std::sync::Arc;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::bounds::Rect;
use crate::components::clickable::Clickable;
use crate::components::node::SceneNode;
use crate::components::sprite::{Label, Sprite};
use crate::components::widgets::{Button, Checkbox, PagedPanel};
use crate::error::SceneError;
use crate::events::pointer::{CheckboxToggled, LeftClicked, PageChanged};
use crate::resources::audio::AudioBridge;
use crate::resources::theme::Theme;
use crate::systems::scene::{add_child, ensure_exists, parent_of, remove_child, spawn_entity};

fn face_sprite(theme: &Theme) -> Sprite {
    Sprite::new(theme.face_texture.clone()).with_color(theme.idle)
}

/// Spawn a detached button.
pub fn spawn_button(
    world: &mut World,
    rect: Rect,
    layer: f32,
    caption: &str,
    theme: Arc<Theme>,
) -> Entity {
    let entity = spawn_entity(world, rect, layer);
    world.entity_mut(entity).insert((
        Clickable::new(),
        face_sprite(&theme),
        Label::new(caption, theme.font.clone(), theme.font_size).with_color(theme.text),
        Button::new(theme),
    ));
    entity
}

/// Spawn a detached checkbox.
pub fn spawn_checkbox(
    world: &mut World,
    rect: Rect,
    layer: f32,
    caption: &str,
    checked: bool,
    theme: Arc<Theme>,
) -> Entity {
    let checkbox = Checkbox::new(caption, checked);
    let entity = spawn_entity(world, rect, layer);
    world.entity_mut(entity).insert((
        Clickable::new(),
        face_sprite(&theme),
        Label::new(checkbox.display_text(), theme.font.clone(), theme.font_size)
            .with_color(theme.text),
        Button::new(theme),
        checkbox,
    ));
    entity
}

/// Set each button's face colour from its click state.
pub fn update_button_faces(world: &mut World) {
    let mut query = world.query::<(&Button, &Clickable, &mut Sprite)>();
    for (button, clickable, mut sprite) in query.iter_mut(world) {
        let color = button.theme.face_color(clickable.state(), clickable.enabled);
        if sprite.color != color {
            sprite.color = color;
        }
    }
}

/// Observer: play the button's click sound.
pub fn observe_button_click(
    trigger: On<LeftClicked>,
    buttons: Query<&Button>,
    audio: Option<Res<AudioBridge>>,
) {
    let (Ok(button), Some(audio)) = (buttons.get(trigger.event().entity), audio) else {
        return;
    };
    if let Some(id) = button.click_sound() {
        audio.play(id);
    }
}

/// Observer: toggle a clicked checkbox.
pub fn observe_checkbox_click(
    trigger: On<LeftClicked>,
    mut boxes: Query<(&mut Checkbox, Option<&mut Label>)>,
    mut commands: Commands,
) {
    let entity = trigger.event().entity;
    let Ok((mut checkbox, label)) = boxes.get_mut(entity) else {
        return;
    };
    checkbox.checked = !checkbox.checked;
    if let Some(mut label) = label {
        label.text = checkbox.display_text();
    }
    debug!("checkbox {:?} -> {}", entity, checkbox.checked);
    commands.trigger(CheckboxToggled {
        entity,
        checked: checkbox.checked,
    });
}

/// Turn `panel` into a paged panel. Page entities not yet attached are
/// added as children of the panel. Shows the first page.
///
/// On error no member is left attached by this call.
pub fn attach_paged_panel(
    world: &mut World,
    panel: Entity,
    pages: Vec<Vec<Entity>>,
) -> Result<(), SceneError> {
    ensure_exists(world, panel)?;
    let component = PagedPanel::new(pages)?;
    let members: Vec<Entity> = component.pages().flatten().copied().collect();
    let mut attached = Vec::new();
    for member in members {
        if parent_of(world, member).is_some() {
            continue;
        }
        if let Err(e) = add_child(world, panel, member) {
            for done in attached {
                let _ = remove_child(world, panel, done);
            }
            return Err(e);
        }
        attached.push(member);
    }
    world
        .get_entity_mut(panel)
        .map_err(|_| SceneError::MissingEntity(panel))?
        .insert(component);
    show_page(world, panel, 0)
}

/// Make page `index` the only visible and active page of `panel`.
pub fn show_page(world: &mut World, panel: Entity, index: usize) -> Result<(), SceneError> {
    let pages: Vec<Vec<Entity>> = {
        let mut component = world
            .get_mut::<PagedPanel>(panel)
            .ok_or(SceneError::MissingComponent {
                entity: panel,
                component: "PagedPanel",
            })?;
        component.select(index)?;
        component.pages().map(<[Entity]>::to_vec).collect()
    };
    for (i, page) in pages.iter().enumerate() {
        for member in page {
            if let Some(mut node) = world.get_mut::<SceneNode>(*member) {
                node.visible = i == index;
                node.active = i == index;
            }
        }
    }
    world.trigger(PageChanged {
        entity: panel,
        page: index,
    });
    Ok(())
}

fn panel(world: &World, entity: Entity) -> Result<&PagedPanel, SceneError> {
    world
        .get::<PagedPanel>(entity)
        .ok_or(SceneError::MissingComponent {
            entity,
            component: "PagedPanel",
        })
}

/// Show the next page, wrapping to the first.
pub fn next_page(world: &mut World, entity: Entity) -> Result<usize, SceneError> {
    let index = panel(world, entity)?.next_index();
    show_page(world, entity, index)?;
    Ok(index)
}

/// Show the previous page, wrapping to the last.
pub fn prev_page(world: &mut World, entity: Entity) -> Result<usize, SceneError> {
    let index = panel(world, entity)?.prev_index();
    show_page(world, entity, index)?;
    Ok(index)
}
