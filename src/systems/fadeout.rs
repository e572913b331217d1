//! Move-fade-remove controller step.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, warn};

use crate::components::fadeout::MoveFadeRemove;
use crate::components::tint::Tint;
use crate::systems::scene::{destroy, remove, translate};

/// Slide and fade `entity`; remove it (and dispose it if configured) once
/// its duration is over.
pub fn move_fade_remove(world: &mut World, entity: Entity, elapsed: f32) {
    let Some(step) = world
        .get_mut::<MoveFadeRemove>(entity)
        .and_then(|mut fade| fade.step(elapsed))
    else {
        return;
    };
    if step.translation != Vec2::ZERO {
        if let Err(e) = translate(world, entity, step.translation) {
            warn!("fade controller could not move {:?}: {}", entity, e);
        }
    }
    if let Some(mut tint) = world.get_mut::<Tint>(entity) {
        tint.alpha = step.alpha;
    } else {
        world
            .entity_mut(entity)
            .insert(Tint::default().with_alpha(step.alpha));
    }
    if !step.done {
        return;
    }

    let dispose = world
        .get::<MoveFadeRemove>(entity)
        .is_some_and(|fade| fade.dispose);
    debug!("fade finished on {:?} (dispose: {})", entity, dispose);
    let result = if dispose {
        destroy(world, entity)
    } else {
        remove(world, entity).map(|_| ())
    };
    if let Err(e) = result {
        warn!("fade controller could not remove {:?}: {}", entity, e);
    }
}
