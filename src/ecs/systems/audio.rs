use crate::ecs::components::{Audio, Movement};
use crate::ecs::systems::{Ctx, System};
use crate::error::PetError;

/// Plays one random clip per second from each walking entity's sound set.
#[derive(Debug, Default)]
pub struct AudioSystem;

impl System for AudioSystem {
    fn start(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>) -> Result<(), PetError> {
        for (entity, audio) in world.query_mut::<&mut Audio>() {
            // Fail early on a broken install rather than on the first step
            let clips = ctx.host.list_clips(&audio.sound_folder)?;
            audio.player = Some(ctx.host.create_player()?);
            log::info!(
                "{entity:?} has {} walking sounds in {}",
                clips.len(),
                audio.sound_folder.display()
            );
        }
        Ok(())
    }

    fn update(&mut self, _world: &mut hecs::World, _ctx: &mut Ctx<'_>) {}

    fn update_per_second(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>) {
        for (_, (audio, movement)) in world.query_mut::<(&Audio, &Movement)>() {
            if !movement.is_moving {
                continue;
            }
            let Some(player) = audio.player else {
                continue;
            };

            let clips = match ctx.host.list_clips(&audio.sound_folder) {
                Ok(clips) => clips,
                Err(e) => {
                    log::warn!("Skipping walking sound: {e}");
                    continue;
                }
            };
            if clips.is_empty() {
                continue;
            }

            let clip = &clips[ctx.rng.usize(..clips.len())];
            log::debug!("Playing {}", clip.display());
            ctx.host.play(player, clip);
        }
    }
}
