use std::sync::Arc;

use bevy::{
    asset::RenderAssetUsages,
    prelude::*,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
    tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future},
};
use tracing::{debug, warn};

use crate::{
    error::Result,
    field::NoiseField,
    raster::{NoiseRaster, TextureSettings},
};

/// System sets for the noise texture pipeline.
///
/// Use these to order your own systems relative to texture baking:
///
/// ```rust,ignore
/// // Inspect the raw raster after baking but before it becomes an Image:
/// app.add_systems(Update, find_hot_spots.after(NoiseTextureSet::Generate)
///                                       .before(NoiseTextureSet::Upload));
/// ```
///
/// ```text
/// NoiseTextureSet::Spawn   →  [async compute]  →  NoiseTextureSet::Generate  →  [your systems]  →  NoiseTextureSet::Upload
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum NoiseTextureSet {
    /// Spawns an async compute task for each queued texture.
    Spawn,
    /// Polls async tasks and inserts [`BakedTexture`] on completion.
    Generate,
    /// Uploads [`BakedTexture`] pixels into a Bevy [`Image`] and removes [`BakedTexture`].
    Upload,
}

/// A noise texture to bake: the shared field and how to sample it.
///
/// `field` is an [`Arc`] so many textures can sample one field, and the async bake task can
/// hold it without copying the grid.
#[derive(Component, Clone)]
pub struct NoiseTexture {
    pub field: Arc<NoiseField>,
    pub settings: TextureSettings,
}

impl NoiseTexture {
    pub fn new(field: Arc<NoiseField>, settings: TextureSettings) -> Self {
        Self { field, settings }
    }
}

/// Marker component added to [`NoiseTexture`] entities that are waiting to be baked.
///
/// Removed once the image has been uploaded, or when baking fails.
#[derive(Component)]
pub struct QueuedTexture;

/// Holds the in-flight async compute task for a [`NoiseTexture`].
#[derive(Component)]
pub struct BakeTask(Task<Result<BakedTexture>>);

/// Baked pixels waiting to be uploaded.
#[derive(Component)]
pub struct BakedTexture {
    pub raster: NoiseRaster,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

/// The uploaded texture of a [`NoiseTexture`].
#[derive(Component, Clone, Debug)]
pub struct NoiseImage(pub Handle<Image>);

/// Runtime configuration for the noise texture pipeline.
///
/// ```rust,ignore
/// fn my_system(mut config: ResMut<NoiseTextureConfig>) {
///     config.max_tasks_per_frame = 1;
/// }
/// ```
#[derive(Resource)]
pub struct NoiseTextureConfig {
    /// Maximum number of bake tasks spawned per frame. Default: `2`.
    pub max_tasks_per_frame: usize,
}

impl Default for NoiseTextureConfig {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: 2,
        }
    }
}

/// Bevy plugin that bakes [`NoiseTexture`]s into [`Image`] assets off the main thread.
///
/// ```text
/// NoiseTexture added
///   → QueuedTexture inserted        (on_texture_add, `auto_queue` feature)
///   → BakeTask spawned              (NoiseTextureSet::Spawn)
///   → [async compute runs]
///   → BakedTexture inserted         (NoiseTextureSet::Generate, once task completes)
///   → NoiseImage inserted           (NoiseTextureSet::Upload)
///   → QueuedTexture + BakedTexture removed
/// ```
///
/// Without `auto_queue`, insert [`QueuedTexture`] yourself to start a bake.
pub struct NoiseTexturePlugin {
    /// Initial value for [`NoiseTextureConfig::max_tasks_per_frame`].
    pub max_tasks_per_frame: usize,
}

impl Default for NoiseTexturePlugin {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: NoiseTextureConfig::default().max_tasks_per_frame,
        }
    }
}

impl Plugin for NoiseTexturePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(NoiseTextureConfig {
            max_tasks_per_frame: self.max_tasks_per_frame,
        })
        .configure_sets(
            Update,
            (
                NoiseTextureSet::Spawn,
                NoiseTextureSet::Generate,
                NoiseTextureSet::Upload,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                spawn_bake_tasks.in_set(NoiseTextureSet::Spawn),
                poll_bake_tasks.in_set(NoiseTextureSet::Generate),
                upload_texture.in_set(NoiseTextureSet::Upload),
            ),
        );

        #[cfg(feature = "auto_queue")]
        app.add_systems(Update, on_texture_add.before(NoiseTextureSet::Spawn));
    }
}

/// Inserts [`QueuedTexture`] on every newly added [`NoiseTexture`].
#[cfg(feature = "auto_queue")]
fn on_texture_add(
    mut commands: Commands,
    query: Query<Entity, (Added<NoiseTexture>, Without<QueuedTexture>)>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert(QueuedTexture);
    }
}

/// Spawns bake tasks for [`QueuedTexture`]s, up to [`NoiseTextureConfig::max_tasks_per_frame`] per frame.
fn spawn_bake_tasks(
    mut commands: Commands,
    config: Res<NoiseTextureConfig>,
    query: Query<
        (Entity, &NoiseTexture),
        (
            With<QueuedTexture>,
            Without<BakeTask>,
            Without<BakedTexture>,
            Without<NoiseImage>,
        ),
    >,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for (entity, texture) in query.iter().take(config.max_tasks_per_frame) {
        let field = Arc::clone(&texture.field);
        let settings = texture.settings.clone();

        let task = task_pool.spawn(async move { bake_texture(&field, &settings) });

        commands.entity(entity).insert(BakeTask(task));
    }
}

/// Polls in-flight [`BakeTask`]s and inserts [`BakedTexture`] on completion.
///
/// A failed bake is logged and the entity is dequeued; it will not be retried.
fn poll_bake_tasks(mut commands: Commands, mut query: Query<(Entity, &mut BakeTask)>) {
    for (entity, mut task) in query.iter_mut() {
        let Some(result) = block_on(future::poll_once(&mut task.0)) else {
            continue;
        };

        let mut entity_commands = commands.entity(entity);
        entity_commands.remove::<BakeTask>();
        match result {
            Ok(baked) => {
                entity_commands.insert(baked);
            }
            Err(err) => {
                warn!("noise texture bake failed for {entity}: {err}");
                entity_commands.remove::<QueuedTexture>();
            }
        }
    }
}

/// Uploads [`BakedTexture`] pixels into an [`Image`] asset and inserts [`NoiseImage`].
///
/// The pixel buffer is moved into the image, not copied.
fn upload_texture(
    mut commands: Commands,
    mut query: Query<(Entity, &mut BakedTexture), With<QueuedTexture>>,
    mut images: ResMut<Assets<Image>>,
) {
    for (entity, mut baked) in query.iter_mut() {
        let size = Extent3d {
            width: baked.raster.width() as u32,
            height: baked.raster.height() as u32,
            depth_or_array_layers: 1,
        };
        let image = Image::new(
            size,
            TextureDimension::D2,
            std::mem::take(&mut baked.pixels),
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        );
        debug!("uploading {}x{} noise texture for {entity}", size.width, size.height);

        commands
            .entity(entity)
            .insert(NoiseImage(images.add(image)))
            .remove::<(QueuedTexture, BakedTexture)>();
    }
}

/// Samples the field and colors the raster with the settings' gradient.
fn bake_texture(field: &NoiseField, settings: &TextureSettings) -> Result<BakedTexture> {
    let raster = NoiseRaster::bake(field, settings)?;
    let pixels = raster.to_rgba8(settings.planet);
    Ok(BakedTexture { raster, pixels })
}
