use std::sync::Arc;

use bevy::prelude::*;
use bevy_infinite_grid::{InfiniteGridBundle, InfiniteGridPlugin, InfiniteGridSettings};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use bevy_value_noise::{
    NoiseConfig, NoiseField, NoiseTexturePlugin,
    gradient::PlanetType,
    plugin::{NoiseImage, NoiseTexture},
    projection::Projection,
    raster::TextureSettings,
};

const EXTENT: f32 = 5.0;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            NoiseTexturePlugin::default(),
            PanOrbitCameraPlugin,
            InfiniteGridPlugin,
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, apply_noise_images)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn(InfiniteGridBundle {
        settings: InfiniteGridSettings {
            fadeout_distance: 100.0,
            ..Default::default()
        },
        ..Default::default()
    });

    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera::default(),
        Transform::from_xyz(0.0, 12.0, 0.1).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let field = match NoiseField::from_config(&NoiseConfig::default().with_seed(42)) {
        Ok(field) => Arc::new(field),
        Err(err) => {
            bevy::log::error!("could not build noise field: {err}");
            return;
        }
    };

    // Bare field on the left, turbulent on the right
    for (x, turbulence) in [(-EXTENT - 0.5, None), (EXTENT + 0.5, Some(5))] {
        let settings = TextureSettings::new(512, 512)
            .with_projection(Projection::Plane {
                extent: EXTENT as f64,
            })
            .with_turbulence(turbulence)
            .with_planet(PlanetType::BlackAndWhite);

        commands.spawn((
            NoiseTexture::new(Arc::clone(&field), settings),
            Mesh3d(meshes.add(Plane3d::default().mesh().size(EXTENT * 2.0, EXTENT * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                unlit: true,
                ..Default::default()
            })),
            Transform::from_xyz(x, 0.01, 0.0),
        ));
    }
}

fn apply_noise_images(
    query: Query<(&NoiseImage, &MeshMaterial3d<StandardMaterial>), Added<NoiseImage>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (image, material) in query.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color_texture = Some(image.0.clone());
        }
    }
}
