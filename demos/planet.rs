use std::sync::Arc;

use bevy::prelude::*;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use bevy_value_noise::{
    NoiseConfig, NoiseField, NoiseTexturePlugin,
    gradient::PlanetType,
    plugin::{NoiseImage, NoiseTexture},
    projection::Projection,
    raster::TextureSettings,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            NoiseTexturePlugin::default(),
            PanOrbitCameraPlugin,
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
    bevy::log::info!("Planet Example");

    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera {
            button_orbit: MouseButton::Left,
            button_pan: MouseButton::Middle,
            ..default()
        },
        Transform::from_xyz(0.0, 2.0, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::FULL_DAYLIGHT,
            ..Default::default()
        },
        Transform::default().with_rotation(Quat::from_rotation_x(-45.0_f32.to_radians())),
    ));

    let field = match NoiseField::from_config(&NoiseConfig::default().with_point_count(4000)) {
        Ok(field) => Arc::new(field),
        Err(err) => {
            bevy::log::error!("could not build noise field: {err}");
            return;
        }
    };

    let planets = [
        PlanetType::Star,
        PlanetType::IcePlanet,
        PlanetType::LavaPlanet,
    ];
    for (i, planet) in planets.into_iter().enumerate() {
        let settings = TextureSettings::new(512, 256)
            .with_projection(Projection::Sphere { radius: 5.0 })
            .with_planet(planet);

        commands.spawn((
            NoiseTexture::new(Arc::clone(&field), settings),
            Mesh3d(meshes.add(Sphere::new(1.0).mesh().uv(64, 32))),
            MeshMaterial3d(materials.add(StandardMaterial::default())),
            Transform::from_xyz((i as f32 - 1.0) * 2.5, 0.0, 0.0),
        ));
    }
}

/// Swaps each planet's material texture in once its noise image is ready.
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
