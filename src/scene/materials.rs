//! Globe and atmosphere shading materials

use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::render_resource::{
    AsBindGroup, Face, RenderPipelineDescriptor, SpecializedMeshPipelineError,
};
use bevy::shader::ShaderRef;

/// Lambert-shaded planet surface lit by a single point light.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GlobeMaterial {
    #[uniform(0)]
    pub base_color: LinearRgba,
    /// xyz: light position in world space, w: ambient floor.
    #[uniform(1)]
    pub light: Vec4,
    #[texture(2)]
    #[sampler(3)]
    pub texture: Option<Handle<Image>>,
}

impl Material for GlobeMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/globe.wgsl".into()
    }
}

/// Fresnel rim glow drawn on the inside of a shell slightly larger than the globe.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct AtmosphereMaterial {
    #[uniform(0)]
    pub color: LinearRgba,
    /// x: falloff power, y: intensity.
    #[uniform(1)]
    pub params: Vec4,
}

impl Material for AtmosphereMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/atmosphere.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        descriptor.primitive.cull_mode = Some(Face::Front);
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

pub const ATMOSPHERE_SCALE: f32 = 1.12;

pub fn globe_material(
    color: Color,
    light_position: Vec3,
    texture: Option<Handle<Image>>,
) -> GlobeMaterial {
    GlobeMaterial {
        base_color: color.to_linear(),
        light: light_position.extend(0.06),
        texture,
    }
}

/// Atmosphere tint derived from the planet colour, lifted toward pale blue.
pub fn atmosphere_material(planet_color: Color) -> AtmosphereMaterial {
    let base = planet_color.to_linear();
    let sky = LinearRgba::rgb(0.3, 0.6, 1.0);
    AtmosphereMaterial {
        color: LinearRgba::rgb(
            (base.red + sky.red) * 0.5,
            (base.green + sky.green) * 0.5,
            (base.blue + sky.blue) * 0.5,
        ),
        params: Vec4::new(3.0, 1.4, 0.0, 0.0),
    }
}

/// Registers both materials with the renderer.
pub struct PlanetMaterialsPlugin;

impl Plugin for PlanetMaterialsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MaterialPlugin::<GlobeMaterial>::default(),
            MaterialPlugin::<AtmosphereMaterial>::default(),
        ));
    }
}
