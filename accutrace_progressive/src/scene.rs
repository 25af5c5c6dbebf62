//! GPU record layout for scene objects.
//!
//! Schema version 2. Every vector occupies a full 16-byte lane so the host
//! structs can be copied byte for byte into WGSL storage arrays.
//!
//! Changes from version 1:
//! - spheres gained the `transmission_ior_metalness_alpha` lane; version 1
//!   records end after `emission` and are read as opaque, non-metallic
//!   surfaces with an index of refraction of 1.
//! - triangles are no longer traced on their own; they are only reached
//!   through an instance record that names their range. A version 1 scene
//!   converts by wrapping all of its triangles in one identity instance.

use accutrace_gpu::{
    lanes::{mat4_columns, vec3_lane},
    AllocatedBuffer, GpuContext,
};
use accutrace_scene::{
    instance::Instance, materials::Material, mesh::Triangle, primitives::Sphere, Scene,
    SceneCounts,
};
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialRecord {
    pub colour_roughness: [f32; 4],
    pub emission: [f32; 4],
    pub transmission_ior_metalness_alpha: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SphereRecord {
    pub centre_radius: [f32; 4],
    pub material: MaterialRecord,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TriangleRecord {
    pub positions: [[f32; 4]; 3],
    pub normals: [[f32; 4]; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceRecord {
    pub triangle_index: u32,
    pub triangle_count: u32,
    pub padding: [u32; 2],
    pub bound_min: [f32; 4],
    pub bound_max: [f32; 4],
    pub material: MaterialRecord,
    pub translation: [f32; 4],
    pub rotation: [[f32; 4]; 4],
    pub inverse_rotation: [[f32; 4]; 4],
}

impl From<&Material> for MaterialRecord {
    fn from(material: &Material) -> Self {
        Self {
            colour_roughness: vec3_lane(&material.colour, material.roughness),
            emission: vec3_lane(&material.emission_colour, material.emission_strength),
            transmission_ior_metalness_alpha: [
                material.transmission,
                material.refractive_index,
                material.metalness,
                material.alpha,
            ],
        }
    }
}

impl From<&Sphere> for SphereRecord {
    fn from(sphere: &Sphere) -> Self {
        Self {
            centre_radius: vec3_lane(&sphere.position, sphere.radius),
            material: MaterialRecord::from(&sphere.material),
        }
    }
}

impl From<&Triangle> for TriangleRecord {
    fn from(triangle: &Triangle) -> Self {
        Self {
            positions: triangle.positions.map(|p| vec3_lane(&p, 0.0)),
            normals: triangle.normals.map(|n| vec3_lane(&n, 0.0)),
        }
    }
}

impl From<&Instance> for InstanceRecord {
    fn from(instance: &Instance) -> Self {
        let range = instance.range();
        let bounds = instance.bounds();
        let transform = instance.transform();
        Self {
            triangle_index: range.start,
            triangle_count: range.count,
            padding: [0; 2],
            bound_min: vec3_lane(&bounds.min, 0.0),
            bound_max: vec3_lane(&bounds.max, 0.0),
            material: MaterialRecord::from(instance.material()),
            translation: vec3_lane(&transform.translation, 0.0),
            rotation: mat4_columns(&transform.rotation_matrix()),
            inverse_rotation: mat4_columns(&transform.inverse_rotation_matrix()),
        }
    }
}

/// The three serialised blocks of a scene plus the real object counts.
/// Empty blocks hold one zeroed record so no binding is ever zero-sized.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneRecords {
    pub spheres: Vec<SphereRecord>,
    pub triangles: Vec<TriangleRecord>,
    pub instances: Vec<InstanceRecord>,
    pub counts: SceneCounts,
}

impl SceneRecords {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            spheres: get_records(scene.spheres()),
            triangles: get_records(scene.triangles()),
            instances: get_records(scene.instances()),
            counts: scene.counts(),
        }
    }
}

fn get_records<'a, S: 'a, R>(items: &'a [S]) -> Vec<R>
where
    R: From<&'a S> + Zeroable,
{
    if items.is_empty() {
        vec![R::zeroed()]
    } else {
        items.iter().map(R::from).collect()
    }
}

#[derive(Debug)]
pub struct SceneBuffers {
    pub spheres_buffer: AllocatedBuffer<SphereRecord>,
    pub triangles_buffer: AllocatedBuffer<TriangleRecord>,
    pub instances_buffer: AllocatedBuffer<InstanceRecord>,
    pub counts: SceneCounts,
}

impl SceneBuffers {
    pub fn create_buffers(ctx: &GpuContext, records: &SceneRecords) -> Self {
        let usage = wgpu::BufferUsages::STORAGE;
        Self {
            spheres_buffer: AllocatedBuffer::with_data(ctx, "Spheres", usage, &records.spheres),
            triangles_buffer: AllocatedBuffer::with_data(ctx, "Triangles", usage, &records.triangles),
            instances_buffer: AllocatedBuffer::with_data(ctx, "Instances", usage, &records.instances),
            counts: records.counts,
        }
    }

    pub fn bind_group(&self, ctx: &GpuContext, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene buffers"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.spheres_buffer.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.triangles_buffer.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.instances_buffer.buffer.as_entire_binding(),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accutrace_scene::{transform::Transform, SceneBuilder};
    use nalgebra_glm as glm;
    use std::mem::{offset_of, size_of};

    #[test]
    fn record_sizes_match_wgsl_structs() {
        assert_eq!(size_of::<MaterialRecord>(), 48);
        assert_eq!(size_of::<SphereRecord>(), 64);
        assert_eq!(size_of::<TriangleRecord>(), 96);
        assert_eq!(size_of::<InstanceRecord>(), 240);
        assert_eq!(offset_of!(InstanceRecord, bound_min), 16);
        assert_eq!(offset_of!(InstanceRecord, material), 48);
        assert_eq!(offset_of!(InstanceRecord, translation), 96);
        assert_eq!(offset_of!(InstanceRecord, rotation), 112);
        assert_eq!(offset_of!(InstanceRecord, inverse_rotation), 176);
    }

    #[test]
    fn empty_scene_is_padded_but_counts_are_zero() {
        let records = SceneRecords::from_scene(&SceneBuilder::new().build());
        assert_eq!(records.spheres, vec![SphereRecord::zeroed()]);
        assert_eq!(records.triangles.len(), 1);
        assert_eq!(records.instances.len(), 1);
        assert_eq!(records.counts, SceneCounts::default());
    }

    #[test]
    fn instance_record_carries_range_bounds_and_rotation() {
        let mut builder = SceneBuilder::new();
        builder.push_triangles(vec![Triangle::flat([
            glm::vec3(9.0, 9.0, 9.0),
            glm::vec3(10.0, 9.0, 9.0),
            glm::vec3(9.0, 10.0, 9.0),
        ])])
        .unwrap();
        let range = builder.push_triangles(vec![Triangle::flat([
            glm::vec3(0.0, 0.0, 0.0),
            glm::vec3(2.0, 0.0, 0.0),
            glm::vec3(0.0, 1.0, -1.0),
        ])])
        .unwrap();
        let transform = Transform::from_translation(glm::vec3(1.0, 2.0, 3.0)).with_euler(0.0, 90.0, 0.0);
        builder
            .add_instance("tri", range, Material::diffuse(glm::vec3(0.5, 0.25, 1.0)), transform)
            .unwrap();
        let records = SceneRecords::from_scene(&builder.build());

        let record = records.instances[0];
        assert_eq!(record.triangle_index, 1);
        assert_eq!(record.triangle_count, 1);
        assert_eq!(record.bound_min, [0.0, 0.0, -1.0, 0.0]);
        assert_eq!(record.bound_max, [2.0, 1.0, 0.0, 0.0]);
        assert_eq!(record.translation, [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(record.material.colour_roughness, [0.5, 0.25, 1.0, 1.0]);
        assert_eq!(record.material.transmission_ior_metalness_alpha, [0.0, 1.0, 0.0, 1.0]);

        let rotation = glm::make_mat4(&record.rotation.concat());
        let inverse = glm::make_mat4(&record.inverse_rotation.concat());
        assert!((inverse * rotation - glm::Mat4::identity()).abs().max() < 1e-6);
        assert_eq!(records.counts.triangles, 2);
    }

    #[test]
    fn sphere_record_packs_radius_and_emission() {
        let sphere = Sphere::new(
            glm::vec3(-100.0, 50.0, 100.0),
            100.0,
            Material::emissive(glm::vec3(1.0, 1.0, 1.0), 3.5),
        );
        let record = SphereRecord::from(&sphere);
        assert_eq!(record.centre_radius, [-100.0, 50.0, 100.0, 100.0]);
        assert_eq!(record.material.emission, [1.0, 1.0, 1.0, 3.5]);
    }
}
