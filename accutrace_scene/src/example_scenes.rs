use crate::{
    camera::Camera,
    materials::Material,
    mesh::Triangle,
    primitives::Sphere,
    transform::Transform,
    Scene, SceneBuilder, SceneError,
};
use nalgebra_glm as glm;
use std::path::Path;

pub const SCENE_NAMES: [&str; 3] = ["model", "spheres", "box"];

pub fn by_name(name: &str, assets_dir: &Path) -> Result<(Camera, Scene), SceneError> {
    match name {
        "model" => model(assets_dir),
        "spheres" => spheres(assets_dir),
        "box" => Ok(light_box()),
        _ => Err(SceneError::UnknownScene(name.to_owned())),
    }
}

fn add_ground_and_sun(builder: &mut SceneBuilder) {
    builder
        .add_sphere(Sphere::new(
            // Ground
            glm::vec3(0.0, -101.0, 0.0),
            100.0,
            Material::diffuse(glm::vec3(0.8, 0.0, 0.8)),
        ))
        .add_sphere(Sphere::new(
            // Sun
            glm::vec3(-100.0, 50.0, 100.0),
            100.0,
            Material::emissive(glm::vec3(1.0, 1.0, 1.0), 3.5),
        ));
}

/// The mesh from `model.obj` standing on a large ground sphere, lit by a distant sun sphere.
pub fn model(assets_dir: &Path) -> Result<(Camera, Scene), SceneError> {
    let mut builder = SceneBuilder::new();
    add_ground_and_sun(&mut builder);
    builder.add_model_from_file(
        "model",
        assets_dir.join("model.obj"),
        Material::diffuse(glm::vec3(0.9, 0.9, 0.9)).with_roughness(0.6),
        Transform::from_translation(glm::vec3(0.0, 0.0, 3.0)).with_euler(0.0, 30.0, 0.0),
    )?;
    let camera = Camera::new(glm::vec3(0.0, 0.5, -2.0));
    Ok((camera, builder.build()))
}

pub fn spheres(assets_dir: &Path) -> Result<(Camera, Scene), SceneError> {
    let mut builder = SceneBuilder::new();
    add_ground_and_sun(&mut builder);
    builder
        .add_sphere(Sphere::new(
            // Red
            glm::vec3(0.0, 1.0, 1.0),
            1.0,
            Material::diffuse(glm::vec3(0.8, 0.0, 0.0)),
        ))
        .add_sphere(Sphere::new(
            // Yellow
            glm::vec3(-2.0, 0.75, 0.5),
            0.75,
            Material::diffuse(glm::vec3(0.8, 0.8, 0.0)),
        ))
        .add_sphere(Sphere::new(
            // Green mirror
            glm::vec3(-3.5, 0.5, 0.0),
            0.5,
            Material::metal(glm::vec3(0.0, 0.8, 0.0), 0.1),
        ))
        .add_sphere(Sphere::new(
            // Glass
            glm::vec3(2.5, 1.25, 0.0),
            1.25,
            Material::glass(glm::vec3(0.8, 0.8, 0.8), 1.5),
        ));
    builder.add_model_from_file(
        "model",
        assets_dir.join("model.obj"),
        Material::metal(glm::vec3(0.9, 0.6, 0.3), 0.3),
        Transform::from_translation(glm::vec3(0.0, 0.5, 4.5)).with_euler(0.0, 45.0, 0.0),
    )?;
    let camera = Camera::with_angles(glm::vec3(0.0, 1.5, -6.0), 5.0, 0.0);
    Ok((camera, builder.build()))
}

fn quad(a: glm::Vec3, b: glm::Vec3, c: glm::Vec3, d: glm::Vec3) -> [Triangle; 2] {
    [Triangle::flat([a, b, c]), Triangle::flat([a, c, d])]
}

/// A closed room built from hardcoded triangles, lit by a panel in the ceiling.
pub fn light_box() -> (Camera, Scene) {
    let mut builder = SceneBuilder::new();
    let v = glm::vec3;

    let walls = [
        (
            // Floor
            quad(v(-1.0, 0.0, -1.0), v(-1.0, 0.0, 1.0), v(1.0, 0.0, 1.0), v(1.0, 0.0, -1.0)),
            Material::diffuse(v(0.75, 0.75, 0.75)),
        ),
        (
            // Ceiling
            quad(v(-1.0, 2.0, -1.0), v(1.0, 2.0, -1.0), v(1.0, 2.0, 1.0), v(-1.0, 2.0, 1.0)),
            Material::diffuse(v(0.75, 0.75, 0.75)),
        ),
        (
            // Back
            quad(v(-1.0, 0.0, 1.0), v(-1.0, 2.0, 1.0), v(1.0, 2.0, 1.0), v(1.0, 0.0, 1.0)),
            Material::diffuse(v(0.75, 0.75, 0.75)),
        ),
        (
            // Left
            quad(v(-1.0, 0.0, -1.0), v(-1.0, 2.0, -1.0), v(-1.0, 2.0, 1.0), v(-1.0, 0.0, 1.0)),
            Material::diffuse(v(0.75, 0.1, 0.1)),
        ),
        (
            // Right
            quad(v(1.0, 0.0, -1.0), v(1.0, 0.0, 1.0), v(1.0, 2.0, 1.0), v(1.0, 2.0, -1.0)),
            Material::diffuse(v(0.1, 0.75, 0.1)),
        ),
        (
            // Light
            quad(v(-0.3, 1.99, -0.3), v(0.3, 1.99, -0.3), v(0.3, 1.99, 0.3), v(-0.3, 1.99, 0.3)),
            Material::emissive(v(1.0, 0.95, 0.85), 8.0),
        ),
    ];

    for (index, (triangles, material)) in walls.into_iter().enumerate() {
        let added = builder.push_triangles(triangles).and_then(|range| {
            builder.add_instance(format!("wall {index}"), range, material, Transform::default())
        });
        if let Err(e) = added {
            log::error!("{e}");
        }
    }

    builder
        .add_sphere(Sphere::new(
            v(-0.4, 0.35, 0.3),
            0.35,
            Material::metal(v(0.95, 0.95, 0.95), 0.05),
        ))
        .add_sphere(Sphere::new(
            v(0.45, 0.3, -0.2),
            0.3,
            Material::glass(v(1.0, 1.0, 1.0), 1.5),
        ));

    let camera = Camera::new(v(0.0, 1.0, -3.2));
    (camera, builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_box_has_one_instance_per_wall() {
        let (_, scene) = light_box();
        assert_eq!(scene.instances().len(), 6);
        assert_eq!(scene.triangles().len(), 12);
        assert_eq!(scene.spheres().len(), 2);
        for instance in scene.instances() {
            assert_eq!(instance.range().count, 2);
            assert!(!instance.bounds().is_empty());
        }
    }

    #[test]
    fn missing_assets_leave_spheres_only() {
        let (_, scene) = by_name("model", Path::new("/nonexistent/accutrace")).unwrap();
        assert_eq!(scene.spheres().len(), 2);
        assert!(scene.instances().is_empty());
    }

    #[test]
    fn unknown_scene_is_an_error() {
        let result = by_name("nope", Path::new("."));
        assert!(matches!(result, Err(SceneError::UnknownScene(_))));
    }
}
