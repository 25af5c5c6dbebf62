use crate::bounds::BoundingBox;
use itertools::Itertools;
use nalgebra_glm as glm;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Cursor, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub positions: [glm::Vec3; 3],
    pub normals: [glm::Vec3; 3],
}

impl Triangle {
    /// A triangle whose three corners share its geometric normal.
    pub fn flat(positions: [glm::Vec3; 3]) -> Self {
        let normal = face_normal(&positions);
        Self {
            positions,
            normals: [normal; 3],
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        let [a, b, c] = self.positions;
        BoundingBox {
            min: glm::vec3(
                a[0].min(b[0]).min(c[0]),
                a[1].min(b[1]).min(c[1]),
                a[2].min(b[2]).min(c[2]),
            ),
            max: glm::vec3(
                a[0].max(b[0]).max(c[0]),
                a[1].max(b[1]).max(c[1]),
                a[2].max(b[2]).max(c[2]),
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh file {0} does not exist")]
    NotFound(PathBuf),
    #[error("cannot read mesh file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed mesh data: {0}")]
    Parse(tobj::LoadError),
    #[error("face references {kind} {index} but only {available} are defined")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        available: usize,
    },
}

impl MeshError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MeshError::NotFound(_))
    }
}

/// Loads every face of an OBJ file as triangles, in file order.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Vec<Triangle>, MeshError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => MeshError::NotFound(path.to_owned()),
        _ => MeshError::Io(e),
    })?;
    let triangles = parse_obj(&mut BufReader::new(file))?;
    log::debug!("Loaded {} triangles from {}", triangles.len(), path.display());
    Ok(triangles)
}

/// Like [`load_obj`], but a missing file is reported as a warning and yields
/// no triangles. Malformed files are still an error.
pub fn load_obj_or_empty<P: AsRef<Path>>(path: P) -> Result<Vec<Triangle>, MeshError> {
    match load_obj(&path) {
        Err(MeshError::NotFound(missing)) => {
            log::warn!("Mesh {} not found, continuing without it", missing.display());
            Ok(vec![])
        }
        result => result,
    }
}

/// Parses OBJ text. `v`, `vn` and `f` records are used; every other record
/// (texture coordinates, groups, materials, smoothing) is read past.
/// Polygons are fanned from their first vertex. A face that does not give a
/// normal for every corner gets the flat face normal on all of them.
pub fn parse_obj<R: BufRead>(reader: &mut R) -> Result<Vec<Triangle>, MeshError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut face_normals = faces_with_normals(&text).into_iter();

    let options = tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj_buf(&mut Cursor::new(text.as_bytes()), &options, |_| Err(tobj::LoadError::OpenFileFailed))
            .map_err(MeshError::Parse)?;

    let mut triangles = vec![];
    for model in &models {
        append_mesh_triangles(&model.mesh, &mut face_normals, &mut triangles)?;
    }
    Ok(triangles)
}

/// Splits a polygon into `(v0, v1, v2), (v0, v2, v3), ...`. Fewer than three
/// corners produce nothing.
pub fn fan_triangulate<T: Copy>(polygon: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    polygon
        .iter()
        .skip(1)
        .tuple_windows()
        .map(move |(&b, &c)| [polygon[0], b, c])
}

/// For every polygon record, in file order, whether all of its corners
/// reference a normal. The loader fills in an index for corners that give
/// none, so this can only be read from the text itself.
fn faces_with_normals(text: &str) -> Vec<bool> {
    text.lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            match words.next() {
                Some("f") | Some("l") => {
                    let corners = words.collect_vec();
                    (corners.len() >= 3).then(|| {
                        corners
                            .iter()
                            .all(|corner| corner.split('/').nth(2).map_or(false, |n| !n.is_empty()))
                    })
                }
                _ => None,
            }
        })
        .collect()
}

fn append_mesh_triangles(
    mesh: &tobj::Mesh,
    face_normals: &mut impl Iterator<Item = bool>,
    out: &mut Vec<Triangle>,
) -> Result<(), MeshError> {
    let positions = mesh
        .positions
        .iter()
        .tuples()
        .map(|(&x, &y, &z)| glm::vec3(x, y, z))
        .collect_vec();
    let normals = mesh
        .normals
        .iter()
        .tuples()
        .map(|(&x, &y, &z)| glm::vec3(x, y, z))
        .collect_vec();
    let mesh_has_normals = !normals.is_empty() && mesh.normal_indices.len() == mesh.indices.len();

    let arities = if mesh.face_arities.is_empty() {
        vec![3; mesh.indices.len() / 3]
    } else {
        mesh.face_arities.clone()
    };

    let mut start = 0;
    for arity in arities {
        let end = start + arity as usize;
        let corners = (start..end).collect_vec();
        start = end;
        if corners.len() < 3 {
            continue;
        }
        let face_has_normals = face_normals.next().unwrap_or(false);
        let has_normals = mesh_has_normals && face_has_normals;

        for [a, b, c] in fan_triangulate(&corners) {
            let positions = [
                lookup(&positions, &mesh.indices, a, "vertex")?,
                lookup(&positions, &mesh.indices, b, "vertex")?,
                lookup(&positions, &mesh.indices, c, "vertex")?,
            ];
            let normals = if has_normals {
                [
                    lookup(&normals, &mesh.normal_indices, a, "normal")?,
                    lookup(&normals, &mesh.normal_indices, b, "normal")?,
                    lookup(&normals, &mesh.normal_indices, c, "normal")?,
                ]
            } else {
                [face_normal(&positions); 3]
            };
            out.push(Triangle { positions, normals });
        }
    }
    Ok(())
}

fn lookup(
    values: &[glm::Vec3],
    indices: &[u32],
    corner: usize,
    kind: &'static str,
) -> Result<glm::Vec3, MeshError> {
    let index = indices.get(corner).copied().unwrap_or(u32::MAX) as usize;
    values
        .get(index)
        .copied()
        .ok_or(MeshError::IndexOutOfRange {
            kind,
            index,
            available: values.len(),
        })
}

fn face_normal([a, b, c]: &[glm::Vec3; 3]) -> glm::Vec3 {
    let n = glm::cross(&(b - a), &(c - a));
    if n.norm() > 0.0 {
        n.normalize()
    } else {
        n
    }
}
