//! Mesh generation for island maps
//!
//! Generates engine-agnostic mesh data from the map's centers.

mod colors;

pub use colors::{from_hex, BasicColorMapper, BiomeColor, ColorMapper};

use glam::DVec3;

use crate::map::Map;
use crate::terrain::Biome;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// Map x/y become mesh x/y; elevation becomes z.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Flat per-triangle normals, shared by the fan of each center
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate mesh from a map with color mapping
///
/// Each center is triangulated as a fan from its site to its corners sorted
/// by angle. All vertices of a center share the color of its biome.
///
/// # Arguments
/// * `map` - The generated map
/// * `color_mapper` - Maps biomes to colors
/// * `height_scale` - Multiplier turning elevation in [0, 1] into z
pub fn generate_mesh<C>(map: &Map, color_mapper: &C, height_scale: f64) -> MeshData
where
    C: ColorMapper<Biome>,
{
    let mut mesh = MeshData::default();

    for center in &map.centers {
        let Ok(corners) = map.sorted_corners(center.id) else {
            continue;
        };
        // Skip degenerate cells
        if corners.len() < 3 {
            continue;
        }

        let color = color_mapper.map_color(&center.biome.unwrap_or(Biome::Ocean));
        let hub = center.pos.extend(center.elevation * height_scale);
        let rim: Vec<DVec3> = corners
            .iter()
            .map(|&q| {
                let corner = &map.corners[q];
                corner.pos.extend(corner.elevation * height_scale)
            })
            .collect();

        triangulate_cell(hub, &rim, color, &mut mesh);
    }

    mesh
}

/// Triangulate a single cell as a triangle fan
fn triangulate_cell(center: DVec3, vertices: &[DVec3], color: BiomeColor, mesh: &mut MeshData) {
    let base_idx = mesh.positions.len() as u32;
    let normal = fan_normal(center, vertices);

    // Add center vertex
    mesh.positions.push(to_f32(center));
    mesh.normals.push(normal);
    mesh.colors.push(color);

    // Add boundary vertices
    for &vertex in vertices {
        mesh.positions.push(to_f32(vertex));
        mesh.normals.push(normal);
        mesh.colors.push(color);
    }

    // Create triangle fan indices
    let num_vertices = vertices.len();
    for i in 0..num_vertices {
        let next_i = (i + 1) % num_vertices;
        mesh.indices.push(base_idx); // Center
        mesh.indices.push(base_idx + 1 + i as u32); // Current vertex
        mesh.indices.push(base_idx + 1 + next_i as u32); // Next vertex
    }
}

/// Average of the fan's triangle normals, pointing up (+z)
fn fan_normal(center: DVec3, vertices: &[DVec3]) -> [f32; 3] {
    let sum: DVec3 = (0..vertices.len())
        .map(|i| {
            let a = vertices[i] - center;
            let b = vertices[(i + 1) % vertices.len()] - center;
            a.cross(b)
        })
        .sum();
    let normal = sum.try_normalize().unwrap_or(DVec3::Z);
    let normal = if normal.z < 0.0 { -normal } else { normal };
    to_f32(normal)
}

#[inline]
fn to_f32(v: DVec3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}
