// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::Point3;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// Triangle mesh of a single model surface, in world coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Build a mesh from flat buffers, validating their shape.
    pub fn from_buffers(positions: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::RaggedPositions(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(Error::RaggedIndices(indices.len()));
        }
        let vertex_count = positions.len() / 3;
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(Self { positions, indices })
    }

    /// Fan-triangulate a planar convex polygon.
    ///
    /// Model surfaces are planar polygons; sub-surfaces and most walls are
    /// convex, which is all the viewer needs for display and picking.
    pub fn from_polygon(points: &[Point3<f64>]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::DegeneratePolygon(points.len()));
        }
        let mut mesh = Self::with_capacity(points.len(), (points.len() - 2) * 3);
        for p in points {
            mesh.add_vertex(*p);
        }
        for i in 1..(points.len() as u32 - 1) {
            mesh.add_triangle(0, i, i + 1);
        }
        Ok(mesh)
    }

    /// Add a vertex
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex position widened to f64
    #[inline]
    pub fn vertex(&self, index: u32) -> Point3<f64> {
        let i = index as usize * 3;
        Point3::new(
            self.positions[i] as f64,
            self.positions[i + 1] as f64,
            self.positions[i + 2] as f64,
        )
    }

    /// Iterate over triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(move |tri| [self.vertex(tri[0]), self.vertex(tri[1]), self.vertex(tri[2])])
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Calculate centroid in f64 precision
    #[inline]
    pub fn centroid_f64(&self) -> Point3<f64> {
        if self.is_empty() {
            return Point3::origin();
        }

        let mut sum = Point3::new(0.0f64, 0.0f64, 0.0f64);
        let count = self.vertex_count();

        self.positions.chunks_exact(3).for_each(|chunk| {
            sum.x += chunk[0] as f64;
            sum.y += chunk[1] as f64;
            sum.z += chunk[2] as f64;
        });

        Point3::new(
            sum.x / count as f64,
            sum.y / count as f64,
            sum.z / count as f64,
        )
    }

    /// Outline edges: edges used by exactly one triangle.
    ///
    /// Vertices are welded by exact position first, so meshes that repeat
    /// vertices per triangle still yield only the polygon outline. Edges are
    /// returned in first-seen order.
    pub fn boundary_edges(&self) -> Vec<[Point3<f64>; 2]> {
        let mut welded: FxHashMap<[u32; 3], u32> = FxHashMap::default();
        let canonical: Vec<u32> = self
            .positions
            .chunks_exact(3)
            .enumerate()
            .map(|(i, c)| {
                let bits = [c[0].to_bits(), c[1].to_bits(), c[2].to_bits()];
                *welded.entry(bits).or_insert(i as u32)
            })
            .collect();

        let mut usage: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        let mut ordered: Vec<(u32, u32)> = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let (a, b) = (canonical[a as usize], canonical[b as usize]);
                if a == b {
                    continue;
                }
                let key = (a.min(b), a.max(b));
                let count = usage.entry(key).or_insert(0);
                if *count == 0 {
                    ordered.push(key);
                }
                *count += 1;
            }
        }

        ordered
            .into_iter()
            .filter(|key| usage.get(key) == Some(&1))
            .map(|(a, b)| [self.vertex(a), self.vertex(b)])
            .collect()
    }
}
