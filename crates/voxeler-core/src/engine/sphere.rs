use super::config::SphereGeometry;
use std::collections::HashMap;

/// Generates the relative offsets of a sphere of `radius` voxels.
///
/// Offsets cover `[-radius, radius]` per axis and satisfy the geometry
/// predicate. Radius 0 yields the single center offset for every geometry.
pub fn generate_sphere(geometry: SphereGeometry, radius: i64) -> Vec<[i64; 3]> {
    let radius = radius.max(0);
    let mut offsets = Vec::new();
    for x in -radius..=radius {
        for y in -radius..=radius {
            for z in -radius..=radius {
                let keep = match geometry {
                    SphereGeometry::Taxicab => x.abs() + y.abs() + z.abs() <= radius,
                    SphereGeometry::Uniform => true,
                    SphereGeometry::Sphere => x * x + y * y + z * z <= radius * radius,
                };
                if keep {
                    offsets.push([x, y, z]);
                }
            }
        }
    }
    offsets
}

/// Memoizes sphere offset sets per geometry and radius.
///
/// Every atom of an element shares one radius, so repeated stamping over a
/// structure reuses one offset set per element instead of regenerating it.
#[derive(Debug, Default)]
pub struct SphereCache {
    spheres: HashMap<(SphereGeometry, i64), Vec<[i64; 3]>>,
}

impl SphereCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, geometry: SphereGeometry, radius: i64) -> &[[i64; 3]] {
        self.spheres
            .entry((geometry, radius))
            .or_insert_with(|| generate_sphere(geometry, radius))
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}
