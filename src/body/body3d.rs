use nalgebra::{Isometry3, Matrix3xX};

use crate::geometry::SuperQuadric;

/// 3D analogue of [`crate::body::BodyTree2D`].
#[derive(Clone, Debug)]
pub struct BodyTree3D {
    pub base: SuperQuadric,
    pub links: Vec<SuperQuadric>,
    pub rel_transforms: Vec<Isometry3<f64>>,
}

impl BodyTree3D {
    pub fn new(base: SuperQuadric) -> Self {
        BodyTree3D { base, links: Vec::new(), rel_transforms: Vec::new() }
    }

    pub fn add_link(&mut self, link: SuperQuadric, rel_transform: Isometry3<f64>) {
        self.links.push(link);
        self.rel_transforms.push(rel_transform);
    }

    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    pub fn set_transform(&mut self, t: &Isometry3<f64>) {
        self.base.set_pose(t.translation.vector, t.rotation);
        for (link, g) in self.links.iter_mut().zip(self.rel_transforms.iter()) {
            let world = t * g;
            link.set_pose(world.translation.vector, world.rotation);
        }
    }

    pub fn bodies(&self) -> impl Iterator<Item = &SuperQuadric> {
        std::iter::once(&self.base).chain(self.links.iter())
    }

    pub fn mink_sum(&self, target: &SuperQuadric, k: i32) -> Vec<Matrix3xX<f64>> {
        self.bodies()
            .map(|body| {
                let axes = target.mink_sum_axes(body.semi_axes, k);
                SuperQuadric::new(axes, target.eps, target.pos, target.quat, target.num)
                    .expect("Minkowski adjustment preserves finite positive axes")
                    .surface_samples()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    fn quadric(a: [f64; 3]) -> SuperQuadric {
        SuperQuadric::new(a, [1.0, 1.0], Vector3::zeros(), UnitQuaternion::identity(), 12).unwrap()
    }

    #[test]
    fn set_transform_propagates_to_links() {
        let mut tree = BodyTree3D::new(quadric([1.0, 1.0, 1.0]));
        tree.add_link(quadric([0.2, 0.2, 0.2]), Isometry3::translation(1.0, 0.0, 0.0));

        let t = Isometry3::translation(2.0, 3.0, 0.0);
        tree.set_transform(&t);

        assert!((tree.base.pos - Vector3::new(2.0, 3.0, 0.0)).norm() < 1e-9);
        assert!((tree.links[0].pos - Vector3::new(3.0, 3.0, 0.0)).norm() < 1e-9);
    }
}
