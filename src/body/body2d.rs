use nalgebra::{Isometry2, Matrix2xX};

use crate::geometry::SuperEllipse;

/// Invariant: when the base is placed by transform `T`, each link's
/// world pose is `T . g_i` ([`spec.md` §3]).
#[derive(Clone, Debug)]
pub struct BodyTree2D {
    pub base: SuperEllipse,
    pub links: Vec<SuperEllipse>,
    pub rel_transforms: Vec<Isometry2<f64>>,
}

impl BodyTree2D {
    pub fn new(base: SuperEllipse) -> Self {
        BodyTree2D { base, links: Vec::new(), rel_transforms: Vec::new() }
    }

    pub fn add_link(&mut self, link: SuperEllipse, rel_transform: Isometry2<f64>) {
        self.links.push(link);
        self.rel_transforms.push(rel_transform);
    }

    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    pub fn set_transform(&mut self, t: &Isometry2<f64>) {
        self.base.set_pose(t.translation.vector, t.rotation.angle());
        for (link, g) in self.links.iter_mut().zip(self.rel_transforms.iter()) {
            let world = t * g;
            link.set_pose(world.translation.vector, world.rotation.angle());
        }
    }

    pub fn bodies(&self) -> impl Iterator<Item = &SuperEllipse> {
        std::iter::once(&self.base).chain(self.links.iter())
    }

    /// Boundary of `target (+/-) body` for every body in the tree, base
    /// first then links in tree order, one point matrix per body.
    pub fn mink_sum(&self, target: &SuperEllipse, k: i32) -> Vec<Matrix2xX<f64>> {
        self.bodies()
            .map(|body| {
                let axes = target.mink_sum_axes(body.semi_axes, k);
                SuperEllipse::new(axes, target.eps, target.pos, target.theta, target.num)
                    .expect("Minkowski adjustment preserves finite positive axes")
                    .surface_samples()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn ellipse(a0: f64, a1: f64) -> SuperEllipse {
        SuperEllipse::new([a0, a1], 1.0, Vector2::zeros(), 0.0, 32).unwrap()
    }

    #[test]
    fn set_transform_propagates_to_links() {
        let mut tree = BodyTree2D::new(ellipse(1.0, 0.5));
        tree.add_link(ellipse(0.3, 0.3), Isometry2::translation(1.0, 0.0));

        let t = Isometry2::new(Vector2::new(2.0, 3.0), 0.0);
        tree.set_transform(&t);

        assert!((tree.base.pos - Vector2::new(2.0, 3.0)).norm() < 1e-9);
        assert!((tree.links[0].pos - Vector2::new(3.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn mink_sum_returns_one_matrix_per_body() {
        let mut tree = BodyTree2D::new(ellipse(1.0, 0.5));
        tree.add_link(ellipse(0.3, 0.3), Isometry2::identity());
        let arena = ellipse(10.0, 10.0);
        let bds = tree.mink_sum(&arena, -1);
        assert_eq!(bds.len(), 2);
        for m in &bds {
            assert_eq!(m.nrows(), 2);
        }
    }
}
