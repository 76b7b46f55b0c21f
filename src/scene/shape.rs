use crate::geometry::{FloatType, Ray, WorldBox};

use super::{
    Bounded, HitRecord, Hitable, Mesh,
    primitives::{Sphere, TrianglePrimitive},
};

/// Closed set of bounded objects a scene is built from.
#[derive(Clone, Debug)]
pub enum Shape<P> {
    Sphere(Sphere<P>),
    Triangle(TrianglePrimitive<P>),
    Mesh(Mesh<P>),
}

impl<P> From<Sphere<P>> for Shape<P> {
    fn from(value: Sphere<P>) -> Self {
        Shape::Sphere(value)
    }
}

impl<P> From<TrianglePrimitive<P>> for Shape<P> {
    fn from(value: TrianglePrimitive<P>) -> Self {
        Shape::Triangle(value)
    }
}

impl<P> From<Mesh<P>> for Shape<P> {
    fn from(value: Mesh<P>) -> Self {
        Shape::Mesh(value)
    }
}

impl<P: Clone> Hitable<P> for Shape<P> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        match self {
            Shape::Sphere(s) => s.hit(ray, t_min, t_max),
            Shape::Triangle(t) => t.hit(ray, t_min, t_max),
            Shape::Mesh(m) => m.hit(ray, t_min, t_max),
        }
    }
}

impl<P> Bounded for Shape<P> {
    fn bound(&self) -> &WorldBox {
        match self {
            Shape::Sphere(s) => s.bound(),
            Shape::Triangle(t) => t.bound(),
            Shape::Mesh(m) => m.bound(),
        }
    }
}
