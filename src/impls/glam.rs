use crate::point::Position;
use glam::{DVec2, DVec3, DVec4, Vec2, Vec3, Vec3A, Vec4};

macro_rules! impl_position {
    ($($vector: ty),*) => {$(
        impl Position for $vector {
            #[inline]
            fn coordinates(&self) -> Vec<f64> {
                self.to_array().coordinates()
            }
        }
    )*};
}

impl_position!(Vec2, Vec3, Vec3A, Vec4, DVec2, DVec3, DVec4);
