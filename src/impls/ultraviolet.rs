use crate::point::Position;
use ultraviolet::{DVec2, DVec3, DVec4, Vec2, Vec3, Vec4};

macro_rules! impl_position {
    ($vector: ty, { $($f: ident),* }) => {
        impl Position for $vector {
            #[inline]
            fn coordinates(&self) -> Vec<f64> {
                vec![$(f64::from(self.$f)),*]
            }
        }
    };
}

impl_position!(Vec2, { x, y });
impl_position!(Vec3, { x, y, z });
impl_position!(Vec4, { x, y, z, w });
impl_position!(DVec2, { x, y });
impl_position!(DVec3, { x, y, z });
impl_position!(DVec4, { x, y, z, w });
