#[cfg(feature = "glam")]
mod glam;
#[cfg(feature = "ultraviolet")]
mod ultraviolet;
