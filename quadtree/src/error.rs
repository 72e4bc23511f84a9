use common::shapes::Rectangle;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadtreeError {
    #[error("entity bounds {bounds:?} are not contained by the root region {region:?}")]
    OutOfBounds { bounds: Rectangle, region: Rectangle },
    #[error("entity is not indexed")]
    NotFound,
    #[error(
        "rectangle must be finite with non-negative width/height (width: {width}, height: {height})"
    )]
    InvalidRectangleDims { width: f32, height: f32 },
    #[error("world width/height must be finite and positive (width: {width}, height: {height})")]
    InvalidWorldDims { width: f32, height: f32 },
    #[error("invalid quadtree config: {reason}")]
    InvalidConfig { reason: &'static str },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

pub(crate) fn validate_bounds(bounds: &Rectangle) -> QuadtreeResult<()> {
    if bounds.is_valid() {
        Ok(())
    } else {
        Err(QuadtreeError::InvalidRectangleDims {
            width: bounds.width,
            height: bounds.height,
        })
    }
}

pub(crate) fn validate_world_dims(width: f32, height: f32) -> QuadtreeResult<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(QuadtreeError::InvalidWorldDims { width, height })
    }
}
