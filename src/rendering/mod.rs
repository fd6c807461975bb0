use crate::game::battle::TextureHandle;
use crate::game::math::Vector2F;

pub mod renderer;
pub mod texture;

/// What the renderer needs to know about one entity. The game side decides
/// which texture to show, the destroyed visual included.
#[derive(Debug, Copy, Clone)]
pub struct SpriteView {
    pub position: Vector2F,
    pub size: Vector2F,
    pub angle: f32,
    pub texture: Option<TextureHandle>,
}

#[derive(Default)]
pub struct Scene {
    pub sprites: Vec<SpriteView>,
}
