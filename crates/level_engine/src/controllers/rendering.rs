//! Controllers in the `controllers::rendering` namespace
//!
//! Cameras, mesh and texture bindings, and shader selection. These hold the
//! configuration a renderer needs; they do not talk to a GPU themselves.

use super::{AttributeBuilder, Controller, Describe};
use crate::assets::AssetHandle;
use crate::coercible_enum;
use crate::foundation::math::Mat4;
use crate::level::ObjectTransform;

/// Orthographic camera
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCameraController {
    /// Viewport slot
    pub id: u32,
    /// Far clip distance
    pub far_clip: f32,
    /// Near clip distance
    pub near_clip: f32,
    /// Vertical extent of the view volume in world units
    pub size: f32,
}

impl Default for OrthographicCameraController {
    fn default() -> Self {
        Self {
            id: 0,
            far_clip: 100.0,
            near_clip: 0.01,
            size: 4.0,
        }
    }
}

impl OrthographicCameraController {
    /// Projection matrix for a viewport of the given aspect ratio
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let half_height = self.size * 0.5;
        let half_width = half_height * aspect;
        Mat4::new_orthographic(
            -half_width,
            half_width,
            -half_height,
            half_height,
            self.near_clip,
            self.far_clip,
        )
    }
}

impl Controller for OrthographicCameraController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl Describe for OrthographicCameraController {
    const TYPE_NAME: &'static str = "controllers::rendering::OrthographicCameraController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .scalar("Id", |c, v| c.id = v)
            .scalar("FarClip", |c, v| c.far_clip = v)
            .scalar("NearClip", |c, v| c.near_clip = v)
            .scalar("Size", |c, v| c.size = v);
    }
}

/// Perspective camera, also reachable as `PerspCamera`
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCameraController {
    /// Viewport slot
    pub id: u32,
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    /// Far clip distance
    pub far_clip: f32,
    /// Near clip distance
    pub near_clip: f32,
}

impl Default for PerspectiveCameraController {
    fn default() -> Self {
        Self {
            id: 0,
            vertical_fov: 60.0,
            far_clip: 100.0,
            near_clip: 0.01,
        }
    }
}

impl PerspectiveCameraController {
    /// Projection matrix for a viewport of the given aspect ratio
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::new_perspective(aspect, self.vertical_fov.to_radians(), self.near_clip, self.far_clip)
    }
}

impl Controller for PerspectiveCameraController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl Describe for PerspectiveCameraController {
    const TYPE_NAME: &'static str = "controllers::rendering::PerspectiveCameraController";
    const SHORT_NAME: Option<&'static str> = Some("PerspCamera");

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .scalar("Id", |c, v| c.id = v)
            .scalar("VerticalFOV", |c, v| c.vertical_fov = v)
            .scalar("FarClip", |c, v| c.far_clip = v)
            .scalar("NearClip", |c, v| c.near_clip = v);
    }
}

/// Mesh asset binding, produced by the `Mesh` directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshLoaderController {
    /// Mesh asset name
    pub asset: String,
    /// Whether the source mesh is authored Z-up
    pub z_up: bool,
}

impl MeshLoaderController {
    /// Bind a mesh asset
    pub fn new(asset: impl Into<String>, z_up: bool) -> Self {
        Self {
            asset: asset.into(),
            z_up,
        }
    }
}

impl Controller for MeshLoaderController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_init(&mut self, _parent: &ObjectTransform) {
        log::debug!("Mesh {} bound (z_up: {})", self.asset, self.z_up);
    }
}

impl Describe for MeshLoaderController {
    const TYPE_NAME: &'static str = "controllers::rendering::MeshLoaderController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .scalar("Asset", |c, v| c.asset = v)
            .scalar("ZUp", |c, v| c.z_up = v);
    }
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest texel
    Nearest,
    /// Bilinear
    #[default]
    Linear,
}

coercible_enum!(TextureFilter { Nearest, Linear });

/// Texture addressing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureWrap {
    /// Tile
    #[default]
    Repeat,
    /// Clamp to the border texel
    ClampToEdge,
    /// Tile, mirroring every other repeat
    MirroredRepeat,
}

coercible_enum!(TextureWrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat
});

/// Texture binding, produced by the `Texture` directive
///
/// The texture itself can only be bound in code or through the directive;
/// its `Texture` attribute has no textual form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureController {
    /// Bound texture asset
    pub texture: Option<AssetHandle>,
    /// Sampling filter
    pub filter: TextureFilter,
    /// Addressing mode
    pub wrap: TextureWrap,
}

impl TextureController {
    /// Bind a texture asset
    pub fn with_texture(texture: AssetHandle) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }
}

impl Controller for TextureController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_init(&mut self, _parent: &ObjectTransform) {
        if self.texture.is_none() {
            log::warn!("TextureController initialised without a texture");
        }
    }
}

impl Describe for TextureController {
    const TYPE_NAME: &'static str = "controllers::rendering::TextureController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .opaque("Texture", "AssetHandle")
            .scalar("Filter", |c, v| c.filter = v)
            .scalar("Wrap", |c, v| c.wrap = v);
    }
}

/// Shader selection, either a named asset or a builtin program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderController {
    /// Shader asset name
    pub asset: String,
    /// Builtin program name
    pub builtin: String,
}

impl ShaderController {
    /// Name of the program to use; a builtin wins over an asset
    pub fn program(&self) -> Option<&str> {
        [self.builtin.as_str(), self.asset.as_str()]
            .into_iter()
            .find(|name| !name.is_empty())
    }
}

impl Controller for ShaderController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_init(&mut self, _parent: &ObjectTransform) {
        if self.program().is_none() {
            log::warn!("ShaderController has neither Asset nor Builtin set");
        }
    }
}

impl Describe for ShaderController {
    const TYPE_NAME: &'static str = "controllers::rendering::ShaderController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .scalar("Asset", |c, v| c.asset = v)
            .scalar("Builtin", |c, v| c.builtin = v);
    }
}
