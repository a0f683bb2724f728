use crate::texture::TextureDesc;
use serde::{Deserialize, Serialize};
use vista_common::Color;

/// Shading model for a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Lit: ambient from scene lights, Lambert diffuse, Blinn specular.
    #[default]
    Phong,
    /// Unlit: color times texture.
    Basic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    pub texture: Option<TextureDesc>,
    pub double_sided: bool,
    pub specular: Color,
    pub shininess: f32,
    /// 1.0 is opaque.
    pub opacity: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: "default".into(),
            kind: MaterialKind::Phong,
            color: Color::WHITE,
            texture: None,
            double_sided: false,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            opacity: 1.0,
        }
    }
}

impl MaterialDesc {
    pub fn phong(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            ..Self::default()
        }
    }

    pub fn basic(name: impl Into<String>, texture: TextureDesc) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Basic,
            texture: Some(texture),
            ..Self::default()
        }
    }

    pub fn with_texture(mut self, texture: TextureDesc) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    /// Translate an MTL entry. Texture paths stay as written; the caller
    /// resolves them against the library's directory.
    pub(crate) fn from_mtl(material: &tobj::Material) -> Self {
        let color = material
            .diffuse
            .map(|[r, g, b]| Color::rgb(r, g, b))
            .unwrap_or(Color::WHITE);
        let specular = material
            .specular
            .map(|[r, g, b]| Color::rgb(r, g, b))
            .unwrap_or(Color::from_hex(0x111111));
        Self {
            name: material.name.clone(),
            kind: MaterialKind::Phong,
            color,
            texture: material
                .diffuse_texture
                .as_ref()
                .filter(|t| !t.trim().is_empty())
                // MTL maps tile; UVs outside [0, 1] are common in exported models.
                .map(|t| TextureDesc::new(t.trim()).tiled(1.0)),
            double_sided: false,
            specular,
            shininess: material.shininess.unwrap_or(30.0).max(1.0),
            opacity: material.dissolve.unwrap_or(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::WrapMode;

    #[test]
    fn phong_defaults() {
        let m = MaterialDesc::phong("cube", Color::from_hex(0x44aa88));
        assert_eq!(m.kind, MaterialKind::Phong);
        assert_eq!(m.color.to_hex(), 0x44aa88);
        assert!(m.texture.is_none());
        assert!(!m.double_sided);
    }

    #[test]
    fn basic_carries_texture() {
        let m = MaterialDesc::basic("wall", TextureDesc::new("wall.jpg"));
        assert_eq!(m.kind, MaterialKind::Basic);
        assert_eq!(m.color, Color::WHITE);
        assert!(m.texture.is_some());
    }

    #[test]
    fn from_mtl_maps_fields() {
        let mtl = tobj::Material {
            name: "blade".into(),
            diffuse: Some([0.5, 0.25, 0.0]),
            shininess: Some(10.0),
            diffuse_texture: Some("windmill_001_base_COL.jpg".into()),
            ..Default::default()
        };
        let m = MaterialDesc::from_mtl(&mtl);
        assert_eq!(m.name, "blade");
        assert_eq!(m.color, Color::rgb(0.5, 0.25, 0.0));
        assert_eq!(m.shininess, 10.0);
        let tex = m.texture.unwrap();
        assert_eq!(tex.source.to_str(), Some("windmill_001_base_COL.jpg"));
        assert_eq!(tex.wrap, WrapMode::Repeat);
        assert_eq!(tex.repeat, [1.0, 1.0]);
    }
}
