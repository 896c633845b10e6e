//! Textures and per-component texture references

/// Texture declared in the textures block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Texture id
    pub id: String,
    /// Image path as written in the document
    pub file: String,
}

impl Texture {
    /// Texture `id` loaded from `file`
    pub fn new(id: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file: file.into(),
        }
    }
}

/// Which texture a component asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureBinding {
    /// Draw untextured
    None,
    /// Use the nearest ancestor's resolved texture
    Inherit,
    /// Use the texture with this id
    Named(String),
}

impl TextureBinding {
    /// Interpret an id, recognizing the `none` and `inherit` sentinels
    pub fn from_id(id: &str) -> Self {
        match id {
            "none" => Self::None,
            "inherit" => Self::Inherit,
            other => Self::Named(other.to_string()),
        }
    }
}

/// Component texture with optional repeat lengths
///
/// Lengths are required for named textures, optional for `inherit` (they
/// override the inherited ones) and ignored for `none`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    /// Requested texture
    pub binding: TextureBinding,
    /// Repeat length along s
    pub length_s: Option<f32>,
    /// Repeat length along t
    pub length_t: Option<f32>,
}

impl TextureRef {
    /// No texture
    pub const fn none() -> Self {
        Self {
            binding: TextureBinding::None,
            length_s: None,
            length_t: None,
        }
    }

    /// Inherit the parent's texture
    pub const fn inherit() -> Self {
        Self {
            binding: TextureBinding::Inherit,
            length_s: None,
            length_t: None,
        }
    }

    /// Named texture with repeat lengths
    pub fn named(id: impl Into<String>, length_s: f32, length_t: f32) -> Self {
        Self {
            binding: TextureBinding::Named(id.into()),
            length_s: Some(length_s),
            length_t: Some(length_t),
        }
    }

    /// Both repeat lengths, when both are present
    pub fn lengths(&self) -> Option<(f32, f32)> {
        self.length_s.zip(self.length_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(TextureBinding::from_id("none"), TextureBinding::None);
        assert_eq!(TextureBinding::from_id("inherit"), TextureBinding::Inherit);
        assert_eq!(TextureBinding::from_id("wood"), TextureBinding::Named("wood".into()));
    }

    #[test]
    fn test_lengths_need_both() {
        assert_eq!(TextureRef::named("wood", 2.0, 3.0).lengths(), Some((2.0, 3.0)));
        let partial = TextureRef {
            length_s: Some(1.0),
            ..TextureRef::inherit()
        };
        assert_eq!(partial.lengths(), None);
    }
}
