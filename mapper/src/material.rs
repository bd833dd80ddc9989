use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::io::Reader as ImageReader;
use image::{GenericImageView, ImageOutputFormat};
use indexmap::IndexMap;

use base::defs::{Error, ErrorKind::*, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(usize);

#[derive(Debug)]
pub struct Texture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>, // Re-encoded for embedding into the output.
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub texture: Option<TextureHandle>,
}

pub type TextureLoader = fn(&Path) -> Result<Texture>;

/// Textures and materials created during one run. Textures are loaded
/// once per source path, the path itself being the identity.
pub struct Materials {
    loader: TextureLoader,
    textures: Vec<Texture>,
    texture_by_path: IndexMap<PathBuf, TextureHandle>,
    materials: Vec<Material>,
}

impl Default for Materials {
    fn default() -> Self {
        Self::with_loader(load_texture_file)
    }
}

impl Materials {
    pub fn with_loader(loader: TextureLoader) -> Self {
        Self {
            loader,
            textures: vec![],
            texture_by_path: IndexMap::new(),
            materials: vec![],
        }
    }

    /// Returns the texture loaded from `path`, loading it on first
    /// request. The flag tells whether it was already loaded.
    pub fn load_texture(
        &mut self,
        path: &Path,
    ) -> Result<(TextureHandle, bool)> {
        if let Some(&handle) = self.texture_by_path.get(path) {
            return Ok((handle, true));
        }
        let texture = (self.loader)(path)?;
        let handle = TextureHandle(self.textures.len());
        self.textures.push(texture);
        self.texture_by_path.insert(path.to_path_buf(), handle);
        Ok((handle, false))
    }

    pub fn create_material(&mut self, name: &str) -> MaterialHandle {
        self.materials.push(Material {
            name: name.to_string(),
            texture: None,
        });
        MaterialHandle(self.materials.len() - 1)
    }

    pub fn bind_texture(
        &mut self,
        material: MaterialHandle,
        texture: Option<TextureHandle>,
    ) {
        self.materials[material.0].texture = texture;
    }

    pub fn rename_material(&mut self, material: MaterialHandle, name: &str) {
        self.materials[material.0].name = name.to_string();
    }

    pub fn material(&self, handle: MaterialHandle) -> &Material {
        &self.materials[handle.0]
    }

    pub fn texture(&self, handle: TextureHandle) -> &Texture {
        &self.textures[handle.0]
    }

    pub fn num_textures(&self) -> usize {
        self.textures.len()
    }
}

/// Decodes an image file of any supported format and re-encodes it as PNG.
pub fn load_texture_file(path: &Path) -> Result<Texture> {
    let load_err = |e: image::ImageError| {
        let desc = format!("failed to load texture '{}'", path.display());
        Error::with_source(ResourceLoadFailed, desc, e)
    };

    let img = ImageReader::open(path)
        .map_err(|e| load_err(e.into()))?
        .with_guessed_format()
        .map_err(|e| load_err(e.into()))?
        .decode()
        .map_err(load_err)?;

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .map_err(load_err)?;

    let (width, height) = img.dimensions();
    Ok(Texture {
        path: path.to_path_buf(),
        width,
        height,
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::util::test::scratch_dir;
    use image::{Rgb, RgbImage};

    fn fake_texture(path: &Path) -> Result<Texture> {
        if path.to_str().unwrap().contains("broken") {
            let desc = format!("failed to load texture '{}'", path.display());
            return Err(Error::new(ResourceLoadFailed, desc));
        }
        Ok(Texture {
            path: path.to_path_buf(),
            width: 1,
            height: 1,
            png: vec![],
        })
    }

    #[test]
    fn test_textures_are_shared_by_path() {
        let mut materials = Materials::with_loader(fake_texture);

        let (a, cached) = materials.load_texture("a.png".as_ref()).unwrap();
        assert!(!cached);
        let (b, cached) = materials.load_texture("b.png".as_ref()).unwrap();
        assert!(!cached);
        let (a2, cached) = materials.load_texture("a.png".as_ref()).unwrap();
        assert!(cached);

        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(materials.num_textures(), 2);
        assert_eq!(materials.texture(b).path, PathBuf::from("b.png"));
    }

    #[test]
    fn test_failed_texture_is_not_registered() {
        let mut materials = Materials::with_loader(fake_texture);
        let err = materials.load_texture("broken.png".as_ref()).unwrap_err();
        assert_eq!(err.kind, ResourceLoadFailed);
        assert_eq!(materials.num_textures(), 0);
    }

    #[test]
    fn test_materials() {
        let mut materials = Materials::with_loader(fake_texture);
        let (tex, _) = materials.load_texture("a.png".as_ref()).unwrap();

        let m = materials.create_material("Material_Top");
        assert_eq!(materials.material(m).texture, None);

        materials.bind_texture(m, Some(tex));
        materials.rename_material(m, "Material_Side");
        assert_eq!(
            materials.material(m),
            &Material {
                name: "Material_Side".to_string(),
                texture: Some(tex),
            }
        );
    }

    #[test]
    fn test_load_texture_file() {
        let dir = scratch_dir("load-texture-file");

        let path = dir.join("checker.jpg");
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(1, 1, Rgb([255, 255, 255]));
        img.save(&path).unwrap();

        let texture = load_texture_file(&path).unwrap();
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(&texture.png[1..4], b"PNG");

        let path = dir.join("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_texture_file(&path).unwrap_err();
        assert_eq!(err.kind, ResourceLoadFailed);

        let err = load_texture_file(&dir.join("missing.png")).unwrap_err();
        assert_eq!(err.kind, ResourceLoadFailed);
    }
}
