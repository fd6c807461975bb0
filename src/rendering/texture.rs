use std::path::Path;

/// Side of the generated fallback pattern.
pub const FALLBACK_TEXTURE_SIZE: u32 = 64;

const CHECKER_TILE_SIZE: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// RGBA pixel data ready for GPU upload.
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Loads a PNG from disk. A missing or unreadable file is logged and
    /// substituted with a checkerboard pattern, it never aborts the run.
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(data) => {
                log::info!("Loaded texture: {}", path.display());
                data
            }
            Err(err) => {
                log::error!("Failed to load texture '{}': {err}", path.display());
                Self::generate_checkerboard(
                    FALLBACK_TEXTURE_SIZE,
                    [200, 60, 200, 255],
                    [40, 40, 40, 255],
                )
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, TextureError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    pub fn generate_checkerboard(size: u32, color1: [u8; 4], color2: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let checker_x = (x / CHECKER_TILE_SIZE) % 2;
                let checker_y = (y / CHECKER_TILE_SIZE) % 2;
                let color = if checker_x == checker_y { color1 } else { color2 };
                data.extend_from_slice(&color);
            }
        }
        Self { data, width: size, height: size }
    }

    pub fn generate_solid(size: u32, color: [u8; 4]) -> Self {
        let data = color.repeat((size * size) as usize);
        Self { data, width: size, height: size }
    }

    /// Uploads the pixels into a new GPU texture and returns its view.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

pub fn create_sprite_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Sprite Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[test]
fn test_checkerboard_dimensions() {
    let tex = TextureData::generate_checkerboard(16, [255, 0, 0, 255], [0, 0, 0, 255]);
    assert_eq!(tex.width, 16);
    assert_eq!(tex.height, 16);
    assert_eq!(tex.data.len(), 16 * 16 * 4);
}

#[test]
fn test_solid_is_uniform() {
    let color = [10, 20, 30, 255];
    let tex = TextureData::generate_solid(4, color);
    assert_eq!(tex.data.len(), 4 * 4 * 4);
    for pixel in tex.data.chunks(4) {
        assert_eq!(pixel, color);
    }
}

#[test]
fn test_missing_file_falls_back() {
    let tex = TextureData::load_or_fallback(Path::new("definitely/not/here.png"));
    assert_eq!(tex.width, FALLBACK_TEXTURE_SIZE);
    assert_eq!(tex.height, FALLBACK_TEXTURE_SIZE);
}
