use vista_assets::{ColorSpace, MagFilter, TextureData, TextureDesc, WrapMode, load_texture};

pub(crate) fn texture_format(color_space: ColorSpace) -> wgpu::TextureFormat {
    match color_space {
        ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
    }
}

pub(crate) fn sampler_descriptor(desc: Option<&TextureDesc>) -> wgpu::SamplerDescriptor<'static> {
    let (wrap, mag) = desc
        .map(|d| (d.wrap, d.mag_filter))
        .unwrap_or((WrapMode::Clamp, MagFilter::Linear));
    let address_mode = match wrap {
        WrapMode::Clamp => wgpu::AddressMode::ClampToEdge,
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
    };
    let mag_filter = match mag {
        MagFilter::Nearest => wgpu::FilterMode::Nearest,
        MagFilter::Linear => wgpu::FilterMode::Linear,
    };
    wgpu::SamplerDescriptor {
        label: Some("material_sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    }
}

/// Decode a material's texture, or fall back to opaque white.
pub(crate) fn texture_or_white(desc: Option<&TextureDesc>) -> TextureData {
    let Some(desc) = desc else {
        return TextureData::solid([255, 255, 255, 255]);
    };
    match load_texture(desc) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %desc.source.display(), "texture unavailable, using white: {e}");
            TextureData::solid([255, 255, 255, 255])
        }
    }
}

pub(crate) fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &TextureData,
    color_space: ColorSpace,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: data.width.max(1),
        height: data.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("material_texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: texture_format(color_space),
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
        &data.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size.width),
            rows_per_image: Some(size.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_maps_to_srgb_format() {
        assert_eq!(texture_format(ColorSpace::Srgb), wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!(texture_format(ColorSpace::Linear), wgpu::TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn tiled_nearest_sampler() {
        let desc = TextureDesc::new("checker.png")
            .tiled(20.0)
            .with_mag_filter(MagFilter::Nearest);
        let s = sampler_descriptor(Some(&desc));
        assert_eq!(s.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(s.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(s.mag_filter, wgpu::FilterMode::Nearest);
    }

    #[test]
    fn untextured_sampler_clamps() {
        let s = sampler_descriptor(None);
        assert_eq!(s.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(s.mag_filter, wgpu::FilterMode::Linear);
    }

    #[test]
    fn missing_file_falls_back_to_white() {
        let desc = TextureDesc::new("/nonexistent/wall.jpg");
        let data = texture_or_white(Some(&desc));
        assert_eq!((data.width, data.height), (1, 1));
        assert_eq!(data.rgba, vec![255, 255, 255, 255]);
    }
}
