#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::new_attachment(device, "depth_texture", Self::DEPTH_FORMAT, wgpu::TextureUsages::empty(), width, height)
    }

    /// The texture frames are rendered into, can be copied out of afterwards
    pub fn new_color_target(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::new_attachment(device, "color_target", Self::COLOR_FORMAT, wgpu::TextureUsages::COPY_SRC, width, height)
    }

    fn new_attachment(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        extra_usage: wgpu::TextureUsages,
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | extra_usage,
            format,
            dimension: wgpu::TextureDimension::D2,
            mip_level_count: 1,
            sample_count: 1,
            size,
            view_formats: &[format],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }
}
