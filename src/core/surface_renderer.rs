use std::sync::{Arc, Mutex};

use winit::window::Window;

use crate::core::framebuffer::Framebuffer;
use crate::traits::surface::{PresentError, PresentationSurface};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Blits framebuffer snapshots to a winit window through wgpu.
///
/// The frame texture keeps the framebuffer's logical resolution; a
/// nearest-filter sampler scales it to whatever size the window currently
/// has. Presentation uses `Fifo`, so `present` blocks on vsync.
pub struct WindowSurface {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    texture: wgpu::Texture,
    frame_width: u32,
    frame_height: u32,
    staging: Vec<u32>,
}

impl WindowSurface {
    /// Create a surface presenting frames of the given logical resolution
    /// to `window`.
    pub fn new(window: Arc<Window>, frame_width: u32, frame_height: u32) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let adapter = pollster::block_on(Self::request_adapter(&instance, &surface))?;
        let (device, queue) = pollster::block_on(Self::request_device(&adapter))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let texture = Self::create_frame_texture(&device, frame_width, frame_height);
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (render_pipeline, bind_group) =
            Self::create_render_pipeline(&device, &texture_view, surface_format);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            render_pipeline,
            bind_group,
            texture,
            frame_width,
            frame_height,
            staging: Vec::with_capacity((frame_width as usize) * (frame_height as usize)),
        })
    }

    /// Reconfigure for a new window size. The frame texture keeps its
    /// resolution; only the output surface changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("failed to find appropriate adapter: {e:?}").into())
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Frame Blit Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| e.into())
    }

    fn create_frame_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        texture_view: &wgpu::TextureView,
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Frame Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../display.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Nearest keeps the low-resolution pixels crisp when scaled up.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Texture Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Texture Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Frame Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Frame Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }
}

impl PresentationSurface for WindowSurface {
    fn present(&mut self, frame: &Framebuffer) -> std::result::Result<(), PresentError> {
        if frame.width() != self.frame_width || frame.height() != self.frame_height {
            return Err(PresentError::Failed(format!(
                "frame is {}x{}, surface expects {}x{}",
                frame.width(),
                frame.height(),
                self.frame_width,
                self.frame_height
            )));
        }

        // Expand packed 0x00RRGGBB into RGBA in a reused staging buffer so
        // the uploaded frame is a complete snapshot of the framebuffer.
        self.staging.clear();
        self.staging.extend(frame.as_slice().iter().map(|&color| {
            let [_, r, g, b] = color.to_be_bytes();
            u32::from_le_bytes([r, g, b, 0xFF])
        }));

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Err(PresentError::NotReady);
            }
            Err(wgpu::SurfaceError::Timeout) => return Err(PresentError::NotReady),
            Err(e) => return Err(PresentError::Failed(e.to_string())),
        };

        self.queue.write_texture(
            self.texture.as_image_copy(),
            bytemuck::cast_slice(&self.staging),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.frame_width),
                rows_per_image: Some(self.frame_height),
            },
            wgpu::Extent3d {
                width: self.frame_width,
                height: self.frame_height,
                depth_or_array_layers: 1,
            },
        );

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Blit Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(())
    }
}

/// Clonable surface slot shared between the host thread and the loop
/// thread.
///
/// The loop can start before the window exists: presenting through an
/// empty slot reports `NotReady`, which the render step treats as "skip
/// this frame and retry".
#[derive(Clone, Default)]
pub struct SharedSurface {
    inner: Arc<Mutex<Option<WindowSurface>>>,
}

impl SharedSurface {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Install the window-backed surface once the window exists.
    pub fn install(&self, surface: WindowSurface) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(surface);
        }
    }

    /// Reconfigure the installed surface for a new window size. No-op
    /// while the slot is empty.
    pub fn resize(&self, width: u32, height: u32) {
        if let Ok(mut slot) = self.inner.lock() {
            if let Some(surface) = slot.as_mut() {
                surface.resize(width, height);
            }
        }
    }
}

impl PresentationSurface for SharedSurface {
    fn present(&mut self, frame: &Framebuffer) -> std::result::Result<(), PresentError> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| PresentError::Failed("surface slot poisoned".into()))?;

        slot.as_mut().ok_or(PresentError::NotReady)?.present(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_reports_not_ready() {
        let mut slot = SharedSurface::new();
        let frame = Framebuffer::new(4, 4).unwrap();

        assert!(matches!(
            slot.present(&frame),
            Err(PresentError::NotReady)
        ));
    }

    #[test]
    fn clones_share_one_slot() {
        let slot = SharedSurface::new();
        let mut observer = slot.clone();
        let frame = Framebuffer::new(4, 4).unwrap();

        // Still empty through either handle
        assert!(matches!(
            observer.present(&frame),
            Err(PresentError::NotReady)
        ));
        assert!(Arc::ptr_eq(&slot.inner, &observer.inner));
    }

    #[test]
    fn staging_conversion_packs_rgba_bytes() {
        // 0x00RRGGBB -> R, G, B, 255 in memory order
        let color: u32 = 0x0011AAFF;
        let [_, r, g, b] = color.to_be_bytes();
        let rgba = u32::from_le_bytes([r, g, b, 0xFF]);

        assert_eq!(rgba.to_le_bytes(), [0x11, 0xAA, 0xFF, 0xFF]);
    }
}
