//! Draws the generated image on a full-window quad.

use log::{debug, warn};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{command_buffer, upload};

#[derive(Debug)]
pub enum PresentError {
    NoAdapter,
    NoSurfaceFormat,
    RequestDevice(wgpu::RequestDeviceError),
    Upload(mandelbrot_texture::Error),
    OutOfMemory,
}

impl std::fmt::Display for PresentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresentError::NoAdapter => write!(f, "no graphics adapter can present to the window"),
            PresentError::NoSurfaceFormat => write!(f, "the window surface supports no formats"),
            PresentError::RequestDevice(err) => write!(f, "failed to open device: {}", err),
            PresentError::Upload(err) => write!(f, "failed to upload image: {}", err),
            PresentError::OutOfMemory => write!(f, "out of GPU memory while presenting"),
        }
    }
}

impl std::error::Error for PresentError {}

impl From<wgpu::RequestDeviceError> for PresentError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        PresentError::RequestDevice(err)
    }
}

impl From<mandelbrot_texture::Error> for PresentError {
    fn from(err: mandelbrot_texture::Error) -> Self {
        PresentError::Upload(err)
    }
}

pub struct Presenter {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    render_bind_group: wgpu::BindGroup,
}

impl Presenter {
    pub fn new(window: &Window, image: &mandelbrot_texture::Image) -> Result<Self, PresentError> {
        let instance = wgpu::Instance::new(wgpu::Backends::all());

        let size = window.inner_size();
        let surface = unsafe { instance.create_surface(window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(PresentError::NoAdapter)?;
        debug!("using adapter {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        let format = surface
            .get_supported_formats(&adapter)
            .first()
            .copied()
            .ok_or(PresentError::NoSurfaceFormat)?;

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        surface.configure(&device, &surface_configuration);

        let texture = upload::texture(&device, &queue, image)?;
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("fractal-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let render_shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("quad.wgsl").into()),
        });

        let render_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("render-bind-group-layout"),
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

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("render-pipeline-layout"),
                bind_group_layouts: &[&render_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render-pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader_module,
                entry_point: "vertex_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &render_shader_module,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_configuration.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let render_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("render-bind-group"),
            layout: &render_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Ok(Self {
            surface,
            device,
            queue,
            surface_configuration,
            render_pipeline,
            render_bind_group,
        })
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        // Minimised windows report a zero size, which is not a valid surface.
        if size.width == 0 || size.height == 0 {
            return;
        }
        debug!("resizing surface to {:?}", size);

        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface.configure(&self.device, &self.surface_configuration);
    }

    /// Draws one frame. Only running out of memory is reported; other surface
    /// errors skip the frame.
    pub fn render(&mut self) -> Result<(), PresentError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.surface_configuration);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(PresentError::OutOfMemory),
            Err(err) => {
                warn!("skipping frame: {}", err);
                return Ok(());
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let command_buffer = command_buffer::record(&self.device, "render", |command_encoder| {
            let mut render_pass = command_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.render_bind_group, &[]);
            render_pass.draw(0..4, 0..1);
        });

        self.queue.submit([command_buffer]);
        surface_texture.present();
        Ok(())
    }
}
