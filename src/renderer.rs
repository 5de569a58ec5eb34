use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::flight::ScrollState;
use crate::labels::{Label, LabelAnchor};
use crate::scene::SceneGeometry;
use crate::types::LineVertex;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Everything the overlay shows for one frame.
pub struct HudFrame<'a> {
    pub fps: f32,
    pub scroll: ScrollState,
    pub labels: &'a [Label],
    pub anchors: &'a [LabelAnchor],
}

pub struct TunnelRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    camera_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    fog_density: f32,
    show_hud: bool,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl TunnelRenderer {
    pub async fn new(
        window: Arc<Window>,
        camera: &Camera,
        scene: &SceneGeometry,
        fog_density: f32,
        show_hud: bool,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size);
        surface.configure(&device, &surface_config);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera.to_uniform(fog_density)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertex Buffer"),
            contents: bytemuck::cast_slice(&scene.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (render_pipeline, camera_bind_group) =
            Self::create_line_pipeline(&device, &camera_buffer, surface_config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!(
            "Renderer initialized: {} line vertices, {}x{} surface",
            scene.vertex_count(),
            size.width,
            size.height
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            size,
            render_pipeline,
            camera_bind_group,
            camera_buffer,
            vertex_buffer,
            vertex_count: scene.vertex_count(),
            fog_density,
            show_hud,
            egui_renderer,
            egui_state,
            egui_ctx,
        })
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
            .map_err(|_| "Failed to find appropriate adapter".into())
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| e.into())
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_line_pipeline(
        device: &wgpu::Device,
        camera_buffer: &wgpu::Buffer,
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Tunnel Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("tunnel.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Tunnel Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Tunnel Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[LineVertex::desc()],
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
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        window: &Window,
        frame: &HudFrame,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let camera_uniform = camera.to_uniform(self.fog_density);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Tunnel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        let raw_input = self.egui_state.take_egui_input(window);
        let show_hud = self.show_hud;
        let vertex_count = self.vertex_count;
        let resolution = (self.size.width, self.size.height);
        let camera_position = camera.position();
        // Anchors are in physical pixels, egui positions in logical points.
        let pixels_per_point = window.scale_factor() as f32;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            for (index, (label, anchor)) in
                frame.labels.iter().zip(frame.anchors.iter()).enumerate()
            {
                if !anchor.visible {
                    continue;
                }
                egui::Area::new(egui::Id::new(("tunnel-label", index)))
                    .fixed_pos(egui::pos2(
                        anchor.x / pixels_per_point,
                        anchor.y / pixels_per_point,
                    ))
                    .pivot(egui::Align2::CENTER_CENTER)
                    .interactable(false)
                    .show(ctx, |ui| {
                        ui.label(
                            egui::RichText::new(&label.text)
                                .size(16.0)
                                .color(egui::Color32::WHITE),
                        );
                    });
            }

            if show_hud {
                egui::Window::new("Flight Info")
                    .title_bar(true)
                    .resizable(false)
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .default_width(220.0)
                    .show(ctx, |ui| {
                        ui.heading(
                            egui::RichText::new(format!("{:.0} FPS", frame.fps))
                                .size(32.0)
                                .color(egui::Color32::from_rgb(74, 158, 255)),
                        );

                        let frame_time_ms = if frame.fps > 0.0 {
                            1000.0 / frame.fps
                        } else {
                            0.0
                        };
                        ui.label(
                            egui::RichText::new(format!("{:.2} ms", frame_time_ms))
                                .size(14.0)
                                .color(egui::Color32::GRAY),
                        );

                        ui.add_space(10.0);
                        ui.separator();
                        ui.add_space(5.0);

                        ui.label(
                            egui::RichText::new("Flight")
                                .size(16.0)
                                .color(egui::Color32::from_rgb(100, 200, 100)),
                        );
                        ui.monospace(format!("Progress: {:.4}", frame.scroll.current));
                        ui.monospace(format!("Target:   {:.4}", frame.scroll.target));
                        ui.monospace(format!(
                            "Pos: ({:.2}, {:.2}, {:.2})",
                            camera_position.x, camera_position.y, camera_position.z
                        ));

                        ui.add_space(5.0);
                        ui.separator();
                        ui.add_space(5.0);

                        ui.label(
                            egui::RichText::new("Rendering")
                                .size(16.0)
                                .color(egui::Color32::from_rgb(200, 150, 100)),
                        );
                        ui.monospace(format!("Resolution: {}x{}", resolution.0, resolution.1));
                        ui.monospace(format!("Vertices: {}", vertex_count));
                    });
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let render_pass_static = unsafe {
                std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(
                    &mut render_pass,
                )
            };

            self.egui_renderer
                .render(render_pass_static, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }
}
