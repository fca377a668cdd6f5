//! WGPU-based rendering engine
//!
//! Draws the scene into an offscreen color target, then composites that
//! target onto the window surface through a blur pass whose radius the intro
//! overlay animates. UI is drawn last, directly onto the surface.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    config::LightingConfig,
    error::RenderError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{GlobalBindings, LightConfig},
            layouts::SceneLayouts,
            texture_resource::TextureResource,
        },
        scene::{object::DrawMesh, scene::Scene},
    },
    wgpu_utils::{
        binding_types::{self, sequential_bind_group, sequential_layout},
        uniform_buffer::UniformBuffer,
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SCENE_PIPELINE: &str = "Scene";
const COMPOSITE_PIPELINE: &str = "Composite";

/// Matches `CompositeParams` in `composite.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct CompositeParams {
    texel_size: [f32; 2],
    radius: f32,
    _padding: f32,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,

    layouts: SceneLayouts,
    global_bindings: GlobalBindings,
    light_config: LightConfig,
    clear_color: wgpu::Color,

    depth_texture: TextureResource,
    scene_target: TextureResource,

    composite_layout: wgpu::BindGroupLayout,
    composite_params: UniformBuffer<CompositeParams>,
    composite_bind_group: wgpu::BindGroup,
    blur_radius: f32,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// `width` and `height` are the initial surface size in physical pixels.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        lighting: &LightingConfig,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(
            &device,
            config.width,
            config.height,
            "depth_texture",
        );
        let scene_target = TextureResource::create_color_target(
            &device,
            config.width,
            config.height,
            format,
            "scene_target",
        );

        let layouts = SceneLayouts::new(&device);
        let global_bindings = GlobalBindings::new(&device, &layouts.globals);

        let composite_layout = sequential_layout(
            &device,
            "Composite Bind Group Layout",
            &[
                (wgpu::ShaderStages::FRAGMENT, binding_types::uniform()),
                (wgpu::ShaderStages::FRAGMENT, binding_types::texture_2d()),
                (
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        );
        let composite_params = UniformBuffer::new_with_data(
            &device,
            &CompositeParams {
                texel_size: texel_size(config.width, config.height),
                radius: 0.0,
                _padding: 0.0,
            },
        );
        let composite_bind_group = create_composite_bind_group(
            &device,
            &composite_layout,
            &composite_params,
            &scene_target,
        );

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("composite", include_str!("composite.wgsl"));

        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default_with_shader("scene")
                .with_label("Scene Pipeline")
                .with_bind_group_layouts(layouts.all())
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format),
        );
        pipeline_manager.register_pipeline(
            COMPOSITE_PIPELINE,
            PipelineConfig::default_with_shader("composite")
                .with_label("Composite Pipeline")
                .with_bind_group_layouts(vec![composite_layout.clone()])
                .with_cull_mode(None)
                .with_color_format(format)
                .with_no_vertex_buffers(),
        );
        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        let [r, g, b] = lighting.clear_color;

        Ok(Self {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            pipeline_manager,
            layouts,
            global_bindings,
            light_config: LightConfig::from(lighting),
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            depth_texture,
            scene_target,
            composite_layout,
            composite_params,
            composite_bind_group,
            blur_radius: 0.0,
        })
    }

    /// Uploads new scene content and per-frame uniforms before drawing.
    pub fn prepare(&mut self, scene: &mut Scene) {
        scene.sync_gpu(&self.device, &self.queue, &self.layouts);
        self.update(scene.camera_manager.camera.uniform);
    }

    /// Uploads camera and light uniforms
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        self.global_bindings
            .update(&self.queue, camera_uniform, &self.light_config);
    }

    /// Sets the composite blur radius in physical pixels. Zero disables it.
    pub fn set_blur_radius(&mut self, radius: f32) {
        self.blur_radius = radius.max(0.0);
        self.write_composite_params();
    }

    /// Renders one frame with an optional UI overlay
    ///
    /// The UI callback records its own pass onto the surface view after the
    /// composite. Surface errors are returned so the caller can reconfigure.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: scene into the offscreen target
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(SCENE_PIPELINE) {
                render_pass.set_pipeline(pipeline);

                for object in scene.objects() {
                    let Some(transform) = object.transform_bind_group() else {
                        log::trace!("Skipping '{}' - no GPU resources yet", object.name);
                        continue;
                    };
                    render_pass.set_bind_group(1, transform, &[]);
                    for mesh in scene.meshes_of(object) {
                        render_pass.draw_mesh(mesh);
                    }
                }
            }
        }

        // PASS 2: composite (and blur) onto the surface
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(COMPOSITE_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.composite_bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }
        }

        // PASS 3: UI overlay
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Convenience method for rendering without UI
    pub fn render_frame_simple(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.render_frame(
            scene,
            None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        )
    }

    /// Convenience method for rendering with UI
    pub fn render_frame_with_ui<F>(
        &mut self,
        scene: &Scene,
        ui_callback: F,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.render_frame(scene, Some(ui_callback))
    }

    /// Resizes the surface and the offscreen targets
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "depth_texture");
        self.scene_target = TextureResource::create_color_target(
            &self.device,
            width,
            height,
            self.format,
            "scene_target",
        );
        self.composite_bind_group = create_composite_bind_group(
            &self.device,
            &self.composite_layout,
            &self.composite_params,
            &self.scene_target,
        );
        self.write_composite_params();
    }

    /// Reconfigures the surface at its current size, after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn write_composite_params(&mut self) {
        self.composite_params.update_content(
            &self.queue,
            CompositeParams {
                texel_size: texel_size(self.config.width, self.config.height),
                radius: self.blur_radius,
                _padding: 0.0,
            },
        );
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn texel_size(width: u32, height: u32) -> [f32; 2] {
    [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32]
}

fn create_composite_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    params: &UniformBuffer<CompositeParams>,
    source: &TextureResource,
) -> wgpu::BindGroup {
    sequential_bind_group(
        device,
        "Composite Bind Group",
        layout,
        vec![
            params.binding_resource(),
            wgpu::BindingResource::TextureView(&source.view),
            wgpu::BindingResource::Sampler(&source.sampler),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_size_handles_zero() {
        assert_eq!(texel_size(200, 100), [0.005, 0.01]);
        assert_eq!(texel_size(0, 0), [1.0, 1.0]);
    }

    #[test]
    fn test_composite_params_is_16_bytes() {
        assert_eq!(std::mem::size_of::<CompositeParams>(), 16);
    }
}
