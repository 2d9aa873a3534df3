//! GPU submission of a composed sprite batch.
//!
//! Owns the wgpu context, the sprite pipeline, the loaded texture set and
//! the text brush. One `draw` call per frame: clear, sprites, text, present.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;
use wgpu_text::glyph_brush::ab_glyph::FontArc;
use wgpu_text::glyph_brush::{Section, Text};
use wgpu_text::{BrushBuilder, TextBrush};

use crate::render::context::RenderContext;
use crate::render::pipeline::{self, InstanceRaw};
use crate::render::sprite::{LOGICAL_HEIGHT, LOGICAL_WIDTH, SpriteBatch, TextureId};
use crate::render::texture;

const FONT_FILE: &str = "font.ttf";

const TEXTURE_FILES: &[(TextureId, &str)] = &[
    (TextureId::MenuBackdrop, "menu.png"),
    (TextureId::Instructions, "instructions.png"),
    (TextureId::Background, "background.png"),
    (TextureId::ResultsOverlay, "results.png"),
    (TextureId::PaddleOne, "paddle_one.png"),
    (TextureId::PaddleTwo, "paddle_two.png"),
    (TextureId::Projectile, "projectile.png"),
];

pub struct Renderer {
    pub ctx: RenderContext,
    pipeline: wgpu::RenderPipeline,
    globals_group: wgpu::BindGroup,
    textures: HashMap<TextureId, wgpu::BindGroup>,
    fallback: wgpu::BindGroup,
    brush: Option<TextBrush>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, assets_dir: &Path) -> Self {
        let ctx = RenderContext::new(window).await;

        let texture_layout = pipeline::create_bind_group_layout(&ctx.device);
        let globals_layout = pipeline::create_globals_layout(&ctx.device);
        let render_pipeline = pipeline::create_render_pipeline(
            &ctx.device,
            &texture_layout,
            &globals_layout,
            ctx.config.format,
        );
        let sampler = pipeline::create_sampler(&ctx.device);

        // Sprites are laid out in logical coordinates; the shader maps them
        // onto whatever the window currently is.
        let globals_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Globals Buffer"),
                contents: bytemuck::cast_slice(&[LOGICAL_WIDTH, LOGICAL_HEIGHT, 0.0, 0.0]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let globals_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let mut textures = HashMap::new();
        for (id, file) in TEXTURE_FILES {
            let path = assets_dir.join(file);
            if let Some((tex, _, _)) = texture::load_texture_from_path(&ctx.device, &ctx.queue, &path)
            {
                textures.insert(
                    *id,
                    texture_bind_group(&ctx.device, &texture_layout, &sampler, &tex),
                );
            }
        }

        let fallback_tex = texture::create_default_texture(
            &ctx.device,
            &ctx.queue,
            [255, 255, 255, 255],
            "Fallback Texture",
        );
        let fallback = texture_bind_group(&ctx.device, &texture_layout, &sampler, &fallback_tex);

        let brush = load_text_brush(&ctx, assets_dir);

        Self {
            ctx,
            pipeline: render_pipeline,
            globals_group,
            textures,
            fallback,
            brush,
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        if let Some(brush) = &mut self.brush {
            brush.resize_view(new_size.width as f32, new_size.height as f32, &self.ctx.queue);
        }
    }

    /// Reconfigures the surface after a lost/outdated frame.
    pub fn reconfigure(&mut self) {
        let size = self.ctx.size;
        self.ctx.resize(size);
    }

    /// Submits one frame: clear to transparent black, draw the batch's
    /// sprites in their (already sorted) order, draw text on top, present.
    pub fn draw(&mut self, batch: &SpriteBatch) -> Result<(), wgpu::SurfaceError> {
        let frame = self.ctx.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let instances: Vec<InstanceRaw> = batch
            .sprites()
            .iter()
            .map(InstanceRaw::from_sprite)
            .collect();

        // One draw call per run of consecutive same-texture sprites, so the
        // sorted order survives batching.
        let mut runs: Vec<(TextureId, std::ops::Range<u32>)> = Vec::new();
        for (i, sprite) in batch.sprites().iter().enumerate() {
            let i = i as u32;
            match runs.last_mut() {
                Some((tex, range)) if *tex == sprite.texture => range.end = i + 1,
                _ => runs.push((sprite.texture, i..i + 1)),
            }
        }

        let instance_buffer = (!instances.is_empty()).then(|| {
            self.ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Sprite Instances"),
                    contents: bytemuck::cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffer) = &instance_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(1, &self.globals_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                for (tex, range) in &runs {
                    let group = self.textures.get(tex).unwrap_or(&self.fallback);
                    pass.set_bind_group(0, group, &[]);
                    pass.draw(0..6, range.clone());
                }
            }
        }

        if let Some(brush) = &mut self.brush
            && !batch.texts().is_empty()
        {
            let sx = self.ctx.config.width as f32 / LOGICAL_WIDTH;
            let sy = self.ctx.config.height as f32 / LOGICAL_HEIGHT;
            let sections: Vec<Section> = batch
                .texts()
                .iter()
                .map(|draw| Section {
                    screen_position: (draw.x * sx, draw.y * sy),
                    bounds: (
                        self.ctx.config.width as f32,
                        self.ctx.config.height as f32,
                    ),
                    text: vec![
                        Text::new(&draw.text)
                            .with_scale(draw.px * sy)
                            .with_color(draw.color),
                    ],
                    ..Default::default()
                })
                .collect();

            match brush.queue(&self.ctx.device, &self.ctx.queue, sections) {
                Ok(()) => {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Text Pass"),
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
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });
                    brush.draw(&mut pass);
                }
                Err(e) => log::error!("RENDER: Text queue failed: {}", e),
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    texture: &wgpu::Texture,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: None,
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn load_text_brush(ctx: &RenderContext, assets_dir: &Path) -> Option<TextBrush> {
    let font_path = assets_dir.join(FONT_FILE);
    match std::fs::read(&font_path) {
        Ok(font_data) => match FontArc::try_from_vec(font_data) {
            Ok(font) => Some(BrushBuilder::using_font(font).build(
                &ctx.device,
                ctx.config.width,
                ctx.config.height,
                ctx.config.format,
            )),
            Err(e) => {
                log::warn!("RENDER: Cannot parse font {:?}: {}", font_path, e);
                None
            }
        },
        Err(e) => {
            log::warn!(
                "RENDER: No font at {:?} ({}), text will not be displayed",
                font_path,
                e
            );
            None
        }
    }
}
