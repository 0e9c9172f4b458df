//! Scene assembly.
//!
//! Projects the contour and buildings for the current year and hands the
//! resulting primitives to a [`SceneRenderer`]. Window, camera and
//! rasterization belong to the renderer.

use crate::buildings::{Building, Rgba, RED};
use crate::geo::{Contour, MapProjection, WorldPoint};
use glam::Vec3;

/// Color of the park outline.
pub const CONTOUR_COLOR: Rgba = RED;

/// Drawing backend fed with scene-space primitives.
pub trait SceneRenderer {
    /// Draws a line segment.
    fn draw_line(&mut self, from: WorldPoint, to: WorldPoint, color: Rgba);

    /// Draws an axis-aligned cuboid. `size` is (x, y, z) extent.
    fn draw_cube(&mut self, center: WorldPoint, size: Vec3, color: Rgba);

    /// Draws the map image as a horizontal quad.
    fn draw_ground_texture(&mut self, center: WorldPoint, width: f32, length: f32);
}

/// Everything drawn each frame, minus the clock.
pub struct Scene<'a> {
    pub contour: &'a Contour,
    pub buildings: &'a [Building],
    pub projection: &'a MapProjection,
}

impl Scene<'_> {
    /// Renders the scene as it looks at `current_year`.
    pub fn render(&self, renderer: &mut impl SceneRenderer, current_year: f64) {
        let (width, length) = self.projection.footprint();
        renderer.draw_ground_texture(Vec3::ZERO, width, length);

        self.render_contour(renderer);

        for building in self.buildings {
            if let Some(offset) = building.vertical_offset(current_year) {
                self.render_building(renderer, building, offset);
            }
        }
    }

    fn render_contour(&self, renderer: &mut impl SceneRenderer) {
        for (a, b) in self.contour.segments() {
            renderer.draw_line(
                self.projection.project(a, 0.0),
                self.projection.project(b, 0.0),
                CONTOUR_COLOR,
            );
        }
    }

    fn render_building(
        &self,
        renderer: &mut impl SceneRenderer,
        building: &Building,
        offset: f64,
    ) {
        let center = self
            .projection
            .project(building.latlon, building.center_height(offset));
        let size = Vec3::new(
            self.projection.meters(building.size[0]),
            self.projection.meters(building.height),
            self.projection.meters(building.size[1]),
        );
        renderer.draw_cube(center, size, building.color);
    }
}

/// Renderer that only logs what it is asked to draw.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    pub lines: usize,
    pub cubes: usize,
    pub textures: usize,
}

impl LoggingRenderer {
    /// Clears the counters for a new frame.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl SceneRenderer for LoggingRenderer {
    fn draw_line(&mut self, from: WorldPoint, to: WorldPoint, _color: Rgba) {
        log::trace!("line {from} -> {to}");
        self.lines += 1;
    }

    fn draw_cube(&mut self, center: WorldPoint, size: Vec3, color: Rgba) {
        log::debug!("cube at {center} size {size} color {color:?}");
        self.cubes += 1;
    }

    fn draw_ground_texture(&mut self, center: WorldPoint, width: f32, length: f32) {
        log::trace!("ground quad at {center} {width}x{length}");
        self.textures += 1;
    }
}
