//! ASCII wireframe rasterizer for terminal rendering
use crossterm::{
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use objview_core::{Camera, Color, EdgeStyle, RenderStyle, Scene, SceneDrawer, VertexStyle};
use std::io::Write;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Vertices win depth ties against the edges that end on them
const VERTEX_DEPTH_BIAS: f64 = 1e-3;

/// Edges whose endpoints project this many screens away are skipped
const MAX_SCREENS: f64 = 16.0;

/// Renders scenes into a character grid
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    camera: Camera,
    background: Color,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            camera: Camera::with_aspect(width as f64 / (height.max(1) as f64 * CELL_ASPECT)),
            background: Color::BLACK,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::WHITE; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at a cell, `None` outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// The buffer as one string per row
    pub fn rows(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    fn plot(&mut self, x: i64, y: i64, depth: f64, character: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    /// Bresenham line between two projected points, interpolating depth
    fn draw_line(
        &mut self,
        from: (f64, f64, f64),
        to: (f64, f64, f64),
        style: EdgeStyle,
        color: Color,
    ) {
        let limit = MAX_SCREENS * self.width.max(self.height) as f64;
        if [from.0, from.1, to.0, to.1].iter().any(|c| c.abs() > limit) {
            return;
        }

        let (x0, y0) = (from.0.floor() as i64, from.1.floor() as i64);
        let (x1, y1) = (to.0.floor() as i64, to.1.floor() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let character = line_char(x1 - x0, y1 - y0);
        let steps = dx.max(-dy).max(1) as f64;

        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        let mut step = 0i64;
        loop {
            if style == EdgeStyle::Solid || step % 2 == 0 {
                let t = step as f64 / steps;
                let depth = from.2 + (to.2 - from.2) * t;
                self.plot(x, y, depth, character, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_term(self.background)))?;
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];
                let color = self.color_buffer[idx];
                if c != ' ' && current != Some(color) {
                    writer.queue(SetForegroundColor(to_term(color)))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl SceneDrawer for AsciiRenderer {
    fn draw_scene(&mut self, scene: &Scene, style: &RenderStyle) {
        self.clear();
        self.background = style.background;
        self.camera.mode = style.projection;

        let (w, h) = (self.width as u32, self.height as u32);
        let projected: Vec<Option<(f64, f64, f64)>> = scene
            .positions()
            .map(|p| self.camera.project(&p.to_na(), w, h))
            .collect();

        for edge in scene.edges() {
            if let (Some(from), Some(to)) = (projected[edge.a], projected[edge.b]) {
                self.draw_line(from, to, style.edge_style, style.edge_color);
            }
        }

        let marker = match style.vertex_style {
            VertexStyle::Circle => 'o',
            VertexStyle::Square => '#',
            VertexStyle::Invisible => return,
        };
        for (x, y, depth) in projected.into_iter().flatten() {
            self.plot(
                x.floor() as i64,
                y.floor() as i64,
                depth - VERTEX_DEPTH_BIAS,
                marker,
                style.vertex_color,
            );
        }
    }
}

/// Pick a glyph that follows the line's screen direction
fn line_char(dx: i64, dy: i64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay * 2 < ax {
        '-'
    } else if ax * 2 < ay {
        '|'
    } else if (dx > 0) == (dy > 0) {
        '\\'
    } else {
        '/'
    }
}

fn to_term(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
