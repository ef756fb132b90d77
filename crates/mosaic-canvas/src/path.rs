//! Path2D
//!
//! Path construction for Canvas 2D.

use tiny_skia::PathBuilder;

/// 2D Path
#[derive(Debug, Clone, Default)]
pub struct Path2D {
    commands: Vec<PathCommand>,
}

/// Path command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadraticCurveTo { cpx: f32, cpy: f32, x: f32, y: f32 },
    RoundRect { x: f32, y: f32, width: f32, height: f32, radius: f32 },
    ClosePath,
}

impl Path2D {
    /// Create new empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to point
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    /// Line to point
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::LineTo(x, y));
    }

    /// Quadratic curve
    pub fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        self.commands.push(PathCommand::QuadraticCurveTo { cpx, cpy, x, y });
    }

    /// Round rectangle with a uniform corner radius
    pub fn round_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        self.commands.push(PathCommand::RoundRect { x, y, width, height, radius });
    }

    /// Round rectangle spelled out as lines and quadratic corners.
    ///
    /// Used when the backend has no rounded-rect primitive; the radius is
    /// clamped to half the shorter side.
    pub fn round_rect_polyfill(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        let r = radius.max(0.0).min(width / 2.0).min(height / 2.0);
        self.move_to(x + r, y);
        self.line_to(x + width - r, y);
        self.quadratic_curve_to(x + width, y, x + width, y + r);
        self.line_to(x + width, y + height - r);
        self.quadratic_curve_to(x + width, y + height, x + width - r, y + height);
        self.line_to(x + r, y + height);
        self.quadratic_curve_to(x, y + height, x, y + height - r);
        self.line_to(x, y + r);
        self.quadratic_curve_to(x, y, x + r, y);
        self.close_path();
    }

    /// Close path
    pub fn close_path(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }

    /// Get commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Lower to a tiny-skia path.
    ///
    /// tiny-skia has no rounded-rect primitive, so `RoundRect` commands are
    /// expanded through [`Path2D::round_rect_polyfill`]. Returns `None` for
    /// empty or degenerate paths.
    pub fn to_skia(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for command in &self.commands {
            lower_command(&mut pb, *command);
        }
        pb.finish()
    }
}

fn lower_command(pb: &mut PathBuilder, command: PathCommand) {
    match command {
        PathCommand::MoveTo(x, y) => pb.move_to(x, y),
        PathCommand::LineTo(x, y) => pb.line_to(x, y),
        PathCommand::QuadraticCurveTo { cpx, cpy, x, y } => pb.quad_to(cpx, cpy, x, y),
        PathCommand::RoundRect { x, y, width, height, radius } => {
            let mut expanded = Path2D::new();
            expanded.round_rect_polyfill(x, y, width, height, radius);
            for sub in expanded.commands {
                lower_command(pb, sub);
            }
        }
        PathCommand::ClosePath => pb.close(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_path_basic() {
        let mut path = Path2D::new();
        path.move_to(10.0, 10.0);
        path.line_to(100.0, 10.0);
        path.line_to(100.0, 100.0);
        path.close_path();

        assert_eq!(path.commands().len(), 4);
        assert!(path.to_skia().is_some());
    }

    #[test]
    fn test_round_rect_polyfill_uses_quadratics() {
        let mut path = Path2D::new();
        path.round_rect_polyfill(0.0, 0.0, 50.0, 40.0, 8.0);

        let curves = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::QuadraticCurveTo { .. }))
            .count();
        assert_eq!(curves, 4);
    }

    #[test]
    fn test_round_rect_radius_clamped() {
        let mut path = Path2D::new();
        path.round_rect_polyfill(0.0, 0.0, 10.0, 10.0, 40.0);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(5.0, 0.0));
    }

    #[test]
    fn test_round_rect_lowers_to_bounds() {
        let mut path = Path2D::new();
        path.round_rect(10.0, 20.0, 50.0, 30.0, 6.0);

        let skia = path.to_skia().unwrap();
        let bounds = skia.bounds();
        assert_relative_eq!(bounds.left(), 10.0);
        assert_relative_eq!(bounds.top(), 20.0);
        assert_relative_eq!(bounds.right(), 60.0);
        assert_relative_eq!(bounds.bottom(), 50.0);
    }

    #[test]
    fn test_empty_path() {
        assert!(Path2D::new().to_skia().is_none());
    }
}
