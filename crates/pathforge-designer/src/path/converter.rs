//! Command type conversion that keeps the drawn geometry.

use pathforge_core::{PathError, Point};

use super::command::{CommandType, PathCommand};
use super::data::{PathData, POINT_EPSILON};
use crate::geometry::{CenterArc, EndpointArc};

/// Largest arc span approximated by a single cubic.
const MAX_ARC_SPAN: f64 = 2.0 * std::f64::consts::PI / 3.0;

/// `S` as `C` and `T` as `Q`, using the cached implied handle.
pub(crate) fn explicit_form(command: &PathCommand) -> Option<PathCommand> {
    let handle = command.handle_a()?;
    let v = command.values();
    let explicit = match command.kind() {
        CommandType::SmoothCubicTo => PathCommand::cubic_to(
            handle,
            Point::new(v[0], v[1]),
            Point::new(v[2], v[3]),
        ),
        CommandType::SmoothQuadTo => PathCommand::quad_to(handle, Point::new(v[0], v[1])),
        _ => return None,
    };
    Some(PathCommand {
        save_as_relative: command.is_relative(),
        cache: command.cache,
        ..explicit
    })
}

fn arc_derivative(arc: &CenterArc, angle: f64) -> Point {
    let (sin_a, cos_a) = angle.sin_cos();
    let (sin_phi, cos_phi) = arc.phi.sin_cos();
    Point::new(
        -arc.rx * sin_a * cos_phi - arc.ry * cos_a * sin_phi,
        -arc.rx * sin_a * sin_phi + arc.ry * cos_a * cos_phi,
    )
}

fn push_arc_cubics(arc: &CenterArc, start: f64, sweep: f64, out: &mut Vec<[Point; 4]>) {
    if sweep.abs() > MAX_ARC_SPAN {
        let half = sweep / 2.0;
        push_arc_cubics(arc, start, half, out);
        push_arc_cubics(arc, start + half, half, out);
        return;
    }
    let end = start + sweep;
    let kappa = 4.0 / 3.0 * (sweep / 4.0).tan();
    let p0 = arc.point_at_angle(start);
    let p3 = arc.point_at_angle(end);
    let c1 = p0 + arc_derivative(arc, start) * kappa;
    let c2 = p3 - arc_derivative(arc, end) * kappa;
    out.push([p0, c1, c2, p3]);
}

/// Cubic approximation of an elliptical arc, one cubic per span of at most
/// 120 degrees. A degenerate arc becomes a single straight cubic.
pub fn arc_to_cubics(arc: &EndpointArc) -> Vec<[Point; 4]> {
    let Some(center) = arc.to_center() else {
        let third = (arc.to - arc.from) * (1.0 / 3.0);
        return vec![[arc.from, arc.from + third, arc.to - third, arc.to]];
    };

    let mut cubics = Vec::new();
    push_arc_cubics(&center, center.start_angle, center.sweep_angle, &mut cubics);
    if let Some(first) = cubics.first_mut() {
        first[0] = arc.from;
    }
    if let Some(last) = cubics.last_mut() {
        last[3] = arc.to;
    }
    cubics
}

/// True when `command`'s first handle is the reflection a smooth command
/// would imply after `previous`.
fn handle_is_implied(command: &PathCommand, previous: Option<&PathCommand>) -> bool {
    let Some(handle) = command.handle_a() else {
        return false;
    };
    let start = command.start();
    let implied = match previous {
        Some(prev) if command.kind().is_cubic() && prev.kind().is_cubic() => {
            prev.handle_b().map(|b| b.reflect_about(&start))
        }
        Some(prev) if command.kind().is_quadratic() && prev.kind().is_quadratic() => {
            prev.handle_a().map(|a| a.reflect_about(&start))
        }
        _ => Some(start),
    };
    implied.is_some_and(|p| p.approx_eq(&handle, POINT_EPSILON))
}

fn converted(
    command: &PathCommand,
    previous: Option<&PathCommand>,
    to: CommandType,
) -> Result<Vec<PathCommand>, PathError> {
    use CommandType::*;

    let from = command.kind();
    let start = command.start();
    let end = command.point();
    let unsupported = || PathError::UnsupportedConversion {
        from: from.letter(),
        to: to.letter(),
    };
    let is_line = matches!(from, LineTo | HorizontalTo | VerticalTo);

    let result = match (from, to) {
        (MoveTo | Close, _) | (_, MoveTo | Close) => return Err(unsupported()),
        (_, LineTo) => vec![PathCommand::line_to(end)],
        (_, HorizontalTo) if is_line && (start.y - end.y).abs() <= POINT_EPSILON => {
            vec![PathCommand::new(HorizontalTo, &[end.x])?]
        }
        (_, VerticalTo) if is_line && (start.x - end.x).abs() <= POINT_EPSILON => {
            vec![PathCommand::new(VerticalTo, &[end.y])?]
        }
        (_, CubicTo) if is_line => {
            let third = (end - start) * (1.0 / 3.0);
            vec![PathCommand::cubic_to(start + third, end - third, end)]
        }
        (_, QuadTo) if is_line => vec![PathCommand::quad_to(start.lerp(&end, 0.5), end)],
        (SmoothCubicTo, CubicTo) | (SmoothQuadTo, QuadTo) => {
            vec![explicit_form(command).ok_or_else(unsupported)?]
        }
        (QuadTo | SmoothQuadTo, CubicTo) => {
            let control = command.handle_a().ok_or_else(unsupported)?;
            vec![PathCommand::cubic_to(
                start + (control - start) * (2.0 / 3.0),
                end + (control - end) * (2.0 / 3.0),
                end,
            )]
        }
        (ArcTo, CubicTo) => {
            let arc = command.arc().ok_or_else(unsupported)?;
            arc_to_cubics(&arc)
                .into_iter()
                .map(|p| PathCommand::cubic_to(p[1], p[2], p[3]))
                .collect()
        }
        (CubicTo, SmoothCubicTo) if handle_is_implied(command, previous) => {
            let b = command.handle_b().ok_or_else(unsupported)?;
            vec![PathCommand::new(SmoothCubicTo, &[b.x, b.y, end.x, end.y])?]
        }
        (QuadTo, SmoothQuadTo) if handle_is_implied(command, previous) => {
            vec![PathCommand::new(SmoothQuadTo, &[end.x, end.y])?]
        }
        _ => return Err(unsupported()),
    };
    Ok(result)
}

/// Converts the command at `index` of `path` to `to`.
///
/// Same-type conversion is a no-op. A smooth command following `index` is
/// first made explicit so that its shape survives the change of its
/// predecessor. The converted commands keep the relative preference.
pub fn convert_command(path: &mut PathData, index: usize, to: CommandType) -> Result<(), PathError> {
    let command = path.command(index).ok_or(PathError::IndexOutOfRange {
        index,
        len: path.len(),
    })?;
    if command.kind() == to {
        return Ok(());
    }

    let previous = index.checked_sub(1).and_then(|i| path.command(i));
    let replacement = converted(command, previous, to)?;

    tracing::debug!(index, from = %command.kind().letter(), to = %to.letter(), "Converting path command");
    path.canonicalize_smooth(index + 1);
    path.replace_command(index, replacement);
    Ok(())
}
