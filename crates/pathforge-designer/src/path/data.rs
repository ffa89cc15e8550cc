//! Ordered path command sequence with subpath queries and structural edits.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use pathforge_core::config::DEFAULT_PRECISION;
use pathforge_core::{EditorSettings, PathError, Point, Rect};
use serde::{Deserialize, Serialize};

use super::command::{AbsoluteCache, CommandType, Operands, PathCommand};
use super::converter;
use super::parser::{parse_path, parse_path_lossy, RawCommand};
use crate::geometry::{
    cubic_bounds, cubic_length, cubic_point, quadratic_bounds, quadratic_length, quadratic_point,
    split_cubic, split_quadratic, t_at_length,
};
use crate::matrix::{is_axis_aligned, Matrix};

/// Distance under which two points are treated as the same point.
pub(crate) const POINT_EPSILON: f64 = 1e-9;

/// The command list of one path element.
///
/// Every non-empty path starts with a Move and a Close is always the last
/// command of its subpath. All operands are absolute; the cached start,
/// end and handle points are refreshed after every edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathData {
    commands: Vec<PathCommand>,
}

fn pair(values: &[f64], i: usize) -> Point {
    Point::new(values[i], values[i + 1])
}

fn end_point(kind: CommandType, values: &[f64], cursor: Point, subpath_start: Point) -> Point {
    match kind {
        CommandType::MoveTo | CommandType::LineTo | CommandType::SmoothQuadTo => pair(values, 0),
        CommandType::HorizontalTo => Point::new(values[0], cursor.y),
        CommandType::VerticalTo => Point::new(cursor.x, values[0]),
        CommandType::CubicTo => pair(values, 4),
        CommandType::SmoothCubicTo | CommandType::QuadTo => pair(values, 2),
        CommandType::ArcTo => pair(values, 5),
        CommandType::Close => subpath_start,
    }
}

/// Formats a number with at most `precision` fractional digits.
pub(crate) fn format_number(value: f64, precision: u32) -> String {
    let mut text = format!("{:.*}", precision as usize, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Shortest form that parses back to the same `f64`.
fn format_exact(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds path data from raw commands, resolving relative operands.
    ///
    /// A missing leading Move is inserted at the origin, and a drawing
    /// command that follows a Close gets an explicit Move to the subpath
    /// start.
    pub fn analyze(raw: &[RawCommand]) -> Result<Self, PathError> {
        let mut commands = Vec::with_capacity(raw.len() + 1);
        let mut cursor = Point::ZERO;
        let mut subpath_start = Point::ZERO;
        let mut previous: Option<CommandType> = None;

        for (i, raw_command) in raw.iter().enumerate() {
            let (kind, relative) =
                CommandType::from_letter(raw_command.letter).ok_or_else(|| PathError::Parse {
                    offset: i,
                    reason: format!("unknown command '{}'", raw_command.letter),
                })?;
            if raw_command.values.len() != kind.operand_count() {
                return Err(PathError::OperandCount {
                    letter: raw_command.letter,
                    expected: kind.operand_count(),
                    actual: raw_command.values.len(),
                });
            }

            let needs_move = match previous {
                None => true,
                Some(CommandType::Close) => true,
                Some(_) => false,
            };
            if needs_move && kind != CommandType::MoveTo {
                commands.push(PathCommand::move_to(cursor));
                subpath_start = cursor;
            }

            let mut command =
                PathCommand::from_operands(kind, raw_command.values.iter().copied().collect());
            if relative {
                command.offset(cursor.x, cursor.y);
            }
            command.save_as_relative = relative;

            let end = end_point(kind, &command.values, cursor, subpath_start);
            if kind == CommandType::MoveTo {
                subpath_start = end;
            }
            cursor = end;
            previous = Some(kind);
            commands.push(command);
        }

        let mut data = Self { commands };
        data.refresh();
        Ok(data)
    }

    /// Parses path data, keeping whatever precedes the first malformed token.
    pub fn parse_lossy(input: &str) -> Self {
        let raw = parse_path_lossy(input);
        Self::analyze(&raw).unwrap_or_else(|err| {
            tracing::warn!(%err, "Discarding unreadable path data");
            Self::default()
        })
    }

    /// Wraps absolute commands, restoring the leading-Move invariant.
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        let mut data = Self { commands };
        data.normalize();
        data.refresh();
        data
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn command(&self, index: usize) -> Option<&PathCommand> {
        self.commands.get(index)
    }

    pub fn prev(&self, index: usize) -> Option<usize> {
        if index == 0 || index > self.commands.len() {
            None
        } else {
            Some(index - 1)
        }
    }

    pub fn next(&self, index: usize) -> Option<usize> {
        if index + 1 < self.commands.len() {
            Some(index + 1)
        } else {
            None
        }
    }

    fn out_of_range(&self, index: usize) -> PathError {
        PathError::IndexOutOfRange {
            index,
            len: self.commands.len(),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), PathError> {
        if index < self.commands.len() {
            Ok(())
        } else {
            Err(self.out_of_range(index))
        }
    }

    /// Index range of the subpath that contains `index`.
    pub fn segment_range(&self, index: usize) -> Option<Range<usize>> {
        if index >= self.commands.len() {
            return None;
        }
        let start = self.commands[..=index]
            .iter()
            .rposition(|c| c.kind == CommandType::MoveTo)
            .unwrap_or(0);
        let end = self.commands[index + 1..]
            .iter()
            .position(|c| c.kind == CommandType::MoveTo)
            .map_or(self.commands.len(), |offset| index + 1 + offset);
        Some(start..end)
    }

    /// Commands of the subpath that contains `index`.
    pub fn segment(&self, index: usize) -> Option<&[PathCommand]> {
        self.segment_range(index).map(|range| &self.commands[range])
    }

    /// Index ranges of every subpath, in order.
    pub fn segments(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut index = 0;
        while let Some(range) = self.segment_range(index) {
            index = range.end;
            ranges.push(range);
        }
        ranges
    }

    pub fn is_segment_closed(&self, index: usize) -> bool {
        self.segment(index)
            .and_then(|segment| segment.last())
            .is_some_and(|last| last.kind == CommandType::Close)
    }

    /// Recomputes cached absolute points for every command.
    pub(crate) fn refresh(&mut self) {
        let mut cursor = Point::ZERO;
        let mut subpath_start = Point::ZERO;
        let mut previous: Option<(CommandType, Option<Point>, Option<Point>)> = None;

        for command in &mut self.commands {
            let values = &command.values;
            let (handle_a, handle_b) = match command.kind {
                CommandType::CubicTo => (Some(pair(values, 0)), Some(pair(values, 2))),
                CommandType::SmoothCubicTo => {
                    let implied = match previous {
                        Some((kind, _, Some(b))) if kind.is_cubic() => b.reflect_about(&cursor),
                        _ => cursor,
                    };
                    (Some(implied), Some(pair(values, 0)))
                }
                CommandType::QuadTo => (Some(pair(values, 0)), None),
                CommandType::SmoothQuadTo => {
                    let implied = match previous {
                        Some((kind, Some(a), _)) if kind.is_quadratic() => a.reflect_about(&cursor),
                        _ => cursor,
                    };
                    (Some(implied), None)
                }
                _ => (None, None),
            };

            let end = end_point(command.kind, values, cursor, subpath_start);
            if command.kind == CommandType::MoveTo {
                subpath_start = end;
            }
            command.cache = AbsoluteCache {
                start: cursor,
                end,
                handle_a,
                handle_b,
            };
            previous = Some((command.kind, handle_a, handle_b));
            cursor = end;
        }
    }

    /// Restores the leading Move and the Move that must follow a Close.
    fn normalize(&mut self) {
        let Some(first) = self.commands.first() else {
            return;
        };
        if first.kind != CommandType::MoveTo {
            self.commands.insert(0, PathCommand::move_to(Point::ZERO));
        }

        let mut subpath_start = Point::ZERO;
        let mut i = 0;
        while i < self.commands.len() {
            match self.commands[i].kind {
                CommandType::MoveTo => subpath_start = pair(&self.commands[i].values, 0),
                CommandType::Close => {
                    if let Some(next) = self.commands.get(i + 1) {
                        if next.kind != CommandType::MoveTo {
                            self.commands
                                .insert(i + 1, PathCommand::move_to(subpath_start));
                        }
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Rewrites a smooth command at `index` into its explicit form.
    ///
    /// Called before any edit that changes the predecessor of `index`, so
    /// that the curve keeps its shape.
    pub(crate) fn canonicalize_smooth(&mut self, index: usize) {
        if let Some(command) = self.commands.get_mut(index) {
            if let Some(explicit) = converter::explicit_form(command) {
                *command = explicit;
            }
        }
    }

    /// Removes the command at `index`, dropping the edge that ends there.
    ///
    /// An open subpath is split at the removed point. A closed subpath is
    /// re-anchored at the removed point and reopened, with the closing edge
    /// written out as a Line. Removing a Move removes the edge after it, and
    /// removing a Close opens the subpath. Subpaths reduced to a lone Move
    /// are dropped.
    pub fn remove_command(&mut self, index: usize) -> Result<(), PathError> {
        let range = self
            .segment_range(index)
            .ok_or_else(|| self.out_of_range(index))?;
        let mut k = index - range.start;
        if k == 0 {
            k = 1;
        }

        if k >= range.len() {
            tracing::debug!(index, "Removing lone move");
            self.commands.drain(range);
            self.normalize();
            self.refresh();
            return Ok(());
        }

        let closed = self.commands[range.end - 1].kind == CommandType::Close;
        self.canonicalize_smooth(range.start + k + 1);
        if closed {
            self.canonicalize_smooth(range.start + 1);
        }

        let segment: Vec<PathCommand> = self.commands[range.clone()].to_vec();
        let last = segment.len() - 1;
        let mut anchor = PathCommand::move_to(segment[k].point());
        anchor.save_as_relative = segment[k].save_as_relative;

        let mut rebuilt = Vec::with_capacity(segment.len());
        if closed && k == last {
            if last > 1 {
                rebuilt.extend_from_slice(&segment[..last]);
            }
        } else if closed {
            let origin = segment[0].point();
            rebuilt.push(anchor);
            rebuilt.extend_from_slice(&segment[k + 1..last]);
            if !segment[last - 1].point().approx_eq(&origin, POINT_EPSILON) {
                rebuilt.push(PathCommand::line_to(origin));
            }
            rebuilt.extend_from_slice(&segment[1..k]);
            if rebuilt.len() == 1 {
                rebuilt.clear();
            }
        } else {
            if k > 1 {
                rebuilt.extend_from_slice(&segment[..k]);
            }
            if k < last {
                rebuilt.push(anchor);
                rebuilt.extend_from_slice(&segment[k + 1..]);
            }
        }

        tracing::debug!(index, closed, "Removing path command");
        self.commands.splice(range, rebuilt);
        self.normalize();
        self.refresh();
        Ok(())
    }

    /// Removes the whole subpath containing `index`.
    pub fn remove_segment(&mut self, index: usize) -> Result<(), PathError> {
        let range = self
            .segment_range(index)
            .ok_or_else(|| self.out_of_range(index))?;
        tracing::debug!(?range, "Removing subpath");
        self.commands.drain(range);
        self.refresh();
        Ok(())
    }

    /// Inserts an absolute command before `index` (or appends at `len`).
    pub fn insert_command(&mut self, index: usize, command: PathCommand) -> Result<(), PathError> {
        if index > self.commands.len() {
            return Err(self.out_of_range(index));
        }
        self.canonicalize_smooth(index);
        self.commands.insert(index, command);
        self.normalize();
        self.refresh();
        Ok(())
    }

    /// Replaces the command at `index` with `replacement`, keeping the
    /// relative preference of the original.
    pub(crate) fn replace_command(&mut self, index: usize, replacement: Vec<PathCommand>) {
        let relative = self.commands[index].save_as_relative;
        let replacement = replacement.into_iter().map(|mut command| {
            command.save_as_relative = relative;
            command
        });
        self.commands.splice(index..index + 1, replacement);
        self.normalize();
        self.refresh();
    }

    /// Splits the command at `index` at parameter `t` without changing the
    /// drawn geometry. The command at `index` afterwards ends on the new
    /// point.
    pub fn split_command(&mut self, index: usize, t: f64) -> Result<(), PathError> {
        self.check_index(index)?;
        if !(t > 0.0 && t < 1.0) {
            return Err(PathError::InvalidCommand {
                index,
                reason: format!("split parameter {t} outside (0, 1)"),
            });
        }
        if self.commands[index].kind == CommandType::MoveTo {
            return Err(PathError::InvalidCommand {
                index,
                reason: "a move has no extent to split".to_string(),
            });
        }

        self.canonicalize_smooth(index + 1);
        self.canonicalize_smooth(index);
        let command = &self.commands[index];
        let start = command.start();
        let end = command.point();

        let pieces = match command.kind {
            CommandType::LineTo | CommandType::Close => {
                vec![PathCommand::line_to(start.lerp(&end, t)), command.clone()]
            }
            CommandType::HorizontalTo | CommandType::VerticalTo => {
                let mid = start.lerp(&end, t);
                let value = if command.kind == CommandType::HorizontalTo {
                    mid.x
                } else {
                    mid.y
                };
                let first = PathCommand::from_operands(command.kind, Operands::from_slice(&[value]));
                vec![first, command.clone()]
            }
            CommandType::CubicTo => {
                let points = command.cubic_points().ok_or(PathError::EmptyPath)?;
                let (left, right) = split_cubic(&points, t);
                vec![
                    PathCommand::cubic_to(left[1], left[2], left[3]),
                    PathCommand::cubic_to(right[1], right[2], right[3]),
                ]
            }
            CommandType::QuadTo => {
                let points = command.quadratic_points().ok_or(PathError::EmptyPath)?;
                let (left, right) = split_quadratic(&points, t);
                vec![
                    PathCommand::quad_to(left[1], left[2]),
                    PathCommand::quad_to(right[1], right[2]),
                ]
            }
            CommandType::ArcTo => {
                let arc = command.arc().ok_or(PathError::EmptyPath)?;
                let mid = arc.point_at(t);
                match arc.to_center() {
                    Some(center) => {
                        let first_sweep = center.sweep_angle * t;
                        let second_sweep = center.sweep_angle - first_sweep;
                        let large = |sweep: f64| sweep.abs() > std::f64::consts::PI;
                        vec![
                            PathCommand::arc_to(
                                center.rx,
                                center.ry,
                                arc.x_rotation,
                                large(first_sweep),
                                arc.sweep,
                                mid,
                            ),
                            PathCommand::arc_to(
                                center.rx,
                                center.ry,
                                arc.x_rotation,
                                large(second_sweep),
                                arc.sweep,
                                end,
                            ),
                        ]
                    }
                    None => vec![PathCommand::line_to(mid), command.clone()],
                }
            }
            CommandType::MoveTo | CommandType::SmoothCubicTo | CommandType::SmoothQuadTo => {
                return Err(PathError::InvalidCommand {
                    index,
                    reason: "command cannot be split".to_string(),
                })
            }
        };

        tracing::debug!(index, t, "Splitting path command");
        let relative = self.commands[index].save_as_relative;
        let pieces = pieces.into_iter().map(|mut piece| {
            piece.save_as_relative = relative;
            piece
        });
        self.commands.splice(index..index + 1, pieces);
        self.refresh();
        Ok(())
    }

    /// Rewrites an `H`/`V` at `index` as a Line to its current end point.
    ///
    /// Their end point follows the previous command, so they are frozen
    /// before that command moves.
    pub(crate) fn freeze_axis_line(&mut self, index: usize) {
        if let Some(command) = self.commands.get_mut(index) {
            if matches!(
                command.kind,
                CommandType::HorizontalTo | CommandType::VerticalTo
            ) {
                let end = command.point();
                command.kind = CommandType::LineTo;
                command.values = Operands::from_slice(&[end.x, end.y]);
            }
        }
    }

    /// Moves the end point of the command at `index`, carrying the control
    /// handles attached to that point along. The commands after it keep
    /// their end points.
    pub fn set_point(&mut self, index: usize, point: Point) -> Result<(), PathError> {
        self.check_index(index)?;
        if self.commands[index].kind == CommandType::Close {
            let start = self
                .segment_range(index)
                .map_or(0, |range| range.start);
            return self.set_point(start, point);
        }
        self.freeze_axis_line(index + 1);

        let delta = point - self.commands[index].point();
        let command = &mut self.commands[index];
        let v = &mut command.values;
        match command.kind {
            CommandType::MoveTo | CommandType::LineTo | CommandType::SmoothQuadTo => {
                v[0] = point.x;
                v[1] = point.y;
            }
            CommandType::HorizontalTo | CommandType::VerticalTo => {
                command.kind = CommandType::LineTo;
                command.values = Operands::from_slice(&[point.x, point.y]);
            }
            CommandType::CubicTo => {
                v[2] += delta.x;
                v[3] += delta.y;
                v[4] = point.x;
                v[5] = point.y;
            }
            CommandType::SmoothCubicTo => {
                v[0] += delta.x;
                v[1] += delta.y;
                v[2] = point.x;
                v[3] = point.y;
            }
            CommandType::QuadTo => {
                v[2] = point.x;
                v[3] = point.y;
            }
            CommandType::ArcTo => {
                v[5] = point.x;
                v[6] = point.y;
            }
            CommandType::Close => {}
        }

        if let Some(next) = self.commands.get_mut(index + 1) {
            if next.kind == CommandType::CubicTo {
                next.values[0] += delta.x;
                next.values[1] += delta.y;
            }
        }

        self.refresh();
        Ok(())
    }

    /// Moves the end point of the command at `index` by `(dx, dy)`.
    pub fn offset(&mut self, index: usize, dx: f64, dy: f64) -> Result<(), PathError> {
        let current = self
            .command(index)
            .map(PathCommand::point)
            .ok_or_else(|| self.out_of_range(index))?;
        self.set_point(index, current + Point::new(dx, dy))
    }

    /// Translates the whole path.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for command in &mut self.commands {
            command.offset(dx, dy);
        }
        self.refresh();
    }

    /// Appends a Close to the subpath containing `index` if it has none.
    pub fn close_segment(&mut self, index: usize) -> Result<(), PathError> {
        let range = self
            .segment_range(index)
            .ok_or_else(|| self.out_of_range(index))?;
        if self.commands[range.end - 1].kind == CommandType::Close {
            return Ok(());
        }
        self.commands.insert(range.end, PathCommand::close());
        self.normalize();
        self.refresh();
        Ok(())
    }

    /// Applies an affine matrix to every command.
    ///
    /// Horizontal and vertical lines become plain lines unless the matrix
    /// is axis aligned.
    pub fn apply_matrix(&mut self, matrix: &Matrix) {
        if !is_axis_aligned(matrix) {
            for index in 0..self.commands.len() {
                self.freeze_axis_line(index);
            }
        }
        for command in &mut self.commands {
            command.apply_matrix(matrix);
        }
        self.refresh();
    }

    /// Converts the command at `index` to `to`, keeping its geometry.
    pub fn convert_command(&mut self, index: usize, to: CommandType) -> Result<(), PathError> {
        converter::convert_command(self, index, to)
    }

    /// Length of the command at `index` up to parameter `t`.
    pub fn command_length_at(&self, index: usize, t: f64, resolution: usize) -> Option<f64> {
        let command = self.commands.get(index)?;
        let t = t.clamp(0.0, 1.0);
        let length = match command.kind {
            CommandType::MoveTo => 0.0,
            CommandType::LineTo
            | CommandType::HorizontalTo
            | CommandType::VerticalTo
            | CommandType::Close => command.start().distance_to(&command.point()) * t,
            CommandType::CubicTo | CommandType::SmoothCubicTo => {
                cubic_length(&command.cubic_points()?, t)
            }
            CommandType::QuadTo | CommandType::SmoothQuadTo => {
                quadratic_length(&command.quadratic_points()?, t)
            }
            CommandType::ArcTo => command.arc()?.length_at(t, resolution),
        };
        Some(length)
    }

    pub fn command_length(&self, index: usize, resolution: usize) -> Option<f64> {
        self.command_length_at(index, 1.0, resolution)
    }

    /// Point on the command at `index` at parameter `t`.
    pub fn command_point_at(&self, index: usize, t: f64) -> Option<Point> {
        let command = self.commands.get(index)?;
        let point = match command.kind {
            CommandType::MoveTo => command.point(),
            CommandType::LineTo
            | CommandType::HorizontalTo
            | CommandType::VerticalTo
            | CommandType::Close => command.start().lerp(&command.point(), t),
            CommandType::CubicTo | CommandType::SmoothCubicTo => {
                cubic_point(&command.cubic_points()?, t)
            }
            CommandType::QuadTo | CommandType::SmoothQuadTo => {
                quadratic_point(&command.quadratic_points()?, t)
            }
            CommandType::ArcTo => command.arc()?.point_at(t),
        };
        Some(point)
    }

    /// Length of the subpath containing `index`.
    pub fn segment_length(&self, index: usize, resolution: usize) -> Option<f64> {
        let range = self.segment_range(index)?;
        Some(
            range
                .filter_map(|i| self.command_length(i, resolution))
                .sum(),
        )
    }

    pub fn total_length(&self, resolution: usize) -> f64 {
        (0..self.commands.len())
            .filter_map(|i| self.command_length(i, resolution))
            .sum()
    }

    /// Point at distance `length` along the path.
    ///
    /// Lengths past the end clamp to the final point; an empty path has
    /// no point.
    pub fn point_at_length(&self, length: f64, settings: &EditorSettings) -> Option<Point> {
        let resolution = settings.arc_length_resolution;
        let mut travelled = 0.0;

        for index in 0..self.commands.len() {
            let command_length = self.command_length(index, resolution)?;
            if command_length > 0.0 && travelled + command_length >= length {
                let local = (length - travelled).max(0.0);
                let t = t_at_length(
                    local,
                    command_length,
                    |t| self.command_length_at(index, t, resolution).unwrap_or(0.0),
                    settings.length_tolerance,
                    settings.max_length_iterations,
                );
                return self.command_point_at(index, t);
            }
            travelled += command_length;
        }

        self.commands.last().map(PathCommand::point)
    }

    /// Tight bounding box of the drawn geometry.
    pub fn bounds(&self) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        for command in &self.commands {
            let rect = match command.kind {
                CommandType::CubicTo | CommandType::SmoothCubicTo => {
                    command.cubic_points().map(|p| cubic_bounds(&p))
                }
                CommandType::QuadTo | CommandType::SmoothQuadTo => {
                    command.quadratic_points().map(|p| quadratic_bounds(&p))
                }
                CommandType::ArcTo => command.arc().map(|arc| arc.bounds()),
                CommandType::MoveTo => Some(Rect::from_corners(command.point(), command.point())),
                _ => Some(Rect::from_corners(command.start(), command.point())),
            };
            if let Some(rect) = rect {
                bounds = Some(match bounds {
                    Some(acc) => acc.union(&rect),
                    None => rect,
                });
            }
        }
        bounds
    }

    /// A copy whose commands all serialize as absolute.
    pub fn to_absolute(&self) -> Self {
        let mut data = self.clone();
        data.set_relative(false);
        data
    }

    pub fn set_relative(&mut self, relative: bool) {
        for command in &mut self.commands {
            command.save_as_relative = relative;
        }
    }

    /// Whether every operand is a finite number.
    pub fn is_finite(&self) -> bool {
        self.commands
            .iter()
            .all(|command| command.values.iter().all(|v| v.is_finite()))
    }

    /// Serializes as `M0,0 L1,1 Z` with at most `precision` fractional digits.
    pub fn to_path_string(&self, precision: u32) -> String {
        self.write_tokens(|v| format_number(v, precision))
    }

    /// Serializes without rounding. Absolute commands parse back to the
    /// same operands; relative ones up to the error of re-adding their
    /// start point.
    pub fn to_exact_string(&self) -> String {
        self.write_tokens(format_exact)
    }

    fn write_tokens(&self, format: impl Fn(f64) -> String) -> String {
        let mut tokens = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            let values: Vec<String> = command
                .output_values()
                .iter()
                .map(|v| format(*v))
                .collect();
            tokens.push(format!("{}{}", command.letter(), values.join(",")));
        }
        tokens.join(" ")
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string(DEFAULT_PRECISION))
    }
}

impl FromStr for PathData {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::analyze(&parse_path(s)?)
    }
}

impl TryFrom<String> for PathData {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PathData> for String {
    fn from(data: PathData) -> Self {
        data.to_exact_string()
    }
}
