//! Point sources: delimited files and random instances.
//!
//! Files hold one point per row with two numeric columns separated by
//! commas, semicolons, tabs or spaces. An optional header row is skipped;
//! when it names `x` and `y` columns those are used, so wider tables work
//! too. Blank lines and lines starting with `#` are ignored.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Coordinate range of generated points, integer-valued.
pub const DEFAULT_COORD_RANGE: Range<i64> = 1..100;

/// Where the points of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointSource {
    /// Delimited file.
    File(PathBuf),
    /// `count` random points in [`DEFAULT_COORD_RANGE`].
    Random { count: usize },
}

impl PointSource {
    /// Loads or generates the points. `rng` is only consumed by
    /// [`PointSource::Random`].
    pub fn load<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Point>> {
        match self {
            PointSource::File(path) => read_points(path),
            PointSource::Random { count } => Ok(random_points(*count, rng)),
        }
    }
}

/// Reads points from a delimited file.
pub fn read_points(path: &Path) -> Result<Vec<Point>> {
    let input = fs::read_to_string(path).map_err(|e| {
        Error::invalid_input(format!("failed to read {}: {e}", path.display()))
    })?;
    parse_points(&input)
        .map_err(|e| Error::invalid_input(format!("{}: {e}", path.display())))
}

/// Parses delimited point rows.
pub fn parse_points(input: &str) -> Result<Vec<Point>> {
    let mut columns: Option<(usize, usize)> = None;
    let mut points = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = split_fields(line);

        if columns.is_none() && points.is_empty() && !is_numeric_row(&fields) {
            columns = Some(header_columns(&fields, idx + 1)?);
            continue;
        }

        let (xi, yi) = match columns {
            Some(cols) => cols,
            None if fields.len() == 2 => (0, 1),
            None => {
                return Err(Error::invalid_input(format!(
                    "line {}: expected 2 columns but got {}: {line}",
                    idx + 1,
                    fields.len()
                )));
            }
        };

        let x = parse_coord(&fields, xi, "x", idx + 1)?;
        let y = parse_coord(&fields, yi, "y", idx + 1)?;
        points.push(Point::new(x, y));
    }

    Ok(points)
}

/// `count` points with integer coordinates drawn uniformly from
/// [`DEFAULT_COORD_RANGE`].
pub fn random_points<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Point> {
    random_points_in(count, DEFAULT_COORD_RANGE, rng)
}

/// `count` points with integer coordinates drawn uniformly from `range` on
/// both axes.
///
/// # Panics
///
/// If `range` is empty.
pub fn random_points_in<R: Rng + ?Sized>(count: usize, range: Range<i64>, rng: &mut R) -> Vec<Point> {
    (0..count)
        .map(|_| {
            let x = rng.random_range(range.clone());
            let y = rng.random_range(range.clone());
            Point::new(x as f64, y as f64)
        })
        .collect()
}

/// Writes a closed tour as `x,y` rows, repeating the first point at the end.
pub fn write_tour(path: &Path, points: &[Point], order: &[usize]) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        Error::invalid_input(format!("failed to create {}: {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);
    writeln!(out, "x,y")?;
    for &i in order.iter().chain(order.first()) {
        writeln!(out, "{}", points[i])?;
    }
    out.flush()?;
    Ok(())
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split([',', ';', '\t', ' '])
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect()
}

fn is_numeric_row(fields: &[&str]) -> bool {
    !fields.is_empty() && fields.iter().all(|f| f.parse::<f64>().is_ok())
}

fn header_columns(fields: &[&str], line: usize) -> Result<(usize, usize)> {
    let find = |name: &str| fields.iter().position(|f| f.eq_ignore_ascii_case(name));
    match (find("x"), find("y")) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ if fields.len() == 2 => Ok((0, 1)),
        _ => Err(Error::invalid_input(format!(
            "line {line}: header must name 'x' and 'y' columns: {}",
            fields.join(",")
        ))),
    }
}

fn parse_coord(fields: &[&str], col: usize, name: &str, line: usize) -> Result<f64> {
    let raw = fields.get(col).ok_or_else(|| {
        Error::invalid_input(format!("line {line}: missing {name} column"))
    })?;
    let value: f64 = raw.parse().map_err(|_| {
        Error::invalid_input(format!("line {line}: invalid {name} coordinate: {raw}"))
    })?;
    if !value.is_finite() {
        return Err(Error::invalid_input(format!(
            "line {line}: {name} coordinate must be finite: {raw}"
        )));
    }
    Ok(value)
}
