//! File surfaces: point/factor readers and curve/grid writers.
//!
//! The line format is `{x, y, z}` with optional braces and a z that defaults
//! to 0 when absent. Numbers are parsed and printed in C-locale form; writes
//! use round-tripping float formatting.

use std::fmt;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shadow::LightGrid;
use crate::Vec3;

/// Errors naming the offending path (and line, for parse failures).
#[derive(Debug)]
pub enum IoError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::Read { path, source } => write!(f, "reading {}: {source}", path.display()),
            IoError::Write { path, source } => write!(f, "writing {}: {source}", path.display()),
            IoError::Parse { path, line, reason } => {
                write!(f, "parsing {} line {line}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for IoError {}

/// Read `{x, y, z}` lines into points. Blank lines are skipped; a missing z
/// defaults to 0.
pub fn read_points(path: &Path) -> Result<Vec<Vec3>, IoError> {
    let text = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let body = line.strip_prefix('{').unwrap_or(line);
        let body = body.strip_suffix('}').unwrap_or(body);
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(parse_err(path, idx, format!("expected 2 or 3 coordinates, got {}", parts.len())));
        }
        let x = parse_float(path, idx, parts[0])?;
        let y = parse_float(path, idx, parts[1])?;
        let z = match parts.get(2) {
            Some(s) => parse_float(path, idx, s)?,
            None => 0.0,
        };
        out.push(Vec3::new(x, y, z));
    }
    Ok(out)
}

/// Read one scalar per line. Blank lines are skipped.
pub fn read_factors(path: &Path) -> Result<Vec<f64>, IoError> {
    let text = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        out.push(parse_float(path, idx, line)?);
    }
    Ok(out)
}

/// Write one `{x, y, z}` line per point, no trailing newline.
pub fn write_curve(path: &Path, points: &[Vec3]) -> Result<(), IoError> {
    let body: Vec<String> = points
        .iter()
        .map(|p| format!("{{{:?}, {:?}, {:?}}}", p.x, p.y, p.z))
        .collect();
    fs::write(path, body.join("\n")).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write alternating center/hours lines, row-major over (row, col).
pub fn write_light_grid(path: &Path, grid: &LightGrid) -> Result<(), IoError> {
    let mut body = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let c = grid.center(col, row);
            let _ = writeln!(body, "{{{:?}, {:?}, {:?}}}", c.x, c.y, c.z);
            let _ = writeln!(body, "{}", grid.hours(col, row));
        }
    }
    fs::write(path, body).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_float(path: &Path, idx: usize, token: &str) -> Result<f64, IoError> {
    token
        .parse::<f64>()
        .map_err(|_| parse_err(path, idx, format!("not a number: {token:?}")))
}

fn parse_err(path: &Path, idx: usize, reason: String) -> IoError {
    IoError::Parse {
        path: path.to_path_buf(),
        line: idx + 1,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_with_and_without_braces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "{1.5, 2.5, 3.5}\n10, 20\n\n{ -4 , 5 }").unwrap();
        let pts = read_points(&path).unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], Vec3::new(1.5, 2.5, 3.5));
        // z defaults to 0 when omitted.
        assert_eq!(pts[1], Vec3::new(10.0, 20.0, 0.0));
        assert_eq!(pts[2], Vec3::new(-4.0, 5.0, 0.0));
    }

    #[test]
    fn parse_errors_name_path_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "{1, 2, 3}\n{nope, 2}").unwrap();
        let err = read_points(&path).unwrap_err();
        match err {
            IoError::Parse { line, ref reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("nope"));
            }
            other => panic!("unexpected error: {other}"),
        }
        let msg = format!("{err}");
        assert!(msg.contains("bad.csv"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_points(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn factors_parse_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factors.csv");
        fs::write(&path, "0.5\n1.25\n\n3\n").unwrap();
        assert_eq!(read_factors(&path).unwrap(), vec![0.5, 1.25, 3.0]);
    }

    #[test]
    fn curve_roundtrips_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crv.csv");
        let pts = vec![Vec3::new(0.5, -1.25, 0.0), Vec3::new(1e-3, 2.0, 300.0)];
        write_curve(&path, &pts).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.ends_with('\n'));
        assert_eq!(read_points(&path).unwrap(), pts);
    }

    #[test]
    fn light_grid_writer_emits_center_hours_pairs() {
        use crate::shadow::ShadowRaster;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lighting.csv");
        let raster = ShadowRaster::new(Vec::new(), Vec::new(), 200.0, 100.0, 100.0, true).unwrap();
        write_light_grid(&path, raster.grid()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // 2x1 grid: a coordinate line and an hours line per cell.
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "{50.0, 50.0, 0.0}");
        assert_eq!(lines[1], "0");
        assert_eq!(lines[2], "{150.0, 50.0, 0.0}");
        assert_eq!(lines[3], "0");
    }
}
