//! CSV serialization of gravity results: one header row, one row per
//! field point, vector quantities space-separated inside brackets.

use std::io::Write;
use std::path::Path;

use crate::error::CliError;
use gravity_kernel::{GravityResult, Vec3};

const HEADER: &str =
    "Point P,Potential [m^2/s^2],Acceleration [m/s^2],Second Derivative Gravity Tensor [1/s^2]";

/// Writes the result table to any writer.
pub fn write_csv<W: Write>(
    mut writer: W,
    points: &[Vec3],
    results: &[GravityResult],
) -> std::io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for (point, result) in points.iter().zip(results.iter()) {
        let a = result.acceleration;
        let t = result.tensor;
        writeln!(
            writer,
            "[{} {} {}],{},[{} {} {}],[{} {} {} {} {} {}]",
            point.x,
            point.y,
            point.z,
            result.potential,
            a.x,
            a.y,
            a.z,
            t.xx,
            t.yy,
            t.zz,
            t.xy,
            t.xz,
            t.yz,
        )?;
    }
    Ok(())
}

/// Writes the result table to a file, creating or truncating it.
pub fn write_csv_file(
    path: &Path,
    points: &[Vec3],
    results: &[GravityResult],
) -> Result<(), CliError> {
    let file = std::fs::File::create(path).map_err(|source| CliError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(std::io::BufWriter::new(file), points, results).map_err(|source| {
        CliError::Output {
            path: path.to_path_buf(),
            source,
        }
    })
}
