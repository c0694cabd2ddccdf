use anyhow::{Context, bail};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use wifiplan_common::{Coord, Grid, Instance};

fn numbers<const N: usize>(line: Option<&str>, what: &str) -> anyhow::Result<[i64; N]> {
    let line = line.with_context(|| format!("missing {} line", what))?;
    let parsed: Vec<i64> = line
        .split_whitespace()
        .map(|t| t.parse::<i64>().with_context(|| format!("bad number '{}' in {} line", t, what)))
        .collect::<anyhow::Result<_>>()?;
    parsed
        .try_into()
        .map_err(|v: Vec<i64>| anyhow::anyhow!("{} line needs {} numbers, found {}", what, N, v.len()))
}

fn non_negative(value: i64, what: &str) -> anyhow::Result<u32> {
    u32::try_from(value).with_context(|| format!("{} must be a non-negative 32-bit value, got {}", what, value))
}

/// Parses an instance:
///
/// ```text
/// H W R
/// backbone_cost router_cost budget
/// origin_row origin_col
/// <H rows of W cells: '.' target, '#' wall, '-' void>
/// ```
pub fn parse_instance(text: &str) -> anyhow::Result<Instance> {
    let mut lines = text.lines();

    let [height, width, range] = numbers::<3>(lines.next(), "size")?;
    let [backbone_cost, router_cost, budget] = numbers::<3>(lines.next(), "cost")?;
    let [origin_row, origin_col] = numbers::<2>(lines.next(), "origin")?;

    let height = non_negative(height, "height")?;
    let width = non_negative(width, "width")?;
    let range = non_negative(range, "router range")?;
    let origin = Coord::new(
        non_negative(origin_row, "origin row")?,
        non_negative(origin_col, "origin column")?,
    );

    let rows: Vec<&str> = lines.take(height as usize).map(str::trim_end).collect();
    if rows.len() != height as usize {
        bail!("expected {} grid rows, found {}", height, rows.len());
    }
    let grid = Grid::from_rows(&rows)?;
    if grid.width() != width {
        bail!("header says width {}, rows have {}", width, grid.width());
    }

    Ok(Instance::new(grid, range, router_cost, backbone_cost, budget, origin)?)
}

pub fn load_instance(path: &Path) -> anyhow::Result<Instance> {
    log::info!("Loading instance: {:?}", path);
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let instance = parse_instance(&text).with_context(|| format!("invalid instance file {:?}", path))?;
    log::info!(
        "Building {}x{}: {} target cells, range {}, budget {}",
        instance.grid.height(),
        instance.grid.width(),
        instance.grid.target_count(),
        instance.router_range,
        instance.budget
    );
    Ok(instance)
}

pub fn write_instance<W: Write>(out: &mut W, instance: &Instance) -> std::io::Result<()> {
    writeln!(
        out,
        "{} {} {}",
        instance.grid.height(),
        instance.grid.width(),
        instance.router_range
    )?;
    writeln!(
        out,
        "{} {} {}",
        instance.backbone_cost, instance.router_cost, instance.budget
    )?;
    writeln!(
        out,
        "{} {}",
        instance.backbone_origin.row, instance.backbone_origin.col
    )?;
    for row in instance.grid.rows() {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

pub fn save_instance(path: &Path, instance: &Instance) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
    write_instance(&mut file, instance)?;
    Ok(())
}

/// Reads `row col` pairs, one router per line. Blank lines and `#` comments
/// are skipped.
pub fn load_routers(path: &Path) -> anyhow::Result<Vec<Coord>> {
    let file = File::open(path).with_context(|| format!("failed to open {:?}", path))?;
    let mut routers = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let [row, col] = numbers::<2>(Some(line), "router")
            .with_context(|| format!("{:?} line {}", path, n + 1))?;
        routers.push(Coord::new(non_negative(row, "row")?, non_negative(col, "col")?));
    }
    Ok(routers)
}
