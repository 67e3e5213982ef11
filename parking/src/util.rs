use std::path::Path;

use anyhow::{anyhow, Context};
use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::{Cell, ParkingGrid};

/// Parse rows of comma separated integers. Blank lines are skipped; the values are not checked
/// against 0/1 here, that is left to grid validation.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<i64>>, anyhow::Error> {
    let mut rows = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let row = line
            .split(',')
            .enumerate()
            .map(|(col, field)| {
                field.trim().parse::<i64>().map_err(|e| {
                    anyhow!(
                        "line {}, column {}: invalid value {:?}: {}",
                        line_no + 1,
                        col + 1,
                        field.trim(),
                        e
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse a JSON array of arrays of integers
pub fn parse_json(text: &str) -> Result<Vec<Vec<i64>>, anyhow::Error> {
    serde_json::from_str(text).context("grid must be a JSON array of integer arrays")
}

/// Dark pixels (red channel below 128) are occupied spots, everything else is empty
pub fn parse_img(img: &DynamicImage) -> Result<ParkingGrid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut cells = vec![vec![Cell::Empty; width]; height];

    for (row, cells_row) in cells.iter_mut().enumerate() {
        for (col, cell) in cells_row.iter_mut().enumerate() {
            let p = img.get_pixel(col as u32, row as u32);

            if p.0[0] < 128 {
                *cell = Cell::Occupied;
            }
        }
    }

    Ok(ParkingGrid::from_cells(cells)?)
}

/// Load a grid from disk, picking the format from the file extension (`csv`, `json`, else image)
pub fn load_grid(path: impl AsRef<Path>) -> Result<ParkingGrid, anyhow::Error> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let grid = match extension.as_deref() {
        Some("csv") | Some("json") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let values = if extension.as_deref() == Some("csv") {
                parse_csv(&text)?
            } else {
                parse_json(&text)?
            };
            ParkingGrid::new(&values)?
        }
        _ => {
            let img = image::open(path)
                .with_context(|| format!("failed to open image {}", path.display()))?;
            parse_img(&img)?
        }
    };

    debug!(
        "loaded {}x{} grid from {}",
        grid.rows(),
        grid.columns(),
        path.display()
    );

    Ok(grid)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::GridError;
    use image::{GrayImage, Luma};

    #[test]
    fn test_parse_csv() {
        let rows = parse_csv("0,1,0\n 1 , 0, 0\n\n0,0,1\n").unwrap();
        assert_eq!(rows, vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_parse_csv_reports_position() {
        let err = parse_csv("0,1\n0,x\n").unwrap_err();
        assert!(err.to_string().contains("line 2, column 2"), "{}", err);
    }

    #[test]
    fn test_csv_values_are_validated_by_grid() {
        let rows = parse_csv("0,2\n1,0\n").unwrap();
        assert!(matches!(
            ParkingGrid::new(&rows),
            Err(GridError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_parse_json() {
        assert_eq!(parse_json("[[0,1],[1,0]]").unwrap(), vec![vec![0, 1], vec![1, 0]]);
        assert!(parse_json("[[0,1],[\"a\"]]").is_err());
    }

    #[test]
    fn test_parse_img() {
        let mut img = GrayImage::from_pixel(3, 2, Luma([255]));
        img.put_pixel(1, 0, Luma([0]));
        img.put_pixel(2, 1, Luma([40]));

        let grid = parse_img(&DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(grid.to_values(), vec![vec![0, 1, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_load_grid_from_files() {
        let dir = std::env::temp_dir().join(format!("parking-util-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let csv = dir.join("grid.csv");
        std::fs::write(&csv, "0,1\n1,0\n").unwrap();
        assert_eq!(load_grid(&csv).unwrap().to_values(), vec![vec![0, 1], vec![1, 0]]);

        let json = dir.join("grid.JSON");
        std::fs::write(&json, "[[1,1,0]]").unwrap();
        assert_eq!(load_grid(&json).unwrap().to_values(), vec![vec![1, 1, 0]]);

        let ragged = dir.join("ragged.csv");
        std::fs::write(&ragged, "0,1\n1\n").unwrap();
        let err = load_grid(&ragged).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GridError>(),
            Some(GridError::InvalidGrid { .. })
        ));

        assert!(load_grid(dir.join("missing.csv")).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
