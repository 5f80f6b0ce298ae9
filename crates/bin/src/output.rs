//! Output formatting helpers for human-readable and JSON output.

use pixelsync::Rgb;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Render painted pixels as aligned `x  y  color` rows.
pub fn pixel_table(pixels: &[((u32, u32), Rgb)]) -> Vec<String> {
    if pixels.is_empty() {
        return Vec::new();
    }

    let rows: Vec<[String; 3]> = pixels
        .iter()
        .map(|((x, y), color)| [x.to_string(), y.to_string(), color.to_string()])
        .collect();
    let headers = ["X", "Y", "COLOR"];

    // Column widths: max of header and all row values
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: [&str; 3]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(line(headers))
        .chain(
            rows.iter()
                .map(|[x, y, color]| line([x.as_str(), y.as_str(), color.as_str()])),
        )
        .collect()
}
