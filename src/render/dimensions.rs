//! Cell-grid dimension calculation.

/// Default cell aspect ratio (height / width).
///
/// Emoji are roughly square in most fonts, so the default is 1.0. ASCII
/// palettes shown in a terminal look better with ~2.0, since terminal
/// characters are about twice as tall as they are wide.
pub const DEFAULT_CELL_ASPECT_RATIO: f64 = 1.0;

/// Calculate the number of rows for a grid `cell_width` cells wide.
///
/// Uses `round(cell_width / (source_aspect * cell_aspect))` where
/// `source_aspect` is `img_width / img_height`. Never returns less than one
/// row for a non-empty image.
///
/// # Arguments
/// * `img_width` - Width of the source image in pixels
/// * `img_height` - Height of the source image in pixels
/// * `cell_width` - Output width in cells
/// * `cell_aspect` - Cell aspect ratio (height / width), 1.0 for square cells
///
/// # Returns
/// The row count, or 0 when the image or requested width is empty.
pub fn calculate_cell_height(
    img_width: u32,
    img_height: u32,
    cell_width: u32,
    cell_aspect: f64,
) -> u32 {
    if img_width == 0 || img_height == 0 || cell_width == 0 {
        return 0;
    }

    let cell_aspect = if cell_aspect.is_finite() && cell_aspect > 0.0 {
        cell_aspect
    } else {
        DEFAULT_CELL_ASPECT_RATIO
    };

    // Taller cells need proportionally fewer rows to keep the picture's shape
    let img_aspect = img_width as f64 / img_height as f64;
    let rows = (cell_width as f64 / (img_aspect * cell_aspect)).round();

    (rows as u32).max(1)
}
