use std::path::Path;

use ratatui::style::Color;
use warbler_client_shared::cover_art_cache::ClientData;

pub type CoverArtCache = warbler_client_shared::cover_art_cache::CoverArtCache<ArtColors>;

/// 4 columns × 2 rows of colours extracted from album art, drawn with
/// half-block characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtColors {
    /// Colors arranged as [row][col], where row 0 is top, col 0 is left.
    pub colors: [[Color; 4]; 2],
}

impl Default for ArtColors {
    fn default() -> Self {
        Self {
            colors: [[Color::DarkGray; 4]; 2],
        }
    }
}

impl ClientData for ArtColors {
    fn from_thumbnail(thumbnail: &image::RgbaImage, _path: &Path) -> Self {
        compute_region_colors(thumbnail)
    }
}

/// Computes the average colour of each region in a 4×2 grid (4 cols, 2 rows).
fn compute_region_colors(image: &image::RgbaImage) -> ArtColors {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w == 0 || h == 0 {
        return ArtColors::default();
    }

    let average_region = |x0: usize, y0: usize, x1: usize, y1: usize| -> Color {
        let mut sums = [0u64; 3];
        let mut count: u64 = 0;
        for y in y0..y1.min(h) {
            for x in x0..x1.min(w) {
                let pixel = image.get_pixel(x as u32, y as u32);
                for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                    *sum += channel as u64;
                }
                count += 1;
            }
        }
        if count == 0 {
            return Color::DarkGray;
        }
        Color::Rgb(
            (sums[0] / count) as u8,
            (sums[1] / count) as u8,
            (sums[2] / count) as u8,
        )
    };

    let col_width = w / 4;
    let row_height = h / 2;

    let mut colors = [[Color::DarkGray; 4]; 2];
    for (row, row_colors) in colors.iter_mut().enumerate() {
        for (col, color) in row_colors.iter_mut().enumerate() {
            let x0 = col * col_width;
            let y0 = row * row_height;
            let x1 = if col == 3 { w } else { (col + 1) * col_width };
            let y1 = if row == 1 { h } else { (row + 1) * row_height };
            *color = average_region(x0, y0, x1.max(x0 + 1), y1.max(y0 + 1));
        }
    }

    ArtColors { colors }
}
