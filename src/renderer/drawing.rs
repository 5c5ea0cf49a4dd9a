use crate::models::clamp_percent;

pub const FILLED: char = '█';
pub const EMPTY: char = '░';

/// `[████░░░░]` with the filled share proportional to `percentage`, always
/// `width` glyphs between the brackets.
pub fn progress_bar(percentage: f32, width: usize) -> String {
    let percentage = clamp_percent(percentage);
    let filled = ((percentage / 100.0) * width as f32).round() as usize;
    let filled = filled.min(width);

    let mut bar = String::with_capacity(width * FILLED.len_utf8() + 2);
    bar.push('[');
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar.push(']');
    bar
}

pub fn horizontal_line(width: usize) -> String {
    "─".repeat(width)
}

/// Cuts `text` to `width` characters and pads it back out, so columns line
/// up regardless of name length.
pub fn column(text: &str, width: usize) -> String {
    let cut: String = text.chars().take(width).collect();
    format!("{:<width$}", cut, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(bar: &str, glyph: char) -> usize {
        bar.chars().filter(|c| *c == glyph).count()
    }

    #[test]
    fn test_progress_bar_ratio() {
        let bar = progress_bar(50.0, 10);
        assert_eq!(bar, "[█████░░░░░]");

        let bar = progress_bar(37.5, 40);
        assert_eq!(count(&bar, FILLED), 15);
        assert_eq!(count(&bar, EMPTY), 25);
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 4), "[░░░░]");
        assert_eq!(progress_bar(100.0, 4), "[████]");
        assert_eq!(progress_bar(250.0, 4), "[████]");
        assert_eq!(progress_bar(-10.0, 4), "[░░░░]");
        assert_eq!(progress_bar(f32::NAN, 4), "[░░░░]");
    }

    #[test]
    fn test_progress_bar_fixed_width() {
        for pct in [0.0, 1.0, 33.3, 66.6, 99.9, 100.0] {
            assert_eq!(progress_bar(pct, 25).chars().count(), 27);
        }
    }

    #[test]
    fn test_column() {
        assert_eq!(column("eth0", 6), "eth0  ");
        assert_eq!(column("enx0024278838ca", 6), "enx002");
    }
}
