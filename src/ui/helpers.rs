use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Render a fixed-width text gauge like `#####---------` for a done/total
/// pair. Zero total draws an empty track.
pub(crate) fn gauge_line(done: usize, total: usize, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let filled = if total == 0 {
        0
    } else {
        (done * width + total / 2) / total
    };
    let filled = filled.min(width);
    let mut line = String::with_capacity(width);
    line.push_str(&"#".repeat(filled));
    line.push_str(&"-".repeat(width - filled));
    line
}

/// Whole percent for a done/total pair, guarded against a zero total.
pub(crate) fn percent(done: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        done * 100 / total
    }
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_scales_to_width() {
        assert_eq!(gauge_line(0, 63, 10), "----------");
        assert_eq!(gauge_line(63, 63, 10), "##########");
        assert_eq!(gauge_line(0, 0, 4), "----");
        let half = gauge_line(5, 10, 10);
        assert_eq!(half, "#####-----");
    }

    #[test]
    fn percent_guards_zero_total() {
        assert_eq!(percent(3, 0), 0);
        assert_eq!(percent(12, 63), 19);
    }
}
