/// Result of checking a child against the space left in its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Centralized logic to check if a child fits in the remaining space.
///
/// * `cursor_y`: The current Y position relative to the container's content origin.
/// * `child_height`: The outer height the child requires.
/// * `available_height`: The container's available height on the current page.
/// * `tolerance`: Slack for floating point inaccuracies.
pub fn check_child_fit(
    cursor_y: f32,
    child_height: f32,
    available_height: f32,
    tolerance: f32,
) -> BreakAnalysis {
    let available = (available_height - cursor_y).max(0.0);
    BreakAnalysis {
        should_break: child_height > available + tolerance,
        remaining_height: available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit_does_not_break() {
        let fit = check_child_fit(600.0, 100.0, 700.0, 0.01);
        assert!(!fit.should_break);
        assert_eq!(fit.remaining_height, 100.0);
    }

    #[test]
    fn test_tolerance_absorbs_rounding() {
        assert!(!check_child_fit(0.0, 100.005, 100.0, 0.01).should_break);
        assert!(check_child_fit(0.0, 100.5, 100.0, 0.01).should_break);
    }

    #[test]
    fn test_unbounded_height_always_fits() {
        assert!(!check_child_fit(1e6, 5e6, f32::INFINITY, 0.01).should_break);
    }
}
