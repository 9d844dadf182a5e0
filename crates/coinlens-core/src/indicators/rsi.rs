use super::rolling::RollingWindow;

/// RSI value used when the trailing window contains no losing day.
pub const SATURATED_RSI: f64 = 100.0;

/// Relative Strength Index over simple trailing averages.
///
/// Day-over-day deltas are split into a gain side and a loss side (a day
/// contributes zero to the side it does not belong to). RSI at index `i`
/// needs `window` deltas, so the first defined value is at `i == window`.
/// A window without any loss saturates at [`SATURATED_RSI`].
pub fn relative_strength_index(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut output = Vec::with_capacity(closes.len());
    if window == 0 {
        output.resize(closes.len(), None);
        return output;
    }

    let mut gains = RollingWindow::new(window);
    let mut losses = RollingWindow::new(window);

    for (index, close) in closes.iter().enumerate() {
        if index == 0 {
            output.push(None);
            continue;
        }

        let delta = close - closes[index - 1];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });

        output.push(rsi_from_windows(&gains, &losses));
    }

    output
}

fn rsi_from_windows(gains: &RollingWindow, losses: &RollingWindow) -> Option<f64> {
    let gain = gains.mean()?;
    let loss = losses.mean()?;

    if losses.all_zero() || loss <= 0.0 {
        return Some(SATURATED_RSI);
    }
    if gains.all_zero() {
        return Some(0.0);
    }

    let relative_strength = gain / loss;
    let rsi = 100.0 - 100.0 / (1.0 + relative_strength);
    Some(rsi.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_defined_value_needs_window_deltas() {
        let closes: Vec<f64> = (0..20).map(f64::from).collect();
        let rsi = relative_strength_index(&closes, 14);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14..].iter().all(|value| *value == Some(SATURATED_RSI)));
    }

    #[test]
    fn monotone_decline_is_zero() {
        let closes: Vec<f64> = (0..10).rev().map(|v| f64::from(v) + 1.0).collect();
        let rsi = relative_strength_index(&closes, 3);
        assert_eq!(rsi[9], Some(0.0));
    }

    #[test]
    fn flat_series_saturates_instead_of_dividing_by_zero() {
        let rsi = relative_strength_index(&[5.0; 6], 3);
        assert_eq!(rsi[5], Some(SATURATED_RSI));
    }

    #[test]
    fn matches_hand_computed_value() {
        // deltas: +2, -1, +1 -> gain = 3/3, loss = 1/3, rs = 3
        let rsi = relative_strength_index(&[10.0, 12.0, 11.0, 12.0], 3);
        let value = rsi[3].expect("defined");
        assert!((value - 75.0).abs() < 1e-12);
    }

    #[test]
    fn losses_leaving_the_window_restore_saturation() {
        // one loss early, then only gains
        let closes = [10.0, 9.0, 10.0, 11.0, 12.0, 13.0];
        let rsi = relative_strength_index(&closes, 2);
        assert!(rsi[2].expect("defined") < 100.0);
        assert_eq!(rsi[3], Some(SATURATED_RSI));
        assert_eq!(rsi[5], Some(SATURATED_RSI));
    }
}
