pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let variance = data.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt())
}

/// Running summary of one channel, shown under the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub last: f64,
}

pub fn summarize(data: &[f64]) -> Option<ChannelSummary> {
    Some(ChannelSummary {
        mean: mean(data)?,
        std_dev: std_dev(data)?,
        last: *data.last()?,
    })
}
