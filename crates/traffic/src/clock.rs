/// Parses an `HH:MM:SS` clock value into whole seconds.
///
/// The hour part is unbounded, so spans longer than a day are expressible;
/// minutes and seconds must stay below 60.
pub(crate) fn clock_seconds(input: &str) -> Option<i64> {
    let mut parts = input.split(':');

    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;

    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }

    Some(hours * 3600 + minutes * 60 + seconds)
}
