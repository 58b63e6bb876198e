use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Euclidean norm of a 3-axis reading. No unit conversion.
pub fn magnitude(x: f32, y: f32, z: f32) -> f32 {
    (x * x + y * y + z * z).sqrt()
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn positive_parser(s: &str) -> Result<f32, String> {
    let s = s.trim();
    f32::from_str(s)
        .map_err(|e| format!("Invalid value '{}': {}", s, e))
        .and_then(|v| {
            if v.is_finite() && v > 0.0 {
                Ok(v)
            } else {
                Err(format!("Value must be positive, got {}", v))
            }
        })
}

pub fn non_negative_parser(s: &str) -> Result<f32, String> {
    let s = s.trim();
    f32::from_str(s)
        .map_err(|e| format!("Invalid value '{}': {}", s, e))
        .and_then(|v| {
            if v.is_finite() && v >= 0.0 {
                Ok(v)
            } else {
                Err(format!("Value must not be negative, got {}", v))
            }
        })
}

/// Accepts plain milliseconds or a seconds suffix: `3000`, `3000ms`, `3s`, `2.5s`.
pub fn duration_ms_parser(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        return ms.trim().parse::<u64>().map_err(|e| format!("Invalid duration '{}': {}", s, e));
    }
    if let Some(secs) = s.strip_suffix('s') {
        let secs = secs
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("Invalid duration '{}': {}", s, e))?;
        if !(secs.is_finite() && secs >= 0.0) {
            return Err(format!("Duration must not be negative, got {}", s));
        }
        return Ok((secs * 1000.0).round() as u64);
    }
    s.parse::<u64>().map_err(|e| format!("Invalid duration '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude(3.0, 4.0, 0.0), 5.0);
        assert_eq!(magnitude(0.0, 0.0, -9.8), 9.8);
        assert!(magnitude(-1.0, -1.0, -1.0) >= 0.0);
    }

    #[test]
    fn test_positive_parser() {
        assert_eq!(positive_parser("0.5"), Ok(0.5));
        assert_eq!(positive_parser(" 50 "), Ok(50.0));
        assert!(positive_parser("0").is_err());
        assert!(positive_parser("-1").is_err());
        assert!(positive_parser("inf").is_err());
        assert!(positive_parser("abc").is_err());
    }

    #[test]
    fn test_non_negative_parser() {
        assert_eq!(non_negative_parser("0"), Ok(0.0));
        assert!(non_negative_parser("-0.1").is_err());
    }

    #[test]
    fn test_duration_parser() {
        assert_eq!(duration_ms_parser("3000"), Ok(3000));
        assert_eq!(duration_ms_parser("3000ms"), Ok(3000));
        assert_eq!(duration_ms_parser("3s"), Ok(3000));
        assert_eq!(duration_ms_parser("2.5s"), Ok(2500));
        assert!(duration_ms_parser("-1s").is_err());
        assert!(duration_ms_parser("soon").is_err());
    }
}
