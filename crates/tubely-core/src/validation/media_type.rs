//! Content-Type parsing for uploaded parts.

use crate::AppError;

fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`'
                        | '|' | '~'
                )
        })
}

/// Split `raw` on the `;` separators that sit outside quoted strings.
///
/// `None` when a quoted string is left open.
fn split_segments(raw: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return None;
    }
    segments.push(&raw[start..]);
    Some(segments)
}

fn is_parameter_value(value: &str) -> bool {
    is_token(value) || (value.len() >= 2 && value.starts_with('"') && value.ends_with('"'))
}

/// Parse a declared Content-Type into its normalized media type.
///
/// Parameters are validated and then dropped (`"video/MP4; codecs=avc1"` becomes
/// `"video/mp4"`), so they can never be used to slip past an allow-list comparison.
pub fn parse_media_type(raw: &str) -> Result<String, AppError> {
    let invalid_parameter = || {
        AppError::InvalidInput(format!(
            "Invalid media parameter in content type: {:?}",
            raw
        ))
    };

    let segments = split_segments(raw).ok_or_else(invalid_parameter)?;
    let mut segments = segments.into_iter();
    let essence = segments.next().unwrap_or_default().trim().to_lowercase();

    let (kind, subtype) = essence
        .split_once('/')
        .ok_or_else(|| AppError::InvalidInput(format!("Unsupported file type: {:?}", raw)))?;
    if !is_token(kind) || !is_token(subtype) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported file type: {:?}",
            raw
        )));
    }

    for parameter in segments {
        let parameter = parameter.trim();
        if parameter.is_empty() {
            continue;
        }
        match parameter.split_once('=') {
            Some((key, value)) if is_token(key.trim()) && is_parameter_value(value.trim()) => {}
            _ => return Err(invalid_parameter()),
        }
    }

    Ok(essence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_media_type() {
        assert_eq!(parse_media_type("video/mp4").unwrap(), "video/mp4");
        assert_eq!(parse_media_type("image/png").unwrap(), "image/png");
    }

    #[test]
    fn test_parameters_are_dropped_and_case_normalized() {
        assert_eq!(
            parse_media_type("Video/MP4; codecs=\"avc1.42E01E\"").unwrap(),
            "video/mp4"
        );
        assert_eq!(
            parse_media_type(" image/jpeg ; charset=binary").unwrap(),
            "image/jpeg"
        );
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(parse_media_type("").is_err());
        assert!(parse_media_type("video").is_err());
        assert!(parse_media_type("video/").is_err());
        assert!(parse_media_type("/mp4").is_err());
        assert!(parse_media_type("video/mp 4").is_err());
        assert!(parse_media_type("video/mp4; broken").is_err());
        assert!(parse_media_type("video/mp4; codecs=").is_err());
    }

    #[test]
    fn test_semicolon_inside_quoted_parameter() {
        assert_eq!(
            parse_media_type("video/mp4; codecs=\"avc1;mp4a\"").unwrap(),
            "video/mp4"
        );
        assert_eq!(
            parse_media_type("video/mp4; name=\"a\\\";b\"; charset=binary").unwrap(),
            "video/mp4"
        );
    }

    #[test]
    fn test_unterminated_quote_is_rejected() {
        assert!(matches!(
            parse_media_type("video/mp4; codecs=\"avc1;mp4a"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
