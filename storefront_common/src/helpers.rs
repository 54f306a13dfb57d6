use std::str::FromStr;

/// Interpret an optional environment value as a boolean flag. Unset or unrecognised values fall back to `default`.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse an optional environment value, returning the parse error message so that callers can log it before
/// falling back to a default.
pub fn parse_value<T>(value: Option<String>) -> Option<Result<T, String>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map(|v| v.trim().parse::<T>().map_err(|e| format!("'{v}' is not valid. {e}")))
}
