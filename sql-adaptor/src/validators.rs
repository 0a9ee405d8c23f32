/// Checks a raw query value before it is bound to a field.
pub type ValidatorFn = fn(&str) -> Result<(), String>;

/// Accepts anything.
pub fn null_validator(_value: &str) -> Result<(), String> {
    Ok(())
}

/// Accepts any integer that fits the widest integer column (`i128`).
pub fn integer_validator(value: &str) -> Result<(), String> {
    value
        .parse::<i128>()
        .map(|_| ())
        .map_err(|_| format!("value '{value}' is not an integer"))
}

/// Accepts finite decimal numbers, integers included.
pub fn numeric_validator(value: &str) -> Result<(), String> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(()),
        _ => Err(format!("value '{value}' is not numeric")),
    }
}
