use super::{MAX_EXPONENT, Unit, UnitError, lookup_named_unit};

const EXPONENT_OUT_OF_RANGE: &str = "exponent out of range";

/// Parse expressions such as `cm2 s`, `1/(keV cm2 s)`, `keV-1 cm^-2 s**-1` or `ph / keV`.
///
/// At most one `/` is accepted; everything after it is inverted.
pub fn parse_unit(expression: &str) -> Result<Unit, UnitError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Ok(Unit::dimensionless());
    }

    let normalized = trimmed.replace("**", "^");
    let mut parts = normalized.split('/');
    let numerator = parts.next().unwrap_or_default();
    let denominator = parts.next();
    if parts.next().is_some() {
        return Err(malformed(expression, "more than one '/'"));
    }

    let mut unit = parse_product(expression, numerator, true)?;
    if let Some(denominator) = denominator {
        let denominator = parse_product(expression, denominator, false)?;
        if denominator.factors.is_empty() {
            return Err(malformed(expression, "empty denominator"));
        }
        unit = &unit / &denominator;
        check_exponents(expression, &unit)?;
    }
    Ok(unit)
}

fn parse_product(expression: &str, text: &str, allow_unity: bool) -> Result<Unit, UnitError> {
    let text = strip_parentheses(expression, text.trim())?;
    let mut unit = Unit::dimensionless();

    for token in text
        .split(|character: char| character.is_whitespace() || character == '*' || character == '.')
        .filter(|token| !token.is_empty())
    {
        if token == "1" {
            if allow_unity {
                continue;
            }
            return Err(malformed(expression, "'1' is only allowed as a numerator"));
        }
        unit = &unit * &parse_factor(expression, token)?;
        check_exponents(expression, &unit)?;
    }

    Ok(unit)
}

fn strip_parentheses<'a>(expression: &str, text: &'a str) -> Result<&'a str, UnitError> {
    match (text.starts_with('('), text.ends_with(')')) {
        (true, true) => {
            let inner = &text[1..text.len() - 1];
            if inner.contains(['(', ')']) {
                Err(malformed(expression, "nested parentheses"))
            } else {
                Ok(inner)
            }
        }
        (false, false) if !text.contains(['(', ')']) => Ok(text),
        _ => Err(malformed(expression, "unbalanced parentheses")),
    }
}

fn parse_factor(expression: &str, token: &str) -> Result<Unit, UnitError> {
    let (name, exponent) = if let Some((name, exponent)) = token.split_once('^') {
        (name, Some(exponent))
    } else {
        let split = token
            .find(|character: char| {
                character.is_ascii_digit() || character == '-' || character == '+'
            })
            .unwrap_or(token.len());
        let (name, exponent) = token.split_at(split);
        (name, (!exponent.is_empty()).then_some(exponent))
    };

    if name.is_empty() {
        return Err(malformed(expression, "exponent without a unit name"));
    }

    let power = match exponent {
        Some(exponent) => exponent
            .parse::<i32>()
            .map_err(|_| malformed(expression, "exponent must be an integer"))?,
        None => 1,
    };
    if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&power) {
        return Err(malformed(expression, EXPONENT_OUT_OF_RANGE));
    }

    let named = lookup_named_unit(name).ok_or_else(|| UnitError::UnknownUnit {
        token: name.to_string(),
    })?;
    Ok(Unit::from_factor(named, power))
}

fn check_exponents(expression: &str, unit: &Unit) -> Result<(), UnitError> {
    if unit.exponents_within(MAX_EXPONENT) {
        Ok(())
    } else {
        Err(malformed(expression, EXPONENT_OUT_OF_RANGE))
    }
}

fn malformed(expression: &str, reason: &'static str) -> UnitError {
    UnitError::Malformed {
        expression: expression.to_string(),
        reason,
    }
}
