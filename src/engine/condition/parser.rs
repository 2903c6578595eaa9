// ==========================================
// Condition line parsing
// ==========================================
// "<id> <operator> <v1>,<v2>,..."  (values may not be empty)
// ==========================================

use super::error::{ConditionError, ConditionResult};
use crate::domain::{Condition, Operator};

pub fn parse_condition(line: &str) -> ConditionResult<Condition> {
    let mut tokens = line.split_whitespace();
    let (Some(id), Some(symbol)) = (tokens.next(), tokens.next()) else {
        return Err(ConditionError::Syntax(line.trim().to_string()));
    };
    let rest = tokens.collect::<Vec<_>>().join(" ");

    let operator = Operator::from_symbol(symbol)
        .ok_or_else(|| ConditionError::UnknownOperator(symbol.to_string()))?;

    let value: Vec<String> = rest
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    if value.is_empty() {
        return Err(ConditionError::Syntax(line.trim().to_string()));
    }

    Ok(Condition {
        id: id.to_lowercase(),
        operator,
        value,
    })
}

/// One condition per non-blank line; errors carry the 1-based line number
pub fn parse_conditions(text: &str) -> ConditionResult<Vec<Condition>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_condition(line).map_err(|e| ConditionError::Line {
                line: index + 1,
                source: Box::new(e),
            })
        })
        .collect()
}
