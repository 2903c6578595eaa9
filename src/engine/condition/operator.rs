// ==========================================
// Value list comparison
// ==========================================
// =   : some value of `a` equals some value of `b`
// !=  : no value of `a` equals any value of `b`
// < > <= >= : some pair (a, b) satisfies the relation
// Two values compare as decimals when both parse, otherwise as text.
// ==========================================

use crate::domain::Operator;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

pub fn compare<A, B>(a: &[A], b: &[B], operator: Operator) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut pairs = a
        .iter()
        .flat_map(|x| b.iter().map(move |y| order(x.as_ref(), y.as_ref())));

    match operator {
        Operator::Eq => pairs.any(|o| o == Ordering::Equal),
        Operator::Ne => pairs.all(|o| o != Ordering::Equal),
        Operator::Lt => pairs.any(|o| o == Ordering::Less),
        Operator::Gt => pairs.any(|o| o == Ordering::Greater),
        Operator::Le => pairs.any(|o| o != Ordering::Greater),
        Operator::Ge => pairs.any(|o| o != Ordering::Less),
    }
}

fn order(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim(), b.trim());
    match (Decimal::from_str(a), Decimal::from_str(b)) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
