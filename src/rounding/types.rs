use thiserror::Error;

/// Politique d'arrondi au plus proche, appliquée aux égalités exactes.
///
/// Les trois dernières variantes sont des arrondis dirigés : elles
/// s'appliquent à tout ratio non entier, pas seulement au point milieu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidpointRounding {
    /// Arrondi bancaire : 2,5 → 2 ; 3,5 → 4.
    #[default]
    ToEven,
    AwayFromZero,
    ToZero,
    ToNegativeInfinity,
    ToPositiveInfinity,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundingError {
    #[error("period must be positive (got {0} ticks)")]
    NonPositivePeriod(i64),
    #[error("rounded value overflows the tick range")]
    Overflow,
}

/// Arrondit exactement `ticks / period` à un entier (`period > 0`).
pub(super) fn round_quotient(ticks: i64, period: i64, midpoint: MidpointRounding) -> i64 {
    let quotient = ticks / period;
    let remainder = ticks % period;
    if remainder == 0 {
        return quotient;
    }
    // le reste porte le signe de `ticks`
    let away = remainder.signum();
    match midpoint {
        MidpointRounding::ToZero => quotient,
        MidpointRounding::ToNegativeInfinity => quotient.min(quotient + away),
        MidpointRounding::ToPositiveInfinity => quotient.max(quotient + away),
        MidpointRounding::ToEven | MidpointRounding::AwayFromZero => {
            let twice = i128::from(remainder).abs() * 2;
            match twice.cmp(&i128::from(period)) {
                std::cmp::Ordering::Less => quotient,
                std::cmp::Ordering::Greater => quotient + away,
                std::cmp::Ordering::Equal => {
                    if midpoint == MidpointRounding::AwayFromZero || quotient % 2 != 0 {
                        quotient + away
                    } else {
                        quotient
                    }
                }
            }
        }
    }
}
