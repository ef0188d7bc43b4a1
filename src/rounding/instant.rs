use super::types::{round_quotient, MidpointRounding, RoundingError};
use crate::model::{Duration, Instant};

/// Plus petit multiple de `period` supérieur ou égal à `instant` (décalage conservé).
///
/// # Panics
/// Si `period` vaut zéro (division entière), ou si `ticks + period - 1`
/// dépasse `i64::MAX` ; voir [`checked_round_up`] pour une entrée non bornée.
pub fn round_up(instant: Instant, period: Duration) -> Instant {
    let p = period.ticks();
    instant.with_ticks((instant.ticks() + p - 1) / p * p)
}

/// Comme [`round_up`], `None` si la période est nulle ou si le calcul déborde.
pub fn checked_round_up(instant: Instant, period: Duration) -> Option<Instant> {
    let p = period.ticks();
    let ticks = instant
        .ticks()
        .checked_add(p)?
        .checked_sub(1)?
        .checked_div(p)?
        .checked_mul(p)?;
    Some(instant.with_ticks(ticks))
}

/// Plus grand multiple de `period` inférieur ou égal à `instant` (décalage conservé).
///
/// Le reste est tronqué vers zéro : pour des ticks négatifs, le résultat est
/// tiré vers zéro et peut donc dépasser `instant`.
///
/// # Panics
/// Si `period` vaut zéro (division entière).
pub fn round_down(instant: Instant, period: Duration) -> Instant {
    let delta = instant.ticks() % period.ticks();
    instant.with_ticks(instant.ticks() - delta)
}

/// Multiple de `period` le plus proche, égalités tranchées par `midpoint`.
///
/// Le ratio `ticks / period` est arrondi en arithmétique entière exacte.
pub fn round(
    instant: Instant,
    period: Duration,
    midpoint: MidpointRounding,
) -> Result<Instant, RoundingError> {
    let p = period.ticks();
    if p <= 0 {
        return Err(RoundingError::NonPositivePeriod(p));
    }
    let units = round_quotient(instant.ticks(), p, midpoint);
    let ticks = units.checked_mul(p).ok_or(RoundingError::Overflow)?;
    Ok(instant.with_ticks(ticks))
}
