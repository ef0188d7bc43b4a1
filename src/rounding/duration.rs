use crate::model::Duration;

/// Plus grand multiple de `period` inférieur ou égal à `duration`
/// (reste tronqué vers zéro, comme pour [`round_down`](super::round_down)).
pub fn round_down_duration(duration: Duration, period: Duration) -> Duration {
    let delta = duration.ticks() % period.ticks();
    Duration::from_ticks(duration.ticks() - delta)
}

/// # Panics
/// Mêmes cas que [`round_up`](super::round_up) : période nulle ou débordement.
pub fn round_up_duration(duration: Duration, period: Duration) -> Duration {
    let p = period.ticks();
    Duration::from_ticks((duration.ticks() + p - 1) / p * p)
}

pub fn checked_round_up_duration(duration: Duration, period: Duration) -> Option<Duration> {
    let p = period.ticks();
    let ticks = duration
        .ticks()
        .checked_add(p)?
        .checked_sub(1)?
        .checked_div(p)?
        .checked_mul(p)?;
    Some(Duration::from_ticks(ticks))
}

/// Arrondi au multiple le plus proche, point milieu toujours loin de zéro.
///
/// Contrairement à [`round`](super::round), une période nulle n'est pas une
/// erreur : la durée est renvoyée inchangée.
pub fn round_duration(duration: Duration, period: Duration) -> Duration {
    let p = period.ticks();
    if p == 0 {
        return duration;
    }
    let shifted = duration.ticks() + duration.ticks().signum() * p / 2;
    Duration::from_ticks(shifted - shifted % p)
}
