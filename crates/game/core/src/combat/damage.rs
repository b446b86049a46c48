//! Damage calculation and application.

/// Lowest damage any hit can deal, so combat always progresses.
pub const MINIMUM_DAMAGE: u32 = 1;

/// Calculate damage from an attack.
///
/// # Formula
///
/// ```text
/// damage = max(attack - defense, MINIMUM_DAMAGE)
/// ```
///
/// Both sides are effective values (status bonuses included) and may be
/// negative after debuffs.
pub fn calculate_damage(attack: i32, defense: i32) -> u32 {
    let raw = i64::from(attack) - i64::from(defense);
    raw.clamp(i64::from(MINIMUM_DAMAGE), i64::from(u32::MAX)) as u32
}

/// Split of incoming damage between the shield pool and HP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Absorption {
    /// Damage soaked by the shield: `min(shield, damage)`.
    pub absorbed: u32,
    /// Damage that reaches HP: `damage - absorbed`.
    pub hp_damage: u32,
    /// Shield left afterwards: `shield - absorbed`.
    pub shield_left: u32,
}

/// Runs `damage` through a shield pool.
pub fn absorb(shield: u32, damage: u32) -> Absorption {
    let absorbed = shield.min(damage);
    Absorption {
        absorbed,
        hp_damage: damage - absorbed,
        shield_left: shield - absorbed,
    }
}

/// Apply damage to current HP.
///
/// # Returns
///
/// New HP value (clamped to 0)
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}
