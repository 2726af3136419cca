use crate::storage::{
    DiceTier, RarityTier, BASE_APY_BPS, BASIS_POINTS, MATURITY_PERIOD, SCALE, TIER2_TASKS,
    TIER3_TASKS, YEAR,
};

/// Bonus-yield thresholds for Uncommon, Rare, Epic and Legendary.
/// Common: [0, 1), Uncommon: [1, 3), Rare: [3, 6), Epic: [6, 10), Legendary: [10, ..)
pub const RARITY_UNCOMMON: i128 = SCALE;
pub const RARITY_RARE: i128 = 3 * SCALE;
pub const RARITY_EPIC: i128 = 6 * SCALE;
pub const RARITY_LEGENDARY: i128 = 10 * SCALE;

impl DiceTier {
    /// Number of faces on this tier's die.
    pub fn range(&self) -> u32 {
        match self {
            DiceTier::Tier1 => 6,
            DiceTier::Tier2 => 12,
            DiceTier::Tier3 => 20,
        }
    }

    /// Bonus APY a maximal roll contributes, in basis points.
    pub fn max_apy_bps(&self) -> i128 {
        match self {
            DiceTier::Tier1 => 1_000,
            DiceTier::Tier2 => 2_000,
            DiceTier::Tier3 => 3_000,
        }
    }

    /// Tier earned by a task count.
    pub fn for_tasks(tasks_completed: u32) -> DiceTier {
        if tasks_completed >= TIER3_TASKS {
            DiceTier::Tier3
        } else if tasks_completed >= TIER2_TASKS {
            DiceTier::Tier2
        } else {
            DiceTier::Tier1
        }
    }
}

/// Returns the rarity for a given bonus yield.
pub fn rarity_for(bonus_yield: i128) -> RarityTier {
    if bonus_yield < RARITY_UNCOMMON {
        RarityTier::Common
    } else if bonus_yield < RARITY_RARE {
        RarityTier::Uncommon
    } else if bonus_yield < RARITY_EPIC {
        RarityTier::Rare
    } else if bonus_yield < RARITY_LEGENDARY {
        RarityTier::Epic
    } else {
        RarityTier::Legendary
    }
}

/// Fixed yield over the maturity window.
///
/// Formula: base = principal × BASE_APY × maturity / year
///
/// Example: 100 × 2% × 90 / 360 = 0.5
pub fn calculate_base_yield(principal: i128) -> Option<i128> {
    principal
        .checked_mul(BASE_APY_BPS)?
        .checked_mul(MATURITY_PERIOD as i128)?
        .checked_div(BASIS_POINTS.checked_mul(YEAR as i128)?)
}

/// Maps a raw random word onto 1..=range for the tier.
pub fn dice_result(tier: DiceTier, random: u64) -> u32 {
    (random % tier.range() as u64) as u32 + 1
}

/// Bonus yield earned by a roll, linear between 0 and the tier's maximum.
///
/// Formula: delta = principal × (result / range) × max_apy × maturity / year
///
/// Example (Tier1, principal 100):
/// - result 6: 100 × 6/6 × 10% × 90/360 = 2.5
/// - result 3: 100 × 3/6 × 10% × 90/360 = 1.25
pub fn calculate_bonus_delta(principal: i128, tier: DiceTier, result: u32) -> Option<i128> {
    let numerator = principal
        .checked_mul(result as i128)?
        .checked_mul(tier.max_apy_bps())?
        .checked_mul(MATURITY_PERIOD as i128)?;
    let denominator = (tier.range() as i128)
        .checked_mul(BASIS_POINTS)?
        .checked_mul(YEAR as i128)?;
    numerator.checked_div(denominator)
}
