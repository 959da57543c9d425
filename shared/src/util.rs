use rust_decimal::{Decimal, RoundingStrategy};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 record id.
///
/// Layout (53 bits, safe for JSON consumers):
///   - 41 bits: milliseconds since 2024-01-01 UTC
///   - 12 bits: random
///
/// The store's primary key constraint is the final arbiter on collisions.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000);
    (ts << 12) | rand_bits
}

/// Decimal places of every stored money amount
pub const MONEY_SCALE: u32 = 2;

/// Round a money amount to [`MONEY_SCALE`] places, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Trim a string and drop it if nothing is left
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
