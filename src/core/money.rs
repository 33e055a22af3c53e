use rust_decimal::{Decimal, RoundingStrategy};

/// Money amounts are stored with cent precision (DECIMAL(15,2))
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a DECIMAL(15,2) column holds: 9_999_999_999_999.99
pub const MAX_AMOUNT: Decimal =
    Decimal::from_parts(2_764_472_319, 232_830, 0, false, MONEY_SCALE);

/// Rounds a value to cents, half away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Validates that an amount is non-negative, fits the storage column and has
/// at most two decimal places
pub fn validate_amount(field: &str, amount: Decimal) -> Result<(), String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("{} cannot be negative", field));
    }

    if amount > MAX_AMOUNT {
        return Err(format!("{} cannot exceed {}", field, MAX_AMOUNT));
    }

    if amount.normalize().scale() > MONEY_SCALE {
        return Err(format!(
            "{} must have at most {} decimal places, got {}",
            field,
            MONEY_SCALE,
            amount.normalize().scale()
        ));
    }

    Ok(())
}

/// Splits `total` into `parts` cent-precise shares that add back up to `total`.
///
/// Every share but the last is `total / parts` truncated to cents; the last one
/// absorbs the remainder, so 10000 over 3 becomes 3333.33, 3333.33, 3333.34.
pub fn split_evenly(total: Decimal, parts: u32) -> Vec<Decimal> {
    if parts == 0 {
        return Vec::new();
    }

    let share = (total / Decimal::from(parts))
        .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);
    let mut shares = vec![share; parts as usize];
    let allocated = share * Decimal::from(parts - 1);
    if let Some(last) = shares.last_mut() {
        *last = total - allocated;
    }
    shares
}

/// Formats an amount as Brazilian Real for display, e.g. `R$ 8.000,00`
pub fn format_brl(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (integer, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-R$ {},{}", grouped, cents)
    } else {
        format!("R$ {},{}", grouped, cents)
    }
}
