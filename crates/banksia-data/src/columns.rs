//! Column names shared by raw, processed and summary tables.

/// Trading date, the ordering key of every price table.
pub const DATE: &str = "Date";
/// Closing price.
pub const CLOSE: &str = "Close";

/// Simple return between consecutive closes.
pub const DAILY_RETURN: &str = "Daily_Return";
/// Compounded return since the first row.
pub const CUMULATIVE_RETURN: &str = "Cumulative_Return";
/// Annualized volatility over the long trailing window.
pub const VOLATILITY_ANNUAL: &str = "Volatility_Annual";
/// Annualized volatility over the short trailing window.
pub const ROLLING_30D_VOLATILITY: &str = "Rolling_30D_Volatility";
/// Relative decline from the running maximum close.
pub const DRAWDOWN: &str = "Drawdown";
/// Sum of returns over the short trailing window.
pub const ROLLING_30D_RETURN: &str = "Rolling_30D_Return";

/// Columns every raw price table must provide.
pub const REQUIRED: [&str; 2] = [DATE, CLOSE];

/// Derived columns in the order they are computed and persisted.
pub const DERIVED: [&str; 6] = [
    DAILY_RETURN,
    CUMULATIVE_RETURN,
    VOLATILITY_ANNUAL,
    ROLLING_30D_VOLATILITY,
    DRAWDOWN,
    ROLLING_30D_RETURN,
];
