//! Market Cap Ranking

use super::coin::NormalizedCoinRecord;

/// Number of coins kept in the heatmap
pub const DEFAULT_TOP_N: usize = 100;

/// Sort by market cap, largest first, and keep at most `top_n` coins.
///
/// Fewer than `top_n` inputs are returned whole. The sort is stable, so ties
/// keep their fetch order.
pub fn rank_by_market_cap(
    mut coins: Vec<NormalizedCoinRecord>,
    top_n: usize,
) -> Vec<NormalizedCoinRecord> {
    coins.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
    coins.truncate(top_n);
    coins
}
