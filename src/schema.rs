//! Registry of the record layouts emitted by the contract test harness.
//!
//! Each [`Dataset`] names a schema, the column headers of its log, and the
//! file that log is kept in. Every decoding path looks layouts up here.

use core::fmt;

use crate::sans::FieldKind::{self, *};

/// A named kind of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// A pool swap and the resulting token deltas.
    Swap,
    /// A snapshot of pool and vault state.
    State,
    /// A vault deposit.
    Deposit,
    /// A vault withdrawal.
    Withdraw,
    /// A request for a random number below a cap.
    RandomRequest,
    /// A position rebalance.
    Rebalance,
}

impl Dataset {
    pub const ALL: [Self; 6] = [
        Self::Swap,
        Self::State,
        Self::Deposit,
        Self::Withdraw,
        Self::RandomRequest,
        Self::Rebalance,
    ];

    /// The name used to select this dataset.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::State => "state",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::RandomRequest => "random-request",
            Self::Rebalance => "rebalance",
        }
    }

    /// Look up a dataset by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Field layout of records in this dataset.
    pub const fn schema(self) -> &'static [FieldKind] {
        match self {
            Self::Swap => &[UInt256, Bool, Bool, UInt256, Int256, Int256, Int256, Int256],
            Self::State => &[
                UInt128, UInt160, UInt160, Int24, Int24, UInt256, UInt256, UInt256, UInt256,
                UInt256, UInt256, UInt256, UInt256,
            ],
            Self::Deposit => &[
                UInt256, Address, UInt256, UInt256, UInt256, UInt256, UInt256, UInt256,
            ],
            Self::Withdraw => &[
                UInt256, UInt256, Address, UInt256, UInt256, UInt256, UInt256, UInt256, UInt256,
                UInt256,
            ],
            Self::RandomRequest => &[UInt256],
            Self::Rebalance => &[Int24, UInt256],
        }
    }

    /// Column headers, one per schema field and in the same order.
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Swap => &[
                "amount",
                "zeroForOne",
                "in",
                "blockNumber",
                "delta0",
                "delta1",
                "delta0c",
                "delta1c",
            ],
            Self::State => &[
                "liquidity",
                "sqrtPriceX96",
                "sqrtPriceX96c",
                "tickLower",
                "tickUpper",
                "borrowed",
                "supplied",
                "collateral",
                "blockNumber",
                "tvl",
                "tvlControl",
                "sharePrice",
                "sharePriceControl",
            ],
            Self::Deposit => &[
                "amount",
                "actor",
                "blockNumber",
                "tWETH",
                "tWETHc",
                "tUSDCc",
                "delShares",
                "delSharesControl",
            ],
            Self::Withdraw => &[
                "shares1",
                "shares2",
                "actor",
                "blockNumber",
                "dWETH",
                "dUSDC",
                "dWETHc",
                "dUSDCc",
                "dSH",
                "dSHc",
            ],
            Self::RandomRequest => &["randomCap"],
            Self::Rebalance => &["tick", "blockNumber"],
        }
    }

    /// Name of the file holding this dataset's log.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Swap => "swaps.csv",
            Self::State => "states.csv",
            Self::Deposit => "deposits.csv",
            Self::Withdraw => "withdraws.csv",
            Self::RandomRequest => "random-requests.csv",
            Self::Rebalance => "rebalances.csv",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
