// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MXR - CORE CHAIN-STATE PRIMITIVES
//
// Addresses, block hashes, role bitmasks and sub-account balances shared by
// the reward engine and the collaborators that feed it (state tree, chain
// reader, election results, chain-state configuration).
// All financial arithmetic uses integer base units (no floating-point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

pub mod broadcast;
pub mod config;
pub mod state;

/// 1 MAN = 10^18 base units. Configured reward mounts are whole MAN.
pub const MAN_PRICE: u128 = 1_000_000_000_000_000_000;

/// Rate unit: every rate group must sum to exactly this value (100%).
pub const REWARD_FULL_RATE: u64 = 100;

/// Treasury funding the fixed per-block validator reward.
pub const BLK_VALIDATOR_REWARD_ADDRESS: Address = Address::system(0x0A);

/// Treasury funding the fixed per-block miner reward.
pub const BLK_MINER_REWARD_ADDRESS: Address = Address::system(0x0B);

/// Errors from parsing the hex text form of an [`Address`] or [`Hash`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseBytesError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseBytesError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| ParseBytesError::InvalidLength {
            expected: N,
            got: bytes.len(),
        })
}

/// Fixed-size byte identifiers rendered as `0x`-prefixed lowercase hex.
macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = ParseBytesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_fixed::<$len>(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let text = String::deserialize(d)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// 20-byte account address.
    Address,
    20
);

fixed_bytes!(
    /// 32-byte block hash.
    Hash,
    32
);

impl Address {
    /// Reserved system account: nineteen zero bytes followed by `tag`.
    pub const fn system(tag: u8) -> Self {
        let mut bytes = [0u8; 20];
        bytes[19] = tag;
        Address(bytes)
    }
}

// ─────────────────────────────────────────────────────────────────
// ROLE BITMASK
// ─────────────────────────────────────────────────────────────────

/// Election role bitmask. Combine with `|` to request a claimant set,
/// e.g. `Role::VALIDATOR | Role::BACKUP_VALIDATOR`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(u8);

impl Role {
    pub const NONE: Role = Role(0);
    pub const VALIDATOR: Role = Role(1 << 0);
    pub const BACKUP_VALIDATOR: Role = Role(1 << 1);
    pub const MINER: Role = Role(1 << 2);
    pub const BACKUP_MINER: Role = Role(1 << 3);

    const PRIMARY_MASK: u8 = Self::VALIDATOR.0 | Self::MINER.0;
    const BACKUP_MASK: u8 = Self::BACKUP_VALIDATOR.0 | Self::BACKUP_MINER.0;

    pub const fn from_bits(bits: u8) -> Self {
        Role(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Role) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Role) -> bool {
        self.0 & other.0 != 0
    }

    /// The active (non-backup) roles of this mask.
    pub const fn primary(self) -> Role {
        Role(self.0 & Self::PRIMARY_MASK)
    }

    /// The backup (standby) roles of this mask.
    pub const fn backup(self) -> Role {
        Role(self.0 & Self::BACKUP_MASK)
    }
}

impl BitOr for Role {
    type Output = Role;

    fn bitor(self, rhs: Role) -> Role {
        Role(self.0 | rhs.0)
    }
}

impl BitOrAssign for Role {
    fn bitor_assign(&mut self, rhs: Role) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Role, &str); 4] = [
            (Role::VALIDATOR, "VALIDATOR"),
            (Role::BACKUP_VALIDATOR, "BACKUP_VALIDATOR"),
            (Role::MINER, "MINER"),
            (Role::BACKUP_MINER, "BACKUP_MINER"),
        ];
        if self.is_empty() {
            return f.write_str("Role(NONE)");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(role, _)| self.contains(*role))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Role({})", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────
// SUB-ACCOUNT BALANCES
// ─────────────────────────────────────────────────────────────────

/// Balance slots held under a single address.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SubAccount {
    Main,
    Freeze,
    Lock,
    Entrust,
}

/// One sub-account slot. The ledger should never hold a negative balance,
/// but the type admits it so readers can detect a corrupted slot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalance {
    pub sub_account: SubAccount,
    #[serde(with = "state::i128_toml")]
    pub balance: i128,
}

/// All sub-account slots of one address, as returned by the state tree.
pub type AccountBalances = Vec<AccountBalance>;

/// Balance of the `Main` sub-account, if the slot exists.
pub fn main_balance(balances: &[AccountBalance]) -> Option<i128> {
    balances
        .iter()
        .find(|b| b.sub_account == SubAccount::Main)
        .map(|b| b.balance)
}
