//! Versioned instruction account layouts
//!
//! A pool creation instruction only carries an ordered account list. Which
//! position holds which mint is fixed by the program version, so each known
//! ordering is kept here as data.

use crate::shared::errors::PoolError;

/// Semantic role of an instruction account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountRole {
    TokenA,
    TokenB,
}

/// Account ordering of one instruction version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountLayout {
    pub name: &'static str,
    pub version: u8,
    /// Minimum account list length accepted as this instruction
    pub min_accounts: usize,
    roles: &'static [(AccountRole, usize)],
}

impl AccountLayout {
    /// Raydium AMM v4 `initialize2`
    pub const AMM_V4_INITIALIZE2: AccountLayout = AccountLayout {
        name: "amm-v4-initialize2",
        version: 4,
        min_accounts: 10,
        roles: &[
            (AccountRole::TokenA, 8),
            (AccountRole::TokenB, 9),
        ],
    };

    pub const KNOWN: &'static [AccountLayout] = &[Self::AMM_V4_INITIALIZE2];

    pub fn by_name(name: &str) -> Result<AccountLayout, PoolError> {
        Self::KNOWN
            .iter()
            .find(|layout| layout.name == name)
            .copied()
            .ok_or_else(|| PoolError::UnknownLayout(name.to_string()))
    }

    pub fn index_of(&self, role: AccountRole) -> Option<usize> {
        self.roles
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, index)| *index)
    }

    /// Account at `role`, if the list is long enough for this layout
    pub fn account<'a, T>(&self, accounts: &'a [T], role: AccountRole) -> Option<&'a T> {
        if accounts.len() < self.min_accounts {
            return None;
        }
        accounts.get(self.index_of(role)?)
    }
}

impl Default for AccountLayout {
    fn default() -> Self {
        Self::AMM_V4_INITIALIZE2
    }
}
